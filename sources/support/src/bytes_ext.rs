use thiserror::Error;

/// A read ran past the end of the underlying bytes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("out of bytes: needed {needed} at position {position}, only {remaining} remaining")]
pub struct Truncated {
    pub needed: usize,
    pub remaining: usize,
    pub position: u64,
}

/**
This macro builds a set of `safe_get_{number_type}_le` functions for safe reading of
little endian values from a Buf. They return Result<T> instead of panicking.
The reported position is relative to the start of the buffer as seen by the caller,
which is only meaningful for cursors, so plain buffers report 0.
 */
macro_rules! impl_safebuf {
    ( $($type:ident),* ) => {
        pub trait SafeBuf: bytes::Buf {
            /// Absolute position used in truncation errors.
            fn position_hint(&self) -> u64 {
                0
            }

            fn ensure(&self, needed: usize) -> Result<(), Truncated> {
                if self.remaining() >= needed {
                    Ok(())
                } else {
                    Err(Truncated {
                        needed,
                        remaining: self.remaining(),
                        position: self.position_hint(),
                    })
                }
            }

            fn safe_get_u8(&mut self) -> Result<u8, Truncated> {
                self.ensure(1)?;
                Ok(self.get_u8())
            }

            fn safe_get_bool(&mut self) -> Result<bool, Truncated> {
                Ok(self.safe_get_u8()? != 0)
            }

            fn safe_copy_bytes(&mut self, len: usize) -> Result<Vec<u8>, Truncated> {
                self.ensure(len)?;
                let mut out = vec![0; len];
                self.copy_to_slice(&mut out);
                Ok(out)
            }

            fn safe_skip(&mut self, len: usize) -> Result<(), Truncated> {
                self.ensure(len)?;
                self.advance(len);
                Ok(())
            }

            paste::paste! {
                $(
                fn [<safe_get_ $type _le>](&mut self) -> Result<$type, Truncated> {
                    self.ensure(std::mem::size_of::<$type>())?;
                    Ok(self.[<get_ $type _le>]())
                }
                )*
            }
        }

        impl SafeBuf for &[u8] {}
        impl SafeBuf for bytes::Bytes {}

        impl<T: AsRef<[u8]>> SafeBuf for std::io::Cursor<T> {
            fn position_hint(&self) -> u64 {
                self.position()
            }
        }
    }
}

impl_safebuf!(u16, u32, u64, i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn it_reads_little_endian() -> anyhow::Result<()> {
        let mut buf: &[u8] = &[0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        assert_eq!(buf.safe_get_u16_le()?, 0x1234);
        assert_eq!(buf.safe_get_u32_le()?, 0x12345678);
        assert!(buf.is_empty());

        Ok(())
    }

    #[test]
    fn it_reports_truncation_with_position() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        cursor.set_position(1);

        let err = cursor.safe_get_u32_le().unwrap_err();
        assert_eq!(
            err,
            Truncated {
                needed: 4,
                remaining: 2,
                position: 1
            }
        );

        // A failed read does not consume anything
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn it_reads_with_buf_in_scope() -> anyhow::Result<()> {
        use bytes::{Buf, Bytes};

        let mut buf = Bytes::from_static(&[0xff, 0x02, 0x01, 0x00, 0x00, 0x00, 0x07]);
        assert_eq!(buf.safe_get_u8()?, 0xff);
        assert_eq!(buf.safe_get_u16_le()?, 0x0102);
        buf.safe_skip(2)?;
        assert_eq!(buf.get_u8(), 0x00);
        assert_eq!(buf.safe_copy_bytes(1)?, vec![0x07]);
        assert_eq!(buf.safe_get_i32_le().unwrap_err().needed, 4);

        Ok(())
    }

    #[test]
    fn it_reads_booleans_as_nonzero() -> anyhow::Result<()> {
        let mut buf: &[u8] = &[0, 1, 0x80];
        assert!(!buf.safe_get_bool()?);
        assert!(buf.safe_get_bool()?);
        assert!(buf.safe_get_bool()?);

        Ok(())
    }
}
