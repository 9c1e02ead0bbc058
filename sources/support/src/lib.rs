pub mod bytes_ext;
pub mod cursor;

#[cfg(test)]
mod tests {
    use crate::bytes_ext::Truncated;
    use crate::cursor::ByteCursor;
    use anyhow::Result;

    #[test]
    fn it_reads_sequential_fields() -> Result<()> {
        let mut data = vec![];
        data.extend_from_slice(&0xa2ab0bf0u32.to_le_bytes());
        data.extend_from_slice(&(-2i32).to_le_bytes());
        data.extend_from_slice(&0x0102030405060708u64.to_le_bytes());
        data.push(1);

        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_u32()?, 0xa2ab0bf0);
        assert_eq!(cursor.read_i32()?, -2);
        assert_eq!(cursor.read_u64()?, 0x0102030405060708);
        assert!(cursor.read_bool()?);
        assert_eq!(cursor.remaining(), 0);

        Ok(())
    }

    #[test]
    fn it_restores_position_after_scope() -> Result<()> {
        let mut cursor = ByteCursor::new(vec![0u8; 32]);
        cursor.skip(4)?;

        let value = cursor.scoped(|c| {
            c.seek(16);
            c.read_u64()
        })?;

        assert_eq!(value, 0);
        assert_eq!(cursor.position(), 4);

        Ok(())
    }

    #[test]
    fn it_restores_position_after_failed_scope() -> Result<()> {
        let mut cursor = ByteCursor::new(vec![0u8; 8]);
        cursor.skip(2)?;

        let res: Result<u64, Truncated> = cursor.scoped(|c| {
            c.seek(6);
            c.read_u64()
        });

        assert!(res.is_err());
        assert_eq!(cursor.position(), 2);

        Ok(())
    }

    #[test]
    fn it_fails_reads_past_a_far_seek() {
        let mut cursor = ByteCursor::new([0u8; 4]);
        cursor.seek(100);

        assert_eq!(cursor.remaining(), 0);
        assert_eq!(
            cursor.read_u16(),
            Err(Truncated {
                needed: 2,
                remaining: 0,
                position: 100
            })
        );
    }

    #[test]
    fn it_reads_raw_bytes_and_skips() -> Result<()> {
        let mut cursor = ByteCursor::new(b"..hello".as_slice());
        cursor.skip(2)?;
        assert_eq!(cursor.read_bytes(5)?, b"hello");
        assert!(cursor.skip(1).is_err());

        Ok(())
    }
}
