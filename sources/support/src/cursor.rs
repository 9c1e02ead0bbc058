use std::io::Cursor;
use std::ops::{Deref, DerefMut};

use crate::bytes_ext::{SafeBuf, Truncated};

/// Sequential little endian reader over an addressable byte source.
///
/// Reads never panic: running off the end yields [`Truncated`] and leaves the
/// position untouched. Seeking past the end is allowed, the next read fails.
#[derive(Debug, Clone)]
pub struct ByteCursor<T> {
    inner: Cursor<T>,
}

macro_rules! forward_reads {
    ( $($type:ident),* ) => {
        paste::paste! {
            $(
            pub fn [<read_ $type>](&mut self) -> Result<$type, Truncated> {
                self.inner.[<safe_get_ $type _le>]()
            }
            )*
        }
    };
}

impl<T: AsRef<[u8]>> ByteCursor<T> {
    pub fn new(source: T) -> Self {
        Self {
            inner: Cursor::new(source),
        }
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn seek(&mut self, pos: u64) {
        self.inner.set_position(pos);
    }

    pub fn len(&self) -> u64 {
        self.inner.get_ref().as_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position()) as usize
    }

    pub fn get_ref(&self) -> &T {
        self.inner.get_ref()
    }

    forward_reads!(u16, u32, u64, i16, i32, i64);

    pub fn read_u8(&mut self) -> Result<u8, Truncated> {
        self.inner.safe_get_u8()
    }

    pub fn read_bool(&mut self) -> Result<bool, Truncated> {
        self.inner.safe_get_bool()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, Truncated> {
        self.inner.safe_copy_bytes(len)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Truncated> {
        self.inner.safe_skip(len)
    }

    /// Borrow the cursor such that its position is restored once the guard drops.
    pub fn save(&mut self) -> PositionGuard<'_, T> {
        let saved = self.position();
        PositionGuard {
            cursor: self,
            saved,
        }
    }

    /// Run `f` against this cursor, restoring the current position on every exit path.
    pub fn scoped<R, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, E>) -> Result<R, E> {
        let mut guard = self.save();
        f(&mut *guard)
    }
}

pub struct PositionGuard<'a, T: AsRef<[u8]>> {
    cursor: &'a mut ByteCursor<T>,
    saved: u64,
}

impl<T: AsRef<[u8]>> Deref for PositionGuard<'_, T> {
    type Target = ByteCursor<T>;

    fn deref(&self) -> &Self::Target {
        self.cursor
    }
}

impl<T: AsRef<[u8]>> DerefMut for PositionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cursor
    }
}

impl<T: AsRef<[u8]>> Drop for PositionGuard<'_, T> {
    fn drop(&mut self) {
        self.cursor.seek(self.saved);
    }
}
