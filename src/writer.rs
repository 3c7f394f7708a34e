use snafu::{ensure, OptionExt};

use crate::error::{DestinationFullSnafu, Result};

/// The only code that touches destination memory.
///
/// Every write copies a run of bytes at the current end and re-terminates
/// the text right after it, so the destination is a valid string between
/// any two writes.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    /// Starts an empty, terminated text at the front of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Result<Self> {
        let first = buf
            .first_mut()
            .context(DestinationFullSnafu { capacity: 0usize })?;
        *first = 0;
        Ok(Self { buf, pos: 0 })
    }

    pub fn write(&mut self, src: &[u8]) -> Result<()> {
        let end = self.pos + src.len();
        ensure!(
            end < self.buf.len(),
            DestinationFullSnafu {
                capacity: self.buf.len()
            }
        );
        self.buf[self.pos..end].copy_from_slice(src);
        self.buf[end] = 0;
        self.pos = end;
        Ok(())
    }

    /// Length of the text written so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}
