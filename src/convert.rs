//! Base-N integer to text conversion through a fixed scratch buffer.

use snafu::{ensure, OptionExt};
use static_assertions::const_assert;

use crate::error::{DigitOutOfRangeSnafu, Result, ScratchOverflowSnafu, UnsupportedBaseSnafu};
use crate::writer::Writer;

/// Padding is only emitted while the remaining pad count stays below this.
pub const PAD_LIMIT: usize = 16;

/// 64 binary digits, a sign, and the widest padding run.
pub const SCRATCH_LEN: usize = 80;

const_assert!(SCRATCH_LEN >= 64 + 1 + (PAD_LIMIT - 2));

/// Digit table for one letter case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alphabet {
    digits: &'static [u8; 16],
    exponent: u8,
}

impl Alphabet {
    pub const LOWER: Alphabet = Alphabet {
        digits: b"0123456789abcdef",
        exponent: b'e',
    };
    pub const UPPER: Alphabet = Alphabet {
        digits: b"0123456789ABCDEF",
        exponent: b'E',
    };

    pub fn digit(&self, value: u64) -> Result<u8> {
        usize::try_from(value)
            .ok()
            .and_then(|i| self.digits.get(i))
            .copied()
            .context(DigitOutOfRangeSnafu { digit: value })
    }

    /// Marker between mantissa and exponent in scientific notation.
    pub fn exponent_marker(&self) -> u8 {
        self.exponent
    }
}

/// Field layout for one converted number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Minimum width, sign included.
    pub width: usize,
    pub fill: u8,
    pub negative: bool,
}

#[cfg(test)]
impl Field {
    pub(crate) const PLAIN: Field = Field {
        width: 0,
        fill: b' ',
        negative: false,
    };
}

pub(crate) struct Scratch {
    buf: [u8; SCRATCH_LEN],
    len: usize,
}

impl Scratch {
    pub(crate) fn new() -> Self {
        Self {
            buf: [0; SCRATCH_LEN],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, b: u8) -> Result<()> {
        let slot = self.buf.get_mut(self.len).ok_or_else(|| {
            log::trace!("scratch buffer full at {} bytes", SCRATCH_LEN);
            ScratchOverflowSnafu.build()
        })?;
        *slot = b;
        self.len += 1;
        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Writes `magnitude` in `base`, padded and signed per `field`.
///
/// A zero fill puts the sign before the padding (`-0042`), a space fill
/// after it (`  -42`). Padding is emitted only when the pad count left
/// after digits and sign lies in `2..PAD_LIMIT`; a count of one or a
/// wider field gets none.
pub fn convert(
    out: &mut Writer<'_>,
    magnitude: u64,
    base: u64,
    alphabet: &Alphabet,
    field: Field,
) -> Result<()> {
    ensure!((2..=16).contains(&base), UnsupportedBaseSnafu { base });

    // largest power of base not above magnitude; stop before it wraps
    let mut place = 1u64;
    let mut count = field.width;
    while let Some(next) = place.checked_mul(base) {
        if next > magnitude {
            break;
        }
        place = next;
        count = count.wrapping_sub(1);
    }

    let mut negative = field.negative;
    if negative {
        count = count.wrapping_sub(1);
    }

    let mut scratch = Scratch::new();
    if negative && field.fill == b'0' {
        scratch.push(b'-')?;
        negative = false;
    }
    if count > 1 && count < PAD_LIMIT {
        for _ in 1..count {
            scratch.push(field.fill)?;
        }
    }
    if negative {
        scratch.push(b'-')?;
    }

    while place > 0 {
        scratch.push(alphabet.digit((magnitude / place) % base)?)?;
        place /= base;
    }

    out.write(scratch.as_bytes())
}
