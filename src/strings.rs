//! Bounded string helpers for targets without a C library.
//!
//! Text is a byte slice ending at its first NUL; the slice end counts as a
//! terminator too.

use core::cmp::Ordering;

use snafu::ensure;

use crate::error::{DestinationFullSnafu, Result};

/// Counts bytes before the terminator, never looking past `max`.
pub fn bounded_length(text: &[u8], max: usize) -> usize {
    text.iter().take(max).take_while(|&&b| b != 0).count()
}

/// The terminated prefix of `buf`.
pub fn as_text(buf: &[u8]) -> &[u8] {
    &buf[..bounded_length(buf, buf.len())]
}

/// Copies `src` and its terminator into `dst`, returning `dst`.
pub fn copy_to_terminator<'a>(dst: &'a mut [u8], src: &[u8]) -> Result<&'a mut [u8]> {
    let text = as_text(src);
    ensure!(
        text.len() < dst.len(),
        DestinationFullSnafu {
            capacity: dst.len()
        }
    );
    dst[..text.len()].copy_from_slice(text);
    dst[text.len()] = 0;
    Ok(dst)
}

/// Three-way comparison of two terminated strings.
///
/// Bytes are compared only while both sides are still inside their text,
/// so a string that is a prefix of the other compares `Equal`.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .zip(b)
        .take_while(|(x, y)| **x != 0 && **y != 0)
        .map(|(x, y)| x.cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}
