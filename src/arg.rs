//! The argument sequence: tagged values consumed one per conversion.

use core::fmt;

use snafu::OptionExt;

use crate::error::{ArgumentMismatchSnafu, MissingArgumentSnafu, Result};
use crate::strings::as_text;

/// One formatting argument.
///
/// Built by the caller (or by `sprintf!`) before the call and consumed
/// left to right, one per conversion other than `%%`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Char(u8),
    Float(f64),
    /// Text ends at its first NUL or at the slice end.
    Str(&'a [u8]),
    Ptr(usize),
}

/// The tag class a conversion asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    Integer,
    Float,
    Text,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::Integer => "an integer",
            ArgKind::Float => "a float",
            ArgKind::Text => "text",
        })
    }
}

impl Arg<'_> {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Int(_) | Arg::Uint(_) | Arg::Char(_) | Arg::Ptr(_) => ArgKind::Integer,
            Arg::Float(_) => ArgKind::Float,
            Arg::Str(_) => ArgKind::Text,
        }
    }
}

macro_rules! from_signed {
    ($($t: ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t: ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg<'_> {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

impl From<f64> for Arg<'_> {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

/// Only the low byte survives; multi-byte characters are not supported.
impl From<char> for Arg<'_> {
    fn from(c: char) -> Self {
        Arg::Char(c as u32 as u8)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Arg::Str(s)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(s: &'a [u8; N]) -> Self {
        Arg::Str(s)
    }
}

impl<T> From<*const T> for Arg<'_> {
    fn from(p: *const T) -> Self {
        Arg::Ptr(p as usize)
    }
}

impl<T> From<*mut T> for Arg<'_> {
    fn from(p: *mut T) -> Self {
        Arg::Ptr(p as usize)
    }
}

/// Cursor over the argument list of a single format call.
pub(crate) struct Args<'a, 'b> {
    list: &'b [Arg<'a>],
    next: usize,
}

impl<'a, 'b> Args<'a, 'b> {
    pub(crate) fn new(list: &'b [Arg<'a>]) -> Self {
        Self { list, next: 0 }
    }

    fn pull(&mut self) -> Result<(usize, Arg<'a>)> {
        let index = self.next;
        let arg = *self
            .list
            .get(index)
            .context(MissingArgumentSnafu { index })?;
        self.next += 1;
        Ok((index, arg))
    }

    /// The next integer-like value as its 64-bit two's-complement pattern.
    pub(crate) fn bits(&mut self) -> Result<u64> {
        match self.pull()? {
            (_, Arg::Int(v)) => Ok(v as u64),
            (_, Arg::Uint(v)) => Ok(v),
            (_, Arg::Char(c)) => Ok(u64::from(c)),
            (_, Arg::Ptr(p)) => Ok(p as u64),
            (index, other) => mismatch(index, ArgKind::Integer, &other),
        }
    }

    pub(crate) fn float(&mut self) -> Result<f64> {
        match self.pull()? {
            (_, Arg::Float(v)) => Ok(v),
            (index, other) => mismatch(index, ArgKind::Float, &other),
        }
    }

    /// The next text argument, cut at its terminator.
    pub(crate) fn text(&mut self) -> Result<&'a [u8]> {
        match self.pull()? {
            (_, Arg::Str(s)) => Ok(as_text(s)),
            (index, other) => mismatch(index, ArgKind::Text, &other),
        }
    }
}

fn mismatch<T>(index: usize, expected: ArgKind, found: &Arg<'_>) -> Result<T> {
    log::trace!("argument {} has tag {:?}, wanted {:?}", index, found.kind(), expected);
    ArgumentMismatchSnafu {
        index,
        expected,
        found: found.kind(),
    }
    .fail()
}
