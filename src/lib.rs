//! rasfmt - printf-style formatting for targets without a C runtime
//!
//! # Design objective:
//! 1. No heap, no libc, no locale: output goes into a caller buffer.
//! 2. The destination is always NUL-terminated between writes.
//! 3. Conditions a C `sprintf` would leave undefined are reported as
//!    [`Error`] or routed to a [`FailFast`] hook.
//!
//! # Examples
//!
//! ```rust
//! let mut buf = [0_u8; 64];
//! let len = rasfmt::sprintf!(&mut buf, "%05d|%5d|%x", -42, -42, 255);
//! assert_eq!(&buf[..len], b"-0042|  -42|ff");
//!
//! rasfmt::sprintf!(&mut buf, "%5s|%.2f|%e", "hi", 3.5, 2500.0);
//! assert_eq!(rasfmt::as_text(&buf), b"hi   |3.50|2.500000e3");
//!
//! let n = rasfmt::format(&mut buf, b"%X%%", &[rasfmt::Arg::from(0xbeef)]).unwrap();
//! assert_eq!(&buf[..n], b"BEEF%");
//!
//! assert!(rasfmt::try_sprintf!(&mut [0_u8; 2], "%d", 100).is_err());
//! ```

#![no_std]

mod arg;
mod convert;
mod error;
mod format;
mod strings;
mod writer;

pub use arg::{Arg, ArgKind};
pub use convert::{convert, Alphabet, Field, PAD_LIMIT, SCRATCH_LEN};
pub use error::{Error, FailFast, PanicOnViolation, Result};
pub use format::{format, format_or_halt, DEFAULT_PRECISION};
pub use strings::{as_text, bounded_length, compare, copy_to_terminator};
pub use writer::Writer;

pub use rasfmt_macros::{sprintf, sprintf_with, try_sprintf};
