use snafu::Snafu;

use crate::arg::ArgKind;

pub type Result<T> = core::result::Result<T, Error>;

/// Every condition the formatter checks instead of corrupting memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The destination cannot hold the text plus its terminator.
    #[snafu(display("destination of {} bytes is full", capacity))]
    DestinationFull { capacity: usize },
    /// A number did not fit the scratch assembly buffer.
    #[snafu(display("number exceeds the scratch buffer"))]
    ScratchOverflow,
    /// The integer converter only speaks bases 2 through 16.
    #[snafu(display("unsupported base {}", base))]
    UnsupportedBase { base: u64 },
    /// A digit index fell outside the 16-entry alphabet.
    #[snafu(display("digit {} is outside the alphabet", digit))]
    DigitOutOfRange { digit: u64 },
    /// A conversion ran out of arguments.
    #[snafu(display("argument {} is missing", index))]
    MissingArgument { index: usize },
    /// The argument at `index` carries the wrong tag for its conversion.
    #[snafu(display("argument {} is {} but the conversion expects {}", index, found, expected))]
    ArgumentMismatch {
        index: usize,
        expected: ArgKind,
        found: ArgKind,
    },
}

/// Halts the program when a format call breaks its contract.
///
/// `file` and `line` point at the formatting call site, not at this crate.
pub trait FailFast {
    fn fail(error: &Error, file: &'static str, line: u32) -> !;
}

/// Default hook: turns the violation into a panic.
pub struct PanicOnViolation;

impl FailFast for PanicOnViolation {
    fn fail(error: &Error, file: &'static str, line: u32) -> ! {
        panic!("rasfmt: {} at {}:{}", error, file, line)
    }
}

/// Adapts a plain handler `fn(&Error, &'static str, u32) -> !` into a
/// [`FailFast`] type usable with `format_or_halt` and `sprintf_with!`.
///
/// ```ignore
/// fn halt(e: &rasfmt::Error, file: &'static str, line: u32) -> ! { loop {} }
/// rasfmt::make_fail_fast!(Halt, halt);
/// ```
#[macro_export]
macro_rules! make_fail_fast {
    ($name: ident, $handler: path) => {
        struct $name;
        impl $crate::FailFast for $name {
            fn fail(error: &$crate::Error, file: &'static str, line: u32) -> ! {
                $handler(error, file, line)
            }
        }
    };
}
