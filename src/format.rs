//! The conversion-specifier interpreter.
//!
//! The template is scanned once. Literal runs go straight to the
//! [`Writer`]; each `%` starts a fresh `Descriptor` that collects width,
//! precision and fill until a conversion letter resolves it.
//!
//! Supported conversions: `c d i o u x X p s f F e E %`. Anything else
//! prints `ERROR` and consumes no argument.

use core::panic::Location;

use crate::arg::{Arg, Args};
use crate::convert::{convert, Alphabet, Field};
use crate::error::{FailFast, Result};
use crate::strings::as_text;
use crate::writer::Writer;

/// Fractional digits printed by `%f` and `%e` without a precision.
pub const DEFAULT_PRECISION: usize = 6;

const UNKNOWN: &[u8] = b"ERROR";

/// Formats `args` into `dst` according to `template`.
///
/// `dst` holds NUL-terminated text afterwards, even when an error cuts the
/// output short. Returns the text length without the terminator.
pub fn format(dst: &mut [u8], template: &[u8], args: &[Arg<'_>]) -> Result<usize> {
    let mut out = Writer::new(dst)?;
    let mut args = Args::new(args);
    let mut rest = as_text(template);

    while !rest.is_empty() {
        let run = rest.iter().position(|&b| b == b'%').unwrap_or(rest.len());
        out.write(&rest[..run])?;
        rest = &rest[run..];
        if let Some((_, spec)) = rest.split_first() {
            rest = specifier(&mut out, &mut args, spec)?;
        }
    }

    Ok(out.position())
}

/// [`format`], handing any error to the fail-fast hook `H` along with the
/// caller's location.
#[track_caller]
pub fn format_or_halt<H: FailFast>(dst: &mut [u8], template: &[u8], args: &[Arg<'_>]) -> usize {
    match format(dst, template, args) {
        Ok(len) => len,
        Err(e) => {
            let caller = Location::caller();
            log::error!("format failed at {}:{}: {}", caller.file(), caller.line(), e);
            H::fail(&e, caller.file(), caller.line())
        }
    }
}

/// Per-specifier state, discarded once the conversion letter is handled.
struct Descriptor {
    width: usize,
    precision: usize,
    fill: u8,
    after_point: bool,
    alphabet: Alphabet,
}

impl Descriptor {
    fn new() -> Self {
        Self {
            width: 0,
            precision: DEFAULT_PRECISION,
            fill: b' ',
            after_point: false,
            alphabet: Alphabet::LOWER,
        }
    }

    fn digit(&mut self, c: u8) {
        let d = usize::from(c - b'0');
        if c == b'0' && self.width == 0 {
            self.fill = b'0';
        }
        if self.after_point {
            // one digit of precision only; the last digit wins
            self.precision = d;
        } else {
            self.width = self.width.wrapping_mul(10).wrapping_add(d);
        }
    }

    fn field(&self, negative: bool) -> Field {
        Field {
            width: self.width,
            fill: self.fill,
            negative,
        }
    }
}

/// Consumes one specifier from `spec` (the text after `%`) and returns the
/// remaining template.
fn specifier<'t>(out: &mut Writer<'_>, args: &mut Args<'_, '_>, mut spec: &'t [u8]) -> Result<&'t [u8]> {
    let mut desc = Descriptor::new();
    loop {
        let Some((&c, rest)) = spec.split_first() else {
            log::warn!("template ends inside a conversion specifier");
            out.write(UNKNOWN)?;
            return Ok(spec);
        };
        spec = rest;

        match c {
            b'0'..=b'9' => {
                desc.digit(c);
                continue;
            }
            b'.' => {
                desc.after_point = true;
                continue;
            }
            b'c' => {
                let byte = args.bits()? as u8;
                out.write(&[byte])?;
            }
            b'd' | b'i' => signed(out, args, &desc, 10)?,
            b'o' => signed(out, args, &desc, 8)?,
            b'u' => convert(out, args.bits()?, 10, &desc.alphabet, desc.field(false))?,
            b'X' | b'x' | b'p' => {
                if c == b'X' {
                    desc.alphabet = Alphabet::UPPER;
                }
                convert(out, args.bits()?, 16, &desc.alphabet, desc.field(false))?;
            }
            b's' => {
                let text = args.text()?;
                out.write(text)?;
                for _ in text.len()..desc.width {
                    out.write(b" ")?;
                }
            }
            b'f' | b'F' => fixed(out, args.float()?, &desc)?,
            b'E' | b'e' => {
                if c == b'E' {
                    desc.alphabet = Alphabet::UPPER;
                }
                scientific(out, args.float()?, &desc)?;
            }
            b'%' => out.write(b"%")?,
            _ => {
                log::warn!("unknown conversion specifier {:?}", c as char);
                out.write(UNKNOWN)?;
            }
        }
        return Ok(spec);
    }
}

fn signed(out: &mut Writer<'_>, args: &mut Args<'_, '_>, desc: &Descriptor, base: u64) -> Result<()> {
    let value = args.bits()? as i64;
    convert(
        out,
        value.unsigned_abs(),
        base,
        &desc.alphabet,
        desc.field(value < 0),
    )
}

/// `%f`: integer part through the converter, then the fraction shifted
/// left by `precision` decimal places.
///
/// The fraction is taken against the integer part narrowed to `f32`, so
/// large or finely fractional values lose digits (`3.14159` → `3.141589`).
fn fixed(out: &mut Writer<'_>, value: f64, desc: &Descriptor) -> Result<()> {
    let negative = value < 0.0;
    let value = if negative { 0.0 - value } else { value };

    if value.is_nan() {
        return out.write(b"NaN");
    }
    if value == f64::INFINITY {
        let text: &[u8] = if negative { b"-INF" } else { b"INF" };
        return out.write(text);
    }

    // saturates at u64::MAX from 2^64 up; the fraction then saturates too
    let int = value as u64;
    convert(out, int, 10, &desc.alphabet, desc.field(negative))?;

    let mut frac = value - f64::from(int as f32);
    for _ in 0..desc.precision {
        frac *= 10.0;
    }
    out.write(b".")?;
    convert(
        out,
        frac as u64,
        10,
        &desc.alphabet,
        Field {
            width: desc.precision,
            fill: b'0',
            negative: false,
        },
    )
}

/// `%e`: one leading digit, `precision` more, then the exponent.
///
/// The exponent is `log10` truncated toward zero. Below one, the mantissa
/// is scaled one extra decade, so `0.05` prints as `5.000000e-1`.
fn scientific(out: &mut Writer<'_>, value: f64, desc: &Descriptor) -> Result<()> {
    let mut value = value;
    if value < 0.0 {
        out.write(b"-")?;
        value = 0.0 - value;
    }

    if value.is_nan() {
        return out.write(b"NaN");
    }
    if value == f64::INFINITY {
        return out.write(b"INF");
    }

    let exp = if value == 0.0 { 0.0 } else { libm::log10(value) };
    let (mut mantissa, negative, shown) = if exp < 0.0 {
        (shift_decades(value, exp as i64 - 1), true, 0.0 - exp)
    } else {
        let scale = libm::pow(10.0, exp as i64 as f64);
        (value / scale, false, exp)
    };

    out.write(&[desc.alphabet.digit(mantissa as u64)?])?;
    out.write(b".")?;
    for _ in 0..desc.precision {
        mantissa -= mantissa as i64 as f64;
        mantissa *= 10.0;
        out.write(&[desc.alphabet.digit(mantissa as u64)?])?;
    }

    out.write(&[desc.alphabet.exponent_marker()])?;
    let field = Field {
        width: 0,
        ..desc.field(negative)
    };
    convert(out, shown as u64, 10, &desc.alphabet, field)
}

/// `value / 10^power` for a negative `power`.
///
/// Past 10^-300 the value is raised first, since the divisor for a
/// subnormal input would otherwise underflow to zero.
fn shift_decades(value: f64, power: i64) -> f64 {
    if power < -300 {
        value * 1e300 / libm::pow(10.0, (power + 300) as f64)
    } else {
        value / libm::pow(10.0, power as f64)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arg::ArgKind;
    use crate::error::{Error, PanicOnViolation};
    extern crate std;
    use std::string::String;

    fn sprintf(template: &str, args: &[Arg<'_>]) -> String {
        let mut buf = [0xffu8; 128];
        let len = format(&mut buf, template.as_bytes(), args).unwrap();
        assert_eq!(buf[len], 0);
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(sprintf("", &[]), "");
        assert_eq!(sprintf("plain text", &[]), "plain text");
        assert_eq!(sprintf("%%", &[]), "%");
        assert_eq!(sprintf("100%% sure", &[]), "100% sure");
        assert_eq!(sprintf("cut\0ignored %d", &[]), "cut");
    }

    #[test]
    fn test_integers() {
        assert_eq!(sprintf("%05d", &[Arg::from(-42)]), "-0042");
        assert_eq!(sprintf("%5d", &[Arg::from(-42)]), "  -42");
        assert_eq!(sprintf("%i|%d", &[Arg::from(7), Arg::from(0)]), "7|0");
        assert_eq!(sprintf("%d", &[Arg::from(i64::MIN)]), "-9223372036854775808");
        assert_eq!(sprintf("%u", &[Arg::from(-1)]), "18446744073709551615");
        assert_eq!(sprintf("%d", &[Arg::Uint(u64::MAX)]), "-1");
        assert_eq!(sprintf("%o %o", &[Arg::from(8), Arg::from(-8)]), "10 -10");
        assert_eq!(sprintf("%x %X", &[Arg::from(255), Arg::from(255)]), "ff FF");
        assert_eq!(sprintf("%08x", &[Arg::from(0xbeefu32)]), "0000beef");
        assert_eq!(sprintf("%p", &[Arg::Ptr(0xdead)]), "dead");
    }

    #[test]
    fn test_wide_fields_stay_unpadded() {
        assert_eq!(sprintf("[%15d]", &[Arg::from(5)]), "[              5]");
        assert_eq!(sprintf("[%16d]", &[Arg::from(5)]), "[5]");
        assert_eq!(sprintf("[%20d]", &[Arg::from(5)]), "[5]");
    }

    #[test]
    fn test_char_and_text() {
        assert_eq!(sprintf("%c%c", &[Arg::from('o'), Arg::from(0x14bu32)]), "oK");
        assert_eq!(sprintf("%5s|", &[Arg::from("hi")]), "hi   |");
        assert_eq!(sprintf("%3s|", &[Arg::from("hello")]), "hello|");
        assert_eq!(sprintf("<%s>", &[Arg::from(b"nul\0tail")]), "<nul>");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(sprintf("%f", &[Arg::from(3.5)]), "3.500000");
        assert_eq!(sprintf("%F", &[Arg::from(0.1)]), "0.100000");
        assert_eq!(sprintf("%.2f", &[Arg::from(3.5)]), "3.50");
        assert_eq!(sprintf("%.0f", &[Arg::from(1.25)]), "1.0");
        assert_eq!(sprintf("%f", &[Arg::from(-2.25)]), "-2.250000");
        assert_eq!(sprintf("%.2f", &[Arg::from(100.75)]), "100.75");
        assert_eq!(sprintf("%f", &[Arg::from(3.14159)]), "3.141589");
    }

    #[test]
    fn test_fixed_single_digit_precision() {
        // only the last precision digit counts: ".12" means 2
        assert_eq!(sprintf("%.12f", &[Arg::from(3.5)]), "3.50");
        assert_eq!(sprintf("%.21f", &[Arg::from(3.5)]), "3.5");
    }

    #[test]
    fn test_fixed_width_covers_integer_part() {
        assert_eq!(sprintf("%8.3f", &[Arg::from(-2.25)]), "      -2.250");
        assert_eq!(sprintf("%04.1f", &[Arg::from(-2.5)]), "-002.5");
    }

    #[test]
    fn test_fixed_saturates_past_u64() {
        assert_eq!(
            sprintf("%f", &[Arg::from(1e30)]),
            "18446744073709551615.18446744073709551615"
        );
    }

    #[test]
    fn test_fixed_special_values() {
        assert_eq!(sprintf("%f", &[Arg::from(f64::NAN)]), "NaN");
        assert_eq!(sprintf("%f", &[Arg::from(f64::INFINITY)]), "INF");
        assert_eq!(sprintf("%f", &[Arg::from(f64::NEG_INFINITY)]), "-INF");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(sprintf("%e", &[Arg::from(1.5)]), "1.500000e0");
        assert_eq!(sprintf("%e", &[Arg::from(2500.0)]), "2.500000e3");
        assert_eq!(sprintf("%E", &[Arg::from(2500.0)]), "2.500000E3");
        assert_eq!(sprintf("%.2e", &[Arg::from(-2500.0)]), "-2.50e3");
        assert_eq!(sprintf("%e", &[Arg::from(0.0)]), "0.000000e0");
    }

    #[test]
    fn test_scientific_below_one() {
        assert_eq!(sprintf("%e", &[Arg::from(0.25)]), "2.500000e-0");
        assert_eq!(sprintf("%.1e", &[Arg::from(0.05)]), "5.0e-1");
    }

    #[test]
    fn test_scientific_subnormal() {
        let tiny = sprintf("%e", &[Arg::from(5e-324)]);
        assert!(tiny.starts_with("4.94"), "{}", tiny);
        assert!(tiny.ends_with("e-323"), "{}", tiny);

        let small = sprintf("%E", &[Arg::from(-2.5e-310)]);
        assert!(small.starts_with("-2."), "{}", small);
        assert!(small.ends_with("E-309"), "{}", small);
    }

    #[test]
    fn test_scientific_special_values() {
        assert_eq!(sprintf("%e", &[Arg::from(f64::NAN)]), "NaN");
        assert_eq!(sprintf("%e", &[Arg::from(f64::INFINITY)]), "INF");
        assert_eq!(sprintf("%E", &[Arg::from(f64::NEG_INFINITY)]), "-INF");
    }

    #[test]
    fn test_unknown_specifier() {
        assert_eq!(sprintf("%q", &[Arg::from(1)]), "ERROR");
        assert_eq!(sprintf("%q%d", &[Arg::from(1)]), "ERROR1");
        assert_eq!(sprintf("abc%", &[]), "abcERROR");
        assert_eq!(sprintf("%5", &[]), "ERROR");
    }

    #[test]
    fn test_argument_errors() {
        let mut buf = [0u8; 32];
        assert_eq!(
            format(&mut buf, b"a%db%d", &[Arg::from(1)]),
            Err(Error::MissingArgument { index: 1 })
        );
        assert_eq!(as_text(&buf), b"a1b");
        assert_eq!(
            format(&mut buf, b"%f", &[Arg::from(1)]),
            Err(Error::ArgumentMismatch {
                index: 0,
                expected: ArgKind::Float,
                found: ArgKind::Integer,
            })
        );
        assert_eq!(
            format(&mut buf, b"%s", &[Arg::from(1.0)]).unwrap_err(),
            Error::ArgumentMismatch {
                index: 0,
                expected: ArgKind::Text,
                found: ArgKind::Float,
            }
        );
    }

    #[test]
    fn test_destination_full() {
        let mut buf = [0u8; 4];
        assert_eq!(
            format(&mut buf, b"%d", &[Arg::from(12345)]),
            Err(Error::DestinationFull { capacity: 4 })
        );
        assert_eq!(format(&mut buf, b"%d", &[Arg::from(123)]), Ok(3));
        assert_eq!(format(&mut [], b"", &[]), Err(Error::DestinationFull { capacity: 0 }));
    }

    #[test]
    fn test_or_halt() {
        let mut buf = [0u8; 16];
        let len = format_or_halt::<PanicOnViolation>(&mut buf, b"%x!", &[Arg::from(10)]);
        assert_eq!(&buf[..=len], b"a!\0");
    }

    #[test]
    #[should_panic(expected = "argument 0 is missing")]
    fn test_or_halt_panics() {
        let mut buf = [0u8; 16];
        format_or_halt::<PanicOnViolation>(&mut buf, b"%d", &[]);
    }
}
