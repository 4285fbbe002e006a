//! Number to text converters
//!
//! Digits are produced least-significant first into a fixed stack buffer,
//! then the field is padded and the digits are emitted in reverse.

use super::directive::Directive;
use super::sink::ByteSink;

/// Decimal digits of `u64::MAX`
const DEC_DIGITS: usize = 20;
/// Hex digits of `u64::MAX`
const HEX_DIGITS: usize = 16;

const LOWER: &[u8; 16] = b"0123456789abcdef";
const UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Fill `buf` with the digits of `value` in `radix`, least significant first
///
/// Returns the digit count, at least 1.
fn digits(mut value: u64, radix: u64, table: &[u8; 16], buf: &mut [u8]) -> usize {
    let mut count = 0;
    loop {
        buf[count] = table[(value % radix) as usize];
        count += 1;
        value /= radix;
        if value == 0 {
            return count;
        }
    }
}

/// Pad to the field width and emit the reversed digits
///
/// Zero padding goes between the sign and the digits; space padding goes
/// before the sign. The sign counts toward the width.
fn emit_field<S: ByteSink + ?Sized>(
    sink: &mut S,
    negative: bool,
    reversed: &[u8],
    directive: &Directive,
) {
    let natural = reversed.len() + usize::from(negative);
    let pad = directive.width.saturating_sub(natural);

    if directive.zero_pad {
        if negative {
            sink.write_byte(b'-');
        }
        pad_with(sink, b'0', pad);
    } else {
        pad_with(sink, b' ', pad);
        if negative {
            sink.write_byte(b'-');
        }
    }

    for &digit in reversed.iter().rev() {
        sink.write_byte(digit);
    }
}

fn pad_with<S: ByteSink + ?Sized>(sink: &mut S, byte: u8, count: usize) {
    for _ in 0..count {
        sink.write_byte(byte);
    }
}

/// Signed decimal; `i64::MIN` included
pub fn emit_signed<S: ByteSink + ?Sized>(sink: &mut S, value: i64, directive: &Directive) {
    let mut buf = [0u8; DEC_DIGITS];
    let count = digits(value.unsigned_abs(), 10, LOWER, &mut buf);
    emit_field(sink, value < 0, &buf[..count], directive);
}

/// Unsigned decimal
pub fn emit_unsigned<S: ByteSink + ?Sized>(sink: &mut S, value: u64, directive: &Directive) {
    let mut buf = [0u8; DEC_DIGITS];
    let count = digits(value, 10, LOWER, &mut buf);
    emit_field(sink, false, &buf[..count], directive);
}

/// Hexadecimal bit pattern, `a-f` or `A-F`
pub fn emit_hex<S: ByteSink + ?Sized>(
    sink: &mut S,
    value: u64,
    uppercase: bool,
    directive: &Directive,
) {
    let mut buf = [0u8; HEX_DIGITS];
    let table = if uppercase { UPPER } else { LOWER };
    let count = digits(value, 16, table, &mut buf);
    emit_field(sink, false, &buf[..count], directive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printk::sink::CaptureSink;

    fn width(width: usize, zero_pad: bool) -> Directive {
        Directive {
            width,
            zero_pad,
            ..Directive::default()
        }
    }

    fn signed(value: i64, directive: Directive) -> CaptureSink<64> {
        let mut sink = CaptureSink::new();
        emit_signed(&mut sink, value, &directive);
        sink
    }

    #[test]
    fn test_zero_is_one_digit() {
        assert_eq!(signed(0, Directive::default()).as_bytes(), b"0");

        let mut sink = CaptureSink::<8>::new();
        emit_unsigned(&mut sink, 0, &Directive::default());
        emit_hex(&mut sink, 0, false, &Directive::default());
        assert_eq!(sink.as_bytes(), b"00");
    }

    #[test]
    fn test_signed_extremes() {
        assert_eq!(
            signed(i64::MIN, Directive::default()).as_bytes(),
            b"-9223372036854775808"
        );
        assert_eq!(
            signed(i64::MAX, Directive::default()).as_bytes(),
            b"9223372036854775807"
        );
    }

    #[test]
    fn test_sign_placement() {
        assert_eq!(signed(-42, width(8, true)).as_bytes(), b"-0000042");
        assert_eq!(signed(-42, width(8, false)).as_bytes(), b"     -42");
        assert_eq!(signed(42, width(5, true)).as_bytes(), b"00042");
    }

    #[test]
    fn test_width_never_truncates() {
        assert_eq!(signed(-12345, width(3, true)).as_bytes(), b"-12345");
        assert_eq!(signed(-12345, width(6, false)).as_bytes(), b"-12345");
    }

    #[test]
    fn test_unsigned_max() {
        let mut sink = CaptureSink::<32>::new();
        emit_unsigned(&mut sink, u64::MAX, &width(22, false));
        assert_eq!(sink.as_bytes(), b"  18446744073709551615");
    }

    #[test]
    fn test_hex_case_and_padding() {
        let mut sink = CaptureSink::<64>::new();
        emit_hex(&mut sink, 0xff, false, &Directive::default());
        sink.write_byte(b' ');
        emit_hex(&mut sink, 0xff, true, &Directive::default());
        sink.write_byte(b' ');
        emit_hex(&mut sink, 0xff, false, &width(4, true));
        sink.write_byte(b' ');
        emit_hex(&mut sink, u64::MAX, true, &Directive::default());
        assert_eq!(sink.as_bytes(), b"ff FF 00ff FFFFFFFFFFFFFFFF");
    }
}
