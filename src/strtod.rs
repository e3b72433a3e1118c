use crate::accum::{Accumulator, DigitConsumeDecision, Sign};
use crate::chars::IntoCharIter;
use crate::compose::compose;
use crate::errors::Error;

// Every accepted "nan" token produces this quiet NaN, sign bit clear,
// regardless of any sign char before it.
const QUIET_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// A peekable char cursor that counts the chars it has consumed.
#[derive(Clone)]
struct CharCursor<I> {
    iter: I,
    current: Option<char>,
    consumed: usize,
}

impl<I: Iterator<Item = char> + Clone> CharCursor<I> {
    fn new(mut iter: I) -> Self {
        Self {
            current: iter.next(),
            iter,
            consumed: 0,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// The current char, or \0 at the end of input.
    fn current(&self) -> char {
        self.current.unwrap_or('\0')
    }

    /// The char after the current one, or \0.
    fn peek_next(&self) -> char {
        self.iter.clone().next().unwrap_or('\0')
    }

    /// Consume the current char, advancing the cursor.
    fn next(&mut self) {
        if self.current.is_some() {
            self.consumed += 1;
        }
        self.current = self.iter.next();
    }

    fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Consume a leading `+` or `-` if present. Absent either, positive.
fn parse_sign<I>(chars: &mut CharCursor<I>) -> Sign
where
    I: Iterator<Item = char> + Clone,
{
    match chars.current() {
        '+' => {
            chars.next();
            Sign::Positive
        }
        '-' => {
            chars.next();
            Sign::Negative
        }
        _ => Sign::Positive,
    }
}

/// Try to consume a fixed string, case-insensitively. Either the whole
/// string matches and is consumed, or nothing is.
fn parse_string<I>(chars: &mut CharCursor<I>, s: &str) -> bool
where
    I: Iterator<Item = char> + Clone,
{
    let mut probe = chars.clone();
    for c in s.chars() {
        if probe.current().to_ascii_lowercase() != c {
            return false;
        }
        probe.next();
    }
    *chars = probe;
    true
}

#[cold]
#[inline(never)]
fn parse_inf_nan<I>(chars: &mut CharCursor<I>, sign: Sign) -> Option<f64>
where
    I: Iterator<Item = char> + Clone,
{
    if parse_string(chars, "inf") {
        // The longer spelling extends the match all or nothing, so
        // "infinit" still reads as three chars.
        parse_string(chars, "inity");
        return Some(match sign {
            Sign::Negative => f64::NEG_INFINITY,
            Sign::Positive => f64::INFINITY,
        });
    }
    if parse_string(chars, "nan") {
        // Payloads like "nan(2)" are left unconsumed.
        return Some(f64::from_bits(QUIET_NAN_BITS));
    }
    None
}

/// Recognize a `0x`/`0X` prefix, returning the base of the numeral.
/// The prefix commits: after it, only hex digits are read, even if
/// that parse then fails.
fn parse_base<I>(chars: &mut CharCursor<I>) -> u32
where
    I: Iterator<Item = char> + Clone,
{
    if chars.current() == '0' && matches!(chars.peek_next(), 'x' | 'X') {
        chars.next();
        chars.next();
        return 16;
    }
    10
}

fn parse_inner<I>(chars: I) -> (f64, usize)
where
    I: Iterator<Item = char> + Clone,
{
    let mut chars = CharCursor::new(chars);

    while chars.current().is_whitespace() {
        chars.next();
    }

    if chars.is_exhausted() {
        return (0.0, 0);
    }

    let sign = parse_sign(&mut chars);

    if matches!(chars.current(), 'i' | 'I' | 'n' | 'N') {
        if let Some(value) = parse_inf_nan(&mut chars, sign) {
            return (value, chars.consumed());
        }
    }

    let base = parse_base(&mut chars);
    let exponent_marker = if base == 16 { 'p' } else { 'e' };

    // Scan the digits. The most significant digits accumulate into
    // `digits`; once they overflow, further digits are only classified,
    // and `exponent` tracks the position of the digits that were kept
    // relative to the decimal point.
    let mut digits = Accumulator::<i64>::new(sign, base);
    let mut digits_usable = false;
    let mut digits_overflow = false;
    let mut after_decimal = false;
    let mut exponent: i32 = 0;
    loop {
        if !after_decimal && chars.current() == '.' {
            after_decimal = true;
            chars.next();
            continue;
        }

        let is_a_digit = if digits_overflow {
            chars.current().to_digit(base).is_some()
        } else {
            match digits.consume(chars.current()) {
                DigitConsumeDecision::Consumed => {
                    digits_usable = true;
                    true
                }
                DigitConsumeDecision::PositiveOverflow | DigitConsumeDecision::NegativeOverflow => {
                    // The digit that trips overflow is itself discarded,
                    // and adjusts the exponent below like any other
                    // discarded digit.
                    digits_overflow = true;
                    true
                }
                DigitConsumeDecision::Invalid => false,
            }
        };
        if !is_a_digit {
            break;
        }

        if after_decimal {
            exponent = exponent.saturating_sub(1);
        }
        if digits_overflow {
            exponent = exponent.saturating_add(1);
        }
        chars.next();
    }

    if !digits_usable {
        // No digit at all, so nothing counts as consumed, not even
        // whitespace, sign or base prefix.
        return (0.0, 0);
    }

    // An exponent marker only binds if at least one exponent digit
    // follows; otherwise the cursor rolls back to just before it.
    // Hex numerals take hexadecimal exponent digits.
    if chars.current().eq_ignore_ascii_case(&exponent_marker) {
        let before_marker = chars.clone();
        chars.next();

        let exponent_sign = parse_sign(&mut chars);
        let mut exponent_parser = Accumulator::<i32>::new(exponent_sign, base);
        let mut exponent_usable = false;
        let mut exponent_overflow = false;
        loop {
            let is_a_digit = if exponent_overflow {
                chars.current().to_digit(base).is_some()
            } else {
                match exponent_parser.consume(chars.current()) {
                    DigitConsumeDecision::Consumed => {
                        exponent_usable = true;
                        true
                    }
                    DigitConsumeDecision::PositiveOverflow
                    | DigitConsumeDecision::NegativeOverflow => {
                        exponent_overflow = true;
                        true
                    }
                    DigitConsumeDecision::Invalid => false,
                }
            };
            if !is_a_digit {
                break;
            }
            chars.next();
        }

        if !exponent_usable {
            chars = before_marker;
        } else if exponent_overflow {
            // The literal exponent does not fit in an i32, so the digit
            // position adjustment cannot matter. Force an extreme:
            // positive numerals collapse to zero, negative ones to
            // infinity.
            exponent = match sign {
                Sign::Negative => i32::MAX,
                Sign::Positive => i32::MIN,
            };
        } else {
            // The sum of adjustment and literal can still overflow an
            // i32, which would flip the sign of the exponent.
            let new_exponent = i64::from(exponent) + i64::from(exponent_parser.value());
            exponent = new_exponent.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        }
    }

    (compose(sign, digits.value(), exponent, base), chars.consumed())
}

/// Parses a 64-bit floating point number from the start of `src`,
/// reporting how many chars were read.
///
/// Leading whitespace is skipped, then an optional sign, then a decimal
/// numeral, a `0x`/`0X`-prefixed hexadecimal numeral, or one of the
/// tokens "inf", "infinity" and "nan" (case-insensitive). Decimal
/// numerals take an optional `e`/`E` exponent; hexadecimal numerals use
/// `p`/`P`, with hexadecimal exponent digits. The numeral is converted
/// to the nearest f64, values out of range becoming an infinity or a
/// signed zero.
///
/// The returned count covers everything read, including whitespace and
/// sign, like the "end" parameter to strtod. Trailing chars are
/// ignored. If no numeral is present at all the result is `(0.0, 0)`,
/// and leading whitespace is not counted.
pub fn strtod<Chars>(src: Chars) -> (f64, usize)
where
    Chars: IntoCharIter,
{
    parse_inner(src.chars())
}

/// True if the input starts with an infinity token, after optional
/// whitespace and sign.
fn begins_with_infinity_token<I>(mut chars: I) -> bool
where
    I: Iterator<Item = char>,
{
    let mut c = chars.next();
    while matches!(c, Some(ch) if ch.is_whitespace()) {
        c = chars.next();
    }
    if matches!(c, Some('+' | '-')) {
        c = chars.next();
    }
    matches!(c, Some('i' | 'I'))
}

/// Like [`strtod()`], but reports why no value, or no finite value,
/// came out.
///
/// Returns [`Error::Empty`] if `src` is empty or all whitespace,
/// [`Error::InvalidChar`] if it starts with something that cannot begin
/// a numeral, and [`Error::Overflow`] if a finite literal scaled out of
/// the f64 range. The tokens "inf" and "infinity" still succeed, and a
/// literal too small in magnitude still succeeds as zero.
///
/// `consumed` is set like the count of [`strtod()`] on success, and to
/// 0 on error.
pub fn strtod_checked<Chars>(src: Chars, consumed: &mut usize) -> Result<f64, Error>
where
    Chars: IntoCharIter,
{
    let chars = src.chars();
    let (value, used) = parse_inner(chars.clone());
    if used == 0 {
        *consumed = 0;
        return if chars.clone().any(|c| !c.is_whitespace()) {
            Err(Error::InvalidChar)
        } else {
            Err(Error::Empty)
        };
    }
    if value.is_infinite() && !begins_with_infinity_token(chars) {
        *consumed = 0;
        return Err(Error::Overflow);
    }
    *consumed = used;
    Ok(value)
}
