use num_traits::PrimInt;

/// The sign of a numeral, as determined by an explicit leading `+` or `-`.
/// Absent either, a numeral is positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

/// The outcome of offering one char to an [`Accumulator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DigitConsumeDecision {
    /// The char was a digit and was appended.
    Consumed,
    /// The char was a digit but appending it would exceed the positive bound.
    PositiveOverflow,
    /// The char was a digit but appending it would exceed the negative bound.
    NegativeOverflow,
    /// The char is not a digit in this base.
    Invalid,
}

/// Accumulates digits into a signed integer, refusing any digit that would
/// overflow. Negative values are built by subtracting each digit, so the
/// asymmetric range of two's complement is handled without negation.
pub struct Accumulator<Int: PrimInt> {
    base: u32,
    radix: Int,
    num: Int,
    sign: Sign,
    // Largest magnitude that can always take one more digit. A value at
    // the cutoff takes only digits strictly below the type bound's last
    // digit, so the bound itself is never produced.
    cutoff: Int,
    max_digit_after_cutoff: Int,
}

impl<Int: PrimInt> Accumulator<Int> {
    pub fn new(sign: Sign, base: u32) -> Self {
        assert!((2..=36).contains(&base), "invalid base {base}");
        assert!(
            Int::min_value() < Int::zero(),
            "accumulator requires a signed type"
        );
        let radix = Int::from(base).expect("base should fit in the accumulator type");
        let (cutoff, max_digit_after_cutoff) = match sign {
            Sign::Positive => (Int::max_value() / radix, Int::max_value() % radix),
            Sign::Negative => (Int::min_value() / radix, Int::min_value() % radix),
        };
        Accumulator {
            base,
            radix,
            num: Int::zero(),
            sign,
            cutoff,
            max_digit_after_cutoff,
        }
    }

    /// Offer one char. On [`DigitConsumeDecision::Consumed`] the digit has
    /// been appended; on any other decision the value is unchanged.
    pub fn consume(&mut self, ch: char) -> DigitConsumeDecision {
        let Some(digit) = ch.to_digit(self.base) else {
            return DigitConsumeDecision::Invalid;
        };
        let digit = Int::from(digit).expect("digit should fit in the accumulator type");
        if !self.can_append_digit(digit) {
            return if self.positive() {
                DigitConsumeDecision::PositiveOverflow
            } else {
                DigitConsumeDecision::NegativeOverflow
            };
        }
        self.num = self.num * self.radix;
        self.num = if self.positive() {
            self.num + digit
        } else {
            self.num - digit
        };
        DigitConsumeDecision::Consumed
    }

    pub fn value(&self) -> Int {
        self.num
    }

    pub fn positive(&self) -> bool {
        self.sign != Sign::Negative
    }

    fn can_append_digit(&self, digit: Int) -> bool {
        let is_below_cutoff = if self.positive() {
            self.num < self.cutoff
        } else {
            self.num > self.cutoff
        };
        if is_below_cutoff {
            return true;
        }
        // Note the strict comparison. For negative values the trailing
        // digit of the bound is nonpositive, so a value at the cutoff
        // never takes another digit.
        self.num == self.cutoff && digit < self.max_digit_after_cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<Int: PrimInt>(acc: &mut Accumulator<Int>, s: &str) -> DigitConsumeDecision {
        let mut last = DigitConsumeDecision::Consumed;
        for c in s.chars() {
            last = acc.consume(c);
        }
        last
    }

    #[test]
    fn digits_below_cutoff() {
        let mut acc = Accumulator::<i64>::new(Sign::Positive, 10);
        assert_eq!(feed(&mut acc, "922337203685477580"), DigitConsumeDecision::Consumed);
        assert_eq!(acc.value(), 922337203685477580);
    }

    #[test]
    fn at_cutoff_takes_small_digits_only() {
        let mut acc = Accumulator::<i64>::new(Sign::Positive, 10);
        feed(&mut acc, "922337203685477580");
        assert_eq!(acc.consume('6'), DigitConsumeDecision::Consumed);
        assert_eq!(acc.value(), 9223372036854775806);

        let mut acc = Accumulator::<i64>::new(Sign::Positive, 10);
        feed(&mut acc, "922337203685477580");
        assert_eq!(acc.consume('7'), DigitConsumeDecision::PositiveOverflow);
        assert_eq!(acc.value(), 922337203685477580);
    }

    #[test]
    fn type_bound_is_unreachable() {
        let mut acc = Accumulator::<i64>::new(Sign::Positive, 10);
        assert_eq!(
            feed(&mut acc, "9223372036854775807"),
            DigitConsumeDecision::PositiveOverflow
        );

        let mut acc = Accumulator::<i32>::new(Sign::Positive, 10);
        assert_eq!(feed(&mut acc, "2147483646"), DigitConsumeDecision::Consumed);
        assert_eq!(acc.value(), 2147483646);
        let mut acc = Accumulator::<i32>::new(Sign::Positive, 10);
        assert_eq!(
            feed(&mut acc, "2147483647"),
            DigitConsumeDecision::PositiveOverflow
        );
    }

    #[test]
    fn negative_accumulation() {
        let mut acc = Accumulator::<i64>::new(Sign::Negative, 10);
        assert_eq!(feed(&mut acc, "456"), DigitConsumeDecision::Consumed);
        assert_eq!(acc.value(), -456);
        assert!(!acc.positive());
    }

    #[test]
    fn negative_at_cutoff_always_overflows() {
        // i64::MIN % 10 is -8, and no digit is below -8, so even the
        // representable -9223372036854775808 is refused.
        let mut acc = Accumulator::<i64>::new(Sign::Negative, 10);
        assert_eq!(feed(&mut acc, "922337203685477580"), DigitConsumeDecision::Consumed);
        assert_eq!(acc.value(), -922337203685477580);
        assert_eq!(acc.consume('8'), DigitConsumeDecision::NegativeOverflow);
        assert_eq!(acc.consume('0'), DigitConsumeDecision::NegativeOverflow);
    }

    #[test]
    fn overflow_leaves_value_intact() {
        let mut acc = Accumulator::<i64>::new(Sign::Positive, 10);
        assert_eq!(feed(&mut acc, "999999999999999999"), DigitConsumeDecision::Consumed);
        assert_eq!(acc.consume('9'), DigitConsumeDecision::PositiveOverflow);
        assert_eq!(acc.value(), 999999999999999999);
    }

    #[test]
    fn non_digits_are_invalid() {
        let mut acc = Accumulator::<i64>::new(Sign::Positive, 10);
        assert_eq!(acc.consume('x'), DigitConsumeDecision::Invalid);
        assert_eq!(acc.consume('a'), DigitConsumeDecision::Invalid);
        assert_eq!(acc.consume(' '), DigitConsumeDecision::Invalid);
        assert_eq!(acc.value(), 0);
    }

    #[test]
    fn hex_digits() {
        let mut acc = Accumulator::<i64>::new(Sign::Positive, 16);
        assert_eq!(feed(&mut acc, "Ff"), DigitConsumeDecision::Consumed);
        assert_eq!(acc.value(), 255);
        assert_eq!(acc.consume('g'), DigitConsumeDecision::Invalid);
    }
}
