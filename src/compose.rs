use crate::accum::Sign;

// Decimal exponents beyond these produce a signed zero or infinity
// outright. Below 10^-344 even the largest mantissa is under half the
// smallest subnormal; at 10^309 even a mantissa of 1 exceeds f64::MAX.
// A larger base only lands further out.
const UNDERFLOW_EXPONENT: i32 = -344;
const OVERFLOW_EXPONENT: i32 = 309;

// Up to this many scaling steps the value takes one f64 multiply or
// divide per exponent unit, rounding at every step, which is the
// rounding behavior callers have always seen for everyday literals.
// Longer chains accumulate enough per-step error to drift several ulps
// from the nearest double, so they run in double-double precision and
// round once at the end.
const STEPWISE_EXPONENT_LIMIT: u32 = 27;

/// Scale `mantissa` by `base` raised to `exponent`. The mantissa already
/// carries the sign; `sign` picks which zero or infinity the shortcut
/// paths produce, since a zero mantissa cannot.
pub fn compose(sign: Sign, mantissa: i64, exponent: i32, base: u32) -> f64 {
    if mantissa == 0 || exponent <= UNDERFLOW_EXPONENT {
        return signed(sign, 0.0);
    }
    if exponent >= OVERFLOW_EXPONENT {
        return signed(sign, f64::INFINITY);
    }
    if exponent.unsigned_abs() > STEPWISE_EXPONENT_LIMIT {
        return scale_precisely(sign, mantissa, exponent, base);
    }
    let base = f64::from(base);
    let mut value = mantissa as f64;
    // Scale one step at a time. A single multiply by base^exponent would
    // round differently, and a step that leaves the f64 range saturates
    // at zero or infinity and stays there.
    if exponent < 0 {
        for _ in 0..-exponent {
            value /= base;
        }
    } else {
        for _ in 0..exponent {
            value *= base;
        }
    }
    value
}

fn signed(sign: Sign, magnitude: f64) -> f64 {
    match sign {
        Sign::Negative => -magnitude,
        Sign::Positive => magnitude,
    }
}

/// 2^exponent, for exponents in the normal f64 range.
fn pow2(exponent: i32) -> f64 {
    f64::from_bits(((exponent + 1023) as u64) << 52)
}

/// An unevaluated sum of two f64s with |lo| no more than half an ulp
/// of `hi`, roughly doubling the working precision.
#[derive(Debug, Copy, Clone)]
struct DoubleDouble {
    hi: f64,
    lo: f64,
}

/// Dekker's Fast2Sum; requires |a| >= |b|.
fn fast_two_sum(a: f64, b: f64) -> DoubleDouble {
    let hi = a + b;
    let lo = b - (hi - a);
    DoubleDouble { hi, lo }
}

/// Knuth's 2Sum, exact for any two f64s.
fn two_sum(a: f64, b: f64) -> DoubleDouble {
    let hi = a + b;
    let bb = hi - a;
    let lo = (a - (hi - bb)) + (b - bb);
    DoubleDouble { hi, lo }
}

/// Exact product, the error term recovered with a fused multiply-add.
fn two_prod(a: f64, b: f64) -> DoubleDouble {
    let hi = a * b;
    let lo = a.mul_add(b, -hi);
    DoubleDouble { hi, lo }
}

impl DoubleDouble {
    fn from_integer(magnitude: u64) -> Self {
        let hi = magnitude as f64;
        // `hi` can round up to 2^63, so the residual needs i128.
        let lo = (magnitude as i128 - hi as i128) as f64;
        DoubleDouble { hi, lo }
    }

    fn mul(self, factor: f64) -> Self {
        let p = two_prod(self.hi, factor);
        fast_two_sum(p.hi, p.lo + self.lo * factor)
    }

    fn div(self, divisor: f64) -> Self {
        let quotient = self.hi / divisor;
        let p = two_prod(quotient, divisor);
        let remainder = ((self.hi - p.hi) - p.lo + self.lo) / divisor;
        fast_two_sum(quotient, remainder)
    }

    /// Exact as long as neither component leaves the finite range.
    fn scale_by_power_of_two(self, scale: f64) -> Self {
        DoubleDouble {
            hi: self.hi * scale,
            lo: self.lo * scale,
        }
    }
}

/// The long-chain version of the scaling loop: the whole chain runs in
/// double-double, so the hundreds of intermediate roundings of the
/// plain loop collapse into a single rounding at the end. Within the
/// chain lengths the shortcut thresholds leave possible, the error of
/// the chain stays around 2^-96 relative, far below the half-ulp that
/// would change the result.
fn scale_precisely(sign: Sign, mantissa: i64, exponent: i32, base: u32) -> f64 {
    let base = f64::from(base);
    let mut value = DoubleDouble::from_integer(mantissa.unsigned_abs());

    if exponent > 0 {
        for _ in 0..exponent {
            value = value.mul(base);
            if !value.hi.is_finite() {
                return signed(sign, f64::INFINITY);
            }
        }
        return signed(sign, value.hi);
    }

    // A negative chain can end in the subnormal range, where every
    // operation would round at reduced precision. Scaling by 2^600 up
    // front is exact and keeps every intermediate normal: the largest
    // mantissa times 2^600 is about 4e199, and the smallest value that
    // is not already known to underflow stays above 2^-475 scaled.
    value = value.scale_by_power_of_two(pow2(600));
    for _ in 0..exponent.unsigned_abs() {
        value = value.div(base);
    }
    if value.hi >= pow2(-1022 + 600) {
        // A normal result; scaling back down is exact.
        return signed(sign, value.hi * pow2(-600));
    }

    // A subnormal result is a multiple of 2^-1074, still scaled by
    // 2^600 here. `q` is below 2^52, so adding and subtracting 2^52
    // rounds it to the nearest integer, ties to even.
    let subnormal_ulp = pow2(-1074 + 600);
    let q = value.hi / subnormal_ulp;
    let mut nearest = (q + pow2(52)) - pow2(52);
    // `q` alone cannot see a tie: the deciding bits sit in `lo`. Both
    // fraction parts are exact, so their 2Sum settles the comparison.
    let fraction = two_sum(q - nearest, value.lo / subnormal_ulp);
    if fraction.hi > 0.5 || (fraction.hi == 0.5 && fraction.lo > 0.0) {
        nearest += 1.0;
    } else if fraction.hi < -0.5 || (fraction.hi == -0.5 && fraction.lo < 0.0) {
        nearest -= 1.0;
    } else if fraction.hi.abs() == 0.5 && fraction.lo == 0.0 && nearest % 2.0 != 0.0 {
        // Exactly halfway between two subnormals: take the even one.
        nearest += fraction.hi.signum();
    }
    signed(sign, nearest * f64::from_bits(1))
}
