//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    ten items at 0.10 → 0.9999999999999999                               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "0.10" is parsed straight into 10 cents                              │
//! │    10 × 10 cents = 100 cents = 1.00, every time                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every amount that enters the cart is normalised to two fractional digits
//! exactly once, at parse time, using round-half-away-from-zero. From then on
//! multiplication by a quantity, summation and subtraction are exact integer
//! operations, so no drift accumulates across many additions.
//!
//! ## Usage
//! ```rust
//! use tally_core::money::{round2, Money};
//!
//! let price = Money::parse("2.50").unwrap();
//! assert_eq!(price.cents(), 250);
//!
//! let line = price.multiply_quantity(3).unwrap();
//! assert_eq!(line.to_string(), "$7.50");
//!
//! // Floats coming from outside are normalised through round2
//! assert_eq!(round2(0.1 + 0.2), Some(Money::from_cents(30)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: remaining-budget arithmetic never needs a second type
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support (as cents) for in-process transport
///
/// The persisted snapshot stores amounts as decimal JSON numbers instead;
/// see [`as_decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

/// Why a decimal string could not be turned into [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyParseError {
    /// Text does not match `-?digits(.digits)?`.
    Malformed,
    /// Well-formed, but too large to represent in cents.
    Overflow,
}

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a plain decimal literal, rounding to cents.
    ///
    /// ## Grammar
    /// `-?digits(.digits)?` with ASCII digits only. No surrounding
    /// whitespace, no `+` sign, no exponent, no thousands separators.
    ///
    /// ## Rounding
    /// Digits past the second fractional digit are rounded half away from
    /// zero: `0.125 → 0.13`, `-0.125 → -0.13`, `0.1249 → 0.12`.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::{Money, MoneyParseError};
    ///
    /// assert_eq!(Money::parse("10"), Ok(Money::from_cents(1000)));
    /// assert_eq!(Money::parse("0.005"), Ok(Money::from_cents(1)));
    /// assert_eq!(Money::parse("1e3"), Err(MoneyParseError::Malformed));
    /// ```
    pub fn parse(raw: &str) -> Result<Money, MoneyParseError> {
        let (negative, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (body, None),
        };

        if !is_digits(int_part) {
            return Err(MoneyParseError::Malformed);
        }
        if let Some(frac) = frac_part {
            if !is_digits(frac) {
                return Err(MoneyParseError::Malformed);
            }
        }

        // Only digits remain, so a parse failure can only mean overflow
        let whole: i64 = int_part.parse().map_err(|_| MoneyParseError::Overflow)?;

        let mut frac_digits = frac_part
            .unwrap_or("")
            .bytes()
            .map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or(MoneyParseError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` on overflow instead of wrapping.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Pen $2.50
    /// Quantity: 2
    ///      │
    ///      ▼
    /// multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Additional cost: $5.00 ──► compared against remaining budget
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(qty)).map(Money)
    }

    /// Checked addition.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Saturating addition, for totals over data that was not validated.
    #[inline]
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Plain decimal text without symbol or grouping (`1050` → `"10.50"`).
    ///
    /// Round-trips through [`Money::parse`], so it is what an input surface
    /// should pre-fill a form field with.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().unsigned_abs(), self.cents_part())
    }

    /// Returns the value as a decimal float (`250` cents → `2.5`).
    ///
    /// Only for serialization boundaries that demand a JSON number.
    /// Never do arithmetic on the result.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Renders the amount as grouped currency text.
    ///
    /// Presentation only: the stored value is untouched.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let amount = Money::from_cents(123_456_789);
    /// assert_eq!(amount.format("€"), "€1,234,567.89");
    /// assert_eq!(Money::from_cents(-550).format("$"), "-$5.50");
    /// ```
    pub fn format(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.dollars().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{}{}{}.{:02}", sign, symbol, grouped, self.cents_part())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Rounds a float to two fractional digits, half away from zero.
///
/// The float is first rendered as its shortest round-trip decimal text and
/// then parsed, so representation noise never leaks into the result:
/// `0.1 + 0.2` (`0.30000000000000004`) becomes exactly 30 cents, and `1.005`
/// becomes 101 cents rather than the 100 a naive `(x * 100.0).round()` gives.
///
/// Returns `None` for NaN, infinities, and values too large for cents.
pub fn round2(value: f64) -> Option<Money> {
    if !value.is_finite() {
        return None;
    }
    // `Display` for f64 never uses exponent notation
    Money::parse(&value.to_string()).ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented rendering (`$10.99`). Use [`Money::format`] for UI text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().unsigned_abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Decimal Serialization
// =============================================================================

/// Serde adapter storing [`Money`] as a decimal JSON number (`2.5`).
///
/// Used by the persisted snapshot, whose layout is
/// `{ price: number, budget: number }`. Reading goes through [`round2`], so a
/// hand-edited `2.499999` comes back as `2.50`.
///
/// ```rust,ignore
/// #[serde(with = "crate::money::as_decimal")]
/// pub price: Money,
/// ```
pub mod as_decimal {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{round2, Money};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        round2(value)
            .ok_or_else(|| D::Error::custom(format!("monetary value out of range: {}", value)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string_round_trips() {
        for cents in [0, 1, 99, 1050, 99_999_999_900, -550] {
            let money = Money::from_cents(cents);
            assert_eq!(Money::parse(&money.to_decimal_string()), Ok(money));
        }
        assert_eq!(Money::from_cents(1050).to_decimal_string(), "10.50");
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(Money::from_cents(0).format("$"), "$0.00");
        assert_eq!(Money::from_cents(99_999).format("$"), "$999.99");
        assert_eq!(Money::from_cents(100_000).format("$"), "$1,000.00");
        assert_eq!(Money::from_cents(99_999_999_900).format("$"), "$999,999,999.00");
        assert_eq!(Money::from_cents(-123_456).format("£"), "-£1,234.56");
    }

    #[test]
    fn test_parse_plain_values() {
        assert_eq!(Money::parse("0"), Ok(Money::zero()));
        assert_eq!(Money::parse("10"), Ok(Money::from_cents(1000)));
        assert_eq!(Money::parse("2.5"), Ok(Money::from_cents(250)));
        assert_eq!(Money::parse("2.50"), Ok(Money::from_cents(250)));
        assert_eq!(Money::parse("007.07"), Ok(Money::from_cents(707)));
        assert_eq!(Money::parse("-4.20"), Ok(Money::from_cents(-420)));
    }

    #[test]
    fn test_parse_rounds_half_away_from_zero() {
        assert_eq!(Money::parse("0.125"), Ok(Money::from_cents(13)));
        assert_eq!(Money::parse("0.1249999"), Ok(Money::from_cents(12)));
        assert_eq!(Money::parse("-0.125"), Ok(Money::from_cents(-13)));
        assert_eq!(Money::parse("0.004"), Ok(Money::zero()));
        assert_eq!(Money::parse("0.005"), Ok(Money::from_cents(1)));
        assert_eq!(Money::parse("9.995"), Ok(Money::from_cents(1000)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "-", ".5", "5.", "1.2.3", "+5", " 5", "5 ", "1e3", "1,000", "abc", "--1", "0x10"] {
            assert_eq!(Money::parse(raw), Err(MoneyParseError::Malformed), "input {:?}", raw);
        }
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::Overflow)
        );
        assert_eq!(
            Money::parse("92233720368547758.08"),
            Err(MoneyParseError::Overflow)
        );
    }

    #[test]
    fn test_round2_removes_float_noise() {
        assert_eq!(round2(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(round2(1.005), Some(Money::from_cents(101)));
        assert_eq!(round2(2.5), Some(Money::from_cents(250)));
        assert_eq!(round2(-0.125), Some(Money::from_cents(-13)));
        assert_eq!(round2(f64::NAN), None);
        assert_eq!(round2(f64::INFINITY), None);
        assert_eq!(round2(1e30), None);
    }

    #[test]
    fn test_repeated_dimes_sum_to_exactly_one() {
        let dime = Money::parse("0.1").unwrap();
        let total: Money = std::iter::repeat(dime).take(10).sum();
        assert_eq!(total, Money::from_cents(100));
        assert_eq!(total.to_string(), "$1.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(a), None);
    }

    #[test]
    fn test_zero_and_sign() {
        assert_eq!(Money::default(), Money::zero());
        assert!(!Money::zero().is_negative());
        assert!(!Money::from_cents(1).is_negative());
        assert!((Money::from_cents(100) - Money::from_cents(101)).is_negative());
    }

    #[test]
    fn test_decimal_serde_round_trip() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            #[serde(with = "as_decimal")]
            amount: Money,
        }

        let json = serde_json::to_string(&Holder {
            amount: Money::from_cents(250),
        })
        .unwrap();
        assert_eq!(json, r#"{"amount":2.5}"#);

        let back: Holder = serde_json::from_str(r#"{"amount":10}"#).unwrap();
        assert_eq!(back.amount, Money::from_cents(1000));

        let noisy: Holder = serde_json::from_str(r#"{"amount":0.30000000000000004}"#).unwrap();
        assert_eq!(noisy.amount, Money::from_cents(30));
    }
}
