//! # Validation Module
//!
//! Turns raw user-supplied strings into typed, bounded values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input surface (terminal prompt, web form, ...)               │
//! │  └── Hands over the raw text, untouched                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Parse (no silent coercion: "3.5" is never a quantity)             │
//! │  └── Bound (length, alphabet, numeric range)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CartStore                                                    │
//! │  └── Budget sufficiency, identity merge, per-line quantity cap         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator is pure and independent of the others. [`validate_item`]
//! runs all three product validators without short-circuiting, so the caller
//! learns about every bad field in one pass.
//!
//! ## Usage
//! ```rust
//! use tally_core::error::{Field, Reason};
//! use tally_core::validation::{validate_price, validate_quantity};
//!
//! assert_eq!(validate_price("2.50").unwrap().cents(), 250);
//! assert_eq!(validate_quantity("3.5").unwrap_err().reason, Reason::NotInteger);
//! assert_eq!(validate_quantity("").unwrap_err().field, Field::Quantity);
//! ```

use crate::error::{Field, Reason, ValidationError, ValidationErrors};
use crate::money::{Money, MoneyParseError};
use crate::{
    MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY, MIN_AMOUNT_CENTS, OWNER_NAME_MAX_LEN, OWNER_NAME_MIN_LEN,
    PRODUCT_NAME_MAX_LEN, PRODUCT_NAME_MIN_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A product whose fields all passed validation.
///
/// Budget sufficiency has NOT been checked yet; that needs the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCandidate {
    /// Trimmed name, original casing.
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates the session owner's display name.
///
/// ## Rules
/// - Trimmed before checking
/// - 2 to 50 characters (counted as characters, not bytes)
/// - Letters (accented letters included) and spaces only; a combining
///   accent is accepted after a letter, so decomposed input such as
///   `"Jose\u{301}"` passes
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_owner_name;
///
/// assert_eq!(validate_owner_name("  José María ").unwrap(), "José María");
/// assert!(validate_owner_name("R2D2").is_err());
/// ```
pub fn validate_owner_name(raw: &str) -> ValidationResult<String> {
    validate_text(raw, Field::Owner, OWNER_NAME_MIN_LEN, OWNER_NAME_MAX_LEN, |c| {
        c.is_alphabetic() || c == ' '
    })
}

/// Validates a product name.
///
/// ## Rules
/// - Trimmed before checking
/// - 2 to 100 characters
/// - Letters (accented included), ASCII digits, spaces, `-` and `.`
/// - Superscripts and other numeric symbols are rejected
pub fn validate_product_name(raw: &str) -> ValidationResult<String> {
    validate_text(
        raw,
        Field::Name,
        PRODUCT_NAME_MIN_LEN,
        PRODUCT_NAME_MAX_LEN,
        |c| c.is_alphabetic() || c.is_ascii_digit() || matches!(c, ' ' | '-' | '.'),
    )
}

fn validate_text(
    raw: &str,
    field: Field,
    min: usize,
    max: usize,
    allowed: impl Fn(char) -> bool,
) -> ValidationResult<String> {
    let text = raw.trim();

    if text.is_empty() {
        return Err(ValidationError::new(field, Reason::Empty));
    }

    let len = text.chars().count();
    if len < min {
        return Err(ValidationError::new(field, Reason::TooShort { min }));
    }
    if len > max {
        return Err(ValidationError::new(field, Reason::TooLong { max }));
    }

    if !chars_allowed(text, allowed) {
        return Err(ValidationError::new(field, Reason::InvalidCharacters));
    }

    Ok(text.to_string())
}

/// Combining marks ride on the preceding base character: allowed only
/// directly after a letter (or after another mark on that letter).
fn chars_allowed(text: &str, allowed: impl Fn(char) -> bool) -> bool {
    let mut base: Option<char> = None;
    text.chars().all(|c| {
        if is_combining_mark(c) {
            base.is_some_and(char::is_alphabetic)
        } else {
            base = Some(c);
            allowed(c)
        }
    })
}

/// Combining diacritical mark blocks.
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the spending limit.
///
/// ## Rules
/// - Blank → `Empty`
/// - Must match `-?digits(.digits)?` → otherwise `NotNumeric`
/// - Rounded to cents, then must lie in [0.01, 999,999,999.00] → otherwise
///   `OutOfRange` (so `"-5"` and `"0.004"` are out of range, not malformed)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  User enters budget: "10"                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_budget("10") ← THIS FUNCTION                                 │
/// │       │                                                                 │
/// │       ├── blank?         → Error: "budget is required"                 │
/// │       ├── not a number?  → Error: "budget must be a number"            │
/// │       ├── out of range?  → Error: "budget is out of range"             │
/// │       │                                                                 │
/// │       └── OK → Money(1000) ──► CartStore::initialize                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_budget(raw: &str) -> ValidationResult<Money> {
    validate_amount(raw, Field::Budget)
}

/// Validates a unit price. Same grammar, rounding and range as the budget.
pub fn validate_price(raw: &str) -> ValidationResult<Money> {
    validate_amount(raw, Field::Price)
}

fn validate_amount(raw: &str, field: Field) -> ValidationResult<Money> {
    let text = raw.trim();

    if text.is_empty() {
        return Err(ValidationError::new(field, Reason::Empty));
    }

    let amount = match Money::parse(text) {
        Ok(amount) => amount,
        Err(MoneyParseError::Malformed) => {
            return Err(ValidationError::new(field, Reason::NotNumeric))
        }
        Err(MoneyParseError::Overflow) => {
            return Err(ValidationError::new(field, Reason::OutOfRange))
        }
    };

    if !is_amount_in_range(amount) {
        return Err(ValidationError::new(field, Reason::OutOfRange));
    }

    Ok(amount)
}

/// True when `amount` lies in the accepted [0.01, 999,999,999.00] range.
pub fn is_amount_in_range(amount: Money) -> bool {
    (MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS).contains(&amount.cents())
}

/// Validates a quantity.
///
/// ## Rules
/// - Blank → `Empty`
/// - Anything but an optionally signed run of ASCII digits → `NotInteger`
///   (`"3.5"`, `"3.0"`, `"1e2"` and `"three"` all land here)
/// - Outside [1, 99,999] → `OutOfRange` (`"-1"`, `"0"`, `"100000"`)
pub fn validate_quantity(raw: &str) -> ValidationResult<u32> {
    let text = raw.trim();

    if text.is_empty() {
        return Err(ValidationError::new(Field::Quantity, Reason::Empty));
    }

    let (negative, digits) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(Field::Quantity, Reason::NotInteger));
    }

    let out_of_range = || ValidationError::new(Field::Quantity, Reason::OutOfRange);

    if negative {
        // "-0" is zero, still below the minimum
        return Err(out_of_range());
    }

    // Digits only: a parse failure means the value is far beyond the maximum
    let quantity: u32 = digits.parse().map_err(|_| out_of_range())?;
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(out_of_range());
    }

    Ok(quantity)
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates every field of a product add.
///
/// All three validators always run. On failure the error lists every bad
/// field in input order (name, price, quantity), independent of which one
/// failed first.
pub fn validate_item(
    name_raw: &str,
    price_raw: &str,
    quantity_raw: &str,
) -> Result<ItemCandidate, ValidationErrors> {
    let name = validate_product_name(name_raw);
    let price = validate_price(price_raw);
    let quantity = validate_quantity(quantity_raw);

    match (name, price, quantity) {
        (Ok(name), Ok(price), Ok(quantity)) => Ok(ItemCandidate {
            name,
            price,
            quantity,
        }),
        (name, price, quantity) => {
            let errors = [name.err(), price.err(), quantity.err()]
                .into_iter()
                .flatten();
            // At least one of the three is an Err in this arm
            Err(ValidationErrors::collect(errors)
                .unwrap_or_else(|| ValidationError::new(Field::Name, Reason::Empty).into()))
        }
    }
}

/// Validates the owner/budget pair used by `initialize`.
pub fn validate_configuration(
    owner_raw: &str,
    budget_raw: &str,
) -> Result<(String, Money), ValidationErrors> {
    match (validate_owner_name(owner_raw), validate_budget(budget_raw)) {
        (Ok(owner), Ok(budget)) => Ok((owner, budget)),
        (owner, budget) => {
            let errors = [owner.err(), budget.err()].into_iter().flatten();
            Err(ValidationErrors::collect(errors)
                .unwrap_or_else(|| ValidationError::new(Field::Owner, Reason::Empty).into()))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reason<T: std::fmt::Debug>(result: ValidationResult<T>) -> Reason {
        result.unwrap_err().reason
    }

    #[test]
    fn test_validate_owner_name() {
        assert_eq!(validate_owner_name("Ana").unwrap(), "Ana");
        assert_eq!(validate_owner_name("  Zoë Ñúñez  ").unwrap(), "Zoë Ñúñez");
        assert_eq!(validate_owner_name(&"a".repeat(50)).unwrap().len(), 50);

        assert_eq!(reason(validate_owner_name("")), Reason::Empty);
        assert_eq!(reason(validate_owner_name("   ")), Reason::Empty);
        assert_eq!(reason(validate_owner_name("A")), Reason::TooShort { min: 2 });
        assert_eq!(
            reason(validate_owner_name(&"a".repeat(51))),
            Reason::TooLong { max: 50 }
        );
        assert_eq!(reason(validate_owner_name("Ana-Maria")), Reason::InvalidCharacters);
        assert_eq!(reason(validate_owner_name("Agent 47")), Reason::InvalidCharacters);
    }

    #[test]
    fn test_owner_name_length_counts_characters() {
        // 25 two-byte characters: 50 bytes but only 25 chars
        assert!(validate_owner_name(&"é".repeat(25)).is_ok());
        assert!(validate_owner_name(&"é".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("Pen").unwrap(), "Pen");
        assert_eq!(validate_product_name("Café 2.0 - Grande").unwrap(), "Café 2.0 - Grande");

        assert_eq!(reason(validate_product_name("")), Reason::Empty);
        assert_eq!(reason(validate_product_name("X")), Reason::TooShort { min: 2 });
        assert_eq!(
            reason(validate_product_name(&"x".repeat(101))),
            Reason::TooLong { max: 100 }
        );
        assert_eq!(reason(validate_product_name("Pen & Ink")), Reason::InvalidCharacters);
        assert_eq!(reason(validate_product_name("50%")), Reason::InvalidCharacters);
    }

    #[test]
    fn test_product_name_digits_are_ascii_only() {
        assert!(validate_product_name("Pack of 12").is_ok());
        assert_eq!(reason(validate_product_name("x²")), Reason::InvalidCharacters);
        assert_eq!(reason(validate_product_name("Tea ½")), Reason::InvalidCharacters);
        assert_eq!(reason(validate_product_name("Box ٣")), Reason::InvalidCharacters);
    }

    #[test]
    fn test_decomposed_accents_are_accepted() {
        assert_eq!(validate_owner_name("Jose\u{301}").unwrap(), "Jose\u{301}");
        assert_eq!(validate_owner_name("Zoe\u{308} Nun\u{303}ez").unwrap(), "Zoe\u{308} Nun\u{303}ez");
        assert!(validate_product_name("Cafe\u{301} 2.0").is_ok());

        // a mark needs a letter to sit on
        assert_eq!(reason(validate_owner_name("Ana \u{301}")), Reason::InvalidCharacters);
        assert_eq!(reason(validate_product_name("Pen 2\u{301}")), Reason::InvalidCharacters);
    }

    #[test]
    fn test_validate_budget() {
        assert_eq!(validate_budget("10").unwrap(), Money::from_cents(1000));
        assert_eq!(validate_budget(" 10.005 ").unwrap(), Money::from_cents(1001));
        assert_eq!(validate_budget("0.01").unwrap(), Money::from_cents(1));
        assert_eq!(
            validate_budget("999999999").unwrap(),
            Money::from_cents(MAX_AMOUNT_CENTS)
        );

        assert_eq!(reason(validate_budget("")), Reason::Empty);
        assert_eq!(reason(validate_budget("ten")), Reason::NotNumeric);
        assert_eq!(reason(validate_budget("1,000")), Reason::NotNumeric);
        assert_eq!(reason(validate_budget("+5")), Reason::NotNumeric);
        assert_eq!(reason(validate_budget("-5")), Reason::OutOfRange);
        assert_eq!(reason(validate_budget("0")), Reason::OutOfRange);
        assert_eq!(reason(validate_budget("0.004")), Reason::OutOfRange);
        assert_eq!(reason(validate_budget("999999999.01")), Reason::OutOfRange);
        assert_eq!(reason(validate_budget("99999999999999999999999")), Reason::OutOfRange);
    }

    #[test]
    fn test_validate_price_reports_price_field() {
        let err = validate_price("abc").unwrap_err();
        assert_eq!(err.field, Field::Price);
        assert_eq!(err.reason, Reason::NotNumeric);
        assert_eq!(validate_price("2.5").unwrap(), Money::from_cents(250));
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity("1").unwrap(), 1);
        assert_eq!(validate_quantity(" 42 ").unwrap(), 42);
        assert_eq!(validate_quantity("+7").unwrap(), 7);
        assert_eq!(validate_quantity("99999").unwrap(), 99_999);

        assert_eq!(reason(validate_quantity("")), Reason::Empty);
        assert_eq!(reason(validate_quantity("3.5")), Reason::NotInteger);
        assert_eq!(reason(validate_quantity("3.0")), Reason::NotInteger);
        assert_eq!(reason(validate_quantity("1e2")), Reason::NotInteger);
        assert_eq!(reason(validate_quantity("three")), Reason::NotInteger);
        assert_eq!(reason(validate_quantity("-")), Reason::NotInteger);
        assert_eq!(reason(validate_quantity("-1")), Reason::OutOfRange);
        assert_eq!(reason(validate_quantity("-0")), Reason::OutOfRange);
        assert_eq!(reason(validate_quantity("0")), Reason::OutOfRange);
        assert_eq!(reason(validate_quantity("100000")), Reason::OutOfRange);
        assert_eq!(reason(validate_quantity("99999999999999")), Reason::OutOfRange);
    }

    #[test]
    fn test_validate_item_collects_every_failure() {
        let errors = validate_item("X", "free", "3.5").unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Name, Field::Price, Field::Quantity]);
        assert_eq!(errors.reason_for(Field::Name), Some(Reason::TooShort { min: 2 }));
        assert_eq!(errors.reason_for(Field::Price), Some(Reason::NotNumeric));
        assert_eq!(errors.reason_for(Field::Quantity), Some(Reason::NotInteger));
    }

    #[test]
    fn test_validate_item_reports_only_bad_fields() {
        // Same bad quantity, regardless of whether other fields are valid
        let alone = validate_item("Pen", "2.50", "0").unwrap_err();
        let with_others = validate_item("", "2.50", "0").unwrap_err();

        assert_eq!(alone.fields(), vec![Field::Quantity]);
        assert_eq!(with_others.fields(), vec![Field::Name, Field::Quantity]);
        assert_eq!(
            alone.reason_for(Field::Quantity),
            with_others.reason_for(Field::Quantity)
        );
    }

    #[test]
    fn test_validate_item_success() {
        let item = validate_item(" Pen ", "2.5", "2").unwrap();
        assert_eq!(
            item,
            ItemCandidate {
                name: "Pen".to_string(),
                price: Money::from_cents(250),
                quantity: 2,
            }
        );
    }

    #[test]
    fn test_validate_configuration() {
        let (owner, budget) = validate_configuration("Ana", "10.00").unwrap();
        assert_eq!(owner, "Ana");
        assert_eq!(budget, Money::from_cents(1000));

        let errors = validate_configuration("", "-1").unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Owner, Field::Budget]);
    }
}
