//! # Rendering
//!
//! Plain-text views of the cart for the terminal.
//!
//! ```text
//!   #  Product            Qty        Price       Line
//!   1  Pen                  2        $2.50      $5.00
//!   2  Book                 1        $4.00      $4.00
//!   Total: $9.00 | Budget: $10.00 | Remaining: $1.00
//! ```

use tally_core::{CartError, CartSummary, CartTotals, LineItem};

use crate::config::AppConfig;

pub fn cart_lines(items: &[LineItem], config: &AppConfig) -> Vec<String> {
    if items.is_empty() {
        return vec!["  (cart is empty)".to_string()];
    }

    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(format!(
        "  {:>2}  {:<16} {:>5} {:>12} {:>12}",
        "#", "Product", "Qty", "Price", "Line"
    ));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "  {:>2}  {:<16} {:>5} {:>12} {:>12}",
            i + 1,
            item.name,
            item.quantity,
            config.format_currency(item.price),
            config.format_currency(item.line_total()),
        ));
    }
    lines
}

pub fn totals_line(totals: &CartTotals, config: &AppConfig) -> String {
    format!(
        "  Total: {} | Budget: {} | Remaining: {}",
        config.format_currency(totals.total),
        config.format_currency(totals.budget),
        config.format_currency(totals.remaining),
    )
}

pub fn summary_lines(summary: &CartSummary, config: &AppConfig) -> Vec<String> {
    let mut lines = vec![format!("Purchase summary for {}", summary.owner)];
    lines.extend(cart_lines(&summary.items, config));
    lines.push(format!("  Budget:    {}", config.format_currency(summary.budget)));
    lines.push(format!("  Total:     {}", config.format_currency(summary.total)));
    lines.push(format!("  Remaining: {}", config.format_currency(summary.remaining)));
    lines
}

/// User-facing wording for a rejected cart operation.
pub fn error_lines(err: &CartError, config: &AppConfig) -> Vec<String> {
    match err {
        CartError::InvalidItem(errors) | CartError::InvalidConfiguration(errors) => errors
            .iter()
            .map(|e| format!("  ! {}", e))
            .collect(),
        CartError::BudgetExceeded {
            available,
            requested,
        } => vec![format!(
            "  ! Not enough budget: that costs {}, only {} left",
            config.format_currency(*requested),
            config.format_currency(*available),
        )],
        CartError::QuantityLimitExceeded {
            current,
            requested,
            max,
        } => vec![format!(
            "  ! You already have {}; adding {} would pass the limit of {}",
            current, requested, max
        )],
        CartError::EmptyCart => vec!["  ! Your cart is empty; add something first".to_string()],
        other => vec![format!("  ! {}", other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::error::{Field, Reason, ValidationError, ValidationErrors};
    use tally_core::{CartPhase, Money};

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_cart_lines() {
        let items = vec![
            LineItem::new("Pen", Money::from_cents(250), 2),
            LineItem::new("Book", Money::from_cents(400), 1),
        ];
        let lines = cart_lines(&items, &config());

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("1  Pen"));
        assert!(lines[1].trim_end().ends_with("$5.00"));
        assert!(lines[2].contains("Book"));

        assert_eq!(cart_lines(&[], &config()), vec!["  (cart is empty)".to_string()]);
    }

    #[test]
    fn test_totals_line() {
        let totals = CartTotals {
            phase: CartPhase::Configured,
            item_count: 2,
            total_quantity: 3,
            budget: Money::from_cents(1000),
            total: Money::from_cents(900),
            remaining: Money::from_cents(100),
        };
        assert_eq!(
            totals_line(&totals, &config()),
            "  Total: $9.00 | Budget: $10.00 | Remaining: $1.00"
        );
    }

    #[test]
    fn test_error_lines() {
        let errors = ValidationErrors::collect([
            ValidationError::new(Field::Name, Reason::Empty),
            ValidationError::new(Field::Price, Reason::NotNumeric),
        ])
        .unwrap();
        assert_eq!(
            error_lines(&CartError::InvalidItem(errors), &config()),
            vec![
                "  ! product name is required".to_string(),
                "  ! price must be a number".to_string(),
            ]
        );

        let budget = CartError::BudgetExceeded {
            available: Money::from_cents(500),
            requested: Money::from_cents(750),
        };
        assert_eq!(
            error_lines(&budget, &config()),
            vec!["  ! Not enough budget: that costs $7.50, only $5.00 left".to_string()]
        );
    }
}
