//! Shareable text renderings of a priced quote.
//!
//! Pure formatters over [`Breakdown`]; nothing here reads or writes the
//! store. The customer message is what gets pasted into a chat with the
//! client, the breakdown rendering is the internal cost sheet.

use crate::pricing::Breakdown;

/// The message sent to the client for one priced product
#[must_use]
pub fn customer_message(
    client_name: &str,
    product_name: &str,
    quantity: u32,
    breakdown: &Breakdown,
) -> String {
    format!(
        "Hello {client_name}! Here is your quote:\n\n\
         {product_name} × {quantity}\n\
         Price per unit: ${price_per_unit:.2}\n\
         Total: ${total:.2}",
        price_per_unit = breakdown.price_per_unit,
        total = breakdown.total,
    )
}

/// The internal cost sheet for one priced quote
#[must_use]
pub fn breakdown_message(breakdown: &Breakdown) -> String {
    format!(
        "Base price total: ${base:.2}\n\
         Extra costs: ${extras:.2}\n\
         Subtotal: ${subtotal:.2}\n\
         Profit: ${profit:.2}\n\
         Total: ${total:.2}\n\
         Price per unit: ${per_unit:.2}",
        base = breakdown.base_price_total,
        extras = breakdown.total_extra_costs,
        subtotal = breakdown.subtotal_without_profit,
        profit = breakdown.profit_amount,
        total = breakdown.total,
        per_unit = breakdown.price_per_unit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Breakdown, ExtraCost};

    fn golden() -> Breakdown {
        Breakdown::compute(
            100.0,
            12,
            &[
                ExtraCost {
                    label: "Installation".to_string(),
                    cost: 50.0,
                    selected: true,
                },
                ExtraCost {
                    label: "Rush delivery".to_string(),
                    cost: 30.0,
                    selected: false,
                },
            ],
            50.0,
        )
    }

    #[test]
    fn test_customer_message_renders_the_priced_quote() {
        let message = customer_message("Acme Industrial", "Canvas banner 1x2m", 12, &golden());
        assert_eq!(
            message,
            "Hello Acme Industrial! Here is your quote:\n\n\
             Canvas banner 1x2m × 12\n\
             Price per unit: $156.25\n\
             Total: $1875.00"
        );
    }

    #[test]
    fn test_breakdown_message_lists_every_step() {
        let message = breakdown_message(&golden());
        assert_eq!(
            message,
            "Base price total: $1200.00\n\
             Extra costs: $50.00\n\
             Subtotal: $1250.00\n\
             Profit: $625.00\n\
             Total: $1875.00\n\
             Price per unit: $156.25"
        );
    }
}
