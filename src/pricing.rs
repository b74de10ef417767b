//! Pricing math for the quote form.
//!
//! [`Breakdown::compute`] is the single pricing rule: pure, synchronous,
//! nothing here touches the store. [`QuoteForm`] carries the editable form
//! state and enforces the input boundaries (quantity floor of one, margin
//! clamped to a percentage, extra costs rejected when negative), so any
//! form state that exists can be priced.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// One optional surcharge on the quote form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraCost {
    /// Display label, e.g. "Installation"
    pub label: String,
    /// Amount added to the subtotal while selected; finite and not negative
    pub cost: f64,
    /// Whether the cost currently participates in the total
    pub selected: bool,
}

/// Fully priced summary derived from one form state
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// `base_price * quantity`
    pub base_price_total: f64,
    /// Sum of the selected extra costs
    pub total_extra_costs: f64,
    /// `base_price_total + total_extra_costs`
    pub subtotal_without_profit: f64,
    /// `subtotal_without_profit * margin / 100`
    pub profit_amount: f64,
    /// `subtotal_without_profit + profit_amount`
    pub total: f64,
    /// `total / quantity`, or zero when the quantity is zero
    pub price_per_unit: f64,
}

impl Breakdown {
    /// Prices one quote. The steps run in a fixed order so identical inputs
    /// always produce identical outputs. The margin is clamped to
    /// `[0, 100]`; a zero quantity yields a zero price per unit rather than
    /// dividing by zero.
    #[must_use]
    pub fn compute(
        base_price: f64,
        quantity: u32,
        extra_costs: &[ExtraCost],
        profit_margin_percent: f64,
    ) -> Self {
        let margin = clamp_margin(profit_margin_percent);

        let base_price_total = base_price * f64::from(quantity);
        let total_extra_costs: f64 = extra_costs
            .iter()
            .filter(|extra| extra.selected)
            .map(|extra| extra.cost)
            .sum();
        let subtotal_without_profit = base_price_total + total_extra_costs;
        let profit_amount = subtotal_without_profit * (margin / 100.0);
        let total = subtotal_without_profit + profit_amount;
        let price_per_unit = if quantity > 0 {
            total / f64::from(quantity)
        } else {
            0.0
        };

        Self {
            base_price_total,
            total_extra_costs,
            subtotal_without_profit,
            profit_amount,
            total,
            price_per_unit,
        }
    }
}

/// Editable form state behind the pricing screen.
///
/// Mutators never leave the form unpriceable: the quantity floor is one,
/// the margin stays inside `[0, 100]`, and extra costs are validated on
/// entry. Unusable input (unparseable quantity text, a non-finite margin)
/// leaves the previous value in place instead of erroring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteForm {
    base_price: f64,
    quantity: u32,
    profit_margin_percent: f64,
    extra_costs: Vec<ExtraCost>,
}

impl QuoteForm {
    /// A fresh form for one product at the given unit base price. A
    /// negative or non-finite price starts at zero.
    #[must_use]
    pub fn new(base_price: f64) -> Self {
        Self {
            base_price: sanitize_price(base_price),
            quantity: 1,
            profit_margin_percent: 0.0,
            extra_costs: Vec::new(),
        }
    }

    /// Current unit base price
    #[must_use]
    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Current quantity, always at least one
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Current profit margin in percent, always inside `[0, 100]`
    #[must_use]
    pub fn profit_margin_percent(&self) -> f64 {
        self.profit_margin_percent
    }

    /// The extra costs in entry order
    #[must_use]
    pub fn extra_costs(&self) -> &[ExtraCost] {
        &self.extra_costs
    }

    /// Replaces the unit base price, ignoring negative or non-finite input
    pub fn set_base_price(&mut self, base_price: f64) {
        if base_price.is_finite() && base_price >= 0.0 {
            self.base_price = base_price;
        }
    }

    /// Adds one unit
    pub fn increment_quantity(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Removes one unit, stopping at one
    pub fn decrement_quantity(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Applies free-text quantity input. Text that does not parse as an
    /// integer leaves the quantity unchanged; a parsed value below one is
    /// raised to one.
    pub fn set_quantity_text(&mut self, text: &str) {
        let Ok(parsed) = text.trim().parse::<i64>() else {
            return;
        };
        self.quantity =
            u32::try_from(parsed.clamp(1, i64::from(u32::MAX))).unwrap_or(u32::MAX);
    }

    /// Replaces the profit margin, clamping into `[0, 100]` and ignoring
    /// non-finite input
    pub fn set_profit_margin(&mut self, percent: f64) {
        if percent.is_finite() {
            self.profit_margin_percent = percent.clamp(0.0, 100.0);
        }
    }

    /// Appends an extra cost, initially unselected.
    ///
    /// # Errors
    /// `Error::Validation` when the cost is negative or non-finite; the
    /// form is left unchanged.
    pub fn add_extra_cost(&mut self, label: impl Into<String>, cost: f64) -> Result<()> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(Error::Validation {
                message: format!("extra cost must be finite and not negative, got {cost}"),
            });
        }
        self.extra_costs.push(ExtraCost {
            label: label.into(),
            cost,
            selected: false,
        });
        Ok(())
    }

    /// Flips whether one extra cost participates in the total and returns
    /// the new state. An index out of range toggles nothing and returns
    /// `false`.
    pub fn toggle_extra_cost(&mut self, index: usize) -> bool {
        match self.extra_costs.get_mut(index) {
            Some(extra) => {
                extra.selected = !extra.selected;
                extra.selected
            }
            None => false,
        }
    }

    /// Removes and returns one extra cost, or `None` for an index out of
    /// range
    pub fn remove_extra_cost(&mut self, index: usize) -> Option<ExtraCost> {
        if index < self.extra_costs.len() {
            Some(self.extra_costs.remove(index))
        } else {
            None
        }
    }

    /// Prices the current form state
    #[must_use]
    pub fn breakdown(&self) -> Breakdown {
        Breakdown::compute(
            self.base_price,
            self.quantity,
            &self.extra_costs,
            self.profit_margin_percent,
        )
    }
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn clamp_margin(percent: f64) -> f64 {
    if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price >= 0.0 {
        price
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    fn extras() -> Vec<ExtraCost> {
        vec![
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
        ]
    }

    #[test]
    fn test_golden_scenario() {
        let breakdown = Breakdown::compute(100.0, 12, &extras(), 50.0);

        assert_eq!(breakdown.base_price_total, 1200.0);
        assert_eq!(breakdown.total_extra_costs, 50.0);
        assert_eq!(breakdown.subtotal_without_profit, 1250.0);
        assert_eq!(breakdown.profit_amount, 625.0);
        assert_eq!(breakdown.total, 1875.0);
        assert_eq!(breakdown.price_per_unit, 156.25);
    }

    #[test]
    fn test_base_price_total_is_exact_for_integer_quantities() {
        for quantity in 1..=200 {
            let breakdown = Breakdown::compute(2.5, quantity, &[], 0.0);
            assert_eq!(breakdown.base_price_total, 2.5 * f64::from(quantity));
        }
    }

    #[test]
    fn test_total_is_monotone_in_margin() {
        let extras = extras();
        let mut previous = f64::MIN;
        for percent in 0..=100 {
            let total = Breakdown::compute(99.99, 7, &extras, f64::from(percent)).total;
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn test_zero_quantity_prices_to_zero_per_unit() {
        let breakdown = Breakdown::compute(100.0, 0, &extras(), 50.0);
        assert_eq!(breakdown.base_price_total, 0.0);
        assert_eq!(breakdown.price_per_unit, 0.0);
    }

    #[test]
    fn test_margin_is_clamped_on_both_ends() {
        let at_cap = Breakdown::compute(100.0, 1, &[], 100.0);
        assert_eq!(Breakdown::compute(100.0, 1, &[], 250.0), at_cap);

        let at_floor = Breakdown::compute(100.0, 1, &[], 0.0);
        assert_eq!(Breakdown::compute(100.0, 1, &[], -25.0), at_floor);
    }

    #[test]
    fn test_unselected_costs_never_price_in() {
        let mut all_off = extras();
        for extra in &mut all_off {
            extra.selected = false;
        }
        let breakdown = Breakdown::compute(10.0, 2, &all_off, 0.0);
        assert_eq!(breakdown.total_extra_costs, 0.0);
        assert_eq!(breakdown.total, 20.0);
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut form = QuoteForm::new(10.0);
        form.decrement_quantity();
        assert_eq!(form.quantity(), 1);

        form.increment_quantity();
        form.increment_quantity();
        form.decrement_quantity();
        assert_eq!(form.quantity(), 2);
    }

    #[test]
    fn test_quantity_text_entry() {
        let mut form = QuoteForm::new(10.0);

        form.set_quantity_text("12");
        assert_eq!(form.quantity(), 12);

        form.set_quantity_text(" 7 ");
        assert_eq!(form.quantity(), 7);

        form.set_quantity_text("0");
        assert_eq!(form.quantity(), 1);

        form.set_quantity_text("-3");
        assert_eq!(form.quantity(), 1);

        form.set_quantity_text("12");
        form.set_quantity_text("a dozen");
        assert_eq!(form.quantity(), 12);
    }

    #[test]
    fn test_margin_entry_clamps_and_ignores_non_finite() {
        let mut form = QuoteForm::new(10.0);

        form.set_profit_margin(130.0);
        assert_eq!(form.profit_margin_percent(), 100.0);

        form.set_profit_margin(-5.0);
        assert_eq!(form.profit_margin_percent(), 0.0);

        form.set_profit_margin(42.5);
        form.set_profit_margin(f64::NAN);
        form.set_profit_margin(f64::INFINITY);
        assert_eq!(form.profit_margin_percent(), 42.5);
    }

    #[test]
    fn test_negative_extra_cost_is_rejected() {
        let mut form = QuoteForm::new(10.0);
        let err = form.add_extra_cost("Discount?", -5.0).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(form.extra_costs().is_empty());
    }

    #[test]
    fn test_toggle_and_remove_extra_costs() {
        let mut form = QuoteForm::new(10.0);
        form.add_extra_cost("Installation", 50.0).unwrap();

        assert!(form.toggle_extra_cost(0));
        assert!(!form.toggle_extra_cost(0));
        assert!(!form.toggle_extra_cost(99));

        let removed = form.remove_extra_cost(0).unwrap();
        assert_eq!(removed.label, "Installation");
        assert!(form.remove_extra_cost(0).is_none());
    }

    #[test]
    fn test_form_prices_the_golden_scenario() {
        let mut form = QuoteForm::new(100.0);
        form.set_quantity_text("12");
        form.add_extra_cost("Installation", 50.0).unwrap();
        form.add_extra_cost("Rush delivery", 30.0).unwrap();
        form.toggle_extra_cost(0);
        form.set_profit_margin(50.0);

        let breakdown = form.breakdown();
        assert_eq!(breakdown.total, 1875.0);
        assert_eq!(breakdown.price_per_unit, 156.25);
    }
}
