//! Running monetary accumulators for the `ICMSTot` block.

use parking_lot::RwLock;
use rust_decimal::Decimal;

use super::normalize::round_half_away;
use super::types::{Contribution, ContributionBasis, IpiKind, Product, Tax, Totals};

/// Accumulates item contributions and computes the grand total.
///
/// Contributions are summed unrounded; rounding happens once in
/// [`Totalizer::finalize`]. The lock only protects the accumulators; the
/// caller decides when all items are in and finalize may run.
#[derive(Debug, Default)]
pub struct Totalizer {
    totals: RwLock<Totals>,
}

impl Totalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one item's product and tax figures.
    pub fn add_item(&self, product: &Product, tax: &Tax) {
        let mut t = self.totals.write();

        if product.include_in_total {
            t.products += product.total;
        }
        t.freight += product.freight.unwrap_or_default();
        t.insurance += product.insurance.unwrap_or_default();
        t.discount += product.discount.unwrap_or_default();
        t.other += product.other.unwrap_or_default();

        if let Some(icms) = &tax.icms {
            if let Some(own) = icms.own() {
                t.icms_base += own.base;
                t.icms_value += own.value;
            }
            if let Some(st) = icms.st() {
                t.icms_st_base += st.base;
                t.icms_st_value += st.value;
            }
            if let Some(relief) = icms.relief() {
                t.icms_relief += relief.value;
            }
        }

        if let Some(ipi) = &tax.ipi {
            if let IpiKind::Taxed { value, .. } = ipi.kind {
                t.ipi += value;
            }
        }

        t.pis += contribution_value(tax.pis.as_ref());
        t.cofins += contribution_value(tax.cofins.as_ref());

        if let Some(ii) = &tax.import {
            t.import_tax += ii.value;
        }

        t.approximate_taxes += tax.approximate_total.unwrap_or_default();
    }

    /// Compute the totals block from the raw sums, optionally rounded.
    ///
    /// The accumulators are never modified: items added afterwards keep
    /// summing unrounded values, and a later finalize with a different
    /// `round` flag sees the same raw sums.
    ///
    /// With rounding on, each component is rounded to 2 places (half away
    /// from zero) and `vNF` is the formula applied to the rounded
    /// components, so it always equals the sum of the printed fields. It is
    /// not the raw formula result rounded on its own; the two can differ
    /// by 0.01.
    pub fn finalize(&self, round: bool) -> Totals {
        let mut t = *self.totals.read();
        if round {
            for field in [
                &mut t.icms_base,
                &mut t.icms_value,
                &mut t.icms_relief,
                &mut t.icms_st_base,
                &mut t.icms_st_value,
                &mut t.products,
                &mut t.freight,
                &mut t.insurance,
                &mut t.discount,
                &mut t.import_tax,
                &mut t.ipi,
                &mut t.pis,
                &mut t.cofins,
                &mut t.other,
                &mut t.approximate_taxes,
            ] {
                *field = round_half_away(*field, 2);
            }
        }
        // PIS and COFINS are informational and stay out of vNF.
        t.grand_total = t.products - t.discount - t.icms_relief
            + t.icms_st_value
            + t.freight
            + t.insurance
            + t.other
            + t.import_tax
            + t.ipi;
        t
    }

    /// Raw accumulator values. `grand_total` is only set by [`Totalizer::finalize`]
    /// on the copy it returns, so here it stays zero.
    pub fn snapshot(&self) -> Totals {
        *self.totals.read()
    }

    /// Clear all accumulators.
    pub fn reset(&self) {
        *self.totals.write() = Totals::default();
    }
}

fn contribution_value(c: Option<&Contribution>) -> Decimal {
    match c {
        Some(Contribution {
            basis: Some(ContributionBasis::Rate { .. } | ContributionBasis::Quantity { .. }),
            value,
            ..
        }) => *value,
        _ => Decimal::ZERO,
    }
}
