/// Share of the monthly bill a rooftop system is assumed to offset.
pub const SAVINGS_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsEstimate {
    pub monthly: f64,
    pub yearly: f64,
}

/// Rough savings estimate shown while the visitor types their bill.
/// Returns `None` for a zero or non-finite bill.
pub fn estimate_savings(monthly_bill: f64) -> Option<SavingsEstimate> {
    if monthly_bill == 0.0 || !monthly_bill.is_finite() {
        return None;
    }
    let monthly = monthly_bill * SAVINGS_RATIO;
    Some(SavingsEstimate {
        monthly,
        yearly: monthly * 12.0,
    })
}
