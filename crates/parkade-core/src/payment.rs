//! Payment collaborator

use rust_decimal::Decimal;

/// Charges the exit fee.
///
/// Every failure (declined card, provider outage) is reported as `false`.
pub trait Payment {
    fn pay(&self, amount: Decimal) -> bool;
}

impl<F> Payment for F
where
    F: Fn(Decimal) -> bool,
{
    fn pay(&self, amount: Decimal) -> bool {
        self(amount)
    }
}
