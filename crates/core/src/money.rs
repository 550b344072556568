//! Exact-decimal monetary amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::quantity::Quantity;

/// A non-negative monetary amount (prices, costs, totals).
///
/// Currency is implicit (the deployment's local currency); the original
/// system carried no currency codes either.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!(
                "amount cannot be negative: {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn add(&self, other: Money) -> Money {
        Money(self.0 + other.0)
    }

    /// Line subtotal: `quantity × unit price`, exact.
    pub fn times(&self, quantity: Quantity) -> Money {
        Money(self.0 * quantity.value())
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn subtotal_is_exact() {
        let price = Money::new(dec!(10.005)).unwrap();
        let qty = Quantity::new(dec!(3)).unwrap();
        assert_eq!(price.times(qty).value(), dec!(30.015));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(Money::new(dec!(-1)).is_err());
    }
}
