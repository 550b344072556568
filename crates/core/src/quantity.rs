//! Non-negative exact-decimal quantity.
//!
//! All stock arithmetic in the system goes through this type so the
//! `available_quantity >= 0` invariant has a single enforcement point and no
//! binary floating-point drift can creep in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A non-negative decimal quantity (stock levels, consumption amounts).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    /// Construct from a decimal, rejecting negative values.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!(
                "quantity cannot be negative: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Construct from a decimal, rejecting zero and negative values.
    ///
    /// Usage lines and purchases must carry a strictly positive amount.
    pub fn positive(value: Decimal) -> DomainResult<Self> {
        let q = Self::new(value)?;
        if q.is_zero() {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }
        Ok(q)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: Quantity) -> Quantity {
        Quantity(self.0 + other.0)
    }

    /// Subtract `other`, returning `None` when the result would go negative.
    pub fn checked_sub(&self, other: Quantity) -> Option<Quantity> {
        if other.0 > self.0 {
            None
        } else {
            Some(Quantity(self.0 - other.0))
        }
    }

    /// Absolute difference between two quantities.
    pub fn abs_diff(&self, other: Quantity) -> Quantity {
        Quantity((self.0 - other.0).abs())
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_negative() {
        assert!(Quantity::new(dec!(-0.01)).is_err());
        assert!(Quantity::new(dec!(0)).is_ok());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(Quantity::positive(dec!(0)).is_err());
        assert!(Quantity::positive(dec!(0.5)).is_ok());
    }

    #[test]
    fn checked_sub_guards_the_floor() {
        let ten = Quantity::new(dec!(10)).unwrap();
        let three = Quantity::new(dec!(3)).unwrap();
        assert_eq!(ten.checked_sub(three).unwrap().value(), dec!(7));
        assert!(three.checked_sub(ten).is_none());
    }

    #[test]
    fn exact_decimal_arithmetic() {
        let a = Quantity::new(dec!(0.1)).unwrap();
        let b = Quantity::new(dec!(0.2)).unwrap();
        assert_eq!(a.add(b).value(), dec!(0.3));
    }
}
