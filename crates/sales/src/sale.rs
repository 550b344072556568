use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmgate_core::{DomainError, DomainResult, Money, PartyId, ProductionId, Quantity, SaleId};

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" => Ok(PaymentMethod::Transfer),
            "credit" => Ok(PaymentMethod::Credit),
            other => Err(DomainError::validation(format!(
                "payment method must be one of cash, transfer, credit (got '{other}')"
            ))),
        }
    }
}

/// One line of a sale: a quantity of one production cycle's harvest at a
/// unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub production_id: ProductionId,
    pub quantity: Quantity,
    pub unit_price: Money,
}

impl SaleLine {
    pub fn new(
        production_id: ProductionId,
        quantity: Quantity,
        unit_price: Money,
    ) -> DomainResult<Self> {
        if quantity.is_zero() {
            return Err(DomainError::validation(
                "sale line quantity must be greater than zero",
            ));
        }
        Ok(Self {
            production_id,
            quantity,
            unit_price,
        })
    }

    /// `quantity × unit price`, exact.
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// A completed sale to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub client_id: PartyId,
    pub sold_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub total: Money,
    pub lines: Vec<SaleLine>,
}

/// Validated input for registering a sale.
///
/// The total is never taken from the caller; it is always recomputed from
/// the lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub client_id: PartyId,
    pub sold_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<SaleLine>,
}

impl NewSale {
    pub fn new(
        client_id: PartyId,
        sold_at: DateTime<Utc>,
        payment_method: PaymentMethod,
        lines: Vec<SaleLine>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation(
                "a sale must have at least one line item",
            ));
        }
        Ok(Self {
            client_id,
            sold_at,
            payment_method,
            lines,
        })
    }

    /// Sum of line subtotals, exact.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::ZERO, |acc, line| acc.add(line.subtotal()))
    }

    pub fn into_sale(self, id: SaleId) -> Sale {
        let total = self.total();
        Sale {
            id,
            client_id: self.client_id,
            sold_at: self.sold_at,
            payment_method: self.payment_method,
            total,
            lines: self.lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, unit_price: Decimal) -> SaleLine {
        SaleLine::new(
            ProductionId::new(),
            Quantity::new(quantity).unwrap(),
            Money::new(unit_price).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn total_is_exact_decimal() {
        // 3 × 10.005 must be 30.015, not 30.014999…
        let sale = NewSale::new(
            PartyId::new(),
            Utc::now(),
            PaymentMethod::Cash,
            vec![line(dec!(3), dec!(10.005))],
        )
        .unwrap();
        assert_eq!(sale.total().value(), dec!(30.015));
    }

    #[test]
    fn total_sums_all_lines() {
        let sale = NewSale::new(
            PartyId::new(),
            Utc::now(),
            PaymentMethod::Transfer,
            vec![line(dec!(2), dec!(1500)), line(dec!(0.5), dec!(2000.40))],
        )
        .unwrap();
        assert_eq!(sale.total().value(), dec!(4000.20));
    }

    #[test]
    fn empty_sale_is_rejected() {
        let err = NewSale::new(PartyId::new(), Utc::now(), PaymentMethod::Cash, Vec::new());
        assert!(err.is_err());
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        assert!(SaleLine::new(
            ProductionId::new(),
            Quantity::ZERO,
            Money::new(dec!(10)).unwrap()
        )
        .is_err());
    }

    proptest! {
        // Totals equal the sum of quantity × unit price over all lines, with
        // no drift, for arbitrary hundredth-precision inputs.
        #[test]
        fn total_matches_line_sum(
            raw in proptest::collection::vec((1u32..10_000, 0u32..1_000_000), 1..12)
        ) {
            let lines: Vec<SaleLine> = raw
                .iter()
                .map(|(q, p)| line(Decimal::new(*q as i64, 2), Decimal::new(*p as i64, 2)))
                .collect();

            let expected: Decimal = raw
                .iter()
                .map(|(q, p)| Decimal::new(*q as i64, 2) * Decimal::new(*p as i64, 2))
                .sum();

            let sale = NewSale::new(PartyId::new(), Utc::now(), PaymentMethod::Cash, lines).unwrap();
            prop_assert_eq!(sale.total().value(), expected);
        }
    }
}
