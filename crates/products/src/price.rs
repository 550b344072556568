use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farmgate_core::{DomainResult, Money, ProductId};

/// One entry in a product's price history.
///
/// The current price of a product is the entry with the latest
/// `effective_from` not in the future; the history itself is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: Uuid,
    pub product_id: ProductId,
    pub price: Money,
    pub effective_from: NaiveDate,
}

/// Validated input for recording a price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductPrice {
    pub product_id: ProductId,
    pub price: Money,
    pub effective_from: NaiveDate,
}

impl NewProductPrice {
    pub fn new(
        product_id: ProductId,
        price: Money,
        effective_from: NaiveDate,
    ) -> DomainResult<Self> {
        Ok(Self {
            product_id,
            price,
            effective_from,
        })
    }
}

/// Pick the price in effect on `on` from a history slice, if any.
pub fn price_on(history: &[ProductPrice], on: NaiveDate) -> Option<&ProductPrice> {
    history
        .iter()
        .filter(|p| p.effective_from <= on)
        .max_by_key(|p| p.effective_from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(product_id: ProductId, price: &str, from: NaiveDate) -> ProductPrice {
        ProductPrice {
            id: Uuid::now_v7(),
            product_id,
            price: Money::new(price.parse().unwrap()).unwrap(),
            effective_from: from,
        }
    }

    #[test]
    fn latest_effective_entry_wins() {
        let pid = ProductId::new();
        let jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let jun = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let history = vec![entry(pid, "1200", jan), entry(pid, "1350.50", jun)];

        let on_may = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        assert_eq!(price_on(&history, on_may).unwrap().price.value(), dec!(1200));

        let on_july = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(
            price_on(&history, on_july).unwrap().price.value(),
            dec!(1350.50)
        );
    }

    #[test]
    fn no_price_before_first_entry() {
        let pid = ProductId::new();
        let jun = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let history = vec![entry(pid, "1200", jun)];
        let on_jan = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(price_on(&history, on_jan).is_none());
    }
}
