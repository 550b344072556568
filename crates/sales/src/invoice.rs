//! Invoice documents derived from sales.
//!
//! The original system rendered these to PDF; here the document model and
//! numbering are kept and the API serves the structured document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmgate_core::{Money, PartyId, ProductionId, Quantity, SaleId};

use crate::sale::{PaymentMethod, Sale};

/// One invoice line with its computed subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub production_id: ProductionId,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// The invoice document for one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub sale_id: SaleId,
    pub client_id: PartyId,
    pub issued_on: NaiveDate,
    pub payment_method: PaymentMethod,
    pub lines: Vec<InvoiceLine>,
    pub total: Money,
}

/// Format a sequential invoice number: `FG-000042`.
pub fn invoice_number(sequence: i64) -> String {
    format!("FG-{sequence:06}")
}

impl Invoice {
    /// Build the document for a persisted sale.
    pub fn for_sale(sale: &Sale, sequence: i64, issued_on: NaiveDate) -> Self {
        let lines = sale
            .lines
            .iter()
            .map(|l| InvoiceLine {
                production_id: l.production_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                subtotal: l.subtotal(),
            })
            .collect();

        Self {
            number: invoice_number(sequence),
            sale_id: sale.id,
            client_id: sale.client_id,
            issued_on,
            payment_method: sale.payment_method,
            lines,
            total: sale.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::{NewSale, SaleLine};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn numbering_is_zero_padded() {
        assert_eq!(invoice_number(42), "FG-000042");
        assert_eq!(invoice_number(1_234_567), "FG-1234567");
    }

    #[test]
    fn document_mirrors_the_sale() {
        let sale = NewSale::new(
            PartyId::new(),
            Utc::now(),
            PaymentMethod::Credit,
            vec![
                SaleLine::new(
                    ProductionId::new(),
                    Quantity::new(dec!(3)).unwrap(),
                    Money::new(dec!(10.005)).unwrap(),
                )
                .unwrap(),
            ],
        )
        .unwrap()
        .into_sale(SaleId::new());

        let issued = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let invoice = Invoice::for_sale(&sale, 7, issued);

        assert_eq!(invoice.number, "FG-000007");
        assert_eq!(invoice.total, sale.total);
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].subtotal.value(), dec!(30.015));
    }
}
