//! `farmgate-sales` — sales with line items and invoice documents.
//!
//! Totals are computed with exact decimal arithmetic; a sale must carry at
//! least one line.

pub mod invoice;
pub mod sale;

pub use invoice::{invoice_number, Invoice, InvoiceLine};
pub use sale::{NewSale, PaymentMethod, Sale, SaleLine};
