//! `farmgate-products` — products, price history, harvested inventory and
//! quality assessments.

pub mod inventory;
pub mod price;
pub mod product;
pub mod quality;

pub use inventory::ProductInventory;
pub use price::{NewProductPrice, ProductPrice};
pub use product::{NewProduct, Product};
pub use quality::{NewQualityAssessment, QualityAssessment, QualityGrade};
