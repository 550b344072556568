//! Request DTOs and their conversions into validated domain inputs.
//!
//! Responses serialize the domain types directly; only requests need a
//! separate shape (string ids, optional fields with defaults).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use farmgate_core::{DomainResult, Money, Quantity};
use farmgate_farms::NewFarm;
use farmgate_parties::{ContactInfo, NewParty, PartyKind};
use farmgate_production::{NewActivity, NewProduction, ProductionStatus};
use farmgate_products::{NewProduct, NewProductPrice, NewQualityAssessment, QualityGrade};
use farmgate_sales::{NewSale, PaymentMethod, SaleLine};
use farmgate_supplies::{NewSupply, NewSupplyPurchase, UsageLine};

// -------------------------
// Auth
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub party_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -------------------------
// Farms
// -------------------------

#[derive(Debug, Deserialize)]
pub struct FarmRequest {
    pub name: String,
    pub location: String,
    pub hectares: Option<Decimal>,
    pub owner_id: String,
}

impl FarmRequest {
    pub fn into_domain(self) -> DomainResult<NewFarm> {
        NewFarm::new(self.name, self.location, self.hectares, self.owner_id.parse()?)
    }
}

// -------------------------
// Parties
// -------------------------

#[derive(Debug, Deserialize)]
pub struct PartyRequest {
    pub kind: String,
    pub full_name: String,
    pub document_id: String,
    #[serde(default)]
    pub contact: ContactInfo,
    pub position: Option<String>,
    pub company: Option<String>,
}

impl PartyRequest {
    pub fn into_domain(self) -> DomainResult<NewParty> {
        NewParty::new(
            PartyKind::parse(&self.kind)?,
            self.full_name,
            self.document_id,
            self.contact,
            self.position,
            self.company,
        )
    }
}

// -------------------------
// Products
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
}

impl ProductRequest {
    pub fn into_domain(self) -> DomainResult<NewProduct> {
        NewProduct::new(self.name, self.description, self.unit)
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductPriceRequest {
    pub price: Decimal,
    pub effective_from: NaiveDate,
}

impl ProductPriceRequest {
    pub fn into_domain(self, product_id: farmgate_core::ProductId) -> DomainResult<NewProductPrice> {
        NewProductPrice::new(product_id, Money::new(self.price)?, self.effective_from)
    }
}

#[derive(Debug, Deserialize)]
pub struct QualityAssessmentRequest {
    pub grade: String,
    pub notes: Option<String>,
    pub assessed_on: NaiveDate,
}

impl QualityAssessmentRequest {
    pub fn into_domain(
        self,
        production_id: farmgate_core::ProductionId,
    ) -> DomainResult<NewQualityAssessment> {
        Ok(NewQualityAssessment {
            production_id,
            grade: QualityGrade::parse(&self.grade)?,
            notes: self.notes,
            assessed_on: self.assessed_on,
        })
    }
}

// -------------------------
// Supplies
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SupplyRequest {
    pub name: String,
    pub unit: String,
    pub available: Decimal,
    pub farm_id: String,
    pub supplier_id: String,
}

impl SupplyRequest {
    pub fn into_domain(self) -> DomainResult<NewSupply> {
        NewSupply::new(
            self.name,
            self.unit,
            Quantity::new(self.available)?,
            self.farm_id.parse()?,
            self.supplier_id.parse()?,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SupplyPurchaseRequest {
    pub supplier_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub purchased_on: NaiveDate,
}

impl SupplyPurchaseRequest {
    pub fn into_domain(
        self,
        supply_id: farmgate_core::SupplyId,
    ) -> DomainResult<NewSupplyPurchase> {
        NewSupplyPurchase::new(
            supply_id,
            self.supplier_id.parse()?,
            Quantity::positive(self.quantity)?,
            Money::new(self.unit_cost)?,
            self.purchased_on,
        )
    }
}

// -------------------------
// Usage lines (shared by productions and activities)
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UsageLineRequest {
    pub supply_id: String,
    pub quantity: Decimal,
    /// Defaults to the owning record's start/sowing date when omitted.
    pub used_on: Option<NaiveDate>,
}

pub fn usage_lines(
    requests: Vec<UsageLineRequest>,
    default_date: NaiveDate,
) -> DomainResult<Vec<UsageLine>> {
    requests
        .into_iter()
        .map(|r| {
            UsageLine::new(
                r.supply_id.parse()?,
                Quantity::positive(r.quantity)?,
                r.used_on.unwrap_or(default_date),
            )
        })
        .collect()
}

// -------------------------
// Productions
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ProductionRequest {
    pub farm_id: String,
    pub product_id: String,
    pub sown_on: NaiveDate,
    #[serde(default = "default_status")]
    pub status: String,
    pub harvested_on: Option<NaiveDate>,
    pub harvested_quantity: Option<Decimal>,
    #[serde(default)]
    pub usage_lines: Vec<UsageLineRequest>,
}

fn default_status() -> String {
    "sown".to_string()
}

impl ProductionRequest {
    pub fn into_domain(self) -> DomainResult<NewProduction> {
        let lines = usage_lines(self.usage_lines, self.sown_on)?;
        NewProduction::new(
            self.farm_id.parse()?,
            self.product_id.parse()?,
            self.sown_on,
            ProductionStatus::parse(&self.status)?,
            self.harvested_on,
            self.harvested_quantity.map(Quantity::positive).transpose()?,
            lines,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct HarvestRequest {
    pub quantity: Decimal,
    pub harvested_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// -------------------------
// Activities
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub farm_id: String,
    pub kind: String,
    pub description: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub usage_lines: Vec<UsageLineRequest>,
}

impl ActivityRequest {
    pub fn into_domain(self) -> DomainResult<NewActivity> {
        let lines = usage_lines(self.usage_lines, self.starts_on)?;
        NewActivity::new(
            self.farm_id.parse()?,
            self.kind,
            self.description,
            self.starts_on,
            self.ends_on,
            lines,
        )
    }
}

// -------------------------
// Sales
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SaleLineRequest {
    pub production_id: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub client_id: String,
    pub payment_method: String,
    /// Defaults to now.
    pub sold_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines: Vec<SaleLineRequest>,
}

impl SaleRequest {
    pub fn into_domain(self) -> DomainResult<NewSale> {
        let lines = self
            .lines
            .into_iter()
            .map(|l| {
                SaleLine::new(
                    l.production_id.parse()?,
                    Quantity::positive(l.quantity)?,
                    Money::new(l.unit_price)?,
                )
            })
            .collect::<DomainResult<Vec<_>>>()?;

        NewSale::new(
            self.client_id.parse()?,
            self.sold_at.unwrap_or_else(Utc::now),
            PaymentMethod::parse(&self.payment_method)?,
            lines,
        )
    }
}
