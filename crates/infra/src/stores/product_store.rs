use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use farmgate_core::{DomainError, FarmId, Money, ProductId, ProductionId, Quantity};
use farmgate_products::{
    NewProduct, NewProductPrice, NewQualityAssessment, Product, ProductInventory, ProductPrice,
    QualityAssessment, QualityGrade,
};

use crate::error::{StoreError, StoreResult};
use crate::stores::supply_store::decode_quantity;

/// Products plus their price history, harvested inventory and quality
/// assessments.
pub struct ProductStore {
    pool: PgPool,
}

impl ProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewProduct) -> StoreResult<Product> {
        let product = input.into_product(ProductId::new(), Utc::now());
        sqlx::query(
            "INSERT INTO products (id, name, description, unit, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.unit)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn get(&self, id: ProductId) -> StoreResult<Product> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        decode_product(&row)
    }

    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_product).collect()
    }

    pub async fn update(&self, id: ProductId, input: NewProduct) -> StoreResult<Product> {
        let updated = sqlx::query(
            "UPDATE products SET name = $2, description = $3, unit = $4 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.unit)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: ProductId) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        Ok(())
    }

    // ---- price history ----

    pub async fn add_price(&self, input: NewProductPrice) -> StoreResult<ProductPrice> {
        let price = ProductPrice {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            price: input.price,
            effective_from: input.effective_from,
        };
        sqlx::query(
            "INSERT INTO product_prices (id, product_id, price, effective_from) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(price.id)
        .bind(price.product_id.as_uuid())
        .bind(price.price.value())
        .bind(price.effective_from)
        .execute(&self.pool)
        .await?;
        Ok(price)
    }

    pub async fn price_history(&self, product_id: ProductId) -> StoreResult<Vec<ProductPrice>> {
        let rows = sqlx::query(
            "SELECT * FROM product_prices WHERE product_id = $1 ORDER BY effective_from DESC",
        )
        .bind(product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ProductPrice {
                    id: row.try_get("id")?,
                    product_id: ProductId::from_uuid(row.try_get("product_id")?),
                    price: Money::new(row.try_get("price")?)?,
                    effective_from: row.try_get("effective_from")?,
                })
            })
            .collect()
    }

    // ---- harvested inventory ----

    pub async fn inventory(&self, product_id: ProductId) -> StoreResult<Vec<ProductInventory>> {
        let rows = sqlx::query("SELECT * FROM product_inventory WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ProductInventory {
                    product_id: ProductId::from_uuid(row.try_get("product_id")?),
                    farm_id: FarmId::from_uuid(row.try_get("farm_id")?),
                    quantity: decode_quantity(row.try_get("quantity")?)?,
                    updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
                })
            })
            .collect()
    }

    // ---- quality assessments ----

    pub async fn add_assessment(
        &self,
        input: NewQualityAssessment,
    ) -> StoreResult<QualityAssessment> {
        let assessment = QualityAssessment {
            id: Uuid::now_v7(),
            production_id: input.production_id,
            grade: input.grade,
            notes: input.notes,
            assessed_on: input.assessed_on,
        };
        sqlx::query(
            "INSERT INTO quality_assessments (id, production_id, grade, notes, assessed_on) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(assessment.id)
        .bind(assessment.production_id.as_uuid())
        .bind(assessment.grade.as_str())
        .bind(&assessment.notes)
        .bind(assessment.assessed_on)
        .execute(&self.pool)
        .await?;
        Ok(assessment)
    }

    pub async fn assessments(
        &self,
        production_id: ProductionId,
    ) -> StoreResult<Vec<QualityAssessment>> {
        let rows = sqlx::query(
            "SELECT * FROM quality_assessments WHERE production_id = $1 ORDER BY assessed_on DESC",
        )
        .bind(production_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let grade: String = row.try_get("grade")?;
                Ok(QualityAssessment {
                    id: row.try_get("id")?,
                    production_id: ProductionId::from_uuid(row.try_get("production_id")?),
                    grade: QualityGrade::parse(&grade)?,
                    notes: row.try_get("notes")?,
                    assessed_on: row.try_get("assessed_on")?,
                })
            })
            .collect()
    }
}

/// Add a harvested yield to the (product, farm) inventory row, creating it
/// on first harvest. Runs inside the harvest transaction.
pub(crate) async fn add_harvest_to_inventory(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    farm_id: FarmId,
    quantity: Quantity,
    now: DateTime<Utc>,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO product_inventory (product_id, farm_id, quantity, updated_at) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (product_id, farm_id) DO UPDATE \
         SET quantity = product_inventory.quantity + EXCLUDED.quantity, \
             updated_at = EXCLUDED.updated_at",
    )
    .bind(product_id.as_uuid())
    .bind(farm_id.as_uuid())
    .bind(quantity.value())
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn decode_product(row: &PgRow) -> StoreResult<Product> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        unit: row.try_get("unit")?,
        created_at: row.try_get("created_at")?,
    })
}
