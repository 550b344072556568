use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use farmgate_core::{DomainError, Money, PartyId, SaleId};
use farmgate_sales::{Invoice, NewSale, PaymentMethod, Sale, SaleLine};

use crate::error::{StoreError, StoreResult};
use crate::stores::supply_store::decode_quantity;

/// Sales with line items and their derived invoices.
pub struct SaleStore {
    pool: PgPool,
}

impl SaleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a sale and its lines atomically. The total has already been
    /// recomputed from the lines by `NewSale`.
    pub async fn create(&self, input: NewSale) -> StoreResult<Sale> {
        let sale = input.into_sale(SaleId::new());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales (id, client_id, sold_at, payment_method, total) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(sale.id.as_uuid())
        .bind(sale.client_id.as_uuid())
        .bind(sale.sold_at)
        .bind(sale.payment_method.as_str())
        .bind(sale.total.value())
        .execute(&mut *tx)
        .await?;

        for (line_no, line) in sale.lines.iter().enumerate() {
            sqlx::query(
                "INSERT INTO sale_lines (sale_id, line_no, production_id, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(sale.id.as_uuid())
            .bind(line_no as i32)
            .bind(line.production_id.as_uuid())
            .bind(line.quantity.value())
            .bind(line.unit_price.value())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(sale_id = %sale.id, total = %sale.total, "sale registered");
        Ok(sale)
    }

    pub async fn get(&self, id: SaleId) -> StoreResult<Sale> {
        let row = sqlx::query("SELECT * FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        let lines = self.lines(id).await?;
        decode_sale(&row, lines)
    }

    pub async fn list(&self) -> StoreResult<Vec<Sale>> {
        let rows = sqlx::query("SELECT * FROM sales ORDER BY sold_at DESC")
            .fetch_all(&self.pool)
            .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = SaleId::from_uuid(row.try_get("id")?);
            let lines = self.lines(id).await?;
            sales.push(decode_sale(row, lines)?);
        }
        Ok(sales)
    }

    /// Build the invoice document for a sale using its persistent sequence
    /// number.
    pub async fn invoice(&self, id: SaleId) -> StoreResult<Invoice> {
        let row = sqlx::query("SELECT invoice_seq FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        let sequence: i64 = row.try_get("invoice_seq")?;

        let sale = self.get(id).await?;
        Ok(Invoice::for_sale(&sale, sequence, Utc::now().date_naive()))
    }

    async fn lines(&self, id: SaleId) -> StoreResult<Vec<SaleLine>> {
        let rows = sqlx::query(
            "SELECT production_id, quantity, unit_price FROM sale_lines \
             WHERE sale_id = $1 ORDER BY line_no",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let line = SaleLine::new(
                    row.try_get::<Uuid, _>("production_id")?.into(),
                    decode_quantity(row.try_get("quantity")?)?,
                    Money::new(row.try_get("unit_price")?)?,
                )?;
                Ok(line)
            })
            .collect()
    }
}

fn decode_sale(row: &PgRow, lines: Vec<SaleLine>) -> StoreResult<Sale> {
    let method: String = row.try_get("payment_method")?;
    if lines.is_empty() {
        // Lines are written in the same transaction as the sale; an empty
        // set here means the row was tampered with outside the API.
        return Err(StoreError::Domain(DomainError::invariant(
            "sale has no line items",
        )));
    }
    Ok(Sale {
        id: SaleId::from_uuid(row.try_get("id")?),
        client_id: PartyId::from_uuid(row.try_get("client_id")?),
        sold_at: row.try_get("sold_at")?,
        payment_method: PaymentMethod::parse(&method)?,
        total: Money::new(row.try_get("total")?)?,
        lines,
    })
}
