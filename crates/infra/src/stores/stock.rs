//! Transactional application of stock-adjustment plans.
//!
//! A consume is a *guarded* decrement: the `WHERE available >= quantity`
//! clause makes the sufficient-stock check and the subtraction one atomic
//! statement, so concurrent edits against the same supply cannot race the
//! stock below zero. Zero rows affected means either a missing supply or
//! insufficient stock; the follow-up SELECT distinguishes the two for the
//! error message.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use farmgate_core::{DomainError, SupplyId};
use farmgate_supplies::StockAdjustment;

use crate::error::{StoreError, StoreResult};

/// Apply a whole plan inside the caller's transaction. Any failure aborts
/// the transaction, so partial stock mutation is never observable.
pub async fn apply_adjustments(
    tx: &mut Transaction<'_, Postgres>,
    plan: &[StockAdjustment],
    now: DateTime<Utc>,
) -> StoreResult<()> {
    for adjustment in plan {
        match adjustment {
            StockAdjustment::Consume {
                supply_id,
                quantity,
            } => consume(tx, *supply_id, quantity.value(), now).await?,
            StockAdjustment::Restock {
                supply_id,
                quantity,
            } => restock(tx, *supply_id, quantity.value()).await?,
        }
    }
    Ok(())
}

async fn consume(
    tx: &mut Transaction<'_, Postgres>,
    supply_id: SupplyId,
    quantity: Decimal,
    now: DateTime<Utc>,
) -> StoreResult<()> {
    let updated = sqlx::query(
        "UPDATE supplies SET available = available - $2 WHERE id = $1 AND available >= $2",
    )
    .bind(supply_id.as_uuid())
    .bind(quantity)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(insufficient_or_missing(tx, supply_id, quantity).await);
    }

    sqlx::query(
        "INSERT INTO supply_usage_history (id, supply_id, quantity_used, used_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::now_v7())
    .bind(supply_id.as_uuid())
    .bind(quantity)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    tracing::debug!(%supply_id, %quantity, "stock consumed");
    Ok(())
}

async fn restock(
    tx: &mut Transaction<'_, Postgres>,
    supply_id: SupplyId,
    quantity: Decimal,
) -> StoreResult<()> {
    let updated = sqlx::query("UPDATE supplies SET available = available + $2 WHERE id = $1")
        .bind(supply_id.as_uuid())
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(StoreError::Domain(DomainError::NotFound));
    }

    tracing::debug!(%supply_id, %quantity, "stock returned");
    Ok(())
}

async fn insufficient_or_missing(
    tx: &mut Transaction<'_, Postgres>,
    supply_id: SupplyId,
    requested: Decimal,
) -> StoreError {
    let row = sqlx::query("SELECT name, available FROM supplies WHERE id = $1")
        .bind(supply_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await;

    match row {
        Ok(Some(row)) => {
            let name: String = row.get("name");
            let available: Decimal = row.get("available");
            StoreError::Domain(DomainError::insufficient_stock(name, available, requested))
        }
        Ok(None) => StoreError::Domain(DomainError::NotFound),
        Err(e) => StoreError::Database(e),
    }
}
