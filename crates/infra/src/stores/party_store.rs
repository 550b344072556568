use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use farmgate_core::{DomainError, PartyId};
use farmgate_parties::{ContactInfo, NewParty, Party, PartyKind};

use crate::error::{StoreError, StoreResult};

/// Persona CRUD (clients, employees, suppliers).
pub struct PartyStore {
    pool: PgPool,
}

impl PartyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewParty) -> StoreResult<Party> {
        let party = input.into_party(PartyId::new(), Utc::now());
        sqlx::query(
            "INSERT INTO parties \
             (id, kind, full_name, document_id, email, phone, address, position, company, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(party.id.as_uuid())
        .bind(party.kind.as_str())
        .bind(&party.full_name)
        .bind(&party.document_id)
        .bind(&party.contact.email)
        .bind(&party.contact.phone)
        .bind(&party.contact.address)
        .bind(&party.position)
        .bind(&party.company)
        .bind(party.active)
        .bind(party.created_at)
        .execute(&self.pool)
        .await?;
        Ok(party)
    }

    pub async fn get(&self, id: PartyId) -> StoreResult<Party> {
        let row = sqlx::query("SELECT * FROM parties WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        decode_party(&row)
    }

    pub async fn list(&self, kind: Option<PartyKind>) -> StoreResult<Vec<Party>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query("SELECT * FROM parties WHERE kind = $1 ORDER BY full_name")
                    .bind(kind.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM parties ORDER BY full_name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.iter().map(decode_party).collect()
    }

    pub async fn update(&self, id: PartyId, input: NewParty) -> StoreResult<Party> {
        let updated = sqlx::query(
            "UPDATE parties SET kind = $2, full_name = $3, document_id = $4, email = $5, \
             phone = $6, address = $7, position = $8, company = $9 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(input.kind.as_str())
        .bind(&input.full_name)
        .bind(&input.document_id)
        .bind(&input.contact.email)
        .bind(&input.contact.phone)
        .bind(&input.contact.address)
        .bind(&input.position)
        .bind(&input.company)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        self.get(id).await
    }

    /// Soft delete: personas referenced by sales, farms and supplies are
    /// deactivated rather than removed.
    pub async fn deactivate(&self, id: PartyId) -> StoreResult<()> {
        let updated = sqlx::query("UPDATE parties SET active = FALSE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        Ok(())
    }
}

fn decode_party(row: &PgRow) -> StoreResult<Party> {
    let kind: String = row.try_get("kind")?;
    Ok(Party {
        id: PartyId::from_uuid(row.try_get("id")?),
        kind: PartyKind::parse(&kind)?,
        full_name: row.try_get("full_name")?,
        document_id: row.try_get("document_id")?,
        contact: ContactInfo {
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
        },
        position: row.try_get("position")?,
        company: row.try_get("company")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}
