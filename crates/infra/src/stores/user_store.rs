use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use farmgate_auth::Role;
use farmgate_core::{DomainError, PartyId, UserId};

use crate::error::{StoreError, StoreResult};

/// A stored API user. The password is only ever persisted as an Argon2
/// PHC-format hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub party_id: Option<PartyId>,
    pub created_at: DateTime<Utc>,
}

/// Users and credentials.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: String,
        password_hash: String,
        roles: Vec<Role>,
        party_id: Option<PartyId>,
    ) -> StoreResult<UserRecord> {
        let user = UserRecord {
            id: UserId::new(),
            username,
            password_hash,
            roles,
            party_id,
            created_at: Utc::now(),
        };

        let role_names: Vec<String> = user.roles.iter().map(|r| r.as_str().to_string()).collect();
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, roles, party_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&role_names)
        .bind(user.party_id.map(|p| *p.as_uuid()))
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Domain(
                DomainError::conflict("username is already taken"),
            )),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_user).transpose()
    }

    pub async fn get(&self, id: UserId) -> StoreResult<UserRecord> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        decode_user(&row)
    }
}

fn decode_user(row: &PgRow) -> StoreResult<UserRecord> {
    let roles: Vec<String> = row.try_get("roles")?;
    Ok(UserRecord {
        id: UserId::from_uuid(row.try_get("id")?),
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        roles: roles.into_iter().map(Role::new).collect(),
        party_id: row
            .try_get::<Option<Uuid>, _>("party_id")?
            .map(PartyId::from_uuid),
        created_at: row.try_get("created_at")?,
    })
}
