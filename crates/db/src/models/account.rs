//! Account entity model and DTOs.

use arcdraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `accounts` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`AccountResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub company_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe account representation for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub company_name: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            company_name: account.company_name.clone(),
        }
    }
}

/// DTO for creating a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub company_name: String,
}

/// DTO for updating an account. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub company_name: Option<String>,
}
