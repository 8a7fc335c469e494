//! Signature entity model and DTO.

use arcdraft_core::signature::SignatureType;
use arcdraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `signatures` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub id: DbId,
    pub proposal_id: DbId,
    pub signer_name: String,
    pub signer_email: Option<String>,
    pub signed_at: Timestamp,
    pub signer_ip: Option<String>,
    pub user_agent: Option<String>,
    #[sqlx(try_from = "String")]
    pub signature_type: SignatureType,
    pub signature_data: String,
    /// Hex SHA-256 of the sections at signing time.
    pub proposal_content_hash: String,
}

/// DTO for recording a signature.
#[derive(Debug, Clone)]
pub struct NewSignature {
    pub proposal_id: DbId,
    pub signer_name: String,
    pub signer_email: Option<String>,
    pub signed_at: Timestamp,
    pub signer_ip: Option<String>,
    pub user_agent: Option<String>,
    pub signature_type: SignatureType,
    pub signature_data: String,
    pub proposal_content_hash: String,
}
