//! Signature capture validation and content hashing.
//!
//! A signature is bound to the exact section content that was on screen when
//! the recipient signed, via a SHA-256 digest of the canonical JSON encoding
//! of the sections. Re-hashing the current sections later reveals drift.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hashing::sha256_hex;
use crate::proposal::Section;

/// How the signature was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureType {
    /// `signature_data` is an image data URL trimmed to the ink bounds.
    Drawn,
    /// `signature_data` is the typed full name.
    Typed,
}

impl SignatureType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drawn => "drawn",
            Self::Typed => "typed",
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown signature type '{0}'. Must be one of: drawn, typed")]
pub struct UnknownSignatureType(pub String);

impl FromStr for SignatureType {
    type Err = UnknownSignatureType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drawn" => Ok(Self::Drawn),
            "typed" => Ok(Self::Typed),
            other => Err(UnknownSignatureType(other.to_string())),
        }
    }
}

impl TryFrom<String> for SignatureType {
    type Error = UnknownSignatureType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Request body for signing a proposal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub signer_name: Option<String>,
    pub signer_email: Option<String>,
    pub signature_type: Option<String>,
    pub signature_data: Option<String>,
}

/// A sign request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureCapture {
    pub signer_name: String,
    pub signer_email: Option<String>,
    pub signature_type: SignatureType,
    pub signature_data: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl SignRequest {
    /// Check required fields and the signature type.
    ///
    /// The payload itself (image or typed name) is accepted as-is.
    pub fn validate(&self) -> Result<SignatureCapture, CoreError> {
        let mut missing = Vec::new();
        if present(&self.signer_name).is_none() {
            missing.push("signerName");
        }
        if present(&self.signature_type).is_none() {
            missing.push("signatureType");
        }
        if present(&self.signature_data).is_none() {
            missing.push("signatureData");
        }
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let signature_type = present(&self.signature_type)
            .unwrap_or_default()
            .parse::<SignatureType>()
            .map_err(|e| CoreError::Validation(format!("signatureType: {e}")))?;

        Ok(SignatureCapture {
            signer_name: present(&self.signer_name)
                .unwrap_or_default()
                .trim()
                .to_string(),
            signer_email: present(&self.signer_email).map(|e| e.trim().to_string()),
            signature_type,
            signature_data: present(&self.signature_data)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Hex SHA-256 digest of the canonical JSON serialization of `sections`.
///
/// Struct fields serialize in declaration order and free-form JSON objects
/// serialize with sorted keys, so equal content always yields an equal hash.
pub fn content_hash(sections: &[Section]) -> Result<String, CoreError> {
    let bytes = serde_json::to_vec(sections)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize sections: {e}")))?;
    Ok(sha256_hex(&bytes))
}
