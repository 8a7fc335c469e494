//! Proposal status machine and section content model.
//!
//! Status transitions happen in exactly three places: manual updates by the
//! owner ([`ProposalStatus::check_manual_change`]), the first public view of a
//! sent proposal ([`ProposalStatus::after_view`]), and signing, which is the
//! only way into [`ProposalStatus::Signed`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a proposal.
///
/// `ReadyToSend`, `Declined` and `Expired` are display states: an owner may
/// set them by hand, but no automatic transition ever produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    ReadyToSend,
    Sent,
    Viewed,
    Signed,
    Declined,
    Expired,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 7] = [
        Self::Draft,
        Self::ReadyToSend,
        Self::Sent,
        Self::Viewed,
        Self::Signed,
        Self::Declined,
        Self::Expired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::ReadyToSend => "ready_to_send",
            Self::Sent => "sent",
            Self::Viewed => "viewed",
            Self::Signed => "signed",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Signed
    }

    /// Status after a public `view` event: only `sent` moves (to `viewed`).
    pub fn after_view(self) -> Self {
        match self {
            Self::Sent => Self::Viewed,
            other => other,
        }
    }

    /// Check that an owner-initiated status change from `self` to `next` is allowed.
    pub fn check_manual_change(self, next: ProposalStatus) -> Result<(), CoreError> {
        if next == Self::Signed {
            return Err(CoreError::Validation(
                "status: a proposal can only become 'signed' through the signing flow".into(),
            ));
        }
        if self.is_terminal() && next != self {
            return Err(CoreError::Conflict(
                "Proposal is already signed; its status can no longer change".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known [`ProposalStatus`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown proposal status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ProposalStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for ProposalStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Hero,
    Text,
    Pricing,
    SignatureBlock,
    Custom,
}

/// One line of a pricing table. Keys beyond the known three are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRow {
    pub title: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PricingRow {
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            description: Some(description.into()),
            extra: Default::default(),
        }
    }
}

/// Type-specific payload of a section.
///
/// `{rows}` and `{text}` shapes are typed; any sibling keys ride along in
/// `extra`. Every other shape (custom blocks, signature blocks) is kept
/// verbatim, so content always round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Pricing {
        rows: Vec<PricingRow>,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
    Text {
        text: String,
        #[serde(flatten)]
        extra: serde_json::Map<String, serde_json::Value>,
    },
    Other(serde_json::Value),
}

impl SectionContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            extra: Default::default(),
        }
    }

    pub fn pricing(rows: Vec<PricingRow>) -> Self {
        Self::Pricing {
            rows,
            extra: Default::default(),
        }
    }
}

impl Default for SectionContent {
    fn default() -> Self {
        Self::Other(serde_json::Value::Object(Default::default()))
    }
}

/// A typed content block within a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    #[serde(default)]
    pub content: SectionContent,
}

impl Section {
    /// Build a section with a fresh random id.
    pub fn new(title: impl Into<String>, kind: SectionType, content: SectionContent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            kind,
            content,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient / provenance
// ---------------------------------------------------------------------------

/// Who the proposal is addressed to. Free text, never checked against a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// How a proposal's initial content was produced. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSource {
    pub template_id: Option<String>,
    pub language: String,
    pub tone: String,
    pub workflow_info: String,
}
