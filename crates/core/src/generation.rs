//! Deterministic stand-in for AI proposal generation.
//!
//! Turns a [`GenerationRequest`] into a title plus three sections (executive
//! summary, scope, pricing). The real generation flow runs in the external
//! automation service; this module only produces a plausible first draft.

use serde::Deserialize;

use crate::error::CoreError;
use crate::proposal::{
    GenerationSource, PricingRow, Recipient, Section, SectionContent, SectionType,
};

pub const DEFAULT_LANGUAGE: &str = "de";
pub const DEFAULT_TONE: &str = "formal";
pub const WORKFLOW_INFO: &str = "mock-generator";

/// Upper bound on pricing rows seeded from product selections.
pub const MAX_PRICING_ROWS: usize = 2;

/// A product line picked from the catalog or entered ad hoc.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomProduct {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for proposal generation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_company: Option<String>,
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub budget_range: Option<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
    pub template_id: Option<String>,
    #[serde(default)]
    pub custom_products: Vec<CustomProduct>,
    pub passcode: Option<String>,
}

/// The content produced for a new proposal.
#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    pub title: String,
    pub sections: Vec<Section>,
    pub recipient: Recipient,
    pub source: GenerationSource,
}

/// Localised fixed strings used by the generator.
struct Phrases {
    summary_title: &'static str,
    scope_title: &'static str,
    pricing_title: &'static str,
    discovery_description: &'static str,
    delivery_price: &'static str,
    delivery_description: &'static str,
}

const PHRASES_DE: Phrases = Phrases {
    summary_title: "Executive Summary",
    scope_title: "Projektumfang",
    pricing_title: "Budget & Timeline",
    discovery_description: "Research & Workshops",
    delivery_price: "Auf Anfrage",
    delivery_description: "Iterative Umsetzung",
};

const PHRASES_EN: Phrases = Phrases {
    summary_title: "Executive Summary",
    scope_title: "Project Scope",
    pricing_title: "Budget & Timeline",
    discovery_description: "Research & workshops",
    delivery_price: "On request",
    delivery_description: "Iterative delivery",
};

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl GenerationRequest {
    /// Check the required fields, naming every one that is missing.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut missing = Vec::new();
        if non_blank(&self.client_name).is_none() {
            missing.push("clientName");
        }
        if non_blank(&self.project_title).is_none() {
            missing.push("projectTitle");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// The passcode to store, treating blank input as "no passcode".
    pub fn normalized_passcode(&self) -> Option<String> {
        non_blank(&self.passcode).map(str::to_string)
    }
}

/// Validate the request and synthesize the initial proposal content.
pub fn generate(request: &GenerationRequest) -> Result<GeneratedDraft, CoreError> {
    request.validate()?;

    let client_name = non_blank(&request.client_name).unwrap_or_default();
    let project_title = non_blank(&request.project_title).unwrap_or_default();
    let language = non_blank(&request.language).unwrap_or(DEFAULT_LANGUAGE);
    let tone = non_blank(&request.tone).unwrap_or(DEFAULT_TONE);

    let phrases = match language {
        "de" => &PHRASES_DE,
        _ => &PHRASES_EN,
    };

    let greeting = match language {
        "de" => format!(
            "Hallo {client_name}, hier ist ein maßgeschneidertes Angebot für {project_title}."
        ),
        _ => format!("Hello {client_name}, here is a tailored proposal for {project_title}."),
    };

    let sections = vec![
        Section::new(
            phrases.summary_title,
            SectionType::Hero,
            SectionContent::text(greeting),
        ),
        Section::new(
            phrases.scope_title,
            SectionType::Text,
            SectionContent::text(request.project_description.clone().unwrap_or_default()),
        ),
        Section::new(
            phrases.pricing_title,
            SectionType::Pricing,
            SectionContent::pricing(pricing_rows(request, phrases)),
        ),
    ];

    Ok(GeneratedDraft {
        title: format!("{project_title} – Proposal"),
        sections,
        recipient: Recipient {
            name: client_name.to_string(),
            email: non_blank(&request.client_email).map(str::to_string),
            company: non_blank(&request.client_company).map(str::to_string),
        },
        source: GenerationSource {
            template_id: non_blank(&request.template_id).map(str::to_string),
            language: language.to_string(),
            tone: tone.to_string(),
            workflow_info: WORKFLOW_INFO.to_string(),
        },
    })
}

fn pricing_rows(request: &GenerationRequest, phrases: &Phrases) -> Vec<PricingRow> {
    if !request.custom_products.is_empty() {
        return request
            .custom_products
            .iter()
            .take(MAX_PRICING_ROWS)
            .map(|product| {
                PricingRow::new(
                    product.name.clone(),
                    product.price.clone().unwrap_or_else(|| "TBD".into()),
                    product.description.clone().unwrap_or_default(),
                )
            })
            .collect();
    }

    vec![
        PricingRow::new(
            "Discovery",
            non_blank(&request.budget_range).unwrap_or("TBD"),
            phrases.discovery_description,
        ),
        PricingRow::new(
            "Delivery",
            phrases.delivery_price,
            phrases.delivery_description,
        ),
    ]
}
