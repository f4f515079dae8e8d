//! Normalized profile records and the values that flow around them.

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceKind;
use crate::ProductError;

/// Maximum accepted length of a product description, in characters.
pub const MAX_PRODUCT_CHARS: usize = 200;

const SUMMARY_HEADLINE_CHARS: usize = 100;

/// Attributes retrieved for an individual.
///
/// `full_name` and `headline` are the shape markers the retriever requires;
/// every other field is whatever the provider happened to return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualProfile {
    pub full_name: String,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    /// Free-text tenure in the current role, e.g. `"Mar 2024 - Present"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<String>,
    /// Employer held immediately before the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_employer: Option<String>,
    /// Description of what the person owns in the current role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

/// Attributes retrieved for an organization page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u64>,
    /// Provider-reported size bucket, e.g. `"51-200"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProfileRecord {
    Individual(IndividualProfile),
    Organization(OrganizationProfile),
}

impl ProfileRecord {
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            ProfileRecord::Individual(_) => ReferenceKind::Individual,
            ProfileRecord::Organization(_) => ReferenceKind::Organization,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            ProfileRecord::Individual(p) => &p.full_name,
            ProfileRecord::Organization(o) => &o.name,
        }
    }

    /// Short descriptive line: the headline for people; industries, falling
    /// back to the description, for organizations.
    #[must_use]
    pub fn headline(&self) -> String {
        let line = match self {
            ProfileRecord::Individual(p) => p.headline.clone(),
            ProfileRecord::Organization(o) if !o.industries.is_empty() => o.industries.join(", "),
            ProfileRecord::Organization(o) => o.description.clone().unwrap_or_default(),
        };
        line.chars().take(SUMMARY_HEADLINE_CHARS).collect()
    }

    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            name: self.display_name().to_string(),
            headline: self.headline(),
            kind: self.kind(),
        }
    }
}

/// What callers show next to a generated message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub headline: String,
    pub kind: ReferenceKind,
}

/// Caller-supplied description of the product being pitched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductContext(String);

impl ProductContext {
    /// Wrap product text without validation.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Trim and validate caller input.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::Empty`] for blank text and
    /// [`ProductError::TooLong`] beyond [`MAX_PRODUCT_CHARS`] characters.
    pub fn parse(raw: &str) -> Result<Self, ProductError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProductError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_PRODUCT_CHARS {
            return Err(ProductError::TooLong {
                len,
                max: MAX_PRODUCT_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The generated message. Serializes to exactly `{"email": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub email: String,
}
