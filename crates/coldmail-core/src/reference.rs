//! Classification of profile references.
//!
//! A reference is either an individual profile (`/in/<handle>`) or an
//! organization page (`/company/<name>`), optionally prefixed with the
//! `https://www.linkedin.com` origin. Anything else is [`ReferenceKind::Invalid`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static INDIVIDUAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://(?:www\.)?linkedin\.com)?/in/([\w-]+)/?$")
        .expect("valid individual reference regex")
});

static ORGANIZATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://(?:www\.)?linkedin\.com)?/company/([\w-]+)/?$")
        .expect("valid organization reference regex")
});

const PROFILE_ORIGIN: &str = "https://www.linkedin.com";

const VALIDATION_MESSAGE: &str = "Invalid URL. Expected format:\n\
    \u{2022} User: https://linkedin.com/in/username/\n\
    \u{2022} Company: https://linkedin.com/company/name/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Individual,
    Organization,
    Invalid,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Individual => write!(f, "individual"),
            ReferenceKind::Organization => write!(f, "organization"),
            ReferenceKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// A classified profile reference.
///
/// `identifier` is present exactly when `kind` is not [`ReferenceKind::Invalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    raw: String,
    kind: ReferenceKind,
    identifier: Option<String>,
}

impl Reference {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// The handle or organization slug extracted from the reference.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind != ReferenceKind::Invalid
    }

    /// Canonical absolute URL for the reference, rebuilt from the identifier.
    #[must_use]
    pub fn canonical_url(&self) -> Option<String> {
        let id = self.identifier.as_deref()?;
        match self.kind {
            ReferenceKind::Individual => Some(format!("{PROFILE_ORIGIN}/in/{id}/")),
            ReferenceKind::Organization => Some(format!("{PROFILE_ORIGIN}/company/{id}/")),
            ReferenceKind::Invalid => None,
        }
    }

    /// User-facing description of the accepted reference shapes.
    #[must_use]
    pub fn validation_message() -> &'static str {
        VALIDATION_MESSAGE
    }
}

/// Classify a raw reference string by its shape.
///
/// Never fails: an unrecognized shape yields [`ReferenceKind::Invalid`] with
/// no identifier.
#[must_use]
pub fn classify(raw: &str) -> Reference {
    let trimmed = raw.trim();

    let matched = INDIVIDUAL_RE
        .captures(trimmed)
        .map(|c| (ReferenceKind::Individual, c))
        .or_else(|| {
            ORGANIZATION_RE
                .captures(trimmed)
                .map(|c| (ReferenceKind::Organization, c))
        });

    match matched {
        Some((kind, caps)) => Reference {
            raw: raw.to_string(),
            kind,
            identifier: caps.get(1).map(|m| m.as_str().to_string()),
        },
        None => Reference {
            raw: raw.to_string(),
            kind: ReferenceKind::Invalid,
            identifier: None,
        },
    }
}

#[cfg(test)]
#[path = "reference_test.rs"]
mod tests;
