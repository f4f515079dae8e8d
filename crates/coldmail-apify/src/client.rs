//! HTTP client for the Apify actor API.
//!
//! Each retrieval is a single `run-sync-get-dataset-items` call: the actor
//! runs to completion and the response body is its dataset. No retries are
//! attempted here; every failure is surfaced to the caller.

use std::time::Duration;

use coldmail_core::config::{
    DEFAULT_APIFY_BASE_URL, DEFAULT_APIFY_COMPANY_ACTOR, DEFAULT_APIFY_PROFILE_ACTOR,
};
use coldmail_core::{IndividualProfile, OrganizationProfile, ProfileRecord, Reference, ReferenceKind};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ApifyError;
use crate::normalize::{normalize_individual, normalize_organization, provider_error};
use crate::types::{RawCompany, RawIndividual};

/// Client for the Apify actor API.
///
/// Use [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: Url,
    profile_actor: String,
    company_actor: String,
}

impl ApifyClient {
    /// Creates a new client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, ApifyError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_APIFY_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApifyError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ApifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("coldmail/0.1 (profile-retrieval)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApifyError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
            profile_actor: DEFAULT_APIFY_PROFILE_ACTOR.to_string(),
            company_actor: DEFAULT_APIFY_COMPANY_ACTOR.to_string(),
        })
    }

    /// Overrides the actor ids used for each reference kind.
    #[must_use]
    pub fn with_actors(mut self, profile_actor: &str, company_actor: &str) -> Self {
        self.profile_actor = profile_actor.to_string();
        self.company_actor = company_actor.to_string();
        self
    }

    /// Retrieves the profile a classified reference points at.
    ///
    /// Dispatches on the reference kind to the individual or organization
    /// actor.
    ///
    /// # Errors
    ///
    /// - [`ApifyError::InvalidReference`] for an unclassified reference.
    /// - [`ApifyError::NotFound`] when the provider has nothing for it.
    /// - [`ApifyError::Timeout`] / [`ApifyError::Http`] on timeouts and
    ///   transport failures.
    /// - [`ApifyError::Normalization`] / [`ApifyError::Deserialize`] when the
    ///   record does not have the expected shape.
    pub async fn retrieve(&self, reference: &Reference) -> Result<ProfileRecord, ApifyError> {
        let identifier = reference
            .identifier()
            .ok_or_else(|| ApifyError::InvalidReference(reference.raw().to_string()))?;

        match reference.kind() {
            ReferenceKind::Individual => {
                let url = reference
                    .canonical_url()
                    .ok_or_else(|| ApifyError::InvalidReference(reference.raw().to_string()))?;
                self.fetch_individual(identifier, &url)
                    .await
                    .map(ProfileRecord::Individual)
            }
            ReferenceKind::Organization => self
                .fetch_organization(identifier)
                .await
                .map(ProfileRecord::Organization),
            ReferenceKind::Invalid => Err(ApifyError::InvalidReference(reference.raw().to_string())),
        }
    }

    /// Runs the profile actor for one individual.
    ///
    /// # Errors
    ///
    /// See [`ApifyClient::retrieve`].
    pub async fn fetch_individual(
        &self,
        identifier: &str,
        profile_url: &str,
    ) -> Result<IndividualProfile, ApifyError> {
        let input = json!({ "username": profile_url, "includeEmail": false });
        tracing::info!(identifier, actor = %self.profile_actor, "fetching individual profile");

        let item = self.run_actor(&self.profile_actor, identifier, &input).await?;
        let raw: RawIndividual = decode_item(identifier, item)?;
        normalize_individual(identifier, raw)
    }

    /// Runs the company actor for one organization.
    ///
    /// # Errors
    ///
    /// See [`ApifyClient::retrieve`].
    pub async fn fetch_organization(
        &self,
        identifier: &str,
    ) -> Result<OrganizationProfile, ApifyError> {
        let input = json!({ "identifier": [identifier] });
        tracing::info!(identifier, actor = %self.company_actor, "fetching organization profile");

        let item = self.run_actor(&self.company_actor, identifier, &input).await?;
        let raw: RawCompany = decode_item(identifier, item)?;
        normalize_organization(identifier, raw)
    }

    /// Builds the synchronous run URL for an actor, with the token attached.
    fn build_url(&self, actor: &str) -> Result<Url, ApifyError> {
        let mut url = self
            .base_url
            .join(&format!("v2/acts/{actor}/run-sync-get-dataset-items"))
            .map_err(|e| ApifyError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }

    /// Runs `actor` with `input` and returns the first dataset item.
    async fn run_actor(
        &self,
        actor: &str,
        identifier: &str,
        input: &Value,
    ) -> Result<Value, ApifyError> {
        let url = self.build_url(actor)?;
        let response = self.client.post(url).json(input).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::REQUEST_TIMEOUT {
            return Err(ApifyError::Timeout {
                identifier: identifier.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApifyError::Provider(error_message(status, &body)));
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| ApifyError::Deserialize {
            context: format!("dataset for {identifier}"),
            source: e,
        })?;

        first_item(payload).ok_or_else(|| {
            tracing::warn!(identifier, "actor returned an empty dataset");
            ApifyError::NotFound {
                identifier: identifier.to_string(),
            }
        })
    }
}

/// First record of a dataset, unwrapping one level of array nesting.
fn first_item(payload: Value) -> Option<Value> {
    let item = match payload {
        Value::Array(items) => items.into_iter().next()?,
        Value::Null => return None,
        other => other,
    };
    match item {
        Value::Array(inner) => inner.into_iter().next(),
        Value::Null => None,
        other => Some(other),
    }
}

fn decode_item<T: DeserializeOwned>(identifier: &str, item: Value) -> Result<T, ApifyError> {
    if let Some(err) = item.get("error") {
        // Items that are only an error may not match the record shape at all.
        if item.as_object().is_some_and(|o| o.len() == 1) {
            return Err(provider_error(identifier, err));
        }
    }
    serde_json::from_value(item).map_err(|e| ApifyError::Deserialize {
        context: format!("profile record for {identifier}"),
        source: e,
    })
}

/// Pulls `error.message` out of an Apify error envelope, falling back to the status.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("provider returned HTTP {status}"))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
