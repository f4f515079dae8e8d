use coldmail_apify::ApifyClient;
use coldmail_core::{
    classify, AppConfig, GenerationResult, ProductContext, ProfileSummary, Reference,
};
use coldmail_generation::{build_request, OpenAiClient};

use crate::cache::ResultCache;
use crate::error::{PipelineError, SetupError};

/// A successful run: the message plus who it was written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub result: GenerationResult,
    pub profile: ProfileSummary,
}

/// Runs one request end to end and records successful results.
pub struct Pipeline {
    retriever: ApifyClient,
    generator: OpenAiClient,
    cache: ResultCache,
}

impl Pipeline {
    #[must_use]
    pub fn new(retriever: ApifyClient, generator: OpenAiClient, cache: ResultCache) -> Self {
        Self {
            retriever,
            generator,
            cache,
        }
    }

    /// Builds both outbound clients from process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if either HTTP client cannot be constructed or
    /// a configured base URL does not parse.
    pub fn from_config(config: &AppConfig, cache: ResultCache) -> Result<Self, SetupError> {
        let retriever = ApifyClient::with_base_url(
            &config.apify_token,
            config.retrieval_timeout_secs,
            &config.apify_base_url,
        )?
        .with_actors(&config.apify_profile_actor, &config.apify_company_actor);

        let generator = OpenAiClient::with_base_url(
            &config.openai_api_key,
            config.generation_timeout_secs,
            &config.openai_base_url,
        )?
        .with_model(&config.openai_model)
        .with_max_output_tokens(config.max_output_tokens)
        .with_reasoning_effort(config.openai_reasoning_effort.as_deref())
        .with_retries(
            config.generation_max_retries,
            config.generation_backoff_base_ms,
        );

        Ok(Self::new(retriever, generator, cache))
    }

    /// Runs the whole pipeline and returns the message with a profile summary.
    ///
    /// The reference and product text are both checked before any outbound
    /// call. The cache is written only after generation succeeds, so a
    /// failed or dropped run leaves the previous result in place.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] variant for the stage that failed.
    pub async fn run(
        &self,
        raw_reference: &str,
        product_text: &str,
    ) -> Result<Generated, PipelineError> {
        let reference = checked_reference(raw_reference)?;
        let product = ProductContext::parse(product_text)?;
        tracing::info!(
            kind = %reference.kind(),
            identifier = reference.identifier().unwrap_or_default(),
            "reference classified"
        );

        let record = self.retriever.retrieve(&reference).await.map_err(|e| {
            tracing::warn!(error = %e, "profile retrieval failed");
            PipelineError::from(e)
        })?;
        let profile = record.summary();
        tracing::info!(name = %profile.name, kind = %profile.kind, "profile retrieved");

        let request = build_request(&record, &product);
        tracing::debug!(strategy = ?request.strategy(), "generation request built");

        let result = self.generator.generate(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "generation failed");
            PipelineError::from(e)
        })?;
        tracing::info!(
            words = coldmail_generation::word_count(&result.email),
            "email generated"
        );

        self.cache.store(result.clone());
        tracing::debug!("result cached");

        Ok(Generated { result, profile })
    }

    /// Runs the pipeline and returns only the generated message.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run`].
    pub async fn run_pipeline(
        &self,
        raw_reference: &str,
        product_text: &str,
    ) -> Result<GenerationResult, PipelineError> {
        self.run(raw_reference, product_text)
            .await
            .map(|generated| generated.result)
    }

    /// The most recent successful result, if any run has succeeded yet.
    #[must_use]
    pub fn last_result(&self) -> Option<GenerationResult> {
        self.cache.fetch_last()
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

fn checked_reference(raw: &str) -> Result<Reference, PipelineError> {
    let reference = classify(raw);
    if reference.is_valid() {
        Ok(reference)
    } else {
        tracing::info!(raw, "rejected invalid reference");
        Err(PipelineError::InvalidReference {
            raw: raw.to_string(),
            message: Reference::validation_message().to_string(),
        })
    }
}
