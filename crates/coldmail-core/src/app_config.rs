use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, read once at startup.
///
/// The provider and generation credentials are handed to the retriever and
/// invoker as-is; nothing else in the pipeline reads them.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub apify_token: String,
    pub apify_base_url: String,
    pub apify_profile_actor: String,
    pub apify_company_actor: String,
    pub retrieval_timeout_secs: u64,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// `None` when the model takes no reasoning hint.
    pub openai_reasoning_effort: Option<String>,
    pub generation_timeout_secs: u64,
    pub max_output_tokens: u32,
    pub generation_max_retries: u32,
    pub generation_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("apify_token", &"[redacted]")
            .field("apify_base_url", &self.apify_base_url)
            .field("apify_profile_actor", &self.apify_profile_actor)
            .field("apify_company_actor", &self.apify_company_actor)
            .field("retrieval_timeout_secs", &self.retrieval_timeout_secs)
            .field("openai_api_key", &"[redacted]")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_reasoning_effort", &self.openai_reasoning_effort)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("generation_max_retries", &self.generation_max_retries)
            .field(
                "generation_backoff_base_ms",
                &self.generation_backoff_base_ms,
            )
            .finish()
    }
}
