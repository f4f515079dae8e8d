//! Prompt rendering and message generation.
//!
//! [`build_request`] picks the personalization strategy for a profile and
//! renders the instruction bundle; [`OpenAiClient::generate`] sends it,
//! repairs the reply into `{"email": ...}` and enforces the word ceiling.

pub mod client;
pub mod error;
pub mod length;
pub mod prompt;
pub mod repair;

mod retry;

pub use client::OpenAiClient;
pub use error::GenerationError;
pub use length::{enforce_word_ceiling, strip_greeting, word_count, MAX_WORDS, TARGET_WORDS};
pub use prompt::{build_request, GenerationRequest, Strategy};
pub use repair::extract_email;
