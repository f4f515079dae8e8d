//! Profile retrieval through Apify scraper actors.
//!
//! One actor per reference kind. Each call runs the actor synchronously and
//! normalizes the first dataset item into a [`coldmail_core::ProfileRecord`].

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::ApifyClient;
pub use error::ApifyError;
pub use normalize::{normalize_individual, normalize_organization};
