//! End-to-end outreach generation.
//!
//! reference → classification → retrieval → request rendering → generation
//! → cached result. [`Pipeline`] owns the two outbound clients and a handle
//! to the injected [`ResultCache`].

pub mod cache;
pub mod error;
pub mod pipeline;

pub use cache::ResultCache;
pub use error::{PipelineError, SetupError};
pub use pipeline::{Generated, Pipeline};
