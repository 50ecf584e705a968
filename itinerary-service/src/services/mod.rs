pub mod credentials;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod render;

pub use credentials::{CredentialVerifier, Credentials, StaticCredentialVerifier};
pub use pipeline::{ItineraryPipeline, PipelineError};
pub use providers::{build_provider, TextProvider};
