//! Configuration for the exporter.
//!
//! Loaded from the `[export]` section of `nexus.toml` (or `NEXUS__`-prefixed
//! environment variables) by the binary.

use serde::Deserialize;

use nexus_core::{ExtractionLimits, SourceRule};

use crate::error::ExportError;

/// Top-level exporter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExporterConfig {
    /// Traversal caps, flattened so `max_level` etc. sit directly under
    /// `[export]`.
    #[serde(flatten)]
    pub limits: ExtractionLimits,

    /// How many roots are processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// One rule per exportable label category.
    #[serde(default)]
    pub sources: Vec<SourceRule>,

    /// Where documents go.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output destinations; each is optional, at least one is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Local directory to write documents under.
    pub directory: Option<String>,

    /// S3 destination.
    pub s3: Option<S3Config>,
}

/// S3 destination settings.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket: String,

    /// Key prefix, usually a folder name ending in `/`. Empty puts
    /// documents at the bucket root.
    #[serde(default)]
    pub key_prefix: String,

    /// Attach a public-read canned ACL to every object.
    #[serde(default)]
    pub public_read: bool,

    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override for S3-compatible stores.
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_concurrency() -> usize {
    4
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            limits: ExtractionLimits::default(),
            concurrency: default_concurrency(),
            sources: Vec::new(),
            output: OutputConfig::default(),
        }
    }
}

impl ExporterConfig {
    /// Reject configurations that cannot produce any export.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.sources.is_empty() {
            return Err(ExportError::Config(
                "at least one [[export.sources]] rule is required".to_string(),
            ));
        }
        if self.output.directory.is_none() && self.output.s3.is_none() {
            return Err(ExportError::Config(
                "at least one output destination (directory or s3) is required".to_string(),
            ));
        }
        Ok(())
    }
}
