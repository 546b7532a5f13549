//! Output destinations.
//!
//! Documents go to a local directory, an S3 bucket, or both. Destinations
//! fail independently: a write error is logged with its destination and key,
//! and never stops the other destination or the rest of the run.

use std::fs;
use std::path::PathBuf;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

use crate::config::S3Config;

const CONTENT_TYPE: &str = "application/json";
const CONTENT_ENCODING: &str = "UTF-8";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    Remote(String),
}

// ── Local Directory ──────────────────────────────────────────────

/// Writes documents under a root directory, creating parents on demand.
pub struct LocalSink {
    root: PathBuf,
}

impl LocalSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn put(&self, name: &str, payload: &[u8]) -> Result<(), SinkError> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, payload)?;
        Ok(())
    }
}

// ── S3 ───────────────────────────────────────────────────────────

/// Writes documents as objects under a key prefix in one bucket.
pub struct S3Sink {
    client: aws_sdk_s3::Client,
    bucket: String,
    key_prefix: String,
    public_read: bool,
}

impl S3Sink {
    /// Build a client from the default AWS credential chain, with optional
    /// region and endpoint overrides from the config.
    pub async fn connect(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let client = match &config.endpoint {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&shared)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                aws_sdk_s3::Client::from_conf(s3_config)
            }
            None => aws_sdk_s3::Client::new(&shared),
        };

        tracing::info!(bucket = %config.bucket, key_prefix = %config.key_prefix, "S3 sink ready");

        Self {
            client,
            bucket: config.bucket.clone(),
            key_prefix: config.key_prefix.clone(),
            public_read: config.public_read,
        }
    }

    async fn put(&self, name: &str, payload: &[u8]) -> Result<(), SinkError> {
        let key = format!("{}{}", self.key_prefix, name);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(payload.to_vec()))
            .content_type(CONTENT_TYPE)
            .content_encoding(CONTENT_ENCODING);
        if self.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request
            .send()
            .await
            .map_err(|e| SinkError::Remote(e.to_string()))?;
        Ok(())
    }
}

// ── Dispatcher ───────────────────────────────────────────────────

/// Per-document delivery tally.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatch {
    pub delivered: usize,
    pub failed: usize,
}

impl Dispatch {
    /// Every configured destination took the document.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.delivered > 0
    }
}

/// Fans one serialized document out to every configured destination.
///
/// Keys derived from shared identifiers may collide across nodes; deliveries
/// are last-write-wins at each destination.
#[derive(Default)]
pub struct SinkDispatcher {
    local: Option<LocalSink>,
    remote: Option<S3Sink>,
}

impl SinkDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local(mut self, sink: LocalSink) -> Self {
        self.local = Some(sink);
        self
    }

    pub fn with_remote(mut self, sink: S3Sink) -> Self {
        self.remote = Some(sink);
        self
    }

    pub fn destination_count(&self) -> usize {
        usize::from(self.local.is_some()) + usize::from(self.remote.is_some())
    }

    /// Deliver one document to every destination, logging each failure.
    pub async fn dispatch(&self, name: &str, payload: &[u8]) -> Dispatch {
        let mut tally = Dispatch::default();

        if let Some(local) = &self.local {
            match local.put(name, payload) {
                Ok(()) => {
                    tracing::debug!(key = name, path = %local.root.display(), "Wrote document");
                    tally.delivered += 1;
                }
                Err(e) => {
                    tracing::error!(key = name, error = %e, "Local write failed");
                    tally.failed += 1;
                }
            }
        }

        if let Some(remote) = &self.remote {
            match remote.put(name, payload).await {
                Ok(()) => {
                    tracing::debug!(key = name, bucket = %remote.bucket, "Put object");
                    tally.delivered += 1;
                }
                Err(e) => {
                    tracing::error!(key = name, bucket = %remote.bucket, error = %e, "S3 put failed");
                    tally.failed += 1;
                }
            }
        }

        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_sink_writes_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = SinkDispatcher::new().with_local(LocalSink::new(dir.path()));

        let tally = sinks.dispatch("ands/a%2Fb.json", b"{\"nodes\":[]}").await;
        assert!(tally.is_complete());
        assert_eq!(tally.delivered, 1);

        let written = std::fs::read(dir.path().join("ands/a%2Fb.json")).unwrap();
        assert_eq!(written, b"{\"nodes\":[]}");
    }

    #[tokio::test]
    async fn test_local_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = SinkDispatcher::new().with_local(LocalSink::new(dir.path()));

        sinks.dispatch("ands/x.json", b"first").await;
        sinks.dispatch("ands/x.json", b"second").await;

        let written = std::fs::read(dir.path().join("ands/x.json")).unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_local_failure_is_reported_not_raised() {
        // Root is a plain file, so the nested create_dir_all must fail.
        let file = tempfile::NamedTempFile::new().unwrap();
        let sinks = SinkDispatcher::new().with_local(LocalSink::new(file.path()));

        let tally = sinks.dispatch("ands/x.json", b"{}").await;
        assert_eq!(tally.delivered, 0);
        assert_eq!(tally.failed, 1);
        assert!(!tally.is_complete());
    }

    #[tokio::test]
    async fn test_empty_dispatcher() {
        let sinks = SinkDispatcher::new();
        assert_eq!(sinks.destination_count(), 0);

        let tally = sinks.dispatch("ands/x.json", b"{}").await;
        assert_eq!(tally.delivered, 0);
        assert_eq!(tally.failed, 0);
        assert!(!tally.is_complete());
    }
}
