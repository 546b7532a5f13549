//! nexus-export: Bounded neighborhood JSON exporter for the Nexus research graph.
//!
//! One run takes a consistent snapshot of the store, qualifies root nodes
//! against the configured source rules, extracts a depth/budget/fan-out
//! bounded neighborhood around each root, and writes one JSON document per
//! derived identifier to the configured sinks. Roots are independent, so
//! they run in parallel under a bounded worker pool.

pub mod assemble;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod extract;
pub mod naming;
pub mod sink;
pub mod snapshot;

pub use error::ExportError;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use nexus_core::{ExtractionLimits, SourceRule};
use nexus_graph::GraphClient;

use crate::sink::SinkDispatcher;
use crate::snapshot::GraphSnapshot;

/// Counters for one full export run, returned rather than kept as shared
/// process state so parallel roots stay race-free.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    /// Eligible roots considered.
    pub candidates: usize,
    /// Roots with at least one document key fully delivered.
    pub exported: usize,
    /// Document keys delivered to every configured destination.
    pub documents: usize,
    /// Roots suppressed because the extraction stayed a singleton.
    pub suppressed: usize,
    /// Roots with no derivable document name.
    pub unnamed: usize,
    /// Roots that failed to serialize or deliver anywhere.
    pub failed: usize,
    pub elapsed_ms: u64,
}

/// Typed outcome of a test-node run; the binary maps this onto an exit code
/// instead of the engine terminating the process itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeExportStatus {
    Exported { documents: usize },
    Suppressed,
    Unnamed,
    Failed,
    NotFound,
    Ineligible,
}

/// Outcome of one root's pipeline.
enum RootOutcome {
    Exported { documents: usize },
    Suppressed,
    Unnamed,
    Failed,
}

/// The export orchestrator.
pub struct ExportEngine {
    snapshot: Arc<GraphSnapshot>,
    rules: Arc<Vec<SourceRule>>,
    limits: ExtractionLimits,
    sinks: Arc<SinkDispatcher>,
    concurrency: usize,
}

impl ExportEngine {
    pub fn new(
        snapshot: GraphSnapshot,
        rules: Vec<SourceRule>,
        limits: ExtractionLimits,
        sinks: SinkDispatcher,
    ) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            rules: Arc::new(rules),
            limits,
            sinks: Arc::new(sinks),
            concurrency: 4,
        }
    }

    /// Fetch and index the store snapshot, then build an engine over it.
    pub async fn from_store(
        client: &GraphClient,
        rules: Vec<SourceRule>,
        limits: ExtractionLimits,
        sinks: SinkDispatcher,
    ) -> error::Result<Self> {
        let records = client.fetch_snapshot().await?;
        let snapshot = GraphSnapshot::from_records(records);
        tracing::info!(
            nodes = snapshot.node_count(),
            relationships = snapshot.relationship_count(),
            "Snapshot indexed"
        );
        Ok(Self::new(snapshot, rules, limits, sinks))
    }

    /// Bound the number of roots processed concurrently.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Export every eligible root in the snapshot.
    ///
    /// Per-root failures are counted and logged, never propagated: one bad
    /// root does not abort the rest of the run.
    pub async fn run(&self) -> RunReport {
        let started_at = Utc::now();
        let start = std::time::Instant::now();

        let roots: Vec<i64> = self
            .snapshot
            .nodes()
            .filter(|node| eligibility::is_eligible(node, &self.snapshot, &self.rules))
            .map(|node| node.id)
            .collect();
        tracing::info!(candidates = roots.len(), "Collected eligible roots");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for root_id in &roots {
            let root_id = *root_id;
            let snapshot = self.snapshot.clone();
            let rules = self.rules.clone();
            let sinks = self.sinks.clone();
            let limits = self.limits;
            let semaphore = semaphore.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return RootOutcome::Failed;
                };
                process_root(&snapshot, &rules, &limits, &sinks, root_id).await
            });
        }

        let mut report = RunReport {
            started_at,
            candidates: roots.len(),
            exported: 0,
            documents: 0,
            suppressed: 0,
            unnamed: 0,
            failed: 0,
            elapsed_ms: 0,
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(RootOutcome::Exported { documents }) => {
                    report.exported += 1;
                    report.documents += documents;
                }
                Ok(RootOutcome::Suppressed) => report.suppressed += 1,
                Ok(RootOutcome::Unnamed) => report.unnamed += 1,
                Ok(RootOutcome::Failed) => report.failed += 1,
                Err(e) => {
                    tracing::error!(error = %e, "Export task panicked");
                    report.failed += 1;
                }
            }
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            exported = report.exported,
            documents = report.documents,
            suppressed = report.suppressed,
            unnamed = report.unnamed,
            failed = report.failed,
            elapsed_ms = report.elapsed_ms,
            "Export run complete"
        );
        report
    }

    /// Process exactly one node.
    pub async fn export_node(&self, node_id: i64) -> NodeExportStatus {
        let Some(node) = self.snapshot.node(node_id) else {
            return NodeExportStatus::NotFound;
        };
        if !eligibility::is_eligible(node, &self.snapshot, &self.rules) {
            return NodeExportStatus::Ineligible;
        }

        match process_root(&self.snapshot, &self.rules, &self.limits, &self.sinks, node_id).await {
            RootOutcome::Exported { documents } => NodeExportStatus::Exported { documents },
            RootOutcome::Suppressed => NodeExportStatus::Suppressed,
            RootOutcome::Unnamed => NodeExportStatus::Unnamed,
            RootOutcome::Failed => NodeExportStatus::Failed,
        }
    }
}

/// One root's pipeline: names, extraction, assembly, serialization, dispatch.
async fn process_root(
    snapshot: &GraphSnapshot,
    rules: &[SourceRule],
    limits: &ExtractionLimits,
    sinks: &SinkDispatcher,
    root_id: i64,
) -> RootOutcome {
    let Some(root) = snapshot.node(root_id) else {
        tracing::error!(root_id, "Root vanished from the snapshot");
        return RootOutcome::Failed;
    };

    let names = naming::document_names(root, rules);
    if names.is_empty() {
        tracing::debug!(root_id, "No document name derivable, skipping");
        return RootOutcome::Unnamed;
    }

    let selected = extract::extract_neighborhood(snapshot, root_id, limits);
    let document = assemble::assemble(snapshot, root_id, &selected);
    if document.is_empty() {
        tracing::debug!(root_id, "Singleton graph, nothing to write");
        return RootOutcome::Suppressed;
    }

    let payload = match serde_json::to_vec(&document) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(root_id, error = %e, "Failed to serialize document");
            return RootOutcome::Failed;
        }
    };

    tracing::debug!(
        root_id,
        nodes = document.nodes.len(),
        relationships = document.relationships.len(),
        names = names.len(),
        "Assembled document"
    );

    let mut documents = 0;
    for name in &names {
        if sinks.dispatch(name, &payload).await.is_complete() {
            documents += 1;
        }
    }

    if documents > 0 {
        RootOutcome::Exported { documents }
    } else {
        RootOutcome::Failed
    }
}
