//! CLI entry point for the Nexus graph exporter.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use nexus_export::config::ExporterConfig;
use nexus_export::sink::{LocalSink, S3Sink, SinkDispatcher};
use nexus_export::{ExportEngine, NodeExportStatus};
use nexus_graph::{GraphClient, GraphConfig};

#[derive(Parser)]
#[command(name = "nexus-export")]
#[command(about = "Bounded neighborhood JSON exporter for the Nexus research graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: nexus).
    #[arg(short, long, default_value = "nexus", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Export every eligible record in the store.
    Run,
    /// Process exactly one node; the exit status reflects the outcome
    /// (0 processed, 1 failed, 2 not found, 3 ineligible).
    TestNode {
        /// Store id of the node to export.
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let export_config = load_exporter_config(&cli.config)?;
    export_config.validate()?;

    let graph_config = load_graph_config(&cli.config);
    let graph = GraphClient::connect(&graph_config).await?;

    match cli.command {
        Command::Run => {
            let engine = build_engine(&graph, &export_config).await?;
            let report = engine.run().await;
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::TestNode { id } => {
            // Cheap existence check before pulling the whole snapshot.
            if graph.fetch_node(id).await?.is_none() {
                tracing::error!(node_id = id, "Test node does not exist");
                std::process::exit(2);
            }

            let engine = build_engine(&graph, &export_config).await?;
            let code = match engine.export_node(id).await {
                NodeExportStatus::Exported { documents } => {
                    tracing::info!(node_id = id, documents, "Test node exported");
                    0
                }
                NodeExportStatus::Suppressed => {
                    tracing::warn!(node_id = id, "Test node yields a singleton graph, nothing written");
                    0
                }
                NodeExportStatus::Unnamed => {
                    tracing::warn!(node_id = id, "No document name derivable for test node");
                    0
                }
                NodeExportStatus::Failed => {
                    tracing::error!(node_id = id, "Test node export failed");
                    1
                }
                NodeExportStatus::NotFound => {
                    tracing::error!(node_id = id, "Test node does not exist");
                    2
                }
                NodeExportStatus::Ineligible => {
                    tracing::error!(node_id = id, "Test node is not eligible for export");
                    3
                }
            };
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

async fn build_engine(
    graph: &GraphClient,
    config: &ExporterConfig,
) -> anyhow::Result<ExportEngine> {
    let sinks = build_sinks(config).await;
    tracing::info!(destinations = sinks.destination_count(), "Sinks configured");
    let engine = ExportEngine::from_store(graph, config.sources.clone(), config.limits, sinks)
        .await?
        .with_concurrency(config.concurrency);
    Ok(engine)
}

async fn build_sinks(config: &ExporterConfig) -> SinkDispatcher {
    let mut sinks = SinkDispatcher::new();
    if let Some(directory) = &config.output.directory {
        sinks = sinks.with_local(LocalSink::new(directory));
    }
    if let Some(s3) = &config.output.s3 {
        sinks = sinks.with_remote(S3Sink::connect(s3).await);
    }
    sinks
}

fn load_exporter_config(file_prefix: &str) -> anyhow::Result<ExporterConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("NEXUS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<ExporterConfig>("export") {
        Ok(c) => Ok(c),
        Err(_) => Ok(ExporterConfig::default()),
    }
}

fn load_graph_config(file_prefix: &str) -> GraphConfig {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("NEXUS")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => GraphConfig {
            uri: c
                .get_string("neo4j.uri")
                .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: c
                .get_string("neo4j.user")
                .unwrap_or_else(|_| "neo4j".to_string()),
            password: c
                .get_string("neo4j.password")
                .unwrap_or_else(|_| "neo4j".to_string()),
            ..Default::default()
        },
        Err(_) => GraphConfig::default(),
    }
}
