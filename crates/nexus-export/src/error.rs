//! Error types for the nexus-export crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Graph store error: {0}")]
    Graph(#[from] nexus_graph::GraphError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
