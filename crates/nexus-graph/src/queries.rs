//! Snapshot queries against the store.
//!
//! One export run reads the store exactly twice: all nodes, then all
//! relationships. Pulling the whole graph up front and computing in memory
//! is cheaper than per-node neighbor queries for the traversal-heavy export,
//! and it gives every root extraction in the run the same consistent view.

use neo4rs::query;

use nexus_core::{NodeRecord, RelRecord};

use crate::client::{GraphClient, GraphError};

/// Raw snapshot of the store as fetched, before in-memory indexing.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecords {
    pub nodes: Vec<NodeRecord>,
    pub relationships: Vec<RelRecord>,
}

impl GraphClient {
    /// Fetch every node and relationship in the store.
    pub async fn fetch_snapshot(&self) -> Result<SnapshotRecords, GraphError> {
        let nodes = self.fetch_all_nodes().await?;
        let relationships = self.fetch_all_relationships().await?;

        tracing::info!(
            nodes = nodes.len(),
            relationships = relationships.len(),
            "Fetched store snapshot"
        );

        Ok(SnapshotRecords {
            nodes,
            relationships,
        })
    }

    /// Fetch a single node by its store id.
    pub async fn fetch_node(&self, node_id: i64) -> Result<Option<NodeRecord>, GraphError> {
        let q = query(
            "MATCH (n) WHERE id(n) = $id
             RETURN id(n) AS id, labels(n) AS labels, properties(n) AS props",
        )
        .param("id", node_id);

        match self.query_one(q).await? {
            Some(row) => Ok(Some(decode_node_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn fetch_all_nodes(&self) -> Result<Vec<NodeRecord>, GraphError> {
        let q = query("MATCH (n) RETURN id(n) AS id, labels(n) AS labels, properties(n) AS props");

        let rows = self.query_rows(q).await?;
        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            nodes.push(decode_node_row(&row)?);
        }
        Ok(nodes)
    }

    async fn fetch_all_relationships(&self) -> Result<Vec<RelRecord>, GraphError> {
        let q = query(
            "MATCH (a)-[r]->(b)
             RETURN id(r) AS id, type(r) AS rel_type, id(a) AS start_id, id(b) AS end_id",
        );

        let rows = self.query_rows(q).await?;
        let mut relationships = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row
                .get("id")
                .map_err(|e| GraphError::Decode(format!("relationship id: {e}")))?;
            let rel_type: String = row
                .get("rel_type")
                .map_err(|e| GraphError::Decode(format!("relationship type: {e}")))?;
            let start_id: i64 = row
                .get("start_id")
                .map_err(|e| GraphError::Decode(format!("relationship start: {e}")))?;
            let end_id: i64 = row
                .get("end_id")
                .map_err(|e| GraphError::Decode(format!("relationship end: {e}")))?;

            relationships.push(RelRecord {
                id,
                rel_type,
                start_id,
                end_id,
            });
        }
        Ok(relationships)
    }
}

/// Decode one `id / labels / props` row into a NodeRecord.
fn decode_node_row(row: &neo4rs::Row) -> Result<NodeRecord, GraphError> {
    let id: i64 = row
        .get("id")
        .map_err(|e| GraphError::Decode(format!("node id: {e}")))?;
    let labels: Vec<String> = row
        .get("labels")
        .map_err(|e| GraphError::Decode(format!("node labels: {e}")))?;
    let props: serde_json::Value = row
        .get("props")
        .map_err(|e| GraphError::Decode(format!("node properties: {e}")))?;

    let properties = match props {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => serde_json::Map::new(),
        other => {
            return Err(GraphError::Decode(format!(
                "node {id} properties are not a map: {other}"
            )))
        }
    };

    Ok(NodeRecord {
        id,
        labels,
        properties,
    })
}
