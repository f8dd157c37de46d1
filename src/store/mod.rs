//! Optional graph-store collaborator.
//!
//! When a Neo4j connection is configured, responses are served from whatever
//! the store currently holds rather than from the fresh generation result,
//! so graphs accumulated across earlier requests stay inspectable. Nothing
//! here writes; the connection is read-only from this service's point of view.

use crate::config::GraphStoreConfig;
use crate::error::{KgforgeError, Result};
use crate::graph::{EdgeData, Element, NodeData};
use neo4rs::{query, Graph};
use std::future::Future;

const NODE_QUERY: &str =
    "MATCH (n) RETURN n.id AS id, n.label AS label, n.color AS color, n.wiki AS wiki";

const EDGE_QUERY: &str =
    "MATCH (s)-[r]->(t) RETURN s.id AS source, t.id AS target, r.type AS label, r.color AS color";

/// Seam between the request handler and the graph store.
pub trait StoreRead: Send + Sync {
    fn fetch_nodes(&self) -> impl Future<Output = Result<Vec<Element<NodeData>>>> + Send;
    fn fetch_edges(&self) -> impl Future<Output = Result<Vec<Element<EdgeData>>>> + Send;
}

/// Neo4j-backed store. Connections are pooled inside `neo4rs::Graph` and
/// established lazily, so construction succeeds without the server being up.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect with explicit credentials.
    pub async fn connect(url: &str, username: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(url, username, password).await.map_err(|e| {
            KgforgeError::GraphStore(format!("Failed to connect to graph store: {}", e))
        })?;

        Ok(Self { graph })
    }

    /// Build a store from the environment variables named in the config.
    ///
    /// Returns `None` unless url, username and password are all set; a
    /// partially configured store is treated as no store at all.
    pub async fn from_env(config: &GraphStoreConfig) -> Result<Option<Self>> {
        let url = std::env::var(&config.url_env).ok();
        let username = std::env::var(&config.username_env).ok();
        let password = std::env::var(&config.password_env).ok();

        match (url, username, password) {
            (Some(url), Some(username), Some(password)) => {
                Ok(Some(Self::connect(&url, &username, &password).await?))
            }
            _ => Ok(None),
        }
    }

    async fn nodes(&self) -> Result<Vec<Element<NodeData>>> {
        let mut stream = self
            .graph
            .execute(query(NODE_QUERY))
            .await
            .map_err(|e| KgforgeError::GraphStore(format!("Node query failed: {}", e)))?;

        let mut nodes = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| KgforgeError::GraphStore(format!("Node query failed: {}", e)))?
        {
            nodes.push(Element {
                data: NodeData {
                    id: row.get("id").unwrap_or_default(),
                    label: row.get("label").unwrap_or_default(),
                    color: row.get("color").unwrap_or_default(),
                    wiki: row.get("wiki").unwrap_or_default(),
                },
            });
        }

        Ok(nodes)
    }

    async fn edges(&self) -> Result<Vec<Element<EdgeData>>> {
        let mut stream = self
            .graph
            .execute(query(EDGE_QUERY))
            .await
            .map_err(|e| KgforgeError::GraphStore(format!("Edge query failed: {}", e)))?;

        let mut edges = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| KgforgeError::GraphStore(format!("Edge query failed: {}", e)))?
        {
            edges.push(Element {
                data: EdgeData {
                    source: row.get("source").unwrap_or_default(),
                    target: row.get("target").unwrap_or_default(),
                    label: row.get("label").unwrap_or_default(),
                    color: row.get("color").unwrap_or_default(),
                },
            });
        }

        Ok(edges)
    }
}

impl StoreRead for Neo4jStore {
    async fn fetch_nodes(&self) -> Result<Vec<Element<NodeData>>> {
        self.nodes().await
    }

    async fn fetch_edges(&self) -> Result<Vec<Element<EdgeData>>> {
        self.edges().await
    }
}
