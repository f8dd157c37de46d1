//! Knowledge graph data model and the visualization reshape.
//!
//! `GraphDocument` is the structured output the generation service produces;
//! `Elements` is the `{nodes, edges}` payload the response contract expects.

mod repair;

pub use repair::strip_trailing_commas;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Color substituted when the generation service omits one.
pub const DEFAULT_COLOR: &str = "defaultColor";

/// Optional document-level metadata on a generated graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphMetadata {
    #[serde(rename = "createdDate", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A node as generated. `id` and `label` must be present; everything else
/// is tolerated missing even though the generation schema asks for it.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub wiki: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// A directed relationship as generated.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub relationship: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Parsed generation output. Missing `nodes` or `edges` is a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub metadata: Option<GraphMetadata>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Wrapper giving every element the `{"data": ...}` envelope the
/// visualization layer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element<T> {
    pub data: T,
}

/// Display payload for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub color: String,
    pub wiki: String,
}

/// Display payload for an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
    pub label: String,
    pub color: String,
}

/// The response contract: node and edge elements ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Elements {
    pub nodes: Vec<Element<NodeData>>,
    pub edges: Vec<Element<EdgeData>>,
}

impl Elements {
    /// Reshape a parsed generation result into the response contract.
    ///
    /// Counts are preserved 1:1. Edge endpoints are not checked against the
    /// node set, so a malformed generation result can produce dangling edges.
    pub fn from_document(doc: GraphDocument) -> Self {
        let nodes = doc
            .nodes
            .into_iter()
            .map(|node| Element {
                data: NodeData {
                    id: node.id,
                    label: node.label,
                    color: node.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                    wiki: node.wiki.unwrap_or_default(),
                },
            })
            .collect();

        let edges = doc
            .edges
            .into_iter()
            .map(|edge| Element {
                data: EdgeData {
                    source: edge.from,
                    target: edge.to,
                    label: edge.relationship,
                    color: edge.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                },
            })
            .collect();

        Self { nodes, edges }
    }
}
