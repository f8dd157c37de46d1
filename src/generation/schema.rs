//! The fixed function-call schema handed to the generation service.
//!
//! Expressed as typed structures rather than a raw JSON blob so the
//! required/optional split per node and edge is visible in one place.

use serde::Serialize;
use std::collections::BTreeMap;

/// A function definition for the generation service's function-calling
/// interface.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDef {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: SchemaNode,
}

/// A JSON Schema fragment. Covers only what the knowledge-graph function
/// needs: objects, arrays and strings.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<&'static str, SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<&'static str>,
}

impl SchemaNode {
    pub fn string() -> Self {
        Self {
            kind: "string",
            description: None,
            properties: None,
            items: None,
            required: Vec::new(),
        }
    }

    pub fn object(properties: impl IntoIterator<Item = (&'static str, SchemaNode)>) -> Self {
        Self {
            kind: "object",
            description: None,
            properties: Some(properties.into_iter().collect()),
            items: None,
            required: Vec::new(),
        }
    }

    /// An object with no fixed keys (free-form property bag).
    pub fn open_object() -> Self {
        Self {
            kind: "object",
            description: None,
            properties: None,
            items: None,
            required: Vec::new(),
        }
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            kind: "array",
            description: None,
            properties: None,
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn require(mut self, required: &[&'static str]) -> Self {
        self.required = required.to_vec();
        self
    }
}

/// The knowledge-graph function definition. Node entries must carry display
/// metadata (`color`, `wiki`) so the response renders without lookups;
/// `direction` and `properties` stay optional on both nodes and edges.
pub fn knowledge_graph_function() -> FunctionDef {
    let metadata = SchemaNode::object([
        ("createdDate", SchemaNode::string()),
        ("lastUpdated", SchemaNode::string()),
        ("description", SchemaNode::string()),
    ]);

    let node = SchemaNode::object([
        ("id", SchemaNode::string()),
        ("label", SchemaNode::string()),
        ("type", SchemaNode::string()),
        ("color", SchemaNode::string()),
        ("wiki", SchemaNode::string()),
        (
            "properties",
            SchemaNode::open_object().describe("Additional attributes for the node"),
        ),
    ])
    .require(&["id", "label", "type", "color", "wiki"]);

    let edge = SchemaNode::object([
        ("from", SchemaNode::string()),
        ("to", SchemaNode::string()),
        ("relationship", SchemaNode::string()),
        ("direction", SchemaNode::string()),
        ("color", SchemaNode::string()),
        (
            "properties",
            SchemaNode::open_object().describe("Additional attributes for the edge"),
        ),
    ])
    .require(&["from", "to", "relationship", "color"]);

    FunctionDef {
        name: "knowledge_graph",
        description: "Generate a knowledge graph with entities and relationships. Make the label the relationship between the nodes like java to jre would be 'runs on', etc.. Use the colors to help differentiate between different node or edge types/categories to differentiate between nodes. Always provide light pastel colors that work well with black font. Please try to use a different color for different nodes. And if you can find a wiki for the concept, share the full link, empty string otherwise.",
        parameters: SchemaNode::object([
            ("metadata", metadata),
            ("nodes", SchemaNode::array(node)),
            ("edges", SchemaNode::array(edge)),
        ])
        .require(&["nodes", "edges"]),
    }
}
