//! Generation-service client: turns user text into a structured knowledge
//! graph through a schema-constrained function call.

pub mod openai;
pub mod schema;

pub use openai::OpenAiGenerator;
pub use schema::{knowledge_graph_function, FunctionDef, SchemaNode};

use crate::error::Result;
use std::future::Future;

/// Seam between the request handler and the generation service.
///
/// Implementations return the raw structured-output payload, a JSON-encoded
/// string, without parsing or repairing it.
pub trait Generate: Send + Sync {
    fn generate(&self, user_input: &str) -> impl Future<Output = Result<String>> + Send;
}
