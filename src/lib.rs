pub mod config;
pub mod error;
pub mod generation;
pub mod graph;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{KgforgeError, Result};
pub use generation::{Generate, OpenAiGenerator};
pub use graph::{Elements, GraphDocument, GraphEdge, GraphNode};
pub use server::HttpServer;
pub use store::{Neo4jStore, StoreRead};
