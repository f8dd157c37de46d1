pub mod handler;
pub mod http;

pub use handler::{process_request, HandlerResponse};
pub use http::HttpServer;
