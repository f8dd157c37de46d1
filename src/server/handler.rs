//! The graph request handler, independent of transport.
//!
//! Three terminal outcomes per invocation: 400 when no usable input was
//! supplied (no collaborator is called), 200 with the elements payload,
//! 500 for any failure past validation. Error detail stays in the log;
//! the response body is deliberately opaque.

use crate::error::{KgforgeError, Result};
use crate::generation::Generate;
use crate::graph::{strip_trailing_commas, Elements, GraphDocument};
use crate::store::StoreRead;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Incoming request body for the graph endpoint.
///
/// `user_input` accepts any JSON value so a non-string input degrades to
/// the validation error instead of a body parse error.
#[derive(Debug, Deserialize)]
struct GraphRequest {
    #[serde(default)]
    user_input: serde_json::Value,
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    elements: &'a Elements,
}

/// Handler result the HTTP layer maps 1:1 onto the response.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HandlerResponse {
    fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }
}

fn no_input() -> HandlerResponse {
    HandlerResponse::new(
        StatusCode::BAD_REQUEST,
        serde_json::json!({"error": "No input provided"}).to_string(),
    )
}

fn internal_error() -> HandlerResponse {
    HandlerResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({"error": "Internal server error"}).to_string(),
    )
}

/// Handle one graph request end to end.
pub async fn process_request<G, S>(generator: &G, store: Option<&S>, body: &str) -> HandlerResponse
where
    G: Generate,
    S: StoreRead,
{
    let request: GraphRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            log::error!("Malformed request body: {}", e);
            return internal_error();
        }
    };

    let user_input = request.user_input.as_str().unwrap_or("");
    if user_input.is_empty() {
        return no_input();
    }

    match build_elements(generator, store, user_input).await {
        Ok(elements) => match serde_json::to_string(&SuccessBody {
            elements: &elements,
        }) {
            Ok(body) => HandlerResponse::new(StatusCode::OK, body),
            Err(e) => {
                log::error!("Response serialization failed: {}", e);
                internal_error()
            }
        },
        Err(e) => {
            // The distinct error kind stays here in the log; callers only
            // ever see the opaque 500 body.
            log::error!("Graph request failed: {}", e);
            internal_error()
        }
    }
}

/// Produce the elements payload from either data source.
///
/// Generation always runs first. When a store is connected its current
/// contents win and the freshly generated graph is discarded without being
/// persisted; the two need not agree for the same input.
async fn build_elements<G, S>(
    generator: &G,
    store: Option<&S>,
    user_input: &str,
) -> Result<Elements>
where
    G: Generate,
    S: StoreRead,
{
    let raw = generator.generate(user_input).await?;
    let repaired = strip_trailing_commas(&raw);
    log::debug!("Generated payload: {}", repaired);

    if let Some(store) = store {
        let nodes = store.fetch_nodes().await?;
        let edges = store.fetch_edges().await?;
        return Ok(Elements { nodes, edges });
    }

    let document: GraphDocument = serde_json::from_str(&repaired).map_err(|e| {
        KgforgeError::MalformedOutput(format!("Structured output did not parse: {}", e))
    })?;

    Ok(Elements::from_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeData, Element, NodeData};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubGenerator {
        payload: Option<String>,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn ok(payload: &str) -> Self {
            Self {
                payload: Some(payload.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                payload: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Generate for StubGenerator {
        async fn generate(&self, _user_input: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.payload {
                Some(payload) => Ok(payload.clone()),
                None => Err(KgforgeError::Generation("stubbed failure".to_string())),
            }
        }
    }

    struct StubStore {
        nodes: Vec<Element<NodeData>>,
        edges: Vec<Element<EdgeData>>,
        fail: bool,
    }

    impl StubStore {
        fn with_contents() -> Self {
            Self {
                nodes: vec![Element {
                    data: NodeData {
                        id: "stored-1".to_string(),
                        label: "Stored".to_string(),
                        color: "#EEEEEE".to_string(),
                        wiki: "".to_string(),
                    },
                }],
                edges: vec![],
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                nodes: vec![],
                edges: vec![],
                fail: true,
            }
        }
    }

    impl StoreRead for StubStore {
        async fn fetch_nodes(&self) -> Result<Vec<Element<NodeData>>> {
            if self.fail {
                return Err(KgforgeError::GraphStore("stubbed failure".to_string()));
            }
            Ok(self.nodes.clone())
        }

        async fn fetch_edges(&self) -> Result<Vec<Element<EdgeData>>> {
            if self.fail {
                return Err(KgforgeError::GraphStore("stubbed failure".to_string()));
            }
            Ok(self.edges.clone())
        }
    }

    const NO_STORE: Option<&StubStore> = None;

    const JAVA_JVM_PAYLOAD: &str = r##"{"nodes":[{"id":"1","label":"Java","type":"language","color":"#FFDAB9","wiki":""},{"id":"2","label":"JVM","type":"runtime","color":"#D0F0C0","wiki":""}],"edges":[{"from":"1","to":"2","relationship":"runs on","color":"#CCCCCC"}]}"##;

    #[tokio::test]
    async fn test_missing_user_input_is_400_without_calls() {
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let response = process_request(&generator, NO_STORE, r#"{}"#).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, r#"{"error":"No input provided"}"#);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_user_input_is_400_without_calls() {
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let response = process_request(&generator, NO_STORE, r#"{"user_input": ""}"#).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, r#"{"error":"No input provided"}"#);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_string_user_input_is_400() {
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let response = process_request(&generator, NO_STORE, r#"{"user_input": 42}"#).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_request_body_is_500() {
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let response = process_request(&generator, NO_STORE, "not json at all").await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, r#"{"error":"Internal server error"}"#);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_path_success() {
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let response = process_request(
            &generator,
            NO_STORE,
            r#"{"user_input": "Java and its virtual machine"}"#,
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            r##"{"elements":{"nodes":[{"data":{"id":"1","label":"Java","color":"#FFDAB9","wiki":""}},{"data":{"id":"2","label":"JVM","color":"#D0F0C0","wiki":""}}],"edges":[{"data":{"source":"1","target":"2","label":"runs on","color":"#CCCCCC"}}]}}"##
        );
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_colors_get_default() {
        let generator = StubGenerator::ok(
            r#"{"nodes":[{"id":"1","label":"A"}],"edges":[{"from":"1","to":"1","relationship":"r"}]}"#,
        );
        let response = process_request(&generator, NO_STORE, r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            r#"{"elements":{"nodes":[{"data":{"id":"1","label":"A","color":"defaultColor","wiki":""}}],"edges":[{"data":{"source":"1","target":"1","label":"r","color":"defaultColor"}}]}}"#
        );
    }

    #[tokio::test]
    async fn test_trailing_commas_are_repaired() {
        let generator = StubGenerator::ok(
            r##"{"nodes":[{"id":"1","label":"A","color":"#fff","wiki":"",},],"edges":[],}"##,
        );
        let response = process_request(&generator, NO_STORE, r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains(r#""id":"1""#));
    }

    #[tokio::test]
    async fn test_generation_failure_is_500() {
        let generator = StubGenerator::failing();
        let response = process_request(&generator, NO_STORE, r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, r#"{"error":"Internal server error"}"#);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_output_is_500() {
        let generator = StubGenerator::ok("{{ definitely not json");
        let response = process_request(&generator, NO_STORE, r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, r#"{"error":"Internal server error"}"#);
    }

    #[tokio::test]
    async fn test_missing_required_output_key_is_500() {
        let generator = StubGenerator::ok(r#"{"nodes":[{"id":"1","label":"A"}]}"#);
        let response = process_request(&generator, NO_STORE, r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_contents_win_over_generation() {
        // The generated graph is discarded, but generation still runs
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let store = StubStore::with_contents();
        let response = process_request(&generator, Some(&store), r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.body,
            r##"{"elements":{"nodes":[{"data":{"id":"stored-1","label":"Stored","color":"#EEEEEE","wiki":""}}],"edges":[]}}"##
        );
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let generator = StubGenerator::ok(JAVA_JVM_PAYLOAD);
        let store = StubStore::failing();
        let response = process_request(&generator, Some(&store), r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, r#"{"error":"Internal server error"}"#);
    }

    #[tokio::test]
    async fn test_dangling_edges_are_not_rejected() {
        let generator = StubGenerator::ok(
            r#"{"nodes":[{"id":"1","label":"A"}],"edges":[{"from":"1","to":"ghost","relationship":"r"}]}"#,
        );
        let response = process_request(&generator, NO_STORE, r#"{"user_input": "x"}"#).await;

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains(r#""target":"ghost""#));
    }
}
