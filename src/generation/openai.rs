use crate::error::{KgforgeError, Result};
use crate::generation::schema::{knowledge_graph_function, FunctionDef};
use crate::generation::Generate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request structure for the OpenAI chat completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    functions: Vec<FunctionDef>,
    function_call: FunctionChoice,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Forces the model to call the named function
#[derive(Serialize)]
struct FunctionChoice {
    name: &'static str,
}

/// Response structure from the OpenAI chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct FunctionCall {
    /// JSON-encoded string holding the structured graph
    arguments: String,
}

/// OpenAI chat-completions client that asks for a knowledge graph through
/// a forced function call.
///
/// A failed call is not reattempted; the handler collapses it to an opaque
/// server error. The 30 second client timeout is the only timeout anywhere
/// in the request path.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    /// Create a new generator
    ///
    /// # Panics
    ///
    /// Panics if HTTP client cannot be created (should not happen in normal operation)
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
        }
    }

    async fn complete(&self, user_input: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(user_input),
            }],
            functions: vec![knowledge_graph_function()],
            function_call: FunctionChoice {
                name: "knowledge_graph",
            },
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| KgforgeError::Generation(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(KgforgeError::Generation(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| KgforgeError::Generation(format!("Failed to parse response: {}", e)))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.function_call)
            .map(|call| call.arguments)
            .ok_or_else(|| {
                KgforgeError::MalformedOutput("Response contained no function call".to_string())
            })
    }
}

impl Generate for OpenAiGenerator {
    async fn generate(&self, user_input: &str) -> Result<String> {
        self.complete(user_input).await
    }
}

fn build_prompt(user_input: &str) -> String {
    format!(
        "Help me understand following by describing as a detailed knowledge graph: {}",
        user_input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_new() {
        let generator =
            OpenAiGenerator::new("test-key".to_string(), "gpt-3.5-turbo-16k".to_string());

        assert_eq!(generator.model, "gpt-3.5-turbo-16k");
        assert_eq!(generator.api_key, "test-key");
    }

    #[test]
    fn test_prompt_embeds_user_input() {
        let prompt = build_prompt("Java and its virtual machine");
        assert!(prompt.starts_with("Help me understand following"));
        assert!(prompt.ends_with("Java and its virtual machine"));
    }

    #[test]
    fn test_response_parsing_extracts_arguments() {
        let raw = r#"{"choices":[{"message":{"function_call":{"name":"knowledge_graph","arguments":"{\"nodes\":[],\"edges\":[]}"}}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let arguments = parsed.choices[0]
            .message
            .function_call
            .as_ref()
            .unwrap()
            .arguments
            .clone();
        assert_eq!(arguments, r#"{"nodes":[],"edges":[]}"#);
    }

    #[test]
    fn test_response_without_function_call() {
        let raw = r#"{"choices":[{"message":{"content":"plain text"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.function_call.is_none());
    }

    // Integration tests for actual API calls would require a real API key
    // and are run separately with proper fixtures
}
