//! Function-calling tools backing role capabilities
//!
//! [`Capability::Search`] maps to [`SerperSearchTool`] and
//! [`Capability::Scrape`] to [`ScrapeWebsiteTool`]. A [`Toolbox`] hands
//! each role exactly the tools its capabilities grant.

use crate::client::{FunctionSpec, ToolSpec};
use crate::{LlmError, Result};
use async_trait::async_trait;
use fincrew_core::{AgentRole, Capability};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";
const DEFAULT_RESULT_COUNT: usize = 10;
const DEFAULT_MAX_PAGE_CHARS: usize = 8_000;
const TOOL_TIMEOUT_SECS: u64 = 30;

/// Trait for tools that roles can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with arguments matching [`Tool::input_schema`]
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Name the model uses to call the tool
    fn name(&self) -> &str;

    /// Description that helps the model decide when to call the tool
    fn description(&self) -> &str;

    /// JSON schema of the arguments
    fn input_schema(&self) -> Value;

    /// Advertisement sent with a chat request
    fn definition(&self) -> ToolSpec {
        ToolSpec {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.input_schema(),
            },
        }
    }
}

fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(TOOL_TIMEOUT_SECS))
        .build()?)
}

fn parse_params<T: for<'de> Deserialize<'de>>(tool: &str, params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| LlmError::ToolError(format!("invalid arguments for {tool}: {e}")))
}

/// Web search through the Serper API
pub struct SerperSearchTool {
    client: Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default)]
    num_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperHit>,
}

#[derive(Debug, Deserialize)]
struct SerperHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SerperSearchTool {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            api_key: api_key.into(),
            endpoint: SERPER_ENDPOINT.to_string(),
        })
    }

    /// Point the tool at another Serper-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Tool for SerperSearchTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = parse_params(self.name(), params)?;
        let num = params.num_results.unwrap_or(DEFAULT_RESULT_COUNT).clamp(1, 20);
        debug!(query = %params.query, num, "Searching the web");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": params.query, "num": num }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, body, "serper"));
        }

        let body: SerperResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("Failed to parse search results: {e}")))?;

        Ok(search_results(body))
    }

    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "Search the internet for a query and return the top results with title, link and snippet."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "num_results": { "type": "integer", "description": "Number of results (1-20)" }
            },
            "required": ["query"]
        })
    }
}

fn search_results(response: SerperResponse) -> Value {
    let results: Vec<Value> = response
        .organic
        .into_iter()
        .map(|hit| json!({ "title": hit.title, "link": hit.link, "snippet": hit.snippet }))
        .collect();
    json!({ "results": results })
}

/// Fetches one web page and returns its readable text
pub struct ScrapeWebsiteTool {
    client: Client,
    max_chars: usize,
}

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    website_url: String,
}

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
        .expect("script pattern is valid")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

impl ScrapeWebsiteTool {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            max_chars: DEFAULT_MAX_PAGE_CHARS,
        })
    }

    /// Limit the amount of page text returned to the model
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars.max(1);
        self
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: ScrapeParams = parse_params(self.name(), params)?;
        let url = url::Url::parse(&params.website_url)
            .map_err(|e| LlmError::ToolError(format!("invalid url '{}': {e}", params.website_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LlmError::ToolError(format!(
                "unsupported url scheme '{}'",
                url.scheme()
            )));
        }
        debug!(%url, "Reading website content");

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, body, url.as_str()));
        }

        let html = response.text().await?;
        Ok(json!({ "url": url.as_str(), "content": page_text(&html, self.max_chars) }))
    }

    fn name(&self) -> &str {
        "read_website_content"
    }

    fn description(&self) -> &str {
        "Read the text content of a web page."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "website_url": { "type": "string", "description": "Full http(s) URL of the page" }
            },
            "required": ["website_url"]
        })
    }
}

/// Strip markup and collapse whitespace, keeping at most `max_chars`
fn page_text(html: &str, max_chars: usize) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_code, " ");
    let text = WHITESPACE.replace_all(&without_tags, " ");
    let text = text.trim();

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Tools keyed by the capability they implement
#[derive(Clone, Default)]
pub struct Toolbox {
    tools: HashMap<Capability, Arc<dyn Tool>>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search plus scrape, the standard web toolset
    pub fn web(serper_api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new()
            .with(Capability::Search, Arc::new(SerperSearchTool::new(serper_api_key)?))
            .with(Capability::Scrape, Arc::new(ScrapeWebsiteTool::new()?)))
    }

    /// Bind a tool to a capability, replacing any previous binding
    pub fn with(mut self, capability: Capability, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(capability, tool);
        self
    }

    /// Tools granted to `role`, in [`Capability::ALL`] order
    pub fn for_role(&self, role: &AgentRole) -> Vec<Arc<dyn Tool>> {
        Capability::ALL
            .iter()
            .filter(|cap| role.can(**cap))
            .filter_map(|cap| self.tools.get(cap).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(params)
        }
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    #[test]
    fn test_page_text_strips_markup() {
        let html = r#"<html><head><style>p { color: red }</style>
            <script>alert("x")</script></head>
            <body><h1>Earnings</h1>
            <p>Revenue   grew <b>12%</b>.</p></body></html>"#;
        assert_eq!(page_text(html, 1_000), "Earnings Revenue grew 12% .");
    }

    #[test]
    fn test_page_text_truncates_on_char_boundary() {
        assert_eq!(page_text("<p>héllo wörld</p>", 5), "héllo...");
        assert_eq!(page_text("short", 5), "short");
    }

    #[test]
    fn test_search_results_shape() {
        let response: SerperResponse = serde_json::from_value(json!({
            "organic": [
                {"title": "NVDA", "link": "https://a.example", "snippet": "chips", "position": 1},
                {"title": "AMD", "link": "https://b.example"}
            ]
        }))
        .unwrap();

        let value = search_results(response);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert_eq!(value["results"][1]["snippet"], "");
    }

    #[test]
    fn test_toolbox_follows_capabilities() {
        let toolbox = Toolbox::new()
            .with(Capability::Search, Arc::new(Echo("search_internet")))
            .with(Capability::Scrape, Arc::new(Echo("read_website_content")));

        let role = AgentRole::new("r", "Role", "goal", "story");
        let names: Vec<String> = toolbox
            .for_role(&role)
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, ["read_website_content", "search_internet"]);

        let spec = toolbox.for_role(&role)[1].definition();
        assert_eq!(spec.kind, "function");
        assert_eq!(spec.function.name, "search_internet");
    }

    #[tokio::test]
    async fn test_scrape_rejects_bad_urls() {
        let tool = ScrapeWebsiteTool::new().unwrap();

        let err = tool.execute(json!({"website_url": "not a url"})).await.unwrap_err();
        assert!(matches!(err, LlmError::ToolError(_)));

        let err = tool
            .execute(json!({"website_url": "ftp://example.com/file"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported url scheme"));

        let err = tool.execute(json!({"url": "https://example.com"})).await.unwrap_err();
        assert!(err.to_string().contains("invalid arguments"));
    }
}
