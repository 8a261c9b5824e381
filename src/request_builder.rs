use crate::detector::GlobalPrefix;
use crate::extractor::nest::ANY_QUERY_KEY;
use crate::extractor::path::ensure_leading_slash;
use crate::extractor::{HttpMethod, RouteDescriptor};
use log::debug;
use serde::{Deserialize, Serialize};

/// Settings for turning routes into request templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Scheme, host and port, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Header lines emitted under every request line
    pub headers: Vec<String>,
    /// Replaces the detected global prefix; `Some("")` disables prefixing
    pub global_prefix_override: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            headers: vec!["Content-Type: application/json".to_string()],
            global_prefix_override: None,
        }
    }
}

/// One ready-to-send request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTemplate {
    pub method: HttpMethod,
    /// Path with the global prefix applied
    pub full_path: String,
    /// Base URL, full path and query placeholders
    pub url: String,
    pub headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestTemplate {
    /// Renders the template as a plain-text request block.
    pub fn render(&self) -> String {
        let mut block = format!("### {} {}\n", self.method, self.full_path);
        block.push_str(&format!("{} {}\n", request_verb(self.method), self.url));
        for header in &self.headers {
            block.push_str(header);
            block.push('\n');
        }
        if let Some(body) = &self.body {
            block.push('\n');
            block.push_str(body);
            block.push('\n');
        }
        block
    }
}

/// Request builder
///
/// Combines extracted routes with the export settings and the effective global prefix.
pub struct RequestBuilder {
    config: ExportConfig,
    prefix: Option<GlobalPrefix>,
}

impl RequestBuilder {
    /// Create a new RequestBuilder; the override prefix, if any, is applied immediately
    pub fn new(config: ExportConfig) -> Self {
        let prefix = config.global_prefix_override.as_deref().and_then(override_prefix);
        Self { config, prefix }
    }

    /// Uses `detected` unless the configuration carries an override.
    pub fn with_detected_prefix(mut self, detected: Option<GlobalPrefix>) -> Self {
        if self.config.global_prefix_override.is_none() {
            self.prefix = detected;
        } else {
            debug!("Global prefix override in effect, ignoring detected prefix");
        }
        self
    }

    /// The prefix applied to route paths, if any.
    pub fn effective_prefix(&self) -> Option<&GlobalPrefix> {
        self.prefix.as_ref()
    }

    /// Route path with the effective global prefix applied.
    pub fn full_path(&self, route: &RouteDescriptor) -> String {
        match &self.prefix {
            Some(prefix) => prefix.apply(&route.path),
            None => ensure_leading_slash(&route.path),
        }
    }

    /// Builds the request template of one route.
    pub fn build(&self, route: &RouteDescriptor) -> RequestTemplate {
        let full_path = self.full_path(route);
        let mut url = format!("{}{}", self.config.base_url.trim_end_matches('/'), full_path);

        let query: Vec<String> = route
            .query_params
            .iter()
            .filter(|name| name.as_str() != ANY_QUERY_KEY)
            .map(|name| format!("{}=", name))
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        RequestTemplate {
            method: route.method,
            full_path,
            url,
            headers: self.config.headers.clone(),
            body: route.body_example.clone(),
        }
    }

    /// Builds one template per route, in route order.
    pub fn build_all(&self, routes: &[RouteDescriptor]) -> Vec<RequestTemplate> {
        debug!("Building request templates for {} routes", routes.len());
        routes.iter().map(|route| self.build(route)).collect()
    }

    /// Renders every route as a request block, blocks separated by a blank line.
    pub fn render(&self, routes: &[RouteDescriptor]) -> String {
        self.build_all(routes)
            .iter()
            .map(RequestTemplate::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn override_prefix(prefix: &str) -> Option<GlobalPrefix> {
    if prefix.trim_matches('/').is_empty() {
        None
    } else {
        Some(GlobalPrefix::new(prefix))
    }
}

/// Verb on the request line; `@All()` handlers are exercised with GET.
fn request_verb(method: HttpMethod) -> HttpMethod {
    match method {
        HttpMethod::All => HttpMethod::Get,
        other => other,
    }
}
