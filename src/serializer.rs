//! Serialization module for route reports and example payloads.
//!
//! This module turns extraction results into JSON, YAML or plain-text request files and
//! writes them to disk.

use crate::detector::GlobalPrefix;
use crate::extractor::RouteDescriptor;
use crate::request_builder::RequestBuilder;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Everything one run found, as emitted by the JSON and YAML formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    /// Global prefix in effect, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_prefix: Option<GlobalPrefix>,
    /// Extracted routes in file and declaration order
    pub routes: Vec<RouteDescriptor>,
}

/// Pretty-printed text of an example value (two-space indentation).
pub fn example_text(value: &Value) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to pretty-print example: {}", e);
            value.to_string()
        }
    }
}

/// Serializes a route report to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(report: &RouteReport) -> Result<String> {
    debug!("Serializing {} routes to YAML", report.routes.len());
    serde_yaml::to_string(report).context("Failed to serialize route report to YAML")
}

/// Serializes a route report to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(report: &RouteReport) -> Result<String> {
    debug!("Serializing {} routes to JSON", report.routes.len());
    serde_json::to_string_pretty(report).context("Failed to serialize route report to JSON")
}

/// Renders routes as a plain-text request file (`### METHOD path` blocks).
pub fn serialize_http(routes: &[RouteDescriptor], builder: &RequestBuilder) -> String {
    debug!("Rendering {} routes as request blocks", routes.len());
    builder.render(routes)
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites an existing file.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
