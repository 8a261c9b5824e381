//! Route extraction module for decorated controller classes.
//!
//! This module defines the route model shared by the rest of the crate and the
//! [`RouteExtractor`] interface. The NestJS-style decorator vocabulary is implemented by
//! [`nest::NestExtractor`]; path joining and `:param` harvesting live in [`path`].
//!
//! # Example
//!
//! ```no_run
//! use request_from_source::example_generator::ExampleGenerator;
//! use request_from_source::extractor::{RouteExtractor, nest::NestExtractor};
//! use request_from_source::parser::AstParser;
//! use request_from_source::type_resolver::TypeLocator;
//! use request_from_source::workspace::FsWorkspace;
//! use std::path::{Path, PathBuf};
//! use std::rc::Rc;
//!
//! let workspace = FsWorkspace::new(PathBuf::from("./my-nest-app"));
//! let mut examples = ExampleGenerator::new(TypeLocator::new(&workspace));
//! let parsed = Rc::new(AstParser::parse_file(Path::new("src/users/users.controller.ts")).unwrap());
//! let routes = NestExtractor.extract_routes(&parsed, &mut examples);
//! println!("Found {} routes", routes.len());
//! ```

pub mod nest;
pub mod path;

use crate::example_generator::ExampleGenerator;
use crate::parser::{AstParser, ParsedFile};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Trait for extracting routes from one parsed TypeScript document.
pub trait RouteExtractor {
    /// Extracts every route declared in `parsed_file`, in declaration order.
    ///
    /// Body examples are produced through `examples`, which may read other files of the
    /// workspace to resolve the body type.
    fn extract_routes(
        &self,
        parsed_file: &Rc<ParsedFile>,
        examples: &mut ExampleGenerator<'_>,
    ) -> Vec<RouteDescriptor>;
}

/// Parses `source` and extracts its routes with `extractor`.
///
/// Never fails: a document that cannot be parsed yields no routes.
pub fn extract_document(
    extractor: &dyn RouteExtractor,
    path: &Path,
    source: String,
    examples: &mut ExampleGenerator<'_>,
) -> Vec<RouteDescriptor> {
    match AstParser::parse_source(path, source) {
        Ok(parsed) => extractor.extract_routes(&Rc::new(parsed), examples),
        Err(e) => {
            warn!("Skipping {}: {:#}", path.display(), e);
            Vec::new()
        }
    }
}

/// Everything known about one decorated handler method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// The HTTP method for this route
    pub method: HttpMethod,
    /// Absolute path, controller prefix already merged (e.g. "/users/:id")
    pub path: String,
    /// Where the handler is declared
    pub source_location: SourceLocation,
    /// The handler method's name
    pub handler_name: String,
    /// Distinct path parameter names
    pub path_params: Vec<String>,
    /// Distinct query parameter names; `*` means any key is accepted
    pub query_params: Vec<String>,
    /// Whether a parameter is bound to the request body
    pub has_body: bool,
    /// Type name written on the body parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type_name: Option<String>,
    /// Pretty-printed example payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_example: Option<String>,
}

impl RouteDescriptor {
    /// Create a new RouteDescriptor with minimal required fields
    pub fn new(method: HttpMethod, path: String, handler_name: String, location: SourceLocation) -> Self {
        Self {
            method,
            path,
            source_location: location,
            handler_name,
            path_params: Vec::new(),
            query_params: Vec::new(),
            has_body: false,
            body_type_name: None,
            body_example: None,
        }
    }
}

/// File and 1-based line of a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

/// HTTP methods a handler can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    /// Matches every verb
    All,
}

impl HttpMethod {
    /// Maps a verb decorator name (`Get`, `Post`, ...) to its method.
    pub fn from_decorator(name: &str) -> Option<Self> {
        match name {
            "Get" => Some(HttpMethod::Get),
            "Post" => Some(HttpMethod::Post),
            "Put" => Some(HttpMethod::Put),
            "Patch" => Some(HttpMethod::Patch),
            "Delete" => Some(HttpMethod::Delete),
            "Options" => Some(HttpMethod::Options),
            "Head" => Some(HttpMethod::Head),
            "All" => Some(HttpMethod::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::All => "ALL",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
