//! Request From Source - HTTP requests and example payloads from decorated TypeScript controllers.
//!
//! This library statically analyzes TypeScript projects that declare HTTP controllers with
//! decorators (`@Controller`, `@Get`, `@Post`, `@Body`, ...). For every handler it produces a
//! route descriptor with the fully composed path and parameter bindings, and a representative
//! JSON body synthesized from the declared type of the body parameter.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`scanner`] - Recursively scans project directories for TypeScript files
//! 2. [`parser`] - Parses TypeScript sources into tree-sitter syntax trees
//! 3. [`syntax`] - Shared helpers for decorators, literals and tree walking
//! 4. [`workspace`] - Read-only file access used for cross-file lookups
//! 5. [`extractor`] - Extracts route descriptors from decorated controller classes
//! 6. [`type_resolver`] - Locates the declaration behind a type name
//! 7. [`example_generator`] - Expands declarations into example JSON values
//! 8. [`heuristics`] - Name-based fallback values
//! 9. [`detector`] - Detects the application-wide global prefix
//! 10. [`request_builder`] - Turns routes into request templates
//! 11. [`serializer`] - Serializes results to JSON, YAML or request files
//!
//! # Example Usage
//!
//! ```no_run
//! use request_from_source::{
//!     detector::GlobalPrefixDetector,
//!     example_generator::ExampleGenerator,
//!     extractor::{RouteExtractor, nest::NestExtractor},
//!     parser::AstParser,
//!     request_builder::{ExportConfig, RequestBuilder},
//!     scanner::FileScanner,
//!     type_resolver::TypeLocator,
//!     workspace::FsWorkspace,
//! };
//! use std::path::PathBuf;
//! use std::rc::Rc;
//!
//! let root = PathBuf::from("./my-nest-app");
//! let scan_result = FileScanner::new(root.clone()).scan().unwrap();
//!
//! let workspace = FsWorkspace::new(root);
//! let mut examples = ExampleGenerator::new(TypeLocator::new(&workspace));
//!
//! let mut routes = Vec::new();
//! for parsed in AstParser::parse_files(&scan_result.route_candidates()).into_iter().flatten() {
//!     routes.extend(NestExtractor.extract_routes(&Rc::new(parsed), &mut examples));
//! }
//!
//! let builder = RequestBuilder::new(ExportConfig::default())
//!     .with_detected_prefix(GlobalPrefixDetector::detect(&workspace));
//! println!("{}", builder.render(&routes));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod scanner;
pub mod parser;
pub mod syntax;
pub mod workspace;
pub mod detector;
pub mod extractor;
pub mod type_resolver;
pub mod example_generator;
pub mod heuristics;
pub mod request_builder;
pub mod serializer;
pub mod error;
