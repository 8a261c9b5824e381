use crate::error::Error;
use crate::request_builder::ExportConfig;
use crate::type_resolver::DEFAULT_MAX_WORKSPACE_FILES;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Request From Source - Generate ready-to-send HTTP requests from decorated TypeScript controllers
#[derive(Parser, Debug)]
#[command(name = "request-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the TypeScript project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (http, json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "http")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Base URL used in request lines
    #[arg(long = "base-url", value_name = "URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Header line added to every request (repeatable)
    #[arg(
        short = 'H',
        long = "header",
        value_name = "HEADER",
        default_value = "Content-Type: application/json"
    )]
    pub headers: Vec<String>,

    /// Global prefix to use instead of the detected one (empty string disables it)
    #[arg(long = "global-prefix", value_name = "PREFIX")]
    pub global_prefix: Option<String>,

    /// Maximum number of files read when searching the workspace for a type
    #[arg(long = "max-workspace-files", value_name = "N", default_value_t = DEFAULT_MAX_WORKSPACE_FILES)]
    pub max_workspace_files: usize,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain-text request blocks
    Http,
    /// JSON route report
    Json,
    /// YAML route report
    Yaml,
}

impl CliArgs {
    /// Export settings carried by the arguments
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            base_url: self.base_url.clone(),
            headers: self.headers.clone(),
            global_prefix_override: self.global_prefix.clone(),
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    // Validate project path exists
    if !args.project_path.exists() {
        return Err(Error::InvalidArgument(format!(
            "Project path does not exist: {}",
            args.project_path.display()
        ))
        .into());
    }

    // Validate project path is a directory
    if !args.project_path.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "Project path is not a directory: {}",
            args.project_path.display()
        ))
        .into());
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref prefix) = args.global_prefix {
        info!("Global prefix override: '{}'", prefix);
    } else {
        info!("Global prefix: auto-detect");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::detector::GlobalPrefixDetector;
    use crate::example_generator::ExampleGenerator;
    use crate::extractor::nest::NestExtractor;
    use crate::extractor::{RouteDescriptor, RouteExtractor};
    use crate::parser::AstParser;
    use crate::request_builder::RequestBuilder;
    use crate::scanner::FileScanner;
    use crate::serializer::{serialize_http, serialize_json, serialize_yaml, write_to_file, RouteReport};
    use crate::type_resolver::{LocatorOptions, TypeLocator};
    use crate::workspace::FsWorkspace;
    use std::rc::Rc;

    info!("Starting request generation...");

    // Step 1: Scan directory for TypeScript files
    info!("Scanning project directory...");
    let scanner = FileScanner::new(args.project_path.clone());
    let scan_result = scanner.scan()?;

    info!("Found {} TypeScript files", scan_result.source_files.len());
    for warning in &scan_result.warnings {
        log::warn!("{}", warning);
    }

    if scan_result.source_files.is_empty() {
        anyhow::bail!("No TypeScript files found in the project directory");
    }

    // Step 2: Parse route candidates
    let candidates = scan_result.route_candidates();
    info!("Parsing {} candidate files...", candidates.len());
    let parsed_files: Vec<Rc<_>> = AstParser::parse_files(&candidates)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(Rc::new(parsed)),
            Err(e) => {
                debug!("Skipping file due to parse error: {:#}", e);
                None
            }
        })
        .collect();
    info!("Successfully parsed {} files", parsed_files.len());

    // Step 3: Extract routes, resolving body types across the workspace
    info!("Extracting routes...");
    let workspace = FsWorkspace::new(args.project_path.clone());
    let locator = TypeLocator::with_options(
        &workspace,
        LocatorOptions {
            max_workspace_files: args.max_workspace_files,
        },
    );
    let mut examples = ExampleGenerator::new(locator);
    let extractor = NestExtractor;

    let mut all_routes: Vec<RouteDescriptor> = Vec::new();
    for parsed in &parsed_files {
        let routes = extractor.extract_routes(parsed, &mut examples);
        debug!("{}: {} routes", parsed.path.display(), routes.len());
        all_routes.extend(routes);
    }

    info!("Extracted {} total routes", all_routes.len());
    if all_routes.is_empty() {
        log::warn!("No routes found in the project");
    }

    // Step 4: Global prefix
    let detected = if args.global_prefix.is_none() {
        info!("Detecting global prefix...");
        GlobalPrefixDetector::detect(&workspace)
    } else {
        None
    };
    let builder = RequestBuilder::new(args.export_config()).with_detected_prefix(detected);

    // Step 5: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Http => serialize_http(&all_routes, &builder),
        OutputFormat::Json | OutputFormat::Yaml => {
            let report = RouteReport {
                global_prefix: builder.effective_prefix().cloned(),
                routes: all_routes.clone(),
            };
            if args.output_format == OutputFormat::Json {
                serialize_json(&report)?
            } else {
                serialize_yaml(&report)?
            }
        }
    };

    // Step 6: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote requests to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    // Step 7: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", scan_result.source_files.len());
    info!("  - Files parsed: {}", parsed_files.len());
    info!("  - Routes found: {}", all_routes.len());
    info!(
        "  - Routes with body: {}",
        all_routes.iter().filter(|r| r.has_body).count()
    );

    Ok(())
}
