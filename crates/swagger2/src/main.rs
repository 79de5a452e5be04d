//! swagger2 command-line front end.
//!
//! Checks Swagger 2.0 documents and validates single requests or responses
//! against them.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

use swagger2_compiler::{compile_spec_file, Compiled};
use swagger2_spec::{check_document, load_document_file, validate_document, Method};
use swagger2_telemetry::{LogFormat, Telemetry, TelemetryConfig};
use swagger2_validator::{request, response, ProblemDetails, RequestParts};

#[derive(Parser, Debug)]
#[command(name = "swagger2", about = "Swagger 2.0 routing and validation", version)]
struct Cli {
    /// Log level (RUST_LOG takes precedence).
    #[arg(long, global = true, env = "SWAGGER2_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log format (json or pretty).
    #[arg(long, global = true, env = "SWAGGER2_LOG_FORMAT", default_value = "json")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check Swagger 2.0 document(s) for structural errors.
    ///
    /// Loads each document, checks its structure (E1001-E1004) and resolves
    /// every local $ref.
    Validate {
        /// Input document file(s) (YAML or JSON).
        #[arg(short, long, required = true, num_args = 1..)]
        spec: Vec<String>,

        /// Output format (text or json).
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a single request against a document.
    Request(RequestArgs),

    /// Validate a single response body against a document.
    Response(ResponseArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Validate { .. } => "validate",
            Commands::Request(_) => "request",
            Commands::Response(_) => "response",
        }
    }
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Document file (YAML or JSON).
    #[arg(short, long)]
    spec: String,

    /// HTTP method.
    #[arg(short, long)]
    method: String,

    /// Request path, including the base path.
    #[arg(short, long)]
    path: String,

    /// Query parameter as key=value. Repeated keys become an array.
    #[arg(long = "query", value_parser = parse_key_val)]
    query: Vec<(String, String)>,

    /// Request header as name=value.
    #[arg(long = "header", value_parser = parse_key_val)]
    header: Vec<(String, String)>,

    /// Explicit path parameter as name=value. Replaces the values captured
    /// from the path.
    #[arg(long = "path-param", value_parser = parse_key_val)]
    path_param: Vec<(String, String)>,

    /// Request body as JSON. Text that is not JSON is sent as a string.
    #[arg(long)]
    body: Option<String>,

    /// Include every violation in the problem details.
    #[arg(long)]
    dev: bool,
}

#[derive(Args, Debug)]
struct ResponseArgs {
    /// Document file (YAML or JSON).
    #[arg(short, long)]
    spec: String,

    /// HTTP method of the originating request.
    #[arg(short, long)]
    method: String,

    /// Request path, including the base path.
    #[arg(short, long)]
    path: String,

    /// Response status code.
    #[arg(long)]
    status: u16,

    /// Response body as JSON. Text that is not JSON is checked as a string.
    #[arg(long)]
    body: Option<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Result for a single document file.
#[derive(serde::Serialize)]
struct CheckResult {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    routes: Option<usize>,
    errors: Vec<CheckIssue>,
}

#[derive(serde::Serialize)]
struct CheckIssue {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl CheckIssue {
    fn new(code: &str, message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            location,
        }
    }
}

fn check_file(spec_path: &str) -> CheckResult {
    let path = Path::new(spec_path);
    let mut result = CheckResult {
        file: spec_path.to_string(),
        valid: false,
        routes: None,
        errors: Vec::new(),
    };

    if !path.exists() {
        result
            .errors
            .push(CheckIssue::new("E1000", format!("file not found: {}", spec_path), None));
        return result;
    }

    let root = match load_document_file(path) {
        Ok(root) => root,
        Err(e) => {
            result.errors.push(CheckIssue::new(e.code(), e.to_string(), None));
            return result;
        }
    };

    let issues = check_document(&root);
    if !issues.is_empty() {
        result.errors = issues
            .into_iter()
            .map(|issue| {
                let location = (!issue.location.is_empty()).then(|| issue.location.clone());
                CheckIssue::new(issue.code, issue.message, location)
            })
            .collect();
        return result;
    }

    match validate_document(&root) {
        Ok(document) => {
            let compiled = swagger2_compiler::compile(&document);
            result.routes = Some(compiled.routes().len());
            result.valid = true;
        }
        Err(e) => result.errors.push(CheckIssue::new(e.code(), e.to_string(), None)),
    }
    result
}

/// Run the validate command.
fn run_validate(specs: &[String], output_format: &str) -> ExitCode {
    let results: Vec<CheckResult> = specs.iter().map(|s| check_file(s)).collect();
    let has_errors = results.iter().any(|r| !r.valid);

    if output_format == "json" {
        let output = serde_json::json!({
            "results": results,
            "summary": {
                "total": results.len(),
                "valid": results.iter().filter(|r| r.valid).count(),
                "invalid": results.iter().filter(|r| !r.valid).count(),
            }
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize results: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        for result in &results {
            match result.routes {
                Some(routes) if result.valid => {
                    eprintln!("✓ {} is valid ({} route(s))", result.file, routes)
                }
                _ => eprintln!("✗ {} has {} error(s)", result.file, result.errors.len()),
            }

            for err in &result.errors {
                if let Some(loc) = &err.location {
                    eprintln!("  {} [{}]: {}", err.code, loc, err.message);
                } else {
                    eprintln!("  {}: {}", err.code, err.message);
                }
            }
        }

        let valid_count = results.iter().filter(|r| r.valid).count();
        let total = results.len();
        eprintln!();
        eprintln!(
            "validated {} document(s): {} valid, {} invalid",
            total,
            valid_count,
            total - valid_count
        );
    }

    if has_errors {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn load_compiled(spec: &str) -> anyhow::Result<Compiled> {
    compile_spec_file(Path::new(spec)).with_context(|| format!("failed to load {}", spec))
}

fn parse_body(raw: Option<&str>) -> Option<Value> {
    raw.map(|raw| serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Build the query object. A key given more than once collects its values
/// into an array.
fn query_object(pairs: &[(String, String)]) -> Value {
    let mut query = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value.clone());
        match query.get_mut(key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                query.insert(key.clone(), value);
            }
        }
    }
    Value::Object(query)
}

fn string_object(pairs: &[(String, String)]) -> Value {
    Value::Object(
        pairs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

/// Run the request command.
fn run_request(args: &RequestArgs) -> anyhow::Result<ExitCode> {
    let compiled = load_compiled(&args.spec)?;

    let Some(path) = compiled.lookup(&args.path) else {
        println!("{}", ProblemDetails::not_found(&args.path).to_json());
        return Ok(ExitCode::from(1));
    };

    let declared = Method::parse(&args.method).and_then(|m| path.operation(m));
    if declared.is_none() {
        let problem = ProblemDetails::method_not_allowed(&args.method).with_instance(&args.path);
        println!("{}", problem.to_json());
        return Ok(ExitCode::from(1));
    }

    let query = query_object(&args.query);
    let headers = string_object(&args.header);
    let path_parameters = string_object(&args.path_param);
    let body = parse_body(args.body.as_deref());

    let mut parts = RequestParts::new().with_query(&query).with_headers(&headers);
    if !args.path_param.is_empty() {
        parts = parts.with_path_parameters(&path_parameters);
    }
    if let Some(body) = &body {
        parts = parts.with_body(body);
    }

    let outcome = request(Some(&path), &args.method, parts);
    tracing::debug!(
        method = %args.method,
        path = %args.path,
        template = path.name(),
        violations = outcome.as_ref().map_or(0, Vec::len),
        "request checked"
    );

    match outcome {
        Some(errors) if errors.is_empty() => {
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Some(errors) => {
            let problem = ProblemDetails::validation_error(&errors, args.dev).with_instance(&args.path);
            println!("{}", problem.to_json());
            Ok(ExitCode::from(1))
        }
        None => anyhow::bail!("no operation for {} {}", args.method, args.path),
    }
}

/// Run the response command.
fn run_response(args: &ResponseArgs) -> anyhow::Result<ExitCode> {
    let compiled = load_compiled(&args.spec)?;
    let path = compiled.lookup(&args.path);
    let body = parse_body(args.body.as_deref());

    match response(path.as_ref(), &args.method, args.status, body.as_ref()) {
        None => {
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Some(error) => {
            println!("{}", error.to_json());
            Ok(ExitCode::from(1))
        }
    }
}

fn init_telemetry(cli: &Cli) -> Option<Telemetry> {
    let format = LogFormat::parse(&cli.log_format).unwrap_or_else(|| {
        eprintln!("warning: unknown log format '{}', using json", cli.log_format);
        LogFormat::Json
    });
    let config = TelemetryConfig::new()
        .with_log_level(cli.log_level.as_str())
        .with_log_format(format);
    match Telemetry::init(config) {
        Ok(telemetry) => Some(telemetry),
        Err(e) => {
            eprintln!("warning: {}", e);
            None
        }
    }
}

fn report(result: anyhow::Result<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|e| {
        eprintln!("error: {:#}", e);
        ExitCode::from(2)
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(telemetry) = init_telemetry(&cli) {
        tracing::debug!(
            service = %telemetry.config().service_name,
            command = cli.command.name(),
            "command started"
        );
    }

    match &cli.command {
        Commands::Validate { spec, format } => run_validate(spec, format),
        Commands::Request(args) => report(run_request(args)),
        Commands::Response(args) => report(run_response(args)),
    }
}
