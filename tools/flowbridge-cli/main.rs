use clap::Parser;
use flowbridge::prelude::*;
use itertools::Itertools;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

/// Upgrades legacy flow definitions to the current engine schema
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the legacy flow or application JSON file
    input_path: String,

    /// Write the converted document here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Emit compact JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,

    /// Additional path-addressed resolver scope, e.g. `trigger` for `$trigger.body`
    #[arg(long = "scope", value_name = "NAME")]
    scopes: Vec<String>,

    /// Additional name-addressed resolver scope, e.g. `secret` for `$secret[key]`
    #[arg(long = "named-scope", value_name = "NAME")]
    named_scopes: Vec<String>,

    /// Additional activity upgrade, written as LEGACY_REF=CURRENT_REF
    #[arg(long = "upgrade", value_name = "LEGACY=CURRENT", value_parser = parse_upgrade)]
    upgrades: Vec<(String, String)>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let total_start = Instant::now();

    let legacy_json = fs::read_to_string(&cli.input_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read legacy file '{}': {}",
            &cli.input_path, e
        ))
    });
    let flows = load_legacy_flows(&legacy_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load legacy document: {}", e)));

    let converter = build_converter(&cli);

    let mut converted = Vec::with_capacity(flows.len());
    for flow in &flows {
        let label = flow
            .resource_id
            .clone()
            .unwrap_or_else(|| flow.definition.name.clone());
        let definition = converter
            .convert(&flow.definition)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert '{}': {}", label, e)));
        converted.push((flow.resource_id.clone(), definition));
    }

    let document = match converted.as_slice() {
        [(None, definition)] => serde_json::to_value(definition),
        _ => converted
            .iter()
            .map(|(id, definition)| {
                serde_json::to_value(definition).map(|data| json!({ "id": id, "data": data }))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|resources| json!({ "resources": resources })),
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize result: {}", e)));

    let rendered = if cli.compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize result: {}", e)));

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not write to file '{}': {}", path, e))
            });
            eprintln!(
                "Converted {} flow(s) [{}] to '{}' in {:?}",
                converted.len(),
                converted.iter().map(|(_, d)| d.name.as_str()).join(", "),
                path,
                total_start.elapsed()
            );
        }
        None => println!("{}", rendered),
    }
}

fn build_converter(cli: &Cli) -> FlowConverter {
    let mut resolver = ScopedResolver::builder();
    for scope in &cli.scopes {
        resolver = resolver.with_scope(scope, ScopeKind::Path);
    }
    for scope in &cli.named_scopes {
        resolver = resolver.with_scope(scope, ScopeKind::Named);
    }

    let mut builder = FlowConverter::builder(Arc::new(resolver.build()));
    for (legacy_ref, current_ref) in &cli.upgrades {
        builder = builder.with_upgrade(legacy_ref, current_ref);
    }
    builder.build()
}

fn parse_upgrade(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((legacy, current)) if !legacy.trim().is_empty() && !current.trim().is_empty() => {
            Ok((legacy.trim().to_string(), current.trim().to_string()))
        }
        _ => Err(format!("expected LEGACY_REF=CURRENT_REF, got '{}'", raw)),
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
