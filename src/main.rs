use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use sdkgen::GenError;
use sdkgen::schema::ApiSchema;

#[derive(Parser)]
#[command(
    name = "sdkgen",
    version,
    about = "Generate Java client bindings from an API schema"
)]
struct Cli {
    /// Path to the JSON schema document.
    #[arg(long)]
    schema: PathBuf,

    /// Directory the generated sources are written to.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sdkgen: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), GenError> {
    let raw = fs::read_to_string(&cli.schema).map_err(|source| GenError::Read {
        path: cli.schema.clone(),
        source,
    })?;
    let schema = ApiSchema::from_json(&raw)?;
    sdkgen::generate(&schema, &cli.out)
}

fn init_tracing() {
    // SDKGEN_LOG controls log level: "trace", "debug", "info", "warn",
    // "error", or a full tracing filter spec like "sdkgen=debug".
    let filter = match std::env::var("SDKGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("sdkgen={level}"),
        Ok(spec) => spec,
        Err(_) => "sdkgen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
