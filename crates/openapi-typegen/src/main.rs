//! CLI for `openapi-typegen`.
//!
//! # Subcommands
//!
//! ```text
//! # Write one .ts file per generated module
//! openapi-typegen generate --input openapi.yaml --output src/api
//!
//! # Same, configured from a file with CLI overrides
//! openapi-typegen generate -i openapi.json -o src/api \
//!   --config typegen.yaml --prefix petstore --use-enums
//!
//! # Run generation without writing anything
//! openapi-typegen check --input openapi.yaml
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=openapi_typegen=debug` for
//! per-operation detail.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use openapi_typegen::{Config, Emit, FilenameCase, GeneratedFile};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Compile OpenAPI 3.0 documents into TypeScript types and react-query wrappers.
#[derive(Parser)]
#[command(name = "openapi-typegen", version, about)]
enum Cli {
    /// Generate TypeScript files into an output directory.
    Generate(GenerateArgs),

    /// Run generation and report what would be written.
    Check(CommonArgs),
}

#[derive(Parser)]
struct CommonArgs {
    /// Path to the OpenAPI document (`.json`, otherwise YAML).
    #[arg(short, long)]
    input: PathBuf,

    /// Path to a config YAML file. CLI flags override values from it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File name and symbol prefix.
    #[arg(long)]
    prefix: Option<String>,

    /// File name casing: camel, snake, kebab or pascal.
    #[arg(long)]
    case: Option<FilenameCase>,

    /// Emit schema enums as `export enum` declarations.
    #[arg(long)]
    use_enums: bool,

    /// Also write starter fetcher and context modules.
    #[arg(long)]
    emit_fetcher: bool,

    /// Header supplied by the fetcher (repeatable or comma-separated).
    #[arg(long = "injected-header", value_delimiter = ',')]
    injected_headers: Vec<String>,
}

#[derive(Parser)]
struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory the `.ts` files are written to (created if missing).
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli {
        Cli::Generate(args) => run_generate(&args),
        Cli::Check(args) => run_check(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// Load config (if provided), then apply CLI overrides.
fn load_config(args: &CommonArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            eprintln!("Loading config: {}", path.display());
            Config::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(prefix) = &args.prefix {
        config = config.filename_prefix(prefix);
    }
    if let Some(case) = args.case {
        config = config.filename_case(case);
    }
    if args.use_enums {
        config = config.use_enums(true);
    }
    if args.emit_fetcher {
        config = config.emit_fetcher(true);
    }
    if !args.injected_headers.is_empty() {
        let refs: Vec<&str> = args.injected_headers.iter().map(String::as_str).collect();
        config = config.injected_headers(&refs);
    }
    Ok(config)
}

fn run(args: &CommonArgs) -> anyhow::Result<Vec<GeneratedFile>> {
    let config = load_config(args)?;
    let document = openapi_typegen::load_document(&args.input)
        .with_context(|| format!("Failed to read document: {}", args.input.display()))?;
    eprintln!(
        "Loaded {} v{} ({} paths, {} schemas)",
        document.info.title,
        document.info.version,
        document.paths.len(),
        document.components.schemas.len(),
    );
    openapi_typegen::generate(&document, &config).context("Failed to generate TypeScript")
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let files = run(&args.common)?;

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output dir: {}", args.output.display()))?;
    for file in &files {
        let path = output_path(&args.output, file);
        fs::write(&path, file.emit())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_check(args: &CommonArgs) -> anyhow::Result<()> {
    let files = run(args)?;
    for file in &files {
        eprintln!(
            "{}.ts: {} declarations, {} imports",
            file.filename,
            file.declarations.len(),
            file.imports.len(),
        );
    }
    eprintln!("OK: {} files", files.len());
    Ok(())
}

fn output_path(dir: &Path, file: &GeneratedFile) -> PathBuf {
    dir.join(format!("{}.ts", file.filename))
}
