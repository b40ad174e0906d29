use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kun_codegen::config::{CodegenConfig, DEFAULT_CONFIG_FILE};
use kun_parser::{NamingConvention, VoidSuccess};

#[derive(Parser, Debug)]
#[command(name = "kun-codegen")]
#[command(about = "Resolve //kun: directives into an HTTP specification")]
struct Args {
    /// Interface description (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Config file (defaults to ./kun.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wire naming convention (snake, camel)
    #[arg(long)]
    naming: Option<String>,

    /// Void methods with an explicit 200 (reject, rewrite)
    #[arg(long)]
    void_success: Option<String>,

    /// Test fixture file
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if args.config.is_some() && !config_path.exists() {
        anyhow::bail!("config file not found: {}", config_path.display());
    }
    let mut config = CodegenConfig::load(&config_path)?;

    if let Some(naming) = &args.naming {
        config.resolve.naming = NamingConvention::parse(naming)
            .ok_or_else(|| anyhow::anyhow!("Unsupported naming convention: {}", naming))?;
    }
    if let Some(policy) = &args.void_success {
        config.resolve.void_success = match policy.as_str() {
            "reject" => VoidSuccess::Reject,
            "rewrite" => VoidSuccess::Rewrite,
            _ => anyhow::bail!("Unsupported void-success policy: {}", policy),
        };
    }
    if args.fixtures.is_some() {
        config.fixtures = args.fixtures;
    }

    kun_codegen::run(&args.input, &args.output, &config)?;
    Ok(())
}
