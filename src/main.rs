use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use clove_lib::config::{merge_config, ConfigOverrides, GeneratorConfig};
use clove_lib::fallback::{self, FallbackKind};
use clove_lib::models::write_manifest;
use clove_lib::{parsers, CodeGenerator, Manifest, ManifestSource};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Clove - turn a project description into a set of generated files
#[derive(Parser, Debug)]
#[command(name = "clove")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.clove/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a project from a natural-language prompt
    Generate {
        prompt: String,

        /// Manifest JSON of an earlier result to extend
        #[arg(long)]
        continue_from: Option<PathBuf>,

        /// Earlier prompts of the project being extended (repeatable)
        #[arg(long)]
        history: Vec<String>,

        /// Write files under this directory instead of printing the manifest
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Candidate models, most preferred first
        #[arg(long, value_delimiter = ',')]
        models: Vec<String>,

        /// Generation timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[arg(long)]
        api_base_url: Option<String>,

        /// API key (otherwise GOOGLE_API_KEY or GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Recover a manifest from saved model output (file or stdin)
    Recover { file: Option<PathBuf> },

    /// Print a fallback project for a prompt
    Fallback {
        prompt: String,

        /// Service-unavailable variant instead of the generic one
        #[arg(long)]
        unavailable: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            prompt,
            continue_from,
            history,
            output,
            models,
            timeout,
            api_base_url,
            api_key,
        } => {
            if prompt.trim().is_empty() {
                bail!("Prompt must not be empty");
            }

            let file_config = match &cli.config {
                Some(path) => GeneratorConfig::load_from(path)?,
                None => GeneratorConfig::load()?,
            };
            let overrides = ConfigOverrides {
                models: Some(models),
                timeout_secs: timeout,
                api_base_url,
            };
            let config = merge_config(&file_config, &overrides);

            let generator = CodeGenerator::from_config(&config, api_key.as_deref())?;

            let request = match continue_from {
                Some(path) => {
                    let existing = read_manifest(&path)?;
                    generator
                        .composer()
                        .continuation_request(&existing, &history, &prompt)?
                }
                None => prompt,
            };

            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| anyhow!("Failed to create tokio runtime: {}", e))?;
            let report = rt.block_on(generator.generate_detailed(&request));

            match &report.source {
                ManifestSource::Model { model_id } => {
                    log::info!("Generated {} entries with {}", report.manifest.len(), model_id)
                }
                ManifestSource::GenericFallback { reason } => {
                    log::warn!("Returning a basic project instead: {}", reason)
                }
                ManifestSource::ServiceUnavailableFallback { reason } => {
                    log::warn!("Model service unavailable: {}", reason)
                }
            }
            if let Some(reset) = report.retry_after {
                log::warn!("Quota likely resets around {}", reset.to_rfc3339());
            }

            emit(&report.manifest, output.as_deref())
        }

        Command::Recover { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut raw = String::new();
                    std::io::stdin()
                        .read_to_string(&mut raw)
                        .context("Failed to read stdin")?;
                    raw
                }
            };

            let manifest = parsers::recover(&raw)?;
            emit(&manifest, None)
        }

        Command::Fallback {
            prompt,
            unavailable,
        } => {
            let kind = if unavailable {
                FallbackKind::ServiceUnavailable
            } else {
                FallbackKind::Generic
            };
            emit(&fallback::synthesize(kind, &prompt), None)
        }
    }
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))
}

fn emit(manifest: &Manifest, output: Option<&Path>) -> Result<()> {
    match output {
        Some(dir) => {
            let written = write_manifest(manifest, dir)?;
            println!("Wrote {} files to {}", written.len(), dir.display());
        }
        None => {
            let json = serde_json::to_string_pretty(manifest)
                .map_err(|e| anyhow!("Failed to serialize manifest: {}", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}
