use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use hintschema_core::config::{self, CONFIG_FILE_NAME, HintSchemaConfig};
use hintschema_core::manifest::{self, Manifest};

#[derive(Parser)]
#[command(
    name = "hintschema",
    about = "JSON Schema generator for type descriptors",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a manifest of descriptors and signatures into JSON Schemas
    Resolve {
        /// Path to the manifest file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Allow types with no strict JSON counterpart (uuid, dates, enums, records)
        #[arg(long)]
        lenient: bool,

        /// Prefix marking private parameters and record fields
        #[arg(long)]
        private_prefix: Option<String>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Check that every entry of a manifest resolves
    Check {
        /// Path to the manifest file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new hintschema configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            input,
            lenient,
            private_prefix,
            format,
        } => cmd_resolve(input, lenient, private_prefix, format),

        Commands::Check { input } => cmd_check(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "hintschema", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<HintSchemaConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    debug!("parsing {} as {ext}", path.display());

    let parsed = match ext {
        "json" => manifest::from_json(&content),
        _ => manifest::from_yaml(&content),
    };
    parsed.with_context(|| format!("invalid manifest {}", path.display()))
}

fn cmd_resolve(
    input: PathBuf,
    lenient: bool,
    private_prefix: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if lenient {
        cfg.resolver.strict = false;
    }
    if let Some(prefix) = private_prefix {
        cfg.resolver.private_arg_prefix = prefix;
    }

    let manifest = load_manifest(&input)?;
    let output = manifest::generate(&manifest, &cfg.resolver_options())
        .with_context(|| format!("failed to resolve {}", input.display()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&output)?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

fn cmd_check(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let manifest = load_manifest(&input)?;

    eprintln!("Manifest: {}", input.display());
    eprintln!("  Names: {}", manifest.names.len());
    eprintln!("  Types: {}", manifest.types.len());
    eprintln!("  Functions: {}", manifest.functions.len());
    eprintln!("  Classes: {}", manifest.classes.len());

    manifest::generate(&manifest, &cfg.resolver_options())
        .with_context(|| format!("failed to resolve {}", input.display()))?;

    let mode = if cfg.resolver.strict { "strict" } else { "lenient" };
    eprintln!("All entries resolve in {mode} mode.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
