//! webmime - manage the content types a Web UI reports for static assets.

mod output;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use webmime_core::{Entry, OverrideStore, StagingError, StagingModel, StoreConfig};

/// Exit code when a lookup finds no override.
const EXIT_NOT_FOUND: u8 = 1;
/// Exit code when an edit is rejected.
const EXIT_INVALID: u8 = 2;

#[derive(Parser)]
#[command(name = "webmime", version, about = "Manage Web UI content-type overrides")]
struct Cli {
    /// Directory holding webui_mime_types.json [default: platform config dir]
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all overrides
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Add an override
    Add {
        extension: String,
        content_type: String,
    },

    /// Change an existing override's extension and content type
    Update {
        extension: String,
        new_extension: String,
        content_type: String,
    },

    /// Remove overrides by extension
    Remove {
        #[arg(required = true)]
        extensions: Vec<String>,
    },

    /// Print the override for an extension or an existing file
    Lookup {
        #[arg(required_unless_present = "path", conflicts_with = "path")]
        extension: Option<String>,

        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// A rejected edit, reported with [`EXIT_INVALID`].
#[derive(Debug)]
struct Rejected(String);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Rejected {}

impl From<StagingError> for Rejected {
    fn from(err: StagingError) -> Self {
        Rejected(err.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            if err.downcast_ref::<Rejected>().is_some() {
                ExitCode::from(EXIT_INVALID)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn store_config(config_dir: Option<PathBuf>) -> Result<StoreConfig> {
    match config_dir {
        Some(dir) => Ok(StoreConfig::new(dir)),
        None => StoreConfig::from_platform_dirs()
            .context("no platform configuration directory; pass --config-dir"),
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = store_config(cli.config_dir)?;
    tracing::debug!(path = %config.path().display(), "using overrides document");
    let mut store = OverrideStore::open(config);

    match cli.command {
        Command::List { format } => {
            let model = StagingModel::new(&store);
            let rendered = match format {
                OutputFormat::Text => output::render_table(&model),
                OutputFormat::Json => output::render_json(&model)?,
            };
            print!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }

        Command::Add {
            extension,
            content_type,
        } => {
            let mut model = StagingModel::new(&store);
            model
                .add_entry(&Entry::new(extension, content_type))
                .map_err(Rejected::from)?;
            model.apply(&mut store);
            Ok(ExitCode::SUCCESS)
        }

        Command::Update {
            extension,
            new_extension,
            content_type,
        } => {
            let mut model = StagingModel::new(&store);
            let row = find_row(&model, &extension)?;
            model
                .update_entry(row, &Entry::new(new_extension, content_type))
                .map_err(Rejected::from)?;
            model.apply(&mut store);
            Ok(ExitCode::SUCCESS)
        }

        Command::Remove { extensions } => {
            let mut model = StagingModel::new(&store);
            for extension in &extensions {
                let row = find_row(&model, extension)?;
                model.remove_rows(row, 1).map_err(Rejected::from)?;
            }
            model.apply(&mut store);
            Ok(ExitCode::SUCCESS)
        }

        Command::Lookup { extension, path } => {
            let found = match (extension, path) {
                (_, Some(path)) => store.lookup_by_path(&path),
                (Some(extension), None) => store.lookup_by_extension(&extension),
                (None, None) => bail!("either an extension or --path is required"),
            };
            match found {
                Some(entry) => {
                    println!("{}", entry.content_type);
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::from(EXIT_NOT_FOUND)),
            }
        }
    }
}

fn find_row(model: &StagingModel, extension: &str) -> Result<usize, Rejected> {
    model
        .find_row(extension)
        .ok_or_else(|| Rejected(format!("no override for extension '{extension}'")))
}
