//! Headless language preference editor.
//!
//! Drives the same editor as the settings window, one command at a time.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use langprefs::application::LanguagePreferenceEditor;
use langprefs::config::AppConfig;
use langprefs::domain::language::LanguageCode;
use langprefs::domain::ports::SettingsStore;
use langprefs::domain::preferences::PreferenceScope;
use langprefs::infrastructure::FileSettingsStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Language preference editor", long_about = None)]
struct Cli {
    /// Settings file (overrides LANGPREFS_SETTINGS_PATH)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print both preference lists
    Show,
    /// Print the selectable languages in display order
    Catalog,
    /// Check and uncheck languages for one scope, then save
    Edit {
        /// series or episode
        #[arg(short, long)]
        scope: PreferenceScope,

        /// Codes to check, appended in the order given
        #[arg(short, long, num_args = 1..)]
        add: Vec<String>,

        /// Codes to uncheck
        #[arg(short, long, num_args = 1..)]
        remove: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if cli.settings.is_some() {
        config.settings_path = cli.settings;
    }
    let catalog = config.load_catalog()?;

    match cli.command {
        Commands::Catalog => {
            for entry in catalog.iter() {
                println!("{:<10} {}", entry.code, entry.label);
            }
        }
        Commands::Show => {
            let store = FileSettingsStore::new(config.resolve_settings_path()?);
            let settings = store.load().await?;
            for scope in PreferenceScope::ALL {
                println!("{:<8} {}", scope, settings.preference(scope));
            }
        }
        Commands::Edit { scope, add, remove } => {
            for code in add.iter().chain(remove.iter()) {
                if !catalog.contains(&LanguageCode::from(code.as_str())) {
                    bail!("'{}' is not in the language catalog", code);
                }
            }

            let store = Arc::new(FileSettingsStore::new(config.resolve_settings_path()?));
            store.load().await?;

            let mut editor = LanguagePreferenceEditor::new(
                Arc::clone(&store) as Arc<dyn SettingsStore>,
                Handle::current(),
                || info!("Language editor closed"),
            );
            editor.open(scope);

            for code in &remove {
                editor.toggle(&LanguageCode::from(code.as_str()), false);
            }
            for code in &add {
                editor.toggle(&LanguageCode::from(code.as_str()), true);
            }

            editor.save()?;
            editor
                .settle()
                .await
                .context("Save was not issued")??;

            let saved = store.snapshot().context("Settings missing after save")?;
            println!("{:<8} {}", scope, saved.preference(scope));
        }
    }

    Ok(())
}
