use langprefs::config::AppConfig;
use langprefs::domain::ports::SettingsStore;
use langprefs::infrastructure::FileSettingsStore;
use langprefs::infrastructure::i18n::I18nService;
use langprefs::interfaces::ui::PreferencesApp;
use std::sync::Arc;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Create Log Channel
    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    // 2. Setup Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false) // No color codes for UI text
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    let config = AppConfig::from_env();
    let catalog = config.load_catalog()?;
    let mut i18n = I18nService::from_dir(&config.translations_dir);
    if !i18n.set_language(&config.ui_language) {
        tracing::warn!(
            "Interface language '{}' not available, using '{}'",
            config.ui_language,
            i18n.current_language_code()
        );
    }

    let settings_path = config.resolve_settings_path()?;
    info!("Using settings file {:?}", settings_path);
    let store = Arc::new(FileSettingsStore::new(settings_path));

    // 3. Create Tokio Runtime in a background thread
    let (handle_tx, handle_rx) = crossbeam_channel::bounded(1);
    let loader = Arc::clone(&store);

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to build Tokio runtime: {}", e);
                return;
            }
        };

        let _ = handle_tx.send(rt.handle().clone());

        rt.block_on(async move {
            info!("Background Runtime Started.");

            // Settings stay unloaded on failure so a corrupt file is never overwritten
            if let Err(e) = loader.load().await {
                tracing::error!("Failed to load settings: {:#}", e);
            }

            // Keep the runtime alive for save tasks
            std::future::pending::<()>().await;
        });
    });

    let runtime = handle_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Background runtime failed to start"))?;

    // 4. Run UI (Blocks Main Thread)
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_title("Language Preferences"),
        ..Default::default()
    };

    eframe::run_native(
        "Language Preferences",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(PreferencesApp::new(
                &cc.egui_ctx,
                store as Arc<dyn SettingsStore>,
                runtime,
                catalog,
                i18n,
                log_rx,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
