// ABOUTME: Main application orchestration for the days-view CLI
// ABOUTME: Coordinates between CLI arguments, settings, logging and command execution

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands::{self, RenderOptions};
use super::{Args, Commands};
use crate::config::Settings;

pub struct App {
    settings: Settings,
    app_root: PathBuf,
}

impl App {
    /// Create a new application instance
    pub fn new(settings: Settings, app_root: PathBuf) -> Self {
        Self { settings, app_root }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Initialize logging based on settings
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let logging = self.settings.logging()?;
        let log_level = if verbose { "debug" } else { logging.level.as_str() };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting days-view v{}", env!("CARGO_PKG_VERSION"));
        debug!("Application root: {}", self.app_root.display());

        match args.command {
            Commands::Render {
                template,
                engine,
                vars,
                merges,
                delimiter,
                output,
            } => commands::render_template(
                &self.app_root,
                &self.settings,
                RenderOptions {
                    template,
                    engine,
                    vars,
                    merges,
                    delimiter,
                    output,
                },
            ),

            Commands::Paths => commands::show_paths(&self.app_root, &self.settings),
        }
    }

    /// Load settings for the parsed arguments, applying environment overrides
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut settings = Settings::load(&args.settings_path())?;
        settings.merge_env()?;
        Ok(Self::new(settings, args.app_root.clone()))
    }
}
