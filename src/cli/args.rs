// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the preview CLI structure and its render and paths subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::view::DEFAULT_DELIMITER;

#[derive(Parser)]
#[command(name = "days-view")]
#[command(about = "Render application views through interchangeable template engines")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Path to settings file (default: <app-root>/config.yaml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(
        short = 'r',
        long,
        global = true,
        default_value = ".",
        help = "Application root containing View/ and system/"
    )]
    pub app_root: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template from the View/ directory
    Render {
        #[arg(help = "Template name relative to View/")]
        template: String,

        #[arg(short, long, help = "Template engine (plain, handlebars, tera)")]
        engine: Option<String>,

        #[arg(short = 'V', long = "var", help = "Set a variable (key=value)")]
        vars: Vec<String>,

        #[arg(
            short = 'm',
            long = "merge",
            help = "Merge a value into a variable (key=value), applied after --var"
        )]
        merges: Vec<String>,

        #[arg(short, long, default_value = DEFAULT_DELIMITER, help = "Delimiter for --merge")]
        delimiter: String,

        #[arg(short, long, help = "Write output to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Show the resolved view, compile and cache locations
    Paths,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format, keeping their order
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<Vec<(String, String)>> {
        vars.iter()
            .map(|var| match var.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
                _ => Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                )),
            })
            .collect()
    }

    /// Settings file to load: `--config`, else `<app-root>/config.yaml`
    pub fn settings_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.app_root.join("config.yaml"))
    }
}
