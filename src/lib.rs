// ABOUTME: Main library module for the days-view rendering layer
// ABOUTME: Exports the view contract, engine adapters, settings and the preview CLI

pub mod cli;
pub mod config;
pub mod engines;
pub mod view;

// Re-export commonly used types
pub use config::Settings;
pub use engines::{HandlebarsView, PlainView, TeraView};
pub use view::{
    create_view, EngineConfig, EngineKind, SetMode, TemplatePaths, Variables, View, ViewError,
};

// Error handling
pub type Result<T> = std::result::Result<T, ViewError>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
