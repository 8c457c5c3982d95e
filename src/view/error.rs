// ABOUTME: Error types for the view layer and its engine adapters
// ABOUTME: Defines the uniform not-found error plus pass-through wrappers for engine failures

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Template file '{template}' not found (looked in {})", .path.display())]
    TemplateNotFound { template: String, path: PathBuf },

    #[error("Engine configuration error for {}: {message}", .path.display())]
    EngineConfiguration { path: PathBuf, message: String },

    #[error("Variable name must not be empty")]
    EmptyVariableName,

    #[error("Template syntax error in '{template}': {message}")]
    TemplateSyntax { template: String, message: String },

    #[error("Unknown template engine: {0}")]
    UnknownEngine(String),

    #[error("Handlebars render error: {0}")]
    HandlebarsRender(#[from] handlebars::RenderError),

    #[error("Handlebars template error: {0}")]
    HandlebarsTemplate(#[from] handlebars::TemplateError),

    #[error("Tera error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Settings error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ViewError {
    /// Wrap a filesystem failure on a compile or cache location
    pub fn engine_configuration(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ViewError::EngineConfiguration {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;
