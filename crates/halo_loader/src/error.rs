//! Loader error types

use halo_core::ColorParseError;
use std::io;
use thiserror::Error;

/// Errors that can occur while configuring or driving a loader
#[derive(Error, Debug)]
pub enum LoaderError {
    /// A configuration value is out of range
    #[error("Invalid loader configuration: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed
    #[error("Invalid color: {0}")]
    Color(#[from] ColorParseError),

    /// The configuration file is not valid TOML for a loader
    #[error("Config parsing failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be written as TOML
    #[error("Config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// IO error while reading or writing a configuration file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The requested change is only allowed while the spinner is idle
    #[error("Cannot change {0} while the loader is animating")]
    Busy(&'static str),
}

/// Result type for halo_loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;
