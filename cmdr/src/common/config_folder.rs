// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter, Result},
          path::{Path, PathBuf}};

use dirs::config_dir;
use fsh_tui::{CONFIG_FILE_NAME, DEFAULT_LOG_FILE_NAME};
use miette::IntoDiagnostic;

pub enum ConfigPaths {
    TopLevelFolderName,
    ConfigFile,
    LogFile,
}

impl Display for ConfigPaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let path = match self {
            ConfigPaths::TopLevelFolderName => "fsh",
            ConfigPaths::ConfigFile => CONFIG_FILE_NAME,
            ConfigPaths::LogFile => DEFAULT_LOG_FILE_NAME,
        };
        write!(f, "{path}")
    }
}

/// This is where the config folder is.
#[must_use]
pub fn try_get_config_folder_path() -> Option<PathBuf> {
    let home_config_folder_path = config_dir()?;
    Some(home_config_folder_path.join(ConfigPaths::TopLevelFolderName.to_string()))
}

#[must_use]
pub fn get_config_file_path(config_folder: &Path) -> PathBuf {
    config_folder.join(ConfigPaths::ConfigFile.to_string())
}

#[must_use]
pub fn get_log_file_path(config_folder: &Path) -> PathBuf {
    config_folder.join(ConfigPaths::LogFile.to_string())
}

/// Create the config folder if needed and return its path.
///
/// # Errors
///
/// Returns an error if the platform has no config dir or the folder can't be created.
pub fn try_create_config_folder() -> miette::Result<PathBuf> {
    let Some(config_folder_path) = try_get_config_folder_path() else {
        // % is Display, ? is Debug.
        tracing::error!(message = "Could not access config folder.", error = "None");
        miette::bail!("Could not access the config folder");
    };

    std::fs::create_dir_all(&config_folder_path).into_diagnostic()?;
    // % is Display, ? is Debug.
    tracing::debug!(
        message = "Config folder ready.",
        config_folder = ?config_folder_path
    );
    Ok(config_folder_path)
}
