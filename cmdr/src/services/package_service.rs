// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug,
          path::PathBuf};

use fsh_tui::ShellError;
use futures_util::future::BoxFuture;

use crate::ServiceStream;

/// One package's progress through an install.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageProgress {
    pub stage: String,
    pub name: String,
    pub version: Option<String>,
    /// Between 0.0 and 1.0.
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackageEvent {
    Progress(Vec<PackageProgress>),
    /// Always the last event of a successful operation.
    Done { count: usize },
    Failed(String),
}

pub type PackageOperation = ServiceStream<PackageEvent>;

/// Dependency management for the project in `dir`.
pub trait PackageService: Debug + Send + Sync {
    fn install(&self, dir: PathBuf, save_dev: bool, packages: Vec<String>) -> PackageOperation;

    fn uninstall(&self, dir: PathBuf, packages: Vec<String>) -> PackageOperation;

    /// The audit report as JSON.
    fn audit(&self, dir: PathBuf) -> BoxFuture<'_, Result<serde_json::Value, ShellError>>;
}

/// `[stage] name @version (NN%)`, the version and percentage only when known.
#[must_use]
pub fn format_progress(item: &PackageProgress) -> String {
    let mut acc = format!("[{}] {}", item.stage, item.name);
    if let Some(version) = &item.version {
        acc.push_str(&format!(" @{version}"));
    }
    if let Some(progress) = item.progress {
        acc.push_str(&format!(" ({:.0}%)", progress * 100.0));
    }
    acc
}
