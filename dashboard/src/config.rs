// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Dashboard session configuration
//!
//! Built from command-line arguments, optionally on top of a JSON config
//! file. Missing keys in the file fall back to [`DashboardConfig::default`].

use crate::loader::DataSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_DATA_LOCATION: &str = "data/csvjson.json";

/// Which report files to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Markdown,
    #[default]
    Both,
}

impl ReportFormat {
    pub fn writes_json(&self) -> bool {
        matches!(self, ReportFormat::Json | ReportFormat::Both)
    }

    pub fn writes_markdown(&self) -> bool {
        matches!(self, ReportFormat::Markdown | ReportFormat::Both)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "both" => Ok(ReportFormat::Both),
            other => Err(format!("unknown report format '{}' (expected json, markdown or both)", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Both => "both",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL or file path of the JSON array of posts
    pub data_location: String,
    /// Generate this many synthetic posts instead of loading
    pub synthetic_size: Option<usize>,
    /// Seed for synthetic data
    pub seed: u64,
    /// Search term applied right after the initial render
    pub search: Option<String>,
    /// Read search terms from stdin until EOF
    pub interactive: bool,
    /// Write a static HTML page here
    pub html_output: Option<String>,
    /// Write snapshot reports into this directory
    pub report_dir: Option<String>,
    pub report_format: ReportFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_location: DEFAULT_DATA_LOCATION.to_string(),
            synthetic_size: None,
            seed: 42,
            search: None,
            interactive: false,
            html_output: None,
            report_dir: None,
            report_format: ReportFormat::Both,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data_location)
    }

    /// Human-readable origin of the posts
    pub fn describe_source(&self) -> String {
        match self.synthetic_size {
            Some(size) => format!("synthetic ({} posts, seed {})", size, self.seed),
            None => self.data_location.clone(),
        }
    }
}
