// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Dashboard snapshot reports
//!
//! A snapshot freezes what a session showed: the config it ran with, where
//! the posts came from, the KPIs, the four chart configs and the active
//! search. It is saved as pretty JSON and as a Markdown report.

use crate::aggregate::{KpiDisplay, KpiSet};
use crate::config::DashboardConfig;
use crate::engine::Dashboard;
use crate::loader::SourceInfo;
use crate::posts::Dataset;
use crate::series::{ChartConfig, ChartSpec};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Where the posts came from and what they contain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub origin: String,
    /// Present when the posts were loaded rather than generated
    pub source: Option<SourceInfo>,
    pub total_posts: usize,
    /// Posts per misinformation label
    pub label_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    #[serde(flatten)]
    pub chart: ChartSpec,
    /// Chart.js-shaped config as mounted
    pub config: ChartConfig,
}

/// The table view at capture time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    pub term: String,
    pub visible_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub config: DashboardConfig,
    pub dataset: DatasetInfo,
    pub kpis: KpiSet,
    pub kpi_display: KpiDisplay,
    pub charts: Vec<ChartSnapshot>,
    pub search: SearchSnapshot,
}

impl DashboardSnapshot {
    pub fn capture(config: &DashboardConfig, dashboard: &Dashboard, source: Option<&SourceInfo>) -> Self {
        let label_distribution = Dataset::label_distribution(dashboard.dataset().posts())
            .into_iter()
            .map(|(label, count)| (format!("{:?}", label), count))
            .collect();

        let kpis = dashboard.aggregates().kpis;

        Self {
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: config.clone(),
            dataset: DatasetInfo {
                origin: config.describe_source(),
                source: source.cloned(),
                total_posts: dashboard.dataset().len(),
                label_distribution,
            },
            kpis,
            kpi_display: kpis.display(),
            charts: dashboard
                .charts()
                .iter()
                .map(|chart| ChartSnapshot {
                    chart: chart.clone(),
                    config: chart.config(),
                })
                .collect(),
            search: SearchSnapshot {
                term: dashboard.state().term().to_string(),
                visible_rows: dashboard.visible_posts().len(),
            },
        }
    }

    /// Save as pretty-printed JSON
    pub fn save_json(&self, output_path: &Path) -> Result<()> {
        ensure_parent(output_path)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_path, json).with_context(|| format!("Failed to write {}", output_path.display()))?;
        tracing::info!("Snapshot saved to {}", output_path.display());
        Ok(())
    }

    pub fn save_markdown(&self, output_path: &Path) -> Result<()> {
        ensure_parent(output_path)?;
        std::fs::write(output_path, self.to_markdown())
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        tracing::info!("Report saved to {}", output_path.display());
        Ok(())
    }

    /// Render a Markdown report
    pub fn to_markdown(&self) -> String {
        let mut report = String::new();

        report.push_str("# Misinformation Dashboard Report\n\n");
        report.push_str(&format!("**Generated:** {}\n\n", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
        report.push_str(&format!("**Version:** {}\n\n", self.version));

        report.push_str("## Dataset\n\n");
        report.push_str(&format!("- **Origin:** {}\n", self.dataset.origin));
        if let Some(ref source) = self.dataset.source {
            report.push_str(&format!("- **SHA-256:** `{}`\n", source.sha256));
            report.push_str(&format!("- **Size:** {} bytes\n", source.size_bytes));
        }
        report.push_str(&format!("- **Total Posts:** {}\n", self.dataset.total_posts));
        for (label, count) in &self.dataset.label_distribution {
            report.push_str(&format!("- **{}:** {}\n", label, count));
        }
        report.push('\n');

        report.push_str("## KPIs\n\n");
        report.push_str("| KPI | Value |\n");
        report.push_str("|-----|-------|\n");
        report.push_str(&format!("| Total Posts | {} |\n", self.kpi_display.total_posts));
        report.push_str(&format!("| Misinformation Rate | {} |\n", self.kpi_display.misinfo_rate));
        report.push_str(&format!("| Avg. Engagement | {} |\n", self.kpi_display.avg_engagement));
        report.push_str(&format!("| Total Interactions | {} |\n\n", self.kpi_display.total_interactions));

        report.push_str("## Charts\n\n");
        for ChartSnapshot { chart, .. } in &self.charts {
            report.push_str(&format!("### {}\n\n", chart.series_label));
            if chart.series.is_empty() {
                report.push_str("_No data._\n\n");
                continue;
            }
            report.push_str("| Label | Count |\n");
            report.push_str("|-------|-------|\n");
            for (label, value) in chart.series.labels.iter().zip(&chart.series.values) {
                report.push_str(&format!("| {} | {} |\n", label.replace('|', "\\|"), value));
            }
            report.push('\n');
        }

        report.push_str("## Table View\n\n");
        if self.search.term.is_empty() {
            report.push_str(&format!("Showing all {} posts.\n", self.search.visible_rows));
        } else {
            report.push_str(&format!(
                "Search \"{}\" matched {} of {} posts.\n",
                self.search.term, self.search.visible_rows, self.dataset.total_posts
            ));
        }

        report
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
