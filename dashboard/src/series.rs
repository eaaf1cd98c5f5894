// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Chart-ready series and the chart contract handed to a renderer
//!
//! A [`ChartSpec`] carries everything a charting backend needs: kind,
//! labels, values, series label and colors. [`ChartSpec::config`] applies
//! the fixed presentation conventions and produces a serializable config.

use crate::aggregate::Aggregates;
use crate::counts::OrderedCounts;
use crate::view::targets;
use serde::{Deserialize, Serialize};

/// Chart color tokens, used whole or sliced per chart
pub const PALETTE: [&str; 8] = [
    "#63b3ed", "#f56565", "#48bb78", "#f6ad55", "#b794f4", "#f6e05e", "#f56565", "#a0aec0",
];

/// Card background; doughnut and pie slices are outlined with it
pub const CARD_BACKGROUND: &str = "#2d3748";
/// Default text color for legends and labels
pub const TEXT_COLOR: &str = "#e2e8f0";
/// Y axis grid line color
pub const GRID_COLOR: &str = "#4a5568";

/// Two parallel sequences built from an ordered count map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build a series preserving the map's iteration order
pub fn to_series(counts: &OrderedCounts) -> Series {
    let (labels, values) = counts.iter().map(|(k, v)| (k.to_string(), v)).unzip();
    Series { labels, values }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
    Pie,
}

impl ChartKind {
    pub fn is_bar(&self) -> bool {
        matches!(self, ChartKind::Bar)
    }
}

/// One chart as handed to the charting collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Mount target identifier
    pub target: String,
    pub kind: ChartKind,
    pub series_label: String,
    pub series: Series,
    pub colors: Vec<String>,
}

impl ChartSpec {
    pub fn new(target: &str, kind: ChartKind, series_label: &str, counts: &OrderedCounts, colors: &[&str]) -> Self {
        Self {
            target: target.to_string(),
            kind,
            series_label: series_label.to_string(),
            series: to_series(counts),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Chart config with the fixed conventions applied:
    /// - bar: legend hidden (positioned top), Y axis from zero with grid
    ///   lines, X grid lines hidden, no borders
    /// - doughnut/pie: legend at the right, no axes, 2px borders in the card
    ///   background color
    pub fn config(&self) -> ChartConfig {
        let is_bar = self.kind.is_bar();

        ChartConfig {
            chart_type: self.kind,
            data: ChartData {
                labels: self.series.labels.clone(),
                datasets: vec![ChartDataset {
                    label: self.series_label.clone(),
                    data: self.series.values.clone(),
                    background_color: self.colors.clone(),
                    border_color: CARD_BACKGROUND.to_string(),
                    border_width: if is_bar { 0 } else { 2 },
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                color: TEXT_COLOR.to_string(),
                plugins: ChartPlugins {
                    legend: Legend {
                        position: if is_bar { LegendPosition::Top } else { LegendPosition::Right },
                        display: !is_bar,
                    },
                },
                scales: is_bar.then(|| Scales {
                    y: Axis {
                        begin_at_zero: true,
                        grid: Grid {
                            display: true,
                            color: Some(GRID_COLOR.to_string()),
                        },
                    },
                    x: Axis {
                        begin_at_zero: false,
                        grid: Grid {
                            display: false,
                            color: None,
                        },
                    },
                }),
            },
        }
    }
}

/// Serializable chart configuration in the shape charting backends expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<usize>,
    pub background_color: Vec<String>,
    pub border_color: String,
    pub border_width: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub color: String,
    pub plugins: ChartPlugins,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPlugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub position: LegendPosition,
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub y: Axis,
    pub x: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: bool,
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub display: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The four dashboard charts, in mount order
pub fn dashboard_charts(aggregates: &Aggregates) -> Vec<ChartSpec> {
    vec![
        ChartSpec::new(
            targets::PLATFORM_CHART,
            ChartKind::Doughnut,
            "Posts by Platform",
            &aggregates.platform_counts,
            &PALETTE,
        ),
        ChartSpec::new(
            targets::MISINFO_CATEGORY_CHART,
            ChartKind::Bar,
            "# of Misinformation Posts",
            &aggregates.misinfo_by_category,
            &PALETTE[1..],
        ),
        ChartSpec::new(
            targets::MODERATION_CHART,
            ChartKind::Bar,
            "Moderation Actions",
            &aggregates.moderation_counts,
            &PALETTE,
        ),
        ChartSpec::new(
            targets::POLITICAL_LEANING_CHART,
            ChartKind::Pie,
            "Political Leaning",
            &aggregates.political_leaning_counts,
            &PALETTE,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::Post;
    use serde_json::json;

    fn counts(pairs: &[(&str, usize)]) -> OrderedCounts {
        let mut counts = OrderedCounts::new();
        for (key, n) in pairs {
            for _ in 0..*n {
                counts.increment(key);
            }
        }
        counts
    }

    #[test]
    fn test_series_preserves_order() {
        let series = to_series(&counts(&[("Twitter", 3), ("Reddit", 1), ("Facebook", 2)]));
        assert_eq!(series.labels, vec!["Twitter", "Reddit", "Facebook"]);
        assert_eq!(series.values, vec![3, 1, 2]);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_bar_conventions() {
        let spec = ChartSpec::new("moderationChart", ChartKind::Bar, "Moderation Actions", &counts(&[("Removed", 2)]), &PALETTE);
        let config = serde_json::to_value(spec.config()).unwrap();

        assert_eq!(config["type"], json!("bar"));
        assert_eq!(config["data"]["datasets"][0]["borderWidth"], json!(0));
        assert_eq!(config["options"]["plugins"]["legend"], json!({"position": "top", "display": false}));
        assert_eq!(config["options"]["scales"]["y"]["beginAtZero"], json!(true));
        assert_eq!(config["options"]["scales"]["y"]["grid"]["color"], json!(GRID_COLOR));
        assert_eq!(config["options"]["scales"]["x"]["grid"]["display"], json!(false));
    }

    #[test]
    fn test_proportional_conventions() {
        for kind in [ChartKind::Doughnut, ChartKind::Pie] {
            let spec = ChartSpec::new("platformChart", kind, "Posts by Platform", &counts(&[("X", 1)]), &PALETTE);
            let config = serde_json::to_value(spec.config()).unwrap();

            assert_eq!(config["data"]["datasets"][0]["borderWidth"], json!(2));
            assert_eq!(config["data"]["datasets"][0]["borderColor"], json!(CARD_BACKGROUND));
            assert_eq!(config["options"]["plugins"]["legend"], json!({"position": "right", "display": true}));
            assert!(config["options"].get("scales").is_none());
        }
    }

    #[test]
    fn test_dashboard_charts() {
        let posts = vec![
            Post {
                platform: Some("X".to_string()),
                content_category: Some("Health".to_string()),
                misinformation_flag: Some("True".to_string()),
                ..Default::default()
            },
            Post {
                platform: Some("Y".to_string()),
                misinformation_flag: Some("False".to_string()),
                ..Default::default()
            },
        ];
        let charts = dashboard_charts(&Aggregates::compute(&posts));

        let targets: Vec<_> = charts.iter().map(|c| c.target.as_str()).collect();
        assert_eq!(targets, vec!["platformChart", "misinfoCategoryChart", "moderationChart", "politicalLeaningChart"]);

        let kinds: Vec<_> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Doughnut, ChartKind::Bar, ChartKind::Bar, ChartKind::Pie]);

        assert_eq!(charts[0].series.labels, vec!["X", "Y"]);
        assert_eq!(charts[1].series.labels, vec!["Health"]);
        assert_eq!(charts[1].colors.len(), PALETTE.len() - 1);
        assert_eq!(charts[1].colors[0], PALETTE[1]);
    }
}
