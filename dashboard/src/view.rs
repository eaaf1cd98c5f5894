// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Presentation seam between the engine and whatever displays it

use crate::series::ChartSpec;
use crate::table::TableRow;
use serde::{Deserialize, Serialize};
use std::io;

/// Stable identifiers of the display targets
pub mod targets {
    pub const TOTAL_POSTS: &str = "total-posts";
    pub const MISINFO_RATE: &str = "misinfo-rate";
    pub const AVG_ENGAGEMENT: &str = "avg-engagement";
    pub const TOTAL_INTERACTIONS: &str = "total-interactions";

    pub const PLATFORM_CHART: &str = "platformChart";
    pub const MISINFO_CATEGORY_CHART: &str = "misinfoCategoryChart";
    pub const MODERATION_CHART: &str = "moderationChart";
    pub const POLITICAL_LEANING_CHART: &str = "politicalLeaningChart";

    pub const TABLE_BODY: &str = "table-body";
    pub const SEARCH_INPUT: &str = "searchInput";

    /// KPI targets with their card titles, in display order
    pub const KPI_CARDS: [(&str, &str); 4] = [
        (TOTAL_POSTS, "Total Posts"),
        (MISINFO_RATE, "Misinformation Rate"),
        (AVG_ENGAGEMENT, "Avg. Engagement"),
        (TOTAL_INTERACTIONS, "Total Interactions"),
    ];

    /// Card title for a KPI target
    pub fn kpi_title(target: &str) -> &str {
        KPI_CARDS
            .iter()
            .find(|(id, _)| *id == target)
            .map_or(target, |(_, title)| *title)
    }
}

/// Lifecycle of the table view.
///
/// `Unloaded -> Loaded -> Filtered`, then `Filtered -> Filtered` on every
/// search input; each filter is re-derived from the full dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableState {
    #[default]
    Unloaded,
    Loaded,
    Filtered { term: String },
}

impl TableState {
    /// Active search term, empty when showing the full dataset
    pub fn term(&self) -> &str {
        match self {
            TableState::Filtered { term } => term,
            TableState::Unloaded | TableState::Loaded => "",
        }
    }
}

/// Something that can display the dashboard
pub trait Presenter {
    /// Write a KPI value into a text target
    fn set_text(&mut self, target: &str, text: &str) -> io::Result<()>;

    /// Draw a chart into its mount target
    fn mount_chart(&mut self, chart: &ChartSpec) -> io::Result<()>;

    /// Replace the whole contents of the table body
    fn replace_rows(&mut self, target: &str, rows: &[TableRow]) -> io::Result<()>;

    /// Blocking user-facing notification, used only when loading fails
    fn notify_failure(&mut self, message: &str) -> io::Result<()>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_titles() {
        assert_eq!(targets::kpi_title(targets::MISINFO_RATE), "Misinformation Rate");
        assert_eq!(targets::kpi_title("unknown"), "unknown");
    }

    #[test]
    fn test_state_term() {
        assert_eq!(TableState::default(), TableState::Unloaded);
        assert_eq!(TableState::Loaded.term(), "");
        assert_eq!(TableState::Filtered { term: "cure".to_string() }.term(), "cure");
    }
}
