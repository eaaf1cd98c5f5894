// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Headline KPIs and the aggregate bundle computed once per dataset load
//!
//! KPIs:
//! - total posts
//! - misinformation rate (percent of posts flagged exactly `"True"`)
//! - average engagement score
//! - total interactions (likes + shares + comments)

use crate::counts::{compute_category_counts, compute_misinfo_by_category, OrderedCounts};
use crate::posts::{Post, TextField};
use serde::{Deserialize, Serialize};

/// Extra digits inspected when looking for an exact halfway value. Any double
/// that is not exactly halfway differs from the halfway point well within them.
const TIE_GUARD_DIGITS: usize = 30;

/// Fixed-point formatting with JavaScript `toFixed` rounding.
///
/// Values exactly halfway between two outputs round away from zero
/// (`0.125` gives `"0.13"`), where `format!` would round to even. NaN
/// prints `"NaN"` and negative zero prints unsigned.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits, 0.0);
    }

    let wide = format!("{:.*}", digits + TIE_GUARD_DIGITS, value.abs());
    let (head, tail) = wide.split_at(wide.len() - TIE_GUARD_DIGITS);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", digits, value);
    }

    let rounded = increment_decimal(head.trim_end_matches('.'));
    if value < 0.0 {
        format!("-{}", rounded)
    } else {
        rounded
    }
}

/// Add one unit in the last place of a plain decimal string
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for b in bytes.iter_mut().rev() {
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

/// Raw KPI values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub total_posts: usize,
    pub misinfo_posts: usize,
    /// Percentage in [0, 100]; 0 for an empty dataset
    pub misinfo_rate: f64,
    /// Mean engagement; 0 for an empty dataset, NaN if a record lacks a score
    pub avg_engagement: f64,
    /// Sum of interactions; NaN if a record lacks a count
    pub total_interactions: f64,
}

/// KPI values formatted for the four display targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiDisplay {
    pub total_posts: String,
    pub misinfo_rate: String,
    pub avg_engagement: String,
    pub total_interactions: String,
}

impl KpiSet {
    pub fn compute(posts: &[Post]) -> Self {
        let total_posts = posts.len();
        let misinfo_posts = posts.iter().filter(|p| p.is_flagged()).count();

        // fold from +0.0 so an empty sum never formats as "-0.0"
        let engagement_sum: f64 = posts
            .iter()
            .map(|p| p.engagement_score.unwrap_or(f64::NAN))
            .fold(0.0, |acc, x| acc + x);
        let total_interactions: f64 = posts
            .iter()
            .map(|p| p.interactions().unwrap_or(f64::NAN))
            .fold(0.0, |acc, x| acc + x);

        let (misinfo_rate, avg_engagement) = if total_posts == 0 {
            (0.0, 0.0)
        } else {
            (
                misinfo_posts as f64 / total_posts as f64 * 100.0,
                engagement_sum / total_posts as f64,
            )
        };

        Self {
            total_posts,
            misinfo_posts,
            misinfo_rate,
            avg_engagement,
            total_interactions,
        }
    }

    /// Format for display: `"50.0%"`, `"15.00"`, `"0.0k"`.
    ///
    /// Interactions are shown in thousands, so totals below 50 read `"0.0k"`.
    pub fn display(&self) -> KpiDisplay {
        KpiDisplay {
            total_posts: self.total_posts.to_string(),
            misinfo_rate: format!("{}%", to_fixed(self.misinfo_rate, 1)),
            avg_engagement: to_fixed(self.avg_engagement, 2),
            total_interactions: format!("{}k", to_fixed(self.total_interactions / 1000.0, 1)),
        }
    }
}

/// Compute the headline KPIs of a record set
pub fn compute_kpis(posts: &[Post]) -> KpiSet {
    KpiSet::compute(posts)
}

/// Everything the dashboard derives from the full dataset.
///
/// Built once at load; table filtering never touches it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub kpis: KpiSet,
    pub platform_counts: OrderedCounts,
    pub moderation_counts: OrderedCounts,
    pub political_leaning_counts: OrderedCounts,
    pub misinfo_by_category: OrderedCounts,
}

impl Aggregates {
    pub fn compute(posts: &[Post]) -> Self {
        let aggregates = Self {
            kpis: compute_kpis(posts),
            platform_counts: compute_category_counts(posts, TextField::Platform),
            moderation_counts: compute_category_counts(posts, TextField::ModerationAction),
            political_leaning_counts: compute_category_counts(posts, TextField::PoliticalLeaning),
            misinfo_by_category: compute_misinfo_by_category(posts),
        };

        tracing::debug!(
            "Aggregates computed: {} posts, {} platforms, {} categories with misinformation",
            aggregates.kpis.total_posts,
            aggregates.platform_counts.len(),
            aggregates.misinfo_by_category.len()
        );

        aggregates
    }
}
