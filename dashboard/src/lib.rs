// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Misinformation dashboard for social-media post datasets
//!
//! This crate provides:
//! - Lenient loading of a JSON array of posts from a URL or file
//! - KPIs and categorical counts computed once per load
//! - Chart series and Chart.js-shaped chart configs
//! - A searchable post table with sentiment/toxicity classes
//! - Terminal and static HTML presenters
//! - Snapshot reports and a labeled train/test split export

pub mod aggregate;
pub mod config;
pub mod counts;
pub mod engine;
pub mod error;
pub mod html;
pub mod labels;
pub mod loader;
pub mod posts;
pub mod report;
pub mod series;
pub mod table;
pub mod terminal;
pub mod view;

pub use aggregate::{compute_kpis, Aggregates, KpiDisplay, KpiSet};
pub use config::{DashboardConfig, ReportFormat};
pub use counts::{compute_category_counts, compute_misinfo_by_category, OrderedCounts};
pub use engine::{Dashboard, LaunchError};
pub use error::{ExportError, LoadError, TransportFailure};
pub use html::HtmlPage;
pub use labels::{LabeledExample, LabeledSplit};
pub use loader::{load, DataSource, LoadedData, SourceInfo};
pub use posts::{Dataset, MisinfoLabel, Post, TextField};
pub use report::DashboardSnapshot;
pub use series::{dashboard_charts, to_series, ChartKind, ChartSpec, Series};
pub use table::{filter, render_rows, TableRow};
pub use terminal::TerminalView;
pub use view::{Presenter, TableState};
