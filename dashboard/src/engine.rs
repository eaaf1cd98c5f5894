// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Analytics & view engine
//!
//! Owns the dataset for the whole session. Aggregates and chart specs are
//! computed once in [`Dashboard::new`]; search input only re-derives the
//! table view from the full dataset.

use crate::aggregate::Aggregates;
use crate::error::LoadError;
use crate::loader::{load, DataSource, LoadedData, SourceInfo};
use crate::posts::{Dataset, Post};
use crate::series::{dashboard_charts, ChartSpec};
use crate::table::{filter, render_rows, TableRow};
use crate::view::{targets, Presenter, TableState};
use std::io;
use thiserror::Error;

/// Failure while bringing a dashboard up
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to render dashboard: {0}")]
    Render(#[from] io::Error),
}

#[derive(Debug)]
pub struct Dashboard {
    dataset: Dataset,
    aggregates: Aggregates,
    charts: Vec<ChartSpec>,
    state: TableState,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        let aggregates = Aggregates::compute(dataset.posts());
        let charts = dashboard_charts(&aggregates);

        Self {
            dataset,
            aggregates,
            charts,
            state: TableState::Unloaded,
        }
    }

    /// Load the dataset and render the full dashboard.
    ///
    /// On a load failure the presenter is notified once and nothing else is
    /// rendered.
    pub async fn launch<P: Presenter>(source: &DataSource, presenter: &mut P) -> Result<(Self, SourceInfo), LaunchError> {
        let LoadedData { dataset, source: info } = match load(source).await {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::error!("Error loading the data: {}", err);
                if let Err(notify_err) = presenter.notify_failure(&err.user_message()) {
                    tracing::warn!("Failed to show failure notification: {}", notify_err);
                }
                return Err(err.into());
            }
        };

        let mut dashboard = Self::new(dataset);
        dashboard.render(presenter)?;
        Ok((dashboard, info))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Posts of the current table view
    pub fn visible_posts(&self) -> Vec<&Post> {
        filter(self.dataset.posts(), self.state.term())
    }

    /// Rows of the current table view
    pub fn visible_rows(&self) -> Vec<TableRow> {
        render_rows(self.visible_posts())
    }

    /// Write KPIs, mount charts and render the full table
    pub fn render<P: Presenter>(&mut self, presenter: &mut P) -> io::Result<()> {
        self.state = TableState::Loaded;
        self.present(presenter)
    }

    /// Write everything for the current state without changing it
    pub fn present<P: Presenter>(&self, presenter: &mut P) -> io::Result<()> {
        let display = self.aggregates.kpis.display();
        presenter.set_text(targets::TOTAL_POSTS, &display.total_posts)?;
        presenter.set_text(targets::MISINFO_RATE, &display.misinfo_rate)?;
        presenter.set_text(targets::AVG_ENGAGEMENT, &display.avg_engagement)?;
        presenter.set_text(targets::TOTAL_INTERACTIONS, &display.total_interactions)?;

        for chart in &self.charts {
            presenter.mount_chart(chart)?;
        }

        self.render_table(presenter)?;
        Ok(())
    }

    /// Handle one search input event.
    ///
    /// The filter always starts from the full dataset, never from the
    /// previously filtered view. A dashboard that was never rendered is
    /// rendered first, so KPIs and charts are always in place.
    pub fn search<P: Presenter>(&mut self, term: &str, presenter: &mut P) -> io::Result<usize> {
        if self.state == TableState::Unloaded {
            self.render(presenter)?;
        }
        self.state = TableState::Filtered { term: term.to_string() };
        let shown = self.render_table(presenter)?;
        tracing::debug!("Search {:?} matched {} of {} posts", term, shown, self.dataset.len());
        Ok(shown)
    }

    fn render_table<P: Presenter>(&self, presenter: &mut P) -> io::Result<usize> {
        let rows = self.visible_rows();
        presenter.replace_rows(targets::TABLE_BODY, &rows)?;
        Ok(rows.len())
    }
}
