// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Misinformation dashboard CLI
//!
//! Usage:
//!   disinfo-dashboard --data data/csvjson.json --interactive
//!   disinfo-dashboard --data https://example.org/posts.json --search vaccine --html out/dashboard.html
//!   disinfo-dashboard --synthetic 500 --output reports --format both

use anyhow::{Context, Result};
use clap::Parser;
use disinfo_dashboard::config::{DashboardConfig, ReportFormat};
use disinfo_dashboard::engine::{Dashboard, LaunchError};
use disinfo_dashboard::html::HtmlPage;
use disinfo_dashboard::loader::SourceInfo;
use disinfo_dashboard::posts::Dataset;
use disinfo_dashboard::report::DashboardSnapshot;
use disinfo_dashboard::terminal::TerminalView;
use disinfo_dashboard::view::Presenter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const PAGE_TITLE: &str = "Misinformation Dashboard";

#[derive(Parser, Debug)]
#[command(name = "disinfo-dashboard")]
#[command(about = "KPIs, charts and a searchable table for misinformation post datasets")]
#[command(version)]
struct Args {
    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL or path of the JSON array of posts
    #[arg(short, long)]
    data: Option<String>,

    /// Use N synthetic posts instead of loading data
    #[arg(long)]
    synthetic: Option<usize>,

    /// Random seed for synthetic data
    #[arg(short, long)]
    seed: Option<u64>,

    /// Filter the table by this term after the initial render
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Read search terms from stdin, one per line, until EOF
    #[arg(short, long)]
    interactive: bool,

    /// Write a static HTML page of the final view
    #[arg(long)]
    html: Option<PathBuf>,

    /// Output directory for snapshot reports
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format (json, markdown, both)
    #[arg(short, long)]
    format: Option<ReportFormat>,
}

impl Args {
    fn into_config(self) -> Result<DashboardConfig> {
        let mut config = match self.config {
            Some(ref path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };

        if let Some(data) = self.data {
            config.data_location = data;
        }
        if self.synthetic.is_some() {
            config.synthetic_size = self.synthetic;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.search.is_some() {
            config.search = self.search;
        }
        config.interactive |= self.interactive;
        if let Some(html) = self.html {
            config.html_output = Some(html.to_string_lossy().to_string());
        }
        if let Some(output) = self.output {
            config.report_dir = Some(output.to_string_lossy().to_string());
        }
        if let Some(format) = self.format {
            config.report_format = format;
        }

        Ok(config)
    }
}

/// Bring the dashboard up from synthetic or loaded data.
///
/// `Ok(None)` means loading failed and the presenter has already shown it.
async fn open_dashboard<P: Presenter>(
    config: &DashboardConfig,
    presenter: &mut P,
) -> Result<Option<(Dashboard, Option<SourceInfo>)>> {
    match config.synthetic_size {
        Some(size) => {
            let mut dashboard = Dashboard::new(Dataset::synthetic(size, config.seed));
            dashboard.render(presenter)?;
            Ok(Some((dashboard, None)))
        }
        None => match Dashboard::launch(&config.source(), presenter).await {
            Ok((dashboard, info)) => Ok(Some((dashboard, Some(info)))),
            Err(LaunchError::Load(_)) => Ok(None),
            Err(err) => Err(err.into()),
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config()?;

    tracing::info!("Misinformation Dashboard");
    tracing::info!("Data: {}", config.describe_source());

    let mut view = TerminalView::stdio();

    let Some((mut dashboard, source)) = open_dashboard(&config, &mut view).await? else {
        return Ok(ExitCode::FAILURE);
    };

    if let Some(ref term) = config.search {
        dashboard.search(term, &mut view)?;
    }

    if config.interactive {
        tracing::info!("Type a search term and press Enter; end input to quit");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read search input")? {
            dashboard.search(line.trim_end_matches('\r'), &mut view)?;
        }
    }

    if let Some(ref html_path) = config.html_output {
        let mut page = HtmlPage::new(PAGE_TITLE).with_search_term(dashboard.state().term());
        dashboard.present(&mut page)?;
        page.save(Path::new(html_path))?;
        println!("\nHTML dashboard saved to: {}", html_path);
    }

    if let Some(ref report_dir) = config.report_dir {
        let report_dir = Path::new(report_dir);
        let snapshot = DashboardSnapshot::capture(&config, &dashboard, source.as_ref());
        let timestamp = snapshot.timestamp.format("%Y%m%d_%H%M%S");

        if config.report_format.writes_json() {
            let json_path = report_dir.join(format!("dashboard_{}.json", timestamp));
            snapshot.save_json(&json_path)?;
            println!("JSON snapshot saved to: {}", json_path.display());
        }

        if config.report_format.writes_markdown() {
            let md_path = report_dir.join(format!("dashboard_{}.md", timestamp));
            snapshot.save_markdown(&md_path)?;
            println!("Markdown report saved to: {}", md_path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
