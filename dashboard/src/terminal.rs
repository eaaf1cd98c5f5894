// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Plain-text presenter for interactive terminal sessions

use crate::series::{ChartKind, ChartSpec};
use crate::table::TableRow;
use crate::view::{targets, Presenter};
use std::io::{self, Write};

const BAR_WIDTH: usize = 40;
const CONTENT_WIDTH: usize = 48;

/// Writes the dashboard to `out` and failure notifications to `alerts`
pub struct TerminalView<W: Write, E: Write> {
    out: W,
    alerts: E,
}

impl TerminalView<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> TerminalView<W, E> {
    pub fn new(out: W, alerts: E) -> Self {
        Self { out, alerts }
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.alerts)
    }
}

/// Truncate to `width` characters, marking the cut with "..."
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        kept + "..."
    }
}

fn chart_title(chart: &ChartSpec) -> String {
    let kind = match chart.kind {
        ChartKind::Doughnut => "doughnut",
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
    };
    format!("{} ({})", chart.series_label, kind)
}

impl<W: Write, E: Write> Presenter for TerminalView<W, E> {
    fn set_text(&mut self, target: &str, text: &str) -> io::Result<()> {
        writeln!(self.out, "{:<22} {}", targets::kpi_title(target), text)
    }

    fn mount_chart(&mut self, chart: &ChartSpec) -> io::Result<()> {
        writeln!(self.out, "\n{}", chart_title(chart))?;
        writeln!(self.out, "{:-<70}", "")?;

        if chart.series.is_empty() {
            return writeln!(self.out, "  (no data)");
        }

        let max = chart.series.values.iter().copied().max().unwrap_or(0).max(1);
        let total: usize = chart.series.values.iter().sum();
        let label_width = chart.series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).min(24);

        for (label, value) in chart.series.labels.iter().zip(&chart.series.values) {
            let bar = "#".repeat(value * BAR_WIDTH / max);
            if chart.kind.is_bar() {
                writeln!(self.out, "  {:<w$} {:<bw$} {}", clip(label, label_width), bar, value, w = label_width, bw = BAR_WIDTH)?;
            } else {
                let share = *value as f64 / total.max(1) as f64 * 100.0;
                writeln!(
                    self.out,
                    "  {:<w$} {:<bw$} {} ({:.1}%)",
                    clip(label, label_width),
                    bar,
                    value,
                    share,
                    w = label_width,
                    bw = BAR_WIDTH
                )?;
            }
        }
        Ok(())
    }

    fn replace_rows(&mut self, _target: &str, rows: &[TableRow]) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{:<10} {:<cw$} {:<14} {:<9} {:>8} {:>6} {:>6} {:<10} {:<14} {}",
            "Platform",
            "Content",
            "Category",
            "Misinfo",
            "Engage",
            "Tox",
            "Sent",
            "Leaning",
            "Moderation",
            "Flags",
            cw = CONTENT_WIDTH
        )?;
        writeln!(self.out, "{:-<150}", "")?;

        for row in rows {
            let mut flags = vec![row.sentiment_bucket.css_class()];
            if let Some(toxicity) = row.toxicity_bucket {
                flags.push(toxicity.css_class());
            }
            writeln!(
                self.out,
                "{:<10} {:<cw$} {:<14} {:<9} {:>8} {:>6} {:>6} {:<10} {:<14} {}",
                clip(&row.platform, 10),
                clip(&row.content_text, CONTENT_WIDTH),
                clip(&row.content_category, 14),
                clip(&row.misinformation_flag, 9),
                row.engagement,
                row.toxicity,
                row.sentiment,
                clip(&row.political_leaning, 10),
                clip(&row.moderation_action, 14),
                flags.join(" "),
                cw = CONTENT_WIDTH
            )?;
        }

        writeln!(self.out, "({} rows)", rows.len())?;
        self.out.flush()
    }

    fn notify_failure(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.alerts, "\n{}", "!".repeat(70))?;
        writeln!(self.alerts, "{}", message)?;
        writeln!(self.alerts, "{}", "!".repeat(70))?;
        self.alerts.flush()
    }
}
