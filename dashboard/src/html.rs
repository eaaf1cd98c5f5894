// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Static HTML snapshot of the dashboard
//!
//! Each chart is emitted as a `<canvas>` with its JSON config alongside, so
//! a charting script can pick them up. Cell text is escaped.

use crate::series::{ChartSpec, CARD_BACKGROUND, TEXT_COLOR};
use crate::table::TableRow;
use crate::view::{targets, Presenter};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// In-memory page assembled from presenter calls
#[derive(Debug, Default)]
pub struct HtmlPage {
    title: String,
    texts: BTreeMap<String, String>,
    charts: Vec<(String, String)>,
    rows: Vec<TableRow>,
    search_term: String,
    failure: Option<String>,
}

/// Escape text for element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl HtmlPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Pre-fill the search box with the term the table was filtered by
    pub fn with_search_term(mut self, term: &str) -> Self {
        self.search_term = term.to_string();
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_html(row: &TableRow) -> String {
        let row_class = row.toxicity_bucket.map_or("", |t| t.css_class());
        format!(
            concat!(
                "<tr class=\"{}\">",
                "<td>{}</td>",
                "<td><div class=\"content-text\" title=\"{}\">{}</div></td>",
                "<td>{}</td>",
                "<td class=\"{}\">{}</td>",
                "<td>{}</td>",
                "<td>{}</td>",
                "<td class=\"{}\">{}</td>",
                "<td>{}</td>",
                "<td>{}</td>",
                "</tr>\n"
            ),
            row_class,
            escape(&row.platform),
            escape(&row.content_text),
            escape(&row.content_text),
            escape(&row.content_category),
            escape(&row.misinformation_class),
            escape(&row.misinformation_flag),
            row.engagement,
            row.toxicity,
            row.sentiment_bucket.css_class(),
            row.sentiment,
            escape(&row.political_leaning),
            escape(&row.moderation_action),
        )
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        html.push_str(&format!(
            "<style>body {{ background: #1a202c; color: {}; font-family: sans-serif; }} .card {{ background: {}; }}</style>\n",
            TEXT_COLOR, CARD_BACKGROUND
        ));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape(&self.title)));

        if let Some(ref failure) = self.failure {
            html.push_str(&format!("<div class=\"alert\" role=\"alert\">{}</div>\n", escape(failure)));
        }

        html.push_str("<section class=\"kpis\">\n");
        for (id, title) in targets::KPI_CARDS {
            let value = self.texts.get(id).map_or("", String::as_str);
            html.push_str(&format!(
                "<div class=\"card\"><h2>{}</h2><p id=\"{}\">{}</p></div>\n",
                title,
                id,
                escape(value)
            ));
        }
        html.push_str("</section>\n");

        html.push_str("<section class=\"charts\">\n");
        for (target, config) in &self.charts {
            html.push_str(&format!(
                "<div class=\"card\"><canvas id=\"{}\"></canvas><script type=\"application/json\" data-chart=\"{}\">{}</script></div>\n",
                escape(target),
                escape(target),
                config.replace("</", "<\\/")
            ));
        }
        html.push_str("</section>\n");

        html.push_str(&format!(
            "<input type=\"text\" id=\"{}\" placeholder=\"Search posts...\" value=\"{}\">\n",
            targets::SEARCH_INPUT,
            escape(&self.search_term)
        ));
        html.push_str("<table>\n<thead><tr><th>Platform</th><th>Content</th><th>Category</th><th>Misinformation</th><th>Engagement</th><th>Toxicity</th><th>Sentiment</th><th>Political Leaning</th><th>Moderation</th></tr></thead>\n");
        html.push_str(&format!("<tbody id=\"{}\">\n", targets::TABLE_BODY));
        for row in &self.rows {
            html.push_str(&Self::row_html(row));
        }
        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

        html
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, self.to_html()).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("HTML dashboard saved to {}", path.display());
        Ok(())
    }
}

impl Presenter for HtmlPage {
    fn set_text(&mut self, target: &str, text: &str) -> io::Result<()> {
        self.texts.insert(target.to_string(), text.to_string());
        Ok(())
    }

    fn mount_chart(&mut self, chart: &ChartSpec) -> io::Result<()> {
        let config = serde_json::to_string(&chart.config()).map_err(io::Error::other)?;
        self.charts.retain(|(target, _)| target != &chart.target);
        self.charts.push((chart.target.clone(), config));
        Ok(())
    }

    fn replace_rows(&mut self, _target: &str, rows: &[TableRow]) -> io::Result<()> {
        self.rows = rows.to_vec();
        Ok(())
    }

    fn notify_failure(&mut self, message: &str) -> io::Result<()> {
        self.failure = Some(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Dashboard;
    use crate::posts::{Dataset, Post};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Post {
                platform: Some("Twitter".to_string()),
                content_text: Some("<script>alert(1)</script>".to_string()),
                content_category: Some("Health".to_string()),
                misinformation_flag: Some("True".to_string()),
                sentiment_score: Some(0.5),
                toxicity_score: Some(0.5),
                ..Default::default()
            },
            Post {
                platform: Some("Reddit".to_string()),
                content_text: Some("Budget vote".to_string()),
                content_category: Some("Politics".to_string()),
                misinformation_flag: Some("False".to_string()),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_page_contents() {
        let mut dashboard = Dashboard::new(dataset());
        let mut page = HtmlPage::new("Misinformation Dashboard");
        dashboard.render(&mut page).unwrap();

        let html = page.to_html();
        assert!(html.contains("id=\"total-posts\">2<"));
        assert!(html.contains("id=\"misinfo-rate\">50.0%<"));
        assert!(html.contains("<canvas id=\"platformChart\">"));
        assert!(html.contains("\"type\":\"doughnut\""));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
        assert!(html.contains("class=\"toxicity-medium\""));
        assert!(html.contains("class=\"sentiment-positive\""));
        assert!(html.contains("class=\"misinformation-true\""));
        assert_eq!(page.row_count(), 2);
    }

    #[test]
    fn test_rows_replaced_not_appended() {
        let mut dashboard = Dashboard::new(dataset());
        let mut page = HtmlPage::new("t").with_search_term("budget");
        dashboard.render(&mut page).unwrap();
        dashboard.search("budget", &mut page).unwrap();
        dashboard.search("budget", &mut page).unwrap();

        assert_eq!(page.row_count(), 1);
        let html = page.to_html();
        assert_eq!(html.matches("<tr class=").count(), 1);
        assert!(html.contains("value=\"budget\""));
    }

    #[test]
    fn test_failure_banner() {
        let mut page = HtmlPage::new("t");
        page.notify_failure("Could not load <data>").unwrap();
        assert!(page.to_html().contains("role=\"alert\">Could not load &lt;data&gt;</div>"));
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("dashboard.html");

        let mut page = HtmlPage::new("t");
        Dashboard::new(dataset()).present(&mut page).unwrap();
        page.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
