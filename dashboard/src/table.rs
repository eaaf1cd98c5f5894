// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Table rows and free-text filtering
//!
//! Rows are derived from posts without touching them: scores are rounded to
//! two decimals for display only, and every row carries its sentiment and
//! toxicity presentation classes.

use crate::aggregate::to_fixed;
use crate::posts::{Post, TextField};
use serde::{Deserialize, Serialize};

pub const POSITIVE_SENTIMENT_ABOVE: f64 = 0.2;
pub const NEGATIVE_SENTIMENT_BELOW: f64 = -0.2;
pub const HIGH_TOXICITY_ABOVE: f64 = 0.7;
pub const MEDIUM_TOXICITY_ABOVE: f64 = 0.4;

/// Fields the search term is matched against
pub const SEARCH_FIELDS: [TextField; 3] = [TextField::ContentText, TextField::Platform, TextField::ContentCategory];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBucket {
    Positive,
    Negative,
    Neutral,
}

impl SentimentBucket {
    /// Missing or NaN scores are neutral
    pub fn classify(score: Option<f64>) -> Self {
        match score {
            Some(s) if s > POSITIVE_SENTIMENT_ABOVE => SentimentBucket::Positive,
            Some(s) if s < NEGATIVE_SENTIMENT_BELOW => SentimentBucket::Negative,
            _ => SentimentBucket::Neutral,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SentimentBucket::Positive => "sentiment-positive",
            SentimentBucket::Negative => "sentiment-negative",
            SentimentBucket::Neutral => "sentiment-neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToxicityBucket {
    High,
    Medium,
}

impl ToxicityBucket {
    /// `None` for scores at or below the medium threshold, or missing
    pub fn classify(score: Option<f64>) -> Option<Self> {
        match score {
            Some(s) if s > HIGH_TOXICITY_ABOVE => Some(ToxicityBucket::High),
            Some(s) if s > MEDIUM_TOXICITY_ABOVE => Some(ToxicityBucket::Medium),
            _ => None,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ToxicityBucket::High => "toxicity-high",
            ToxicityBucket::Medium => "toxicity-medium",
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub platform: String,
    pub content_text: String,
    pub content_category: String,
    pub misinformation_flag: String,
    /// `misinformation-<flag lower-cased>`
    pub misinformation_class: String,
    pub engagement: String,
    pub toxicity: String,
    pub sentiment: String,
    pub political_leaning: String,
    pub moderation_action: String,
    pub sentiment_bucket: SentimentBucket,
    pub toxicity_bucket: Option<ToxicityBucket>,
}

/// Two decimals, `NaN` when the score is missing
fn score(value: Option<f64>) -> String {
    to_fixed(value.unwrap_or(f64::NAN), 2)
}

impl TableRow {
    pub fn from_post(post: &Post) -> Self {
        let flag = post.text_or_missing(TextField::MisinformationFlag);

        Self {
            platform: post.text_or_missing(TextField::Platform).to_string(),
            content_text: post.text_or_missing(TextField::ContentText).to_string(),
            content_category: post.text_or_missing(TextField::ContentCategory).to_string(),
            misinformation_flag: flag.to_string(),
            misinformation_class: format!("misinformation-{}", flag.to_lowercase()),
            engagement: score(post.engagement_score),
            toxicity: score(post.toxicity_score),
            sentiment: score(post.sentiment_score),
            political_leaning: post.text_or_missing(TextField::PoliticalLeaning).to_string(),
            moderation_action: post.text_or_missing(TextField::ModerationAction).to_string(),
            sentiment_bucket: SentimentBucket::classify(post.sentiment_score),
            toxicity_bucket: ToxicityBucket::classify(post.toxicity_score),
        }
    }
}

/// Render rows for `posts`, one per post, in input order
pub fn render_rows<'a, I>(posts: I) -> Vec<TableRow>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts.into_iter().map(TableRow::from_post).collect()
}

/// Case-insensitive substring match on content text, platform or category.
///
/// An empty term keeps every post. Posts missing a searched field simply
/// don't match on it.
pub fn matches(post: &Post, lowered_term: &str) -> bool {
    lowered_term.is_empty()
        || SEARCH_FIELDS.iter().any(|field| {
            post.text(*field)
                .map_or(false, |text| text.to_lowercase().contains(lowered_term))
        })
}

/// Keep the posts matching `term`, preserving order
pub fn filter<'a, I>(posts: I, term: &str) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let lowered = term.to_lowercase();
    posts.into_iter().filter(|post| matches(post, &lowered)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(platform: &str, text: &str, category: &str) -> Post {
        Post {
            platform: Some(platform.to_string()),
            content_text: Some(text.to_string()),
            content_category: Some(category.to_string()),
            misinformation_flag: Some("False".to_string()),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post("Twitter", "Moon landing was staged", "Science"),
            post("Facebook", "New clinic opens downtown", "Health"),
            post("Reddit", "Election results certified", "Politics"),
            post("TikTok", "Miracle cure for everything", "HEALTH"),
        ]
    }

    #[test]
    fn test_sentiment_thresholds() {
        assert_eq!(SentimentBucket::classify(Some(0.21)), SentimentBucket::Positive);
        assert_eq!(SentimentBucket::classify(Some(0.2)), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::classify(Some(-0.2)), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::classify(Some(-0.21)), SentimentBucket::Negative);
        assert_eq!(SentimentBucket::classify(Some(f64::NAN)), SentimentBucket::Neutral);
        assert_eq!(SentimentBucket::classify(None), SentimentBucket::Neutral);
    }

    #[test]
    fn test_toxicity_thresholds() {
        assert_eq!(ToxicityBucket::classify(Some(0.71)), Some(ToxicityBucket::High));
        assert_eq!(ToxicityBucket::classify(Some(0.7)), Some(ToxicityBucket::Medium));
        assert_eq!(ToxicityBucket::classify(Some(0.41)), Some(ToxicityBucket::Medium));
        assert_eq!(ToxicityBucket::classify(Some(0.4)), None);
        assert_eq!(ToxicityBucket::classify(None), None);
    }

    #[test]
    fn test_row_formatting_does_not_mutate_post() {
        let mut source = post("Twitter", "text", "Health");
        source.engagement_score = Some(12.3456);
        source.toxicity_score = Some(0.755);
        source.sentiment_score = Some(-0.5);
        source.misinformation_flag = Some("True".to_string());
        let before = source.clone();

        let row = TableRow::from_post(&source);
        assert_eq!(row.engagement, "12.35");
        assert_eq!(row.sentiment, "-0.50");
        assert_eq!(row.misinformation_class, "misinformation-true");
        assert_eq!(row.sentiment_bucket, SentimentBucket::Negative);
        assert_eq!(row.toxicity_bucket, Some(ToxicityBucket::High));
        assert_eq!(source, before);
    }

    #[test]
    fn test_row_scores_round_halfway_up() {
        let mut source = post("Twitter", "text", "Health");
        source.toxicity_score = Some(0.125);
        source.sentiment_score = Some(-0.375);
        source.engagement_score = Some(2.5);

        let row = TableRow::from_post(&source);
        assert_eq!(row.toxicity, "0.13");
        assert_eq!(row.sentiment, "-0.38");
        assert_eq!(row.engagement, "2.50");
    }

    #[test]
    fn test_row_for_incomplete_post() {
        let row = TableRow::from_post(&Post::default());
        assert_eq!(row.platform, "n/a");
        assert_eq!(row.engagement, "NaN");
        assert_eq!(row.misinformation_class, "misinformation-n/a");
        assert_eq!(row.toxicity_bucket, None);
    }

    #[test]
    fn test_render_row_count_and_order() {
        let posts = sample();
        let rows = render_rows(&posts);
        assert_eq!(rows.len(), posts.len());
        assert_eq!(rows[2].platform, "Reddit");
        assert_eq!(render_rows(&posts), rows);
        assert!(render_rows(&[]).is_empty());
    }

    #[test]
    fn test_empty_term_keeps_everything() {
        let posts = sample();
        let filtered = filter(&posts, "");
        assert_eq!(filtered.len(), posts.len());
        assert!(filtered.iter().zip(posts.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_filter_matches_any_search_field() {
        let posts = sample();

        let by_category: Vec<_> = filter(&posts, "health").into_iter().map(|p| p.text_or_missing(TextField::Platform)).collect();
        assert_eq!(by_category, vec!["Facebook", "TikTok"]);

        let by_platform = filter(&posts, "REDDIT");
        assert_eq!(by_platform.len(), 1);

        let by_text = filter(&posts, "cure");
        assert_eq!(by_text[0].text_or_missing(TextField::Platform), "TikTok");
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let posts = sample();
        let filtered = filter(&posts, "zzz-no-such-term");
        assert!(filtered.is_empty());
        assert!(render_rows(filtered).is_empty());
    }

    #[test]
    fn test_filter_idempotent() {
        let posts = sample();
        let once = filter(&posts, "e");
        let twice = filter(once.iter().copied(), "e");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_skips_missing_fields() {
        let posts = vec![Post::default(), post("Twitter", "hello", "News")];
        assert_eq!(filter(&posts, "n/a").len(), 0);
        assert_eq!(filter(&posts, "").len(), 2);
    }
}
