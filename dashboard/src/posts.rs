// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Post records and the in-memory dataset they are loaded into
//!
//! Records are read leniently: a field that is missing or carries the wrong
//! JSON type is kept as `None` instead of rejecting the record, and shows up
//! downstream as a placeholder (`NaN` for numbers, [`MISSING_TEXT`] for text).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Placeholder for a text field the record did not carry
pub const MISSING_TEXT: &str = "n/a";

/// Label derived from the textual `Misinformation_Flag`
///
/// Matching is exact and case-sensitive: `"true"` is not `"True"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MisinfoLabel {
    /// Flag is `"True"`
    Misinformation,
    /// Flag is `"False"`
    Authentic,
    /// Flag is `"Uncertain"`
    Uncertain,
    /// Any other value, including a missing flag
    Unknown,
}

impl MisinfoLabel {
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("True") => MisinfoLabel::Misinformation,
            Some("False") => MisinfoLabel::Authentic,
            Some("Uncertain") => MisinfoLabel::Uncertain,
            _ => MisinfoLabel::Unknown,
        }
    }

    /// Numeric training label (1 = misinformation, 0 = authentic)
    pub fn to_binary(&self) -> Option<u8> {
        match self {
            MisinfoLabel::Misinformation => Some(1),
            MisinfoLabel::Authentic => Some(0),
            MisinfoLabel::Uncertain | MisinfoLabel::Unknown => None,
        }
    }
}

/// Text columns of a post that can be grouped or searched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextField {
    Platform,
    ContentText,
    ContentCategory,
    MisinformationFlag,
    PoliticalLeaning,
    ModerationAction,
}

impl TextField {
    /// Key of this field in the input document
    pub fn column_name(&self) -> &'static str {
        match self {
            TextField::Platform => "Platform",
            TextField::ContentText => "Content_Text",
            TextField::ContentCategory => "Content_Category",
            TextField::MisinformationFlag => "Misinformation_Flag",
            TextField::PoliticalLeaning => "Political_Leaning",
            TextField::ModerationAction => "Moderation_Action",
        }
    }
}

/// A single social-media post as it appears in the input document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "Platform", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(rename = "Content_Text", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(rename = "Content_Category", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content_category: Option<String>,
    /// Textual boolean, expected `"True"` or `"False"`
    #[serde(rename = "Misinformation_Flag", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub misinformation_flag: Option<String>,
    #[serde(rename = "Engagement_Score", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
    #[serde(rename = "Like_Count", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub like_count: Option<f64>,
    #[serde(rename = "Share_Count", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub share_count: Option<f64>,
    #[serde(rename = "Comment_Count", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<f64>,
    /// Expected in [0, 1]
    #[serde(rename = "Toxicity_Score", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub toxicity_score: Option<f64>,
    /// Expected in [-1, 1]
    #[serde(rename = "Sentiment_Score", default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(rename = "Political_Leaning", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub political_leaning: Option<String>,
    #[serde(rename = "Moderation_Action", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub moderation_action: Option<String>,
    /// Columns the dashboard does not use
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        // JSON `true` becomes "true", which never equals the "True" flag
        other => Some(other.to_string()),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

impl Post {
    /// Build a post from an arbitrary JSON value.
    ///
    /// Values that are not objects become a post with every field missing.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Platform => self.platform.as_deref(),
            TextField::ContentText => self.content_text.as_deref(),
            TextField::ContentCategory => self.content_category.as_deref(),
            TextField::MisinformationFlag => self.misinformation_flag.as_deref(),
            TextField::PoliticalLeaning => self.political_leaning.as_deref(),
            TextField::ModerationAction => self.moderation_action.as_deref(),
        }
    }

    /// Text of a field, or [`MISSING_TEXT`] when absent
    pub fn text_or_missing(&self, field: TextField) -> &str {
        self.text(field).unwrap_or(MISSING_TEXT)
    }

    pub fn label(&self) -> MisinfoLabel {
        MisinfoLabel::from_flag(self.misinformation_flag.as_deref())
    }

    /// True only when the flag is exactly `"True"`
    pub fn is_flagged(&self) -> bool {
        self.misinformation_flag.as_deref() == Some("True")
    }

    /// Likes + shares + comments, `None` if any count is missing.
    ///
    /// Counts are summed as given, negative or fractional ones included.
    pub fn interactions(&self) -> Option<f64> {
        Some(self.like_count? + self.share_count? + self.comment_count?)
    }
}

/// The full, read-only record set of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    posts: Vec<Post>,
}

impl Dataset {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Parse a JSON document whose root is an array of post records.
    ///
    /// Fails only when the body is not JSON or the root is not an array.
    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let values: Vec<Value> = serde_json::from_slice(bytes)?;
        Ok(Self::new(values.into_iter().map(Post::from_value).collect()))
    }

    /// Generate a synthetic dataset for demos and tests
    pub fn synthetic(size: usize, seed: u64) -> Self {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let platforms = ["Twitter", "Facebook", "Reddit", "Instagram", "TikTok"];
        let categories = ["Politics", "Health", "Science", "Entertainment", "Technology"];
        let flags = ["True", "False", "False", "Uncertain"];
        let leanings = ["Left", "Right", "Center", "Neutral"];
        let actions = ["None", "Flagged", "Removed", "Warning Label"];

        let fake_phrases = [
            "BREAKING: shocking discovery they tried to hide",
            "You won't believe what this miracle cure does",
            "Secret documents reveal the real plan",
        ];
        let real_phrases = [
            "According to official reports released today",
            "New peer-reviewed study finds modest effect",
            "Local council confirms updated schedule",
        ];

        let posts = (0..size)
            .map(|i| {
                let flag = flags[rng.gen_range(0..flags.len())];
                let phrases = if flag == "True" { &fake_phrases } else { &real_phrases };
                let phrase = phrases[rng.gen_range(0..phrases.len())];

                Post {
                    platform: Some(platforms[rng.gen_range(0..platforms.len())].to_string()),
                    content_text: Some(format!("{} (post {})", phrase, i)),
                    content_category: Some(categories[rng.gen_range(0..categories.len())].to_string()),
                    misinformation_flag: Some(flag.to_string()),
                    engagement_score: Some(rng.gen_range(0.0..100.0)),
                    like_count: Some(f64::from(rng.gen_range(0u32..5000))),
                    share_count: Some(f64::from(rng.gen_range(0u32..1000))),
                    comment_count: Some(f64::from(rng.gen_range(0u32..500))),
                    toxicity_score: Some(rng.gen_range(0.0..1.0)),
                    sentiment_score: Some(rng.gen_range(-1.0..1.0)),
                    political_leaning: Some(leanings[rng.gen_range(0..leanings.len())].to_string()),
                    moderation_action: Some(actions[rng.gen_range(0..actions.len())].to_string()),
                    extra: HashMap::new(),
                }
            })
            .collect();

        Self::new(posts)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Count posts per misinformation label
    pub fn label_distribution(posts: &[Post]) -> HashMap<MisinfoLabel, usize> {
        let mut dist = HashMap::new();
        for post in posts {
            *dist.entry(post.label()).or_insert(0) += 1;
        }
        dist
    }
}
