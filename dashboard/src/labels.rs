// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Labeled train/test split for misinformation classifiers
//!
//! Posts flagged "True" become label 1, "False" label 0; "Uncertain" and any
//! other flag are dropped. The split is shuffled with a seeded RNG so the same
//! dataset and seed always produce the same files.

use crate::error::ExportError;
use crate::posts::Post;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// One `(text, label)` training example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub label: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSplit {
    pub train: Vec<LabeledExample>,
    pub test: Vec<LabeledExample>,
    /// Posts left out: uncertain or unknown flag, or no content text
    pub skipped: usize,
}

impl LabeledSplit {
    /// Build a shuffled split; `test_fraction` is clamped to [0, 1].
    ///
    /// The test share is rounded up, so any non-zero fraction of a non-empty
    /// set yields at least one test example.
    pub fn from_posts(posts: &[Post], test_fraction: f64, seed: u64) -> Self {
        let mut skipped = 0;
        let mut examples: Vec<LabeledExample> = posts
            .iter()
            .filter_map(|post| {
                let example = match (post.label().to_binary(), post.content_text.as_ref()) {
                    (Some(label), Some(text)) => Some(LabeledExample {
                        text: text.clone(),
                        label,
                    }),
                    _ => None,
                };
                if example.is_none() {
                    skipped += 1;
                }
                example
            })
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        examples.shuffle(&mut rng);

        let fraction = if test_fraction.is_nan() { 0.0 } else { test_fraction.clamp(0.0, 1.0) };
        let n_test = ((examples.len() as f64) * fraction).ceil() as usize;
        let train = examples.split_off(n_test.min(examples.len()));

        tracing::info!(
            "Labeled split: {} train, {} test, {} skipped",
            train.len(),
            examples.len(),
            skipped
        );

        Self {
            train,
            test: examples,
            skipped,
        }
    }

    /// Label counts as `(misinformation, authentic)`
    pub fn label_counts(examples: &[LabeledExample]) -> (usize, usize) {
        let positives = examples.iter().filter(|e| e.label == 1).count();
        (positives, examples.len() - positives)
    }

    /// Write `train.csv` and `test.csv` with `text,label` headers
    pub fn write_csv(&self, output_dir: &Path) -> Result<(PathBuf, PathBuf), ExportError> {
        std::fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let train_path = output_dir.join("train.csv");
        let test_path = output_dir.join("test.csv");
        write_examples(&train_path, &self.train)?;
        write_examples(&test_path, &self.test)?;

        Ok((train_path, test_path))
    }
}

fn write_examples(path: &Path, examples: &[LabeledExample]) -> Result<(), ExportError> {
    let to_err = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(to_err)?;
    if examples.is_empty() {
        writer.write_record(["text", "label"]).map_err(to_err)?;
    }
    for example in examples {
        writer.serialize(example).map_err(to_err)?;
    }
    writer.flush().map_err(|e| to_err(e.into()))?;

    tracing::info!("Wrote {} examples to {}", examples.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::Dataset;

    fn post(text: &str, flag: &str) -> Post {
        Post {
            content_text: Some(text.to_string()),
            misinformation_flag: Some(flag.to_string()),
            ..Default::default()
        }
    }

    fn posts() -> Vec<Post> {
        (0..10)
            .map(|i| post(&format!("post {}", i), if i % 2 == 0 { "True" } else { "False" }))
            .chain([post("unsure", "Uncertain"), post("odd casing", "true"), Post::default()])
            .collect()
    }

    #[test]
    fn test_split_sizes_and_filtering() {
        let split = LabeledSplit::from_posts(&posts(), DEFAULT_TEST_FRACTION, DEFAULT_SEED);

        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.skipped, 3);

        let all: Vec<LabeledExample> = split.train.iter().chain(&split.test).cloned().collect();
        assert!(all.iter().all(|e| e.text.starts_with("post ")));
        assert_eq!(LabeledSplit::label_counts(&all), (5, 5));
    }

    #[test]
    fn test_split_is_deterministic() {
        let a = LabeledSplit::from_posts(&posts(), 0.3, 7);
        let b = LabeledSplit::from_posts(&posts(), 0.3, 7);
        assert_eq!(a, b);
        assert_eq!(a.test.len(), 3);
    }

    #[test]
    fn test_fraction_edges() {
        let none = LabeledSplit::from_posts(&posts(), 0.0, 1);
        assert!(none.test.is_empty());
        assert_eq!(none.train.len(), 10);

        let all = LabeledSplit::from_posts(&posts(), 5.0, 1);
        assert!(all.train.is_empty());
        assert_eq!(all.test.len(), 10);

        let empty = LabeledSplit::from_posts(&[], 0.2, 1);
        assert!(empty.train.is_empty() && empty.test.is_empty());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let split = LabeledSplit::from_posts(Dataset::synthetic(50, 3).posts(), 0.2, 42);

        let (train_path, test_path) = split.write_csv(&dir.path().join("splits")).unwrap();

        let mut reader = csv::Reader::from_path(&train_path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["text", "label"]);
        let rows: Vec<LabeledExample> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, split.train);

        let test_rows = csv::Reader::from_path(&test_path).unwrap().records().count();
        assert_eq!(test_rows, split.test.len());
    }
}
