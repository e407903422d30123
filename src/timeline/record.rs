//! Slide source rows.
//!
//! Rows arrive as a JSON array exported from the product spreadsheet,
//! where every cell is a string, or hand-written, where the skip flag is a
//! plain boolean. Both wire shapes parse.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{SlatecastError, SlatecastResult};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideRecord {
    pub image: String,
    pub title: String,
    pub bullets: Vec<String>,
    #[serde(alias = "capacity_text")]
    pub capacity: String,
    #[serde(alias = "dimensions_text", alias = "dimension_text")]
    pub dimensions: String,
    #[serde(deserialize_with = "skip_flag")]
    pub skip: bool,
}

impl SlideRecord {
    pub fn skip_requested(&self) -> bool {
        self.skip
    }
}

/// Accepts a boolean or a spreadsheet-style cell, where "1", "true",
/// "yes" and "y" (any case, padded or not) mean skip.
fn skip_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Text(String),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Flag(flag) => flag,
        Repr::Text(text) => matches!(
            text.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "y"
        ),
    })
}

pub fn load_records(path: &Path) -> SlatecastResult<Vec<SlideRecord>> {
    let file =
        File::open(path).with_context(|| format!("opening slide records {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|err| {
        SlatecastError::serde(format!("parsing slide records {}: {err}", path.display()))
    })
}
