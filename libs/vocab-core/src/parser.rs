//! Parser for plain-text word lists.
//!
//! # Format
//! ```text
//! # Top 100 High-Frequency Words
//! the|el/la|article|El perro es grande.
//! to be|ser/estar|verb|Quiero ser doctor.
//!
//! # Food, Dining, & Travel
//! apple|manzana|noun|Me gusta la manzana roja.
//! ```
//!
//! Rows are `target|source|type|example`. A `#` header names the category,
//! which decides the part (deck) of every row below it.

use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};

/// Part used for rows under an unknown category or before any header.
pub const FALLBACK_PART: u32 = 10;

/// Known categories and the part they belong to.
pub const CATEGORY_PARTS: &[(&str, u32)] = &[
    ("Top 100 High-Frequency Words", 1),
    ("Essential Regular Verbs", 2),
    ("Essential Irregular & Stem-Changing Verbs", 3),
    ("Core Adjectives & Adverbs", 4),
    ("Time, Numbers, & Calendar", 5),
    ("People, Family, & Home", 6),
    ("Food, Dining, & Travel", 7),
    ("Health, Body & Emergencies", 8),
    ("Common Connectors & Prepositions", 9),
    ("Business, Study, & Tech Essentials", 10),
    ("Travel, Environment & Additional Nouns", 10),
    ("Colors & Basic Qualities", 10),
    ("Final Extra Essential Words", 10),
];

/// Word parsed from a list (no ID yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWord {
    pub target: String,
    pub source: String,
    pub kind: Option<String>,
    pub example: String,
    pub part: u32,
    pub line_number: usize,
}

/// Parsed word list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCatalog {
    pub words: Vec<RawWord>,
    /// Category headers not found in `CATEGORY_PARTS`, in order of appearance.
    pub unknown_categories: Vec<String>,
}

/// Look up the part for a category name.
pub fn part_for_category(category: &str) -> Option<u32> {
    CATEGORY_PARTS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, part)| *part)
}

/// Parse a word list.
pub fn parse(content: &str) -> Result<ParsedCatalog> {
    let mut catalog = ParsedCatalog::default();
    let mut part = FALLBACK_PART;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') {
            let category = trimmed.trim_start_matches('#').trim();
            part = match part_for_category(category) {
                Some(part) => part,
                None => {
                    catalog.unknown_categories.push(category.to_string());
                    FALLBACK_PART
                }
            };
            continue;
        }

        catalog.words.push(parse_row(trimmed, part, line_num)?);
    }

    Ok(catalog)
}

fn parse_row(row: &str, part: u32, line: usize) -> Result<RawWord> {
    // The example is the remainder of the row and may itself contain '|'
    let fields: Vec<&str> = row.splitn(4, '|').map(str::trim).collect();
    if fields.len() < 4 {
        return Err(ParseError::MalformedRow {
            line,
            fields: fields.len(),
        });
    }

    let required = |value: &str, field: &'static str| {
        if value.is_empty() {
            Err(ParseError::MissingField { line, field })
        } else {
            Ok(value.to_string())
        }
    };

    Ok(RawWord {
        target: required(fields[0], "target")?,
        source: required(fields[1], "source")?,
        kind: Some(fields[2]).filter(|k| !k.is_empty()).map(str::to_string),
        example: fields[3].to_string(),
        part,
        line_number: line,
    })
}
