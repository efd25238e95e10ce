//! Information extraction pipeline for Chinese text
//!
//! Entity recognition rides entirely on jieba's joint segmentation and
//! POS tagging (`nr` person, `ns` place, `nt` organization), dates come from
//! a fixed regex pass, keywords from jieba's TF-IDF ranking, and relations
//! from a trivial pairwise rule. No model of its own.

use std::collections::HashMap;
use std::path::Path;

use jieba_rs::{Jieba, KeywordExtract, TfIdf};
use regex::Regex;
use serde::{Deserialize, Serialize};

use textinfo_core::{Result, TextInfoError};

pub mod dict;

/// Domain tag that enables the relation rule
pub const DEFAULT_DOMAIN: &str = "general";

/// Predicate used for every emitted relation
pub const RELATION_PREDICATE: &str = "关联";

/// Pattern for full Chinese calendar dates (e.g. `2024年3月15日`)
const DATE_PATTERN: &str = r"\d{4}年\d{1,2}月\d{1,2}日";

/// How many keywords the ranking pass keeps
const KEYWORD_COUNT: usize = 5;

// ============================================================================
// Result Types
// ============================================================================

/// Entity categories recognized by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Location,
    Organization,
    Date,
}

impl EntityType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Location => "location",
            Self::Organization => "organization",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single extracted entity with character offsets into the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity category
    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Surface form as it appears in the text
    pub value: String,

    /// Character offset of the entity start
    pub start_pos: usize,

    /// Character offset one past the entity end
    pub end_pos: usize,
}

/// A subject-predicate-object triple over extracted entity values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Full result of one extraction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub entities: Vec<Entity>,
    pub keywords: Vec<String>,
    pub relations: Vec<Relation>,
}

// ============================================================================
// Extractor
// ============================================================================

/// Extraction pipeline handle
///
/// Holds the loaded segmenter and the compiled date pattern. Built once at
/// startup and shared read-only afterwards; the dictionary is never mutated
/// after construction.
pub struct InfoExtractor {
    jieba: Jieba,
    /// Userdict tags, applied over the segmenter's own tag. jieba-rs keeps
    /// the stock tag for words it already knows, so the userdict tag has to
    /// be carried separately.
    tag_overrides: HashMap<String, String>,
    keyword_ranker: TfIdf,
    date_pattern: Regex,
}

impl InfoExtractor {
    /// Build an extractor with the stock dictionary only
    pub fn new() -> Result<Self> {
        Self::build(Jieba::new(), HashMap::new())
    }

    /// Build an extractor that also loads the user dictionary at `path`,
    /// creating the file with sample entries when it does not exist
    pub fn with_userdict(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dict::ensure_exists(path)?;

        let mut jieba = Jieba::new();
        let tag_overrides = dict::load_into(&mut jieba, path)?;
        Self::build(jieba, tag_overrides)
    }

    fn build(jieba: Jieba, tag_overrides: HashMap<String, String>) -> Result<Self> {
        let date_pattern = Regex::new(DATE_PATTERN)
            .map_err(|e| TextInfoError::Extraction(format!("invalid date pattern: {e}")))?;

        Ok(Self {
            jieba,
            tag_overrides,
            keyword_ranker: TfIdf::default(),
            date_pattern,
        })
    }

    /// Run the full pipeline over `text`
    ///
    /// `domain` is a free-form tag; only the literal `"general"` enables the
    /// relation rule. Entity order is all tag-derived entities in
    /// segmentation order, then all date matches in text order.
    pub fn extract(&self, text: &str, domain: &str) -> Result<Extraction> {
        let mut entities = self.tag_entities(text);
        entities.extend(self.date_entities(text));

        let keywords = self.keywords(text);
        let relations = self.relate(domain, &entities);

        Ok(Extraction {
            entities,
            keywords,
            relations,
        })
    }

    /// Entities derived from POS tags: `nr` person, `ns` location, `nt` or
    /// a word containing `公司` organization
    fn tag_entities(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for token in self.jieba.tag(text, true) {
            let tag = self
                .tag_overrides
                .get(token.word)
                .map(String::as_str)
                .unwrap_or(token.tag);

            let entity_type = if tag == "nr" {
                EntityType::Person
            } else if tag == "ns" {
                EntityType::Location
            } else if tag == "nt" || token.word.contains("公司") {
                EntityType::Organization
            } else {
                continue;
            };

            // Offsets come from the first occurrence of the word in the full
            // text, not from the token position. A repeated word keeps the
            // offsets of its first occurrence.
            if let Some(byte_start) = text.find(token.word) {
                let start_pos = text[..byte_start].chars().count();
                entities.push(Entity {
                    entity_type,
                    value: token.word.to_string(),
                    start_pos,
                    end_pos: start_pos + token.word.chars().count(),
                });
            }
        }

        entities
    }

    /// Date entities from the fixed pattern, with exact per-match offsets
    fn date_entities(&self, text: &str) -> Vec<Entity> {
        self.date_pattern
            .find_iter(text)
            .map(|m| {
                let start_pos = text[..m.start()].chars().count();
                let value = m.as_str().to_string();
                let end_pos = start_pos + value.chars().count();
                Entity {
                    entity_type: EntityType::Date,
                    value,
                    start_pos,
                    end_pos,
                }
            })
            .collect()
    }

    /// Top-ranked keywords, no POS filter, no deduplication against entities
    fn keywords(&self, text: &str) -> Vec<String> {
        self.keyword_ranker
            .extract_keywords(&self.jieba, text, KEYWORD_COUNT, vec![])
            .into_iter()
            .map(|k| k.keyword)
            .collect()
    }

    /// At most one relation: the first two entities, linked by the fixed
    /// predicate, and only in the general domain
    fn relate(&self, domain: &str, entities: &[Entity]) -> Vec<Relation> {
        if domain == DEFAULT_DOMAIN && entities.len() >= 2 {
            vec![Relation {
                subject: entities[0].value.clone(),
                predicate: RELATION_PREDICATE.to_string(),
                object: entities[1].value.clone(),
            }]
        } else {
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
