//! Site content sections: hero, about, contact.
//!
//! Each section is one record, created by migration and never deleted. Admin
//! saves merge into the stored payload: keys absent from the update keep their
//! stored values and keys set to `null` are removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Content errors.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Section name not recognised.
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Payload does not have the section shape.
    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

/// A site section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSection {
    /// Landing hero.
    HomeHero,
    /// About section.
    About,
    /// Contact section.
    Contact,
}

impl SiteSection {
    /// All sections, in page order.
    pub const ALL: [Self; 3] = [Self::HomeHero, Self::About, Self::Contact];

    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HomeHero => "home_hero",
            Self::About => "about",
            Self::Contact => "contact",
        }
    }
}

impl std::fmt::Display for SiteSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SiteSection {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ContentError::UnknownSection(s.to_string()))
    }
}

/// A social profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Platform name, e.g. "GitHub".
    pub platform: String,
    /// Profile URL.
    pub url: String,
}

/// Typed view of a section payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBody {
    /// Main text.
    #[serde(default)]
    pub description: String,
    /// Skills list (about).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Tools list (about).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    /// Social links (contact).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<SocialLink>>,
    /// Contact email (contact).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A stored section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    /// Section.
    pub section_name: SiteSection,
    /// Heading.
    pub title: Option<String>,
    /// Sub-heading.
    pub subtitle: Option<String>,
    /// Payload.
    pub content: Value,
    /// Last save.
    pub updated_at: DateTime<Utc>,
}

/// An admin save of one section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionUpdate {
    /// New heading.
    pub title: Option<String>,
    /// New sub-heading.
    pub subtitle: Option<String>,
    /// Payload keys to overwrite.
    pub content: Option<Map<String, Value>>,
}

impl SectionUpdate {
    /// Merge this update into the stored section.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidContent` if the merged payload does not
    /// have the section shape.
    pub fn apply(self, current: &SiteContent) -> Result<SiteContent, ContentError> {
        let content = match self.content {
            Some(patch) => merge_content(&current.content, patch)?,
            None => current.content.clone(),
        };

        Ok(SiteContent {
            section_name: current.section_name,
            title: self.title.or_else(|| current.title.clone()),
            subtitle: self.subtitle.or_else(|| current.subtitle.clone()),
            content,
            updated_at: Utc::now(),
        })
    }
}

/// Overlay `patch` onto a stored payload.
///
/// # Errors
///
/// Returns `ContentError::InvalidContent` if the result is not a valid
/// section body.
pub fn merge_content(stored: &Value, patch: Map<String, Value>) -> Result<Value, ContentError> {
    let mut merged = match stored {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for (key, value) in patch {
        if value.is_null() {
            merged.remove(&key);
        } else {
            merged.insert(key, value);
        }
    }

    let merged = Value::Object(merged);
    serde_json::from_value::<SectionBody>(merged.clone())
        .map_err(|e| ContentError::InvalidContent(e.to_string()))?;
    Ok(merged)
}
