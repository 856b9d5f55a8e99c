//! Localization catalogs and member-facing translation helpers.
//!
//! # Responsibility
//! - Load per-locale message catalogs and answer keyed lookups.
//! - Apply and strip member-field translations around the save path.
//!
//! # Invariants
//! - Lookup results are tri-state: found text, an explicitly empty entry, or
//!   a missing key. The raw key is never echoed back as a value.
//! - Whether a field was edited is read from the record's override flags,
//!   never inferred by comparing strings against the catalog.

use crate::model::member::FamilyMember;
use log::error;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Locales shipped with embedded catalogs.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ru"];

/// Fallback locale for unknown requests and the canonical text source.
pub const DEFAULT_LOCALE: &str = "en";

const EN_MESSAGES_JSON: &str = include_str!("messages/en.json");
const RU_MESSAGES_JSON: &str = include_str!("messages/ru.json");

/// Member-field translation keys live under this top-level section.
const MEMBER_SECTION: &str = "FamilyMembers";

/// Outcome of one catalog lookup.
///
/// `Empty` and `Missing` are distinct on purpose: an empty entry is a
/// deliberate catalog decision, a missing key means the catalog has nothing
/// to say. Callers that need "no translation occurred" treat both as such
/// without any string comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Non-empty localized text.
    Found(String),
    /// Key exists but its value is blank.
    Empty,
    /// Key is absent from the catalog.
    Missing,
}

impl Translation {
    /// Returns the localized text, if any was found.
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::Found(text) => Some(text),
            Self::Empty | Self::Missing => None,
        }
    }
}

/// Errors from decoding catalog data.
#[derive(Debug)]
pub enum CatalogError {
    /// Catalog source is not valid JSON.
    Parse(serde_json::Error),
    /// Catalog root is not a JSON object.
    NotAnObject,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid catalog JSON: {err}"),
            Self::NotAnObject => write!(f, "catalog root must be a JSON object"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::NotAnObject => None,
        }
    }
}

/// One locale's message catalog.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: String,
    root: Map<String, Value>,
}

impl MessageCatalog {
    /// Decodes a catalog from JSON source.
    pub fn from_json_str(locale: impl Into<String>, json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        let Value::Object(root) = value else {
            return Err(CatalogError::NotAnObject);
        };
        Ok(Self {
            locale: locale.into(),
            root,
        })
    }

    /// Loads the embedded catalog for a locale.
    ///
    /// Unknown locales fall back to [`DEFAULT_LOCALE`]. A corrupt embedded
    /// catalog degrades to an empty one (every lookup `Missing`) instead of
    /// failing the caller.
    pub fn load_embedded(locale: &str) -> Self {
        let normalized = normalize_locale(locale);
        let source = match normalized {
            "ru" => RU_MESSAGES_JSON,
            _ => EN_MESSAGES_JSON,
        };
        match Self::from_json_str(normalized, source) {
            Ok(catalog) => catalog,
            Err(err) => {
                error!(
                    "event=catalog_load module=i18n status=error locale={normalized} error={err}"
                );
                Self {
                    locale: normalized.to_string(),
                    root: Map::new(),
                }
            }
        }
    }

    /// Returns this catalog's locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Looks up a dotted key path, e.g. `FamilyTree.emptyTitle`.
    pub fn lookup(&self, key: &str) -> Translation {
        let mut segments = key.split('.');
        let Some(first) = segments.next() else {
            return Translation::Missing;
        };
        let Some(mut cursor) = self.root.get(first) else {
            return Translation::Missing;
        };
        for segment in segments {
            let Value::Object(map) = cursor else {
                return Translation::Missing;
            };
            let Some(next) = map.get(segment) else {
                return Translation::Missing;
            };
            cursor = next;
        }
        match cursor {
            Value::String(text) if text.trim().is_empty() => Translation::Empty,
            Value::String(text) => Translation::Found(text.clone()),
            _ => Translation::Missing,
        }
    }

    /// Looks up one translatable member field.
    pub fn member_field(&self, member_id: &str, field: &str) -> Translation {
        self.lookup(&format!("{MEMBER_SECTION}.{member_id}.{field}"))
    }
}

/// Applies catalog translations to a member's display text.
///
/// Fields flagged as user-edited keep their stored value; everything else
/// takes the catalog text when one is found.
pub fn localize_member(catalog: &MessageCatalog, member: &FamilyMember) -> FamilyMember {
    let mut localized = member.clone();
    if !member.overrides.name {
        if let Some(text) = catalog.member_field(&member.id, "name").found() {
            localized.name = text.to_string();
        }
    }
    if !member.overrides.birthplace {
        if let Some(text) = catalog.member_field(&member.id, "birthplace").found() {
            localized.birthplace = text.to_string();
        }
    }
    if !member.overrides.bio {
        if let Some(text) = catalog.member_field(&member.id, "bio").found() {
            localized.bio = text.to_string();
        }
    }
    localized
}

/// Restores canonical text on fields the user did not edit.
///
/// The inverse of [`localize_member`] for the save path: a member whose
/// fields were displayed translated must not persist the translation as if
/// it were an edit. `canonical` should be the [`DEFAULT_LOCALE`] catalog.
pub fn canonicalize_member(canonical: &MessageCatalog, mut member: FamilyMember) -> FamilyMember {
    if !member.overrides.name {
        if let Some(text) = canonical.member_field(&member.id, "name").found() {
            member.name = text.to_string();
        }
    }
    if !member.overrides.birthplace {
        if let Some(text) = canonical.member_field(&member.id, "birthplace").found() {
            member.birthplace = text.to_string();
        }
    }
    if !member.overrides.bio {
        if let Some(text) = canonical.member_field(&member.id, "bio").found() {
            member.bio = text.to_string();
        }
    }
    member
}

fn normalize_locale(locale: &str) -> &'static str {
    let primary = locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or(DEFAULT_LOCALE)
        .to_ascii_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .find(|supported| **supported == primary)
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

#[cfg(test)]
mod tests {
    use super::{normalize_locale, MessageCatalog, Translation};

    #[test]
    fn lookup_distinguishes_empty_from_missing() {
        let catalog =
            MessageCatalog::from_json_str("en", r#"{"a": {"b": "text", "blank": "  "}}"#).unwrap();
        assert_eq!(catalog.lookup("a.b"), Translation::Found("text".to_string()));
        assert_eq!(catalog.lookup("a.blank"), Translation::Empty);
        assert_eq!(catalog.lookup("a.gone"), Translation::Missing);
        assert_eq!(catalog.lookup("a"), Translation::Missing);
    }

    #[test]
    fn normalize_locale_handles_region_tags_and_unknowns() {
        assert_eq!(normalize_locale("ru-RU"), "ru");
        assert_eq!(normalize_locale(" EN "), "en");
        assert_eq!(normalize_locale("de"), "en");
    }

    #[test]
    fn embedded_catalogs_load() {
        assert_eq!(MessageCatalog::load_embedded("ru").locale(), "ru");
        assert_eq!(MessageCatalog::load_embedded("xx").locale(), "en");
    }
}
