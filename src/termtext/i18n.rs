//! Translation lookup.
//!
//! Display strings are translated by exact match on their English source
//! text: the untranslated template is the catalog key. A string with no entry
//! in the active catalog is shown as written, so an unknown locale simply
//! behaves like English.

use crate::error::{CatalogError, TemplateError};
use crate::template::{interpolate, Template};
use crate::value::SubstitutionMap;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Locale used when none is configured. Its strings are the catalog keys, so it
/// needs no catalog of its own.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Catalogs compiled into the binary, keyed by locale.
static EMBEDDED: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("fr-FR", include_str!("i18n/resources/fr-FR.all.json"))])
});

/// Localized strings for one locale, keyed by English source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    id: String,
    #[serde(default)]
    translation: String,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning the catalog for chaining.
    pub fn add(mut self, id: &str, translation: &str) -> Self {
        self.entries.insert(id.to_string(), translation.to_string());
        self
    }

    /// Parses a catalog file: a JSON array of `{"id": …, "translation": …}`.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, an entry whose id is empty, or a translation
    /// whose placeholders do not match its id (see [`check_placeholders`]).
    pub fn from_json(locale: &str, json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                locale: locale.to_string(),
                source,
            })?;

        let mut catalog = Self::new();
        for entry in entries {
            if entry.id.is_empty() {
                return Err(CatalogError::EmptyId {
                    locale: locale.to_string(),
                });
            }
            check_placeholders(locale, &entry.id, &entry.translation)?;
            catalog.entries.insert(entry.id, entry.translation);
        }
        Ok(catalog)
    }

    /// Looks up `id`. Entries left untranslated (empty) count as missing.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)
            .map(String::as_str)
            .filter(|translation| !translation.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Checks that `translation` renders with any data `id` renders with: it must
/// parse, and reference only keys the id references.
///
/// Empty translations are misses and always pass. Ids that do not parse as
/// templates are shown as plain text, so their translations are not checked.
pub fn check_placeholders(
    locale: &str,
    id: &str,
    translation: &str,
) -> Result<(), CatalogError> {
    if translation.is_empty() {
        return Ok(());
    }
    let Ok(source) = Template::parse(id) else {
        return Ok(());
    };
    let placeholder_error = |reason: String| CatalogError::Placeholder {
        locale: locale.to_string(),
        id: id.to_string(),
        reason,
    };

    let target = Template::parse(translation).map_err(|e| placeholder_error(e.to_string()))?;
    let known: Vec<String> = source.keys().collect();
    let result = match target.keys().find(|key| !known.contains(key)) {
        Some(key) => Err(placeholder_error(format!(
            "translation uses {{{{.{key}}}}}, which the source text does not provide"
        ))),
        None => Ok(()),
    };
    result
}

/// Where catalogs come from.
pub trait CatalogSource {
    /// Locales this source can provide catalogs for.
    fn locales(&self) -> Vec<String>;

    /// Loads the catalog for one of [`CatalogSource::locales`]. `Ok(None)`
    /// means there is nothing to translate with.
    fn load(&self, locale: &str) -> Result<Option<Catalog>, CatalogError>;
}

/// Catalogs compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalogs;

impl CatalogSource for EmbeddedCatalogs {
    fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = EMBEDDED.keys().map(|l| l.to_string()).collect();
        locales.sort();
        locales
    }

    fn load(&self, locale: &str) -> Result<Option<Catalog>, CatalogError> {
        EMBEDDED
            .get(locale)
            .map(|json| Catalog::from_json(locale, json))
            .transpose()
    }
}

impl CatalogSource for HashMap<String, Catalog> {
    fn locales(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn load(&self, locale: &str) -> Result<Option<Catalog>, CatalogError> {
        Ok(self.get(locale).cloned())
    }
}

/// Canonical form of a locale setting: `fr_fr.UTF-8` becomes `fr-FR`.
///
/// Returns `None` for settings that name no language (empty, `C`, `POSIX`).
pub fn normalize_locale(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.split(['.', '@']).next().unwrap_or(raw);
    if raw.is_empty() || raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return None;
    }

    let mut parts = raw.split(['-', '_']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let mut normalized = language;
    for part in parts {
        normalized.push('-');
        normalized.push_str(&part.to_ascii_uppercase());
    }
    Some(normalized)
}

fn language_of(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

/// Translates display strings for one locale.
///
/// Built once and never changed afterwards; clones share the catalog.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    catalog: Option<Arc<Catalog>>,
}

impl Translator {
    /// A translator that returns every string unchanged.
    pub fn identity() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            catalog: None,
        }
    }

    /// A translator backed by an already-built catalog.
    pub fn from_catalog(locale: &str, catalog: Catalog) -> Self {
        Self {
            locale: locale.to_string(),
            catalog: Some(Arc::new(catalog)),
        }
    }

    /// Picks the catalog for `locale` from `source`.
    ///
    /// An exact locale match wins; otherwise the first locale sharing the
    /// language is used. Locales the source does not know about translate to
    /// the source strings.
    ///
    /// # Errors
    ///
    /// Only when the selected catalog fails to load.
    pub fn resolve(locale: &str, source: &impl CatalogSource) -> Result<Self, CatalogError> {
        let Some(wanted) = normalize_locale(locale) else {
            return Ok(Self::identity());
        };

        let mut available = source.locales();
        available.sort();
        let chosen = available
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(&wanted))
            .or_else(|| {
                available.iter().find(|candidate| {
                    language_of(candidate).eq_ignore_ascii_case(language_of(&wanted))
                })
            });

        let Some(chosen) = chosen else {
            tracing::debug!(locale = %wanted, "no translation catalog, using source strings");
            return Ok(Self {
                locale: wanted,
                catalog: None,
            });
        };

        let catalog = source.load(chosen)?;
        tracing::debug!(
            locale = %chosen,
            entries = catalog.as_ref().map_or(0, Catalog::len),
            "loaded translation catalog"
        );
        Ok(Self {
            locale: chosen.clone(),
            catalog: catalog.map(Arc::new),
        })
    }

    /// The locale this translator was resolved to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the localized form of `source`, or `source` itself when the
    /// catalog has no entry for that exact string.
    pub fn translate<'a>(&'a self, source: &'a str) -> &'a str {
        match self.catalog.as_ref().and_then(|c| c.lookup(source)) {
            Some(translation) => translation,
            None => {
                if self.catalog.is_some() {
                    tracing::trace!(locale = %self.locale, source, "no translation");
                }
                source
            }
        }
    }

    /// Translates `source` and fills in its placeholders from `args`.
    ///
    /// # Errors
    ///
    /// Returns the [`TemplateError`] of the (translated) template.
    pub fn translate_with(
        &self,
        source: &str,
        args: &SubstitutionMap,
    ) -> Result<String, TemplateError> {
        interpolate(self.translate(source), args)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::identity()
    }
}
