//! Locale catalogs and message lookup.
//!
//! Catalogs are TOML files embedded at compile time and flattened into dot
//! paths (`buttons.rename.success`). Lookup falls back from the requested
//! locale to `en-us`, and finally to the key itself so a missing entry never
//! breaks a reply. Placeholders use `{name}` syntax.

use std::collections::HashMap;

use crate::errors::{Error, Result};

/// Locale every lookup falls back to.
pub const FALLBACK_LOCALE: &str = "en-us";

const CATALOGS: &[(&str, &str)] = &[
    (
        "en-us",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/lang/en-us.toml")),
    ),
    (
        "de",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/lang/de.toml")),
    ),
];

/// Flattened message catalogs keyed by lowercase locale name.
pub struct Translations {
    locales: HashMap<String, HashMap<String, String>>,
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, nested, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

impl Translations {
    /// Parses the embedded catalogs.
    pub fn load() -> Result<Self> {
        let mut locales = HashMap::new();
        for (name, raw) in CATALOGS {
            let value: toml::Value = raw
                .parse()
                .map_err(|e| Error::config(format!("invalid locale catalog {name}: {e}")))?;
            let mut flat = HashMap::new();
            flatten("", &value, &mut flat);
            locales.insert((*name).to_string(), flat);
        }
        Ok(Self { locales })
    }

    /// Whether a catalog exists for `locale` (case-insensitive).
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(&locale.to_lowercase())
    }

    /// Picks the locale for a reply: the interaction locale when a catalog
    /// for it exists, else the guild's preferred locale, else the fallback.
    #[must_use]
    pub fn resolve_locale(&self, interaction_locale: &str, guild_locale: Option<&str>) -> String {
        let interaction = interaction_locale.to_lowercase();
        if self.has_locale(&interaction) {
            return interaction;
        }
        if let Some(guild) = guild_locale {
            let guild = guild.to_lowercase();
            if self.has_locale(&guild) {
                return guild;
            }
        }
        FALLBACK_LOCALE.to_string()
    }

    /// Looks up `key` in `locale`, falling back to `en-us` and then to the
    /// key itself.
    #[must_use]
    pub fn translate_to(&self, locale: &str, key: &str) -> String {
        let locale = locale.to_lowercase();
        self.locales
            .get(&locale)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.locales
                    .get(FALLBACK_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Like [`translate_to`](Self::translate_to), substituting `{name}`
    /// placeholders from `params`.
    #[must_use]
    pub fn translate_with(&self, locale: &str, key: &str, params: &[(&str, &str)]) -> String {
        let mut message = self.translate_to(locale, key);
        for (name, value) in params {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}
