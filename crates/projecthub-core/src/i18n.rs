//! Locale handling.
//!
//! Paths are locale-agnostic internally. Every locale except the default one
//! is addressed through a leading `/{locale}` segment, so `/projects/a` is
//! served as `/projects/a` (default) and `/de/projects/a`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Ordered set of supported locales with one designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<String>,
    default: String,
}

impl LocaleSet {
    /// Create a locale set.
    ///
    /// Fails when the set is empty, contains duplicates or blank codes, or
    /// does not contain the default locale.
    pub fn new<I, S>(locales: I, default: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locales: Vec<String> = locales.into_iter().map(Into::into).collect();
        let default = default.into();

        if locales.is_empty() {
            return Err(CoreError::locale("at least one locale is required"));
        }

        for (i, locale) in locales.iter().enumerate() {
            if locale.is_empty() || locale.contains('/') {
                return Err(CoreError::locale(format!("invalid locale code '{locale}'")));
            }
            if locales[..i].contains(locale) {
                return Err(CoreError::locale(format!("duplicate locale '{locale}'")));
            }
        }

        if !locales.contains(&default) {
            return Err(CoreError::locale(format!(
                "default locale '{default}' is not one of {locales:?}"
            )));
        }

        Ok(Self { locales, default })
    }

    /// All locales in configured order.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Iterate over locale codes in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    /// The default locale.
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Number of locales.
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Always false; a locale set holds at least the default locale.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Whether `value` is a supported locale code.
    pub fn is_locale(&self, value: &str) -> bool {
        self.locales.iter().any(|l| l == value)
    }

    /// Map an optional locale code to a supported one, falling back to the default.
    pub fn resolve_locale<'a>(&'a self, locale: Option<&str>) -> &'a str {
        locale
            .and_then(|l| self.locales.iter().find(|known| *known == l))
            .map_or(self.default.as_str(), String::as_str)
    }

    /// Remove a leading locale segment from a path.
    ///
    /// A missing leading slash is added, `/{locale}` becomes `/` and, for
    /// non-default locales, `/{locale}/rest` becomes `/rest`. The default
    /// locale is never a path prefix, so `/{default}/rest` is kept as is.
    pub fn strip_locale(&self, path: &str) -> String {
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        for locale in &self.locales {
            let Some(rest) = normalized
                .strip_prefix('/')
                .and_then(|p| p.strip_prefix(locale.as_str()))
            else {
                continue;
            };
            if rest.is_empty() || rest == "/" {
                return "/".to_string();
            }
            if rest.starts_with('/') && *locale != self.default {
                return rest.to_string();
            }
        }

        normalized
    }

    /// Qualify a path for `locale`.
    ///
    /// The default locale keeps the path as is; other locales get a `/{locale}`
    /// prefix, with the root path becoming `/{locale}` (no trailing slash).
    /// Unknown locales are treated as the default.
    pub fn localize_path(&self, path: &str, locale: &str) -> String {
        let normalized = self.strip_locale(path);
        let locale = self.resolve_locale(Some(locale));

        if locale == self.default {
            normalized
        } else if normalized == "/" {
            format!("/{locale}")
        } else {
            format!("/{locale}{normalized}")
        }
    }
}

/// A value that is either shared by all locales or translated per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedValue<T> {
    /// Same value for every locale.
    Plain(T),
    /// Translations keyed by locale code.
    PerLocale(BTreeMap<String, T>),
}

impl<T> LocalizedValue<T> {
    /// Resolve the value for `locale`.
    ///
    /// Falls back to the default locale, then to the first translation in
    /// locale-set order, then to any translation at all.
    pub fn resolve(&self, locale: &str, locales: &LocaleSet) -> Option<&T> {
        match self {
            Self::Plain(value) => Some(value),
            Self::PerLocale(map) => map
                .get(locale)
                .or_else(|| map.get(locales.default_locale()))
                .or_else(|| locales.iter().find_map(|l| map.get(l)))
                .or_else(|| map.values().next()),
        }
    }
}
