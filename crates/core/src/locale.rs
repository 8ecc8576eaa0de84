//! Supported languages and best-locale selection.

use crate::document::DocumentLocale;
use crate::error::CoreError;

/// Languages accepted by the `pl` query parameter.
pub const SUPPORTED_LANGS: &[&str] = &["fr", "it", "de", "en", "es", "ca", "eu", "sl", "zh"];

/// Order in which locales are tried when the preferred one is missing.
pub const LANG_FALLBACK_PRIORITY: &[&str] = &["fr", "en", "it", "de", "es", "ca", "eu", "sl", "zh"];

/// Check whether a language code is supported.
pub fn is_valid_lang(lang: &str) -> bool {
    SUPPORTED_LANGS.contains(&lang)
}

/// Validate an optional preferred-language parameter.
pub fn validate_preferred_lang(lang: Option<&str>) -> Result<Option<String>, CoreError> {
    match lang {
        None => Ok(None),
        Some(l) if is_valid_lang(l) => Ok(Some(l.to_string())),
        Some(l) => Err(CoreError::Validation(format!("invalid lang: {l}"))),
    }
}

/// Keep only the best locale for `lang`.
///
/// The exact language wins; otherwise the first locale found in
/// [`LANG_FALLBACK_PRIORITY`], and as a last resort the first locale listed.
/// Without a preferred language every locale is kept.
pub fn retain_best_locale(locales: &mut Vec<DocumentLocale>, lang: Option<&str>) {
    let Some(lang) = lang else {
        return;
    };
    if locales.len() <= 1 {
        return;
    }

    let best = std::iter::once(lang)
        .chain(LANG_FALLBACK_PRIORITY.iter().copied())
        .find_map(|l| locales.iter().position(|loc| loc.lang == l))
        .unwrap_or(0);

    let chosen = locales.swap_remove(best);
    locales.clear();
    locales.push(chosen);
}
