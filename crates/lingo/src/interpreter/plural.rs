//! CLDR plural category resolution.
//!
//! Backs the `plural(n)` builtin. Different languages have different plural
//! rules: English has "one" and "other", while Russian has "one", "few",
//! "many" and "other", and Arabic uses all six categories.
//!
//! Rules are cached per thread per language, keyed by the primary language
//! subtag of the locale.

use std::cell::RefCell;

use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Languages with plural data. Anything else uses English rules.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bg", "bn", "ca", "cs", "da", "de", "el", "en", "es", "et", "fa", "fi", "fr", "ga",
    "he", "hi", "hr", "hu", "id", "it", "ja", "ko", "lt", "lv", "nb", "nl", "pl", "pt", "ro",
    "ru", "sk", "sl", "sr", "sv", "th", "tr", "uk", "vi", "zh",
];

/// Language used for unknown or unparsable locales.
const FALLBACK_LANGUAGE: &str = "en";

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by language code.
    static PLURAL_RULES_CACHE: RefCell<Vec<(&'static str, PluralRules)>> = const { RefCell::new(Vec::new()) };
}

/// Supported primary language subtag of a locale tag such as `en-GB` or
/// `pt_BR`, or `"en"`.
fn normalize_lang(tag: &str) -> &'static str {
    let tag = tag.replace('_', "-");
    let Ok(locale) = Locale::try_from_str(&tag) else {
        return FALLBACK_LANGUAGE;
    };
    let language = locale.id.language;
    SUPPORTED_LANGUAGES
        .iter()
        .find(|&&code| code == language.as_str())
        .copied()
        .unwrap_or(FALLBACK_LANGUAGE)
}

fn build_rules(language: &str) -> Option<PluralRules> {
    let locale = Locale::try_from_str(language).ok()?;
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).ok()
}

/// Translate a `PluralCategory` enum to its string representation.
fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Get the CLDR plural category for a number in the given locale.
///
/// Returns one of "zero", "one", "two", "few", "many" or "other". Locales
/// that cannot be parsed, or whose language has no plural data, use English
/// rules.
///
/// ```
/// use lingo::interpreter::plural_category;
///
/// assert_eq!(plural_category("en-GB", 1), "one");
/// assert_eq!(plural_category("en-GB", 2), "other");
/// assert_eq!(plural_category("ru", 2), "few");
/// assert_eq!(plural_category("ru", 5), "many");
/// assert_eq!(plural_category("xx", 1), "one");
/// ```
pub fn plural_category(locale: &str, n: i64) -> &'static str {
    let language = normalize_lang(locale);
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, rules)) = cache.iter().find(|(code, _)| *code == language) {
            return category_str(rules.category_for(n));
        }
        let Some(rules) = build_rules(language).or_else(|| build_rules(FALLBACK_LANGUAGE)) else {
            return "other";
        };
        let category = category_str(rules.category_for(n));
        cache.push((language, rules));
        category
    })
}
