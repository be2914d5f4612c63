use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use lazy_static::lazy_static;
use serde_derive::{Deserialize, Serialize};
use crate::helper_model::RentalError;

type Bundle = HashMap<String, String>;

lazy_static! {
    static ref EN_BUNDLE: Bundle = parse_bundle(include_str!("../../locales/en.json"));
    static ref RU_BUNDLE: Bundle = parse_bundle(include_str!("../../locales/ru.json"));
}

fn parse_bundle(raw: &str) -> Bundle {
    match serde_json::from_str::<Bundle>(raw) {
        Ok(bundle) => bundle,
        Err(err) => {
            tracing::error!("translation bundle is not a flat JSON object: {}", err);
            Bundle::new()
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            _ => Err(RentalError::NotFound),
        }
    }
}

pub fn bundle(locale: Locale) -> &'static Bundle {
    match locale {
        Locale::En => &EN_BUNDLE,
        Locale::Ru => &RU_BUNDLE,
    }
}

/// Looks `key` up in `locale`, then in English, then gives the key back.
pub fn translate(locale: Locale, key: &str) -> String {
    bundle(locale)
        .get(key)
        .or_else(|| bundle(Locale::En).get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundles_are_loaded() {
        assert!(!bundle(Locale::En).is_empty());
        assert!(!bundle(Locale::Ru).is_empty());
    }

    #[test]
    fn every_russian_key_exists_in_english() {
        for key in bundle(Locale::Ru).keys() {
            assert!(bundle(Locale::En).contains_key(key), "{} missing from en", key);
        }
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("RU".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("de".parse::<Locale>(), Err(RentalError::NotFound));
    }

    #[test]
    fn translation_falls_back_to_english_then_key() {
        assert_eq!(translate(Locale::Ru, "nav.home"), "Главная");
        assert_eq!(
            translate(Locale::Ru, "error.pricing_not_configured"),
            translate(Locale::En, "error.pricing_not_configured")
        );
        assert_eq!(translate(Locale::Ru, "no.such.key"), "no.such.key");
    }
}
