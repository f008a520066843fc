use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod reminder;
pub use reminder::*;

/// Display language for titles and translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            other => Err(format!("unsupported language '{}', expected 'en' or 'es'", other)),
        }
    }
}

/// A single Dua entry as stored in the bundled resource.
///
/// Every field except `default_time_option` is required; a missing key fails
/// the decode of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuaRecord {
    pub id: String,
    pub title_en: String,
    pub title_es: String,
    #[serde(rename = "arabicText")]
    pub arabic_text: String,
    pub transliteration: String,
    pub translation_en: String,
    pub translation_es: String,
    /// Suggested time label such as "After Fajr". Informational only.
    #[serde(rename = "defaultTimeOption", default)]
    pub default_time_option: Option<String>,
}

impl DuaRecord {
    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::En => &self.title_en,
            Language::Es => &self.title_es,
        }
    }

    pub fn translation(&self, language: Language) -> &str {
        match language {
            Language::En => &self.translation_en,
            Language::Es => &self.translation_es,
        }
    }
}
