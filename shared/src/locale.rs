use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::ConfigError;

/// Locales the client can request results in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    En,
    Fr,
    Sw,
}

impl Locale {
    pub fn tag(&self) -> &str {
        self.as_ref()
    }

    /// Native name used in the locale switcher.
    pub fn label(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Sw => "Kiswahili",
        }
    }

    pub fn parse_tag(tag: &str) -> Result<Self, ConfigError> {
        tag.trim()
            .parse()
            .map_err(|_| ConfigError::UnknownLocale(tag.to_string()))
    }
}
