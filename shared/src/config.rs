use url::Url;

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::prediction::{LocaleTransport, PredictionEndpoint};
use crate::store::StoreConfig;

/// Root of the prediction service; `/predict/` is appended.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TABLE: &str = "backend";
pub const DEFAULT_BUCKET: &str = "crop-images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub prediction: PredictionEndpoint,
    pub default_locale: Locale,
    /// `None` turns the history view off.
    pub store: Option<StoreConfig>,
}

impl AppConfig {
    /// Builds the configuration from key lookups.
    ///
    /// The browser has no process environment, so the app feeds this from
    /// `option_env!` values captured at build time.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let transport = match get("LOCALE_TRANSPORT") {
            Some(raw) => raw
                .parse::<LocaleTransport>()
                .map_err(|_| ConfigError::UnknownLocaleTransport(raw))?,
            None => LocaleTransport::default(),
        };
        let backend = get("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let prediction = PredictionEndpoint::new(&backend, transport)?;

        let default_locale = match get("DEFAULT_LOCALE") {
            Some(tag) => Locale::parse_tag(&tag)?,
            None => Locale::default(),
        };

        let store = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(api_key)) => Some(StoreConfig {
                url: Url::parse(&url).map_err(|e| ConfigError::InvalidUrl {
                    key: "SUPABASE_URL",
                    reason: e.to_string(),
                })?,
                api_key,
                table: get("SUPABASE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                bucket: get("SUPABASE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            }),
            (Some(_), None) => return Err(ConfigError::Incomplete("SUPABASE_URL", "SUPABASE_KEY")),
            (None, Some(_)) => return Err(ConfigError::Incomplete("SUPABASE_KEY", "SUPABASE_URL")),
            (None, None) => None,
        };

        Ok(Self {
            prediction,
            default_locale,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.prediction.request_url(Locale::En).as_str(),
            "http://localhost:8000/predict/"
        );
        assert_eq!(config.prediction.transport(), LocaleTransport::Form);
        assert_eq!(config.default_locale, Locale::En);
        assert!(config.store.is_none());
    }

    #[test]
    fn reads_every_key() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BACKEND_URL", "https://api.example.org"),
            ("LOCALE_TRANSPORT", "Query"),
            ("DEFAULT_LOCALE", "fr"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_KEY", "anon"),
            ("SUPABASE_TABLE", "predictions"),
        ]))
        .unwrap();

        assert_eq!(
            config.prediction.request_url(Locale::Fr).as_str(),
            "https://api.example.org/predict/?locale=fr"
        );
        assert_eq!(config.default_locale, Locale::Fr);
        let store = config.store.unwrap();
        assert_eq!(store.table, "predictions");
        assert_eq!(store.bucket, DEFAULT_BUCKET);
        assert_eq!(store.api_key, "anon");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[("BACKEND_URL", "  "), ("SUPABASE_KEY", "")])).unwrap();
        assert!(config.store.is_none());
        assert_eq!(
            config.prediction.request_url(Locale::En).as_str(),
            "http://localhost:8000/predict/"
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("DEFAULT_LOCALE", "xx")])),
            Err(ConfigError::UnknownLocale("xx".into()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("LOCALE_TRANSPORT", "header")])),
            Err(ConfigError::UnknownLocaleTransport("header".into()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://abc.supabase.co")])),
            Err(ConfigError::Incomplete("SUPABASE_URL", "SUPABASE_KEY"))
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("SUPABASE_URL", "::"), ("SUPABASE_KEY", "k")])),
            Err(ConfigError::InvalidUrl { key: "SUPABASE_URL", .. })
        ));
    }
}
