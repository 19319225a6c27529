use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use url::Url;

use crate::error::{ConfigError, TransferError};
use crate::locale::Locale;

/// Verdict returned by the prediction service for one image.
///
/// Older service builds name the label `disease`. A body may carry either key
/// or both; `disease_name` wins when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WirePrediction")]
pub struct PredictionResult {
    pub disease_name: String,
    pub severity: f64,
    pub treatment: String,
    pub image_url: String,
}

#[derive(Deserialize)]
struct WirePrediction {
    disease_name: Option<String>,
    disease: Option<String>,
    severity: f64,
    treatment: String,
    image_url: String,
}

impl TryFrom<WirePrediction> for PredictionResult {
    type Error = String;

    fn try_from(wire: WirePrediction) -> Result<Self, Self::Error> {
        let disease_name = wire
            .disease_name
            .or(wire.disease)
            .ok_or_else(|| "missing field `disease_name`".to_string())?;
        Ok(Self {
            disease_name,
            severity: wire.severity,
            treatment: wire.treatment,
            image_url: wire.image_url,
        })
    }
}

impl PredictionResult {
    /// Disease identifiers come back snake_cased (`tomato_early_blight`).
    pub fn display_name(&self) -> String {
        humanize_label(&self.disease_name)
    }
}

pub fn humanize_label(label: &str) -> String {
    label
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where the locale tag travels in a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LocaleTransport {
    /// A `locale` multipart field next to `file`.
    #[default]
    Form,
    /// A `?locale=` query parameter.
    Query,
}

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";
/// Name of the multipart field (or query key) carrying the locale tag.
pub const LOCALE_FIELD: &str = "locale";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionEndpoint {
    url: Url,
    transport: LocaleTransport,
}

impl PredictionEndpoint {
    /// `base` is the service root. A base that already ends in `/predict` is
    /// taken as the endpoint itself rather than nested again.
    pub fn new(base: &str, transport: LocaleTransport) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base.trim()).map_err(|e| ConfigError::InvalidUrl {
            key: "BACKEND_URL",
            reason: e.to_string(),
        })?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl {
                key: "BACKEND_URL",
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty();
        let already_predict = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .is_some_and(|last| last == "predict");
        if let Ok(mut path) = url.path_segments_mut() {
            if !already_predict {
                path.push("predict");
            }
            path.push("");
        }
        Ok(Self { url, transport })
    }

    pub fn transport(&self) -> LocaleTransport {
        self.transport
    }

    /// Target of the POST for the given locale.
    pub fn request_url(&self, locale: Locale) -> Url {
        let mut url = self.url.clone();
        if self.transport == LocaleTransport::Query {
            url.query_pairs_mut().append_pair(LOCALE_FIELD, locale.tag());
        }
        url
    }

    /// Whether the locale goes into the multipart body.
    pub fn locale_in_form(&self) -> bool {
        self.transport == LocaleTransport::Form
    }
}

/// Turns a finished HTTP exchange into a result.
///
/// Non-success bodies are not interpreted; the service gives no error schema.
pub fn interpret_response(status: u16, body: &str) -> Result<PredictionResult, TransferError> {
    if !(200..300).contains(&status) {
        return Err(TransferError::Status { status });
    }
    serde_json::from_str(body).map_err(|e| TransferError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"disease_name":"leaf_blight","severity":0.8,"treatment":"apply fungicide","image_url":"https://x/y.png"}"#;

    #[test]
    fn decodes_success_body() {
        let result = interpret_response(200, BODY).unwrap();
        assert_eq!(
            result,
            PredictionResult {
                disease_name: "leaf_blight".into(),
                severity: 0.8,
                treatment: "apply fungicide".into(),
                image_url: "https://x/y.png".into(),
            }
        );
    }

    #[test]
    fn accepts_disease_alias() {
        let body = r#"{"disease":"maize_blight","severity":0.87,"treatment":"t","image_url":"u"}"#;
        let result = interpret_response(200, body).unwrap();
        assert_eq!(result.disease_name, "maize_blight");
    }

    #[test]
    fn both_disease_keys_prefer_disease_name() {
        let body = r#"{"disease_name":"leaf_rust","disease":"rust","severity":0.3,"treatment":"t","image_url":"u"}"#;
        let result = interpret_response(200, body).unwrap();
        assert_eq!(result.disease_name, "leaf_rust");
    }

    #[test]
    fn missing_disease_label_is_malformed() {
        let body = r#"{"severity":0.3,"treatment":"t","image_url":"u"}"#;
        assert!(matches!(
            interpret_response(200, body),
            Err(TransferError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_success_status_ignores_body() {
        assert_eq!(
            interpret_response(500, BODY),
            Err(TransferError::Status { status: 500 })
        );
        assert_eq!(
            interpret_response(400, r#"{"detail":"Invalid file type"}"#),
            Err(TransferError::Status { status: 400 })
        );
    }

    #[test]
    fn malformed_body_is_a_transfer_error() {
        assert!(matches!(
            interpret_response(200, "<html>oops</html>"),
            Err(TransferError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret_response(200, r#"{"disease_name":"x"}"#),
            Err(TransferError::MalformedResponse(_))
        ));
    }

    #[test]
    fn endpoint_appends_predict_path() {
        let endpoint = PredictionEndpoint::new("https://api.example.com", LocaleTransport::Form).unwrap();
        assert_eq!(endpoint.request_url(Locale::En).as_str(), "https://api.example.com/predict/");

        let nested = PredictionEndpoint::new("https://api.example.com/v1/", LocaleTransport::Form).unwrap();
        assert_eq!(nested.request_url(Locale::En).as_str(), "https://api.example.com/v1/predict/");
        assert!(nested.locale_in_form());
    }

    #[test]
    fn endpoint_base_already_at_predict_is_not_nested() {
        for base in ["http://h:8000/predict/", "http://h:8000/predict"] {
            let endpoint = PredictionEndpoint::new(base, LocaleTransport::Form).unwrap();
            assert_eq!(endpoint.request_url(Locale::En).as_str(), "http://h:8000/predict/");
        }
    }

    #[test]
    fn query_transport_adds_locale_parameter() {
        let endpoint = PredictionEndpoint::new("http://localhost:8000", LocaleTransport::Query).unwrap();
        assert_eq!(
            endpoint.request_url(Locale::Sw).as_str(),
            "http://localhost:8000/predict/?locale=sw"
        );
        assert!(!endpoint.locale_in_form());
    }

    #[test]
    fn rejects_unparsable_base() {
        assert!(matches!(
            PredictionEndpoint::new("not a url", LocaleTransport::Form),
            Err(ConfigError::InvalidUrl { key: "BACKEND_URL", .. })
        ));
    }

    #[test]
    fn humanizes_disease_labels() {
        assert_eq!(humanize_label("tomato_early_blight"), "Tomato Early Blight");
        assert_eq!(humanize_label("leaf_blight"), "Leaf Blight");
    }
}
