use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// One saved prediction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    #[serde(default)]
    pub crop_name: Option<String>,
    #[serde(default)]
    pub disease_name: Option<String>,
    #[serde(default)]
    pub severity: Option<f64>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PredictionRecord {
    pub fn disease_or_unknown(&self) -> &str {
        self.disease_name.as_deref().unwrap_or("unknown")
    }

    pub fn crop_or_unknown(&self) -> &str {
        self.crop_name.as_deref().unwrap_or("unknown")
    }

    pub fn severity_band(&self) -> SeverityBand {
        SeverityBand::of(self.severity)
    }

    pub fn severity_text(&self) -> String {
        self.severity
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "N/A".to_string())
    }

    fn sort_key(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }
}

fn id_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Int(id) => id.to_string(),
    })
}

/// Accepts RFC 3339 or offset-less timestamps (read as UTC). Anything else
/// becomes `None` rather than failing the whole listing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    log::warn!("Ignoring unparsable timestamp '{}'", raw);
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBand {
    High,
    Medium,
    Low,
    Unknown,
}

impl SeverityBand {
    pub fn of(severity: Option<f64>) -> Self {
        match severity {
            None => SeverityBand::Unknown,
            Some(s) if s > 0.7 => SeverityBand::High,
            Some(s) if s > 0.4 => SeverityBand::Medium,
            Some(_) => SeverityBand::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CropFilter {
    #[default]
    All,
    Maize,
    Beans,
    Tomato,
}

impl CropFilter {
    fn matches(&self, crop: &str) -> bool {
        let crop = crop.to_lowercase();
        match self {
            CropFilter::All => true,
            // The service names crops after the file prefix, so "bean" shows up too.
            CropFilter::Beans => crop == "beans" || crop == "bean",
            other => crop == other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryQuery {
    pub search: String,
    pub crop: CropFilter,
    pub sort: SortOrder,
}

impl HistoryQuery {
    pub fn matches(&self, record: &PredictionRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || record
                .disease_or_unknown()
                .to_lowercase()
                .contains(&needle);
        search_ok && self.crop.matches(record.crop_or_unknown())
    }

    /// Filtered, sorted copy of `records`. The sort is stable.
    pub fn apply(&self, records: &[PredictionRecord]) -> Vec<PredictionRecord> {
        let mut selected: Vec<PredictionRecord> =
            records.iter().filter(|r| self.matches(r)).cloned().collect();
        match self.sort {
            SortOrder::Newest => selected.sort_by_key(|r| std::cmp::Reverse(r.sort_key())),
            SortOrder::Oldest => selected.sort_by_key(|r| r.sort_key()),
        }
        selected
    }
}
