use async_trait::async_trait;
use url::Url;

use crate::error::StoreError;
use crate::history::PredictionRecord;
use crate::upload::CandidateFile;

/// Saved predictions and the image bucket behind them.
#[async_trait(?Send)]
pub trait DataStore {
    type Blob;

    /// All rows, newest first.
    async fn list_predictions(&self) -> Result<Vec<PredictionRecord>, StoreError>;

    async fn delete_prediction(&self, id: &str) -> Result<(), StoreError>;

    /// Stores `blob` under `object_name` and returns its public URL.
    async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        blob: &Self::Blob,
        media_type: &str,
    ) -> Result<String, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: Url,
    pub api_key: String,
    pub table: String,
    pub bucket: String,
}

/// Request shapes for a Supabase-compatible REST + storage API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseRest {
    config: StoreConfig,
}

impl SupabaseRest {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.url.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn list_url(&self) -> Url {
        let mut url = self.endpoint(&["rest", "v1", self.config.table.as_str()]);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");
        url
    }

    pub fn delete_url(&self, id: &str) -> Url {
        let mut url = self.endpoint(&["rest", "v1", self.config.table.as_str()]);
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        url
    }

    pub fn upload_url(&self, bucket: &str, object_name: &str) -> Url {
        self.endpoint(&["storage", "v1", "object", bucket, object_name])
    }

    pub fn public_url(&self, bucket: &str, object_name: &str) -> Url {
        self.endpoint(&["storage", "v1", "object", "public", bucket, object_name])
    }

    /// Headers every request carries.
    pub fn auth_headers(&self) -> [(&'static str, String); 2] {
        [
            ("apikey", self.config.api_key.clone()),
            ("Authorization", format!("Bearer {}", self.config.api_key)),
        ]
    }
}

/// `"{unix_millis}_{file_name}"`, so re-uploads of one file never collide.
pub fn object_name(unix_millis: u64, file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    format!("{}_{}", unix_millis, base)
}

/// Copies `file` into `bucket` under a timestamped name; returns the public URL.
pub async fn archive_file<S: DataStore>(
    store: &S,
    bucket: &str,
    file: &CandidateFile<S::Blob>,
    unix_millis: u64,
) -> Result<String, StoreError> {
    let name = object_name(unix_millis, &file.name);
    log::info!("Archiving {} as {}/{}", file.name, bucket, name);
    store
        .upload_object(bucket, &name, &file.body, &file.media_type)
        .await
}

pub fn check_status(status: u16, body: &str) -> Result<(), StoreError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StoreError::Status {
            status,
            body: body.to_string(),
        })
    }
}

pub fn decode_rows(status: u16, body: &str) -> Result<Vec<PredictionRecord>, StoreError> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| StoreError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest() -> SupabaseRest {
        SupabaseRest::new(StoreConfig {
            url: Url::parse("https://abc.supabase.co/").unwrap(),
            api_key: "anon-key".into(),
            table: "backend".into(),
            bucket: "crop-images".into(),
        })
    }

    #[test]
    fn list_orders_by_creation_descending() {
        assert_eq!(
            rest().list_url().as_str(),
            "https://abc.supabase.co/rest/v1/backend?select=*&order=created_at.desc"
        );
    }

    #[test]
    fn delete_filters_by_id() {
        assert_eq!(
            rest().delete_url("42").as_str(),
            "https://abc.supabase.co/rest/v1/backend?id=eq.42"
        );
    }

    #[test]
    fn storage_urls_escape_object_names() {
        let rest = rest();
        assert_eq!(
            rest.upload_url("crop-images", "1700000000000_leaf 1.jpg").as_str(),
            "https://abc.supabase.co/storage/v1/object/crop-images/1700000000000_leaf%201.jpg"
        );
        assert_eq!(
            rest.public_url("crop-images", "a.png").as_str(),
            "https://abc.supabase.co/storage/v1/object/public/crop-images/a.png"
        );
    }

    #[test]
    fn headers_carry_the_key_twice() {
        let [apikey, auth] = rest().auth_headers();
        assert_eq!(apikey, ("apikey", "anon-key".to_string()));
        assert_eq!(auth, ("Authorization", "Bearer anon-key".to_string()));
    }

    #[test]
    fn object_names_are_timestamp_prefixed() {
        assert_eq!(object_name(1_700_000_000_000, "maize_leaf.jpg"), "1700000000000_maize_leaf.jpg");
        assert_eq!(object_name(5, "C:\\photos\\leaf.png"), "5_leaf.png");
    }

    #[test]
    fn decode_rows_reports_status_and_garbage() {
        assert_eq!(
            decode_rows(401, "nope"),
            Err(StoreError::Status {
                status: 401,
                body: "nope".into()
            })
        );
        assert!(matches!(decode_rows(200, "{"), Err(StoreError::MalformedResponse(_))));
        assert_eq!(decode_rows(200, "[]"), Ok(vec![]));
    }
}
