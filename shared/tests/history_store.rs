use std::cell::RefCell;
use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::executor::block_on;
use shared::store::{archive_file, decode_rows};
use shared::{
    CandidateFile, CropFilter, DataStore, HistoryQuery, PredictionRecord, SortOrder, StoreError,
};

/// In-memory stand-in for the hosted table and bucket.
#[derive(Default)]
struct MemoryStore {
    rows: RefCell<Vec<PredictionRecord>>,
    objects: RefCell<BTreeMap<String, (String, Vec<u8>)>>,
}

#[async_trait(?Send)]
impl DataStore for MemoryStore {
    type Blob = Vec<u8>;

    async fn list_predictions(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        Ok(HistoryQuery::default().apply(&self.rows.borrow()))
    }

    async fn delete_prediction(&self, id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(StoreError::Status {
                status: 404,
                body: format!("no row {}", id),
            });
        }
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        blob: &Vec<u8>,
        media_type: &str,
    ) -> Result<String, StoreError> {
        self.objects.borrow_mut().insert(
            format!("{}/{}", bucket, object_name),
            (media_type.to_string(), blob.clone()),
        );
        Ok(format!("https://store/public/{}/{}", bucket, object_name))
    }
}

const ROWS: &str = r#"[
    {"id": 1, "crop_name": "maize", "disease_name": "maize_blight", "severity": 0.91,
     "treatment": "Use resistant seeds", "image_url": "https://s/1.jpg", "created_at": "2025-01-01T09:00:00+00:00"},
    {"id": 2, "crop_name": "tomato", "disease_name": "tomato_healthy", "severity": 0.35,
     "treatment": "No treatment needed", "image_url": "https://s/2.jpg", "created_at": "2025-01-03T09:00:00+00:00"},
    {"id": 3, "crop_name": "bean", "disease_name": "bean_rust", "severity": 0.55,
     "treatment": "Apply neem-based fungicide", "image_url": "https://s/3.jpg", "created_at": "2025-01-02T09:00:00+00:00"}
]"#;

fn seeded() -> MemoryStore {
    let store = MemoryStore::default();
    *store.rows.borrow_mut() = decode_rows(200, ROWS).unwrap();
    store
}

fn ids(records: &[PredictionRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn listing_then_filtering() {
    let store = seeded();
    let rows = block_on(store.list_predictions()).unwrap();
    assert_eq!(ids(&rows), vec!["2", "3", "1"]);

    let query = HistoryQuery {
        search: "rust".into(),
        crop: CropFilter::Beans,
        sort: SortOrder::Oldest,
    };
    assert_eq!(ids(&query.apply(&rows)), vec!["3"]);
}

#[test]
fn delete_removes_only_that_row() {
    let store = seeded();
    block_on(store.delete_prediction("2")).unwrap();
    let rows = block_on(store.list_predictions()).unwrap();
    assert_eq!(ids(&rows), vec!["3", "1"]);

    assert!(matches!(
        block_on(store.delete_prediction("2")),
        Err(StoreError::Status { status: 404, .. })
    ));
}

#[test]
fn archive_uses_timestamped_object_name() {
    let store = MemoryStore::default();
    let file = CandidateFile::from_bytes("tomato_leaf.png", "image/png", vec![137, 80, 78, 71]);

    let url = block_on(archive_file(&store, "crop-images", &file, 1_700_000_000_123)).unwrap();

    assert_eq!(url, "https://store/public/crop-images/1700000000123_tomato_leaf.png");
    let objects = store.objects.borrow();
    let (media_type, bytes) = &objects["crop-images/1700000000123_tomato_leaf.png"];
    assert_eq!(media_type, "image/png");
    assert_eq!(bytes, &file.body);
}
