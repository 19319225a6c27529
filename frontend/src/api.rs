use async_trait::async_trait;
use gloo_file::File as GlooFile;
use gloo_net::http::{Request, RequestBuilder, Response};
use shared::prediction::{interpret_response, FILE_FIELD, LOCALE_FIELD};
use shared::store::{check_status, decode_rows};
use shared::{
    CandidateFile, DataStore, Locale, PredictionEndpoint, PredictionRecord, PredictionResult,
    PredictionService, StoreConfig, StoreError, SupabaseRest, TransferError,
};
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Talks to `POST <backend>/predict/` with a multipart body.
pub struct BrowserPredictionService {
    endpoint: PredictionEndpoint,
}

impl BrowserPredictionService {
    pub fn new(endpoint: PredictionEndpoint) -> Self {
        Self { endpoint }
    }

    fn form_data(&self, file: &CandidateFile<GlooFile>, locale: Locale) -> Result<FormData, JsValue> {
        let form_data = FormData::new()?;
        let blob: &Blob = file.body.as_ref();
        form_data.append_with_blob_and_filename(FILE_FIELD, blob, &file.name)?;
        if self.endpoint.locale_in_form() {
            form_data.append_with_str(LOCALE_FIELD, locale.tag())?;
        }
        Ok(form_data)
    }
}

#[async_trait(?Send)]
impl PredictionService for BrowserPredictionService {
    type Body = GlooFile;

    async fn predict(
        &self,
        file: &CandidateFile<GlooFile>,
        locale: Locale,
    ) -> Result<PredictionResult, TransferError> {
        let form_data = self
            .form_data(file, locale)
            .map_err(|e| TransferError::Network(js_error(e)))?;
        let url = self.endpoint.request_url(locale);

        let response = Request::post(url.as_str())
            .body(form_data)
            .map_err(|e| TransferError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransferError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransferError::MalformedResponse(e.to_string()))?;
        if !response.ok() {
            log::error!("Prediction service answered {}: {}", status, body);
        }
        interpret_response(status, &body)
    }
}

/// Prediction history and image bucket on a Supabase project.
pub struct SupabaseStore {
    rest: SupabaseRest,
}

impl SupabaseStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            rest: SupabaseRest::new(config),
        }
    }

    pub fn bucket(&self) -> &str {
        self.rest.bucket()
    }

    fn authorized(&self, mut builder: RequestBuilder) -> RequestBuilder {
        for (name, value) in self.rest.auth_headers() {
            builder = builder.header(name, &value);
        }
        builder
    }

    async fn read(response: Response) -> Result<(u16, String), StoreError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        Ok((status, body))
    }
}

fn network(err: gloo_net::Error) -> StoreError {
    StoreError::Network(err.to_string())
}

#[async_trait(?Send)]
impl DataStore for SupabaseStore {
    type Blob = GlooFile;

    async fn list_predictions(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let url = self.rest.list_url();
        let response = self
            .authorized(Request::get(url.as_str()))
            .send()
            .await
            .map_err(network)?;
        let (status, body) = Self::read(response).await?;
        let rows = decode_rows(status, &body)?;
        log::info!("Fetched {} saved predictions", rows.len());
        Ok(rows)
    }

    async fn delete_prediction(&self, id: &str) -> Result<(), StoreError> {
        let url = self.rest.delete_url(id);
        let response = self
            .authorized(Request::delete(url.as_str()))
            .header("Prefer", "return=minimal")
            .send()
            .await
            .map_err(network)?;
        let (status, body) = Self::read(response).await?;
        check_status(status, &body)?;
        log::info!("Deleted prediction {}", id);
        Ok(())
    }

    async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        blob: &GlooFile,
        media_type: &str,
    ) -> Result<String, StoreError> {
        let url = self.rest.upload_url(bucket, object_name);
        let raw: &Blob = blob.as_ref();
        let response = self
            .authorized(Request::post(url.as_str()))
            .header("Content-Type", media_type)
            .header("x-upsert", "true")
            .body(raw.clone())
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let (status, body) = Self::read(response).await?;
        check_status(status, &body)?;
        Ok(self.rest.public_url(bucket, object_name).to_string())
    }
}
