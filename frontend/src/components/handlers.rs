use super::super::{FileData, Model, Msg, View};
use super::utils::collect_files;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::controller::transfer;
use shared::store::archive_file;
use shared::{
    CandidateFile, DataStore, Locale, PredictionRecord, PredictionResult, StoreError, Ticket,
    UploadError,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

fn candidate(file: &GlooFile) -> CandidateFile<GlooFile> {
    CandidateFile::new(file.name(), file.raw_mime_type(), file.size(), file.clone())
}

pub fn handle_files_added(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    // The verdict on screen belongs to the selected file; keep it until it lands.
    if let Err(busy) = model.workflow.check_ready() {
        log::warn!("Ignoring {} new file(s) during an upload", files.len());
        model.notice = Some(busy.to_string());
        return true;
    }

    let total = files.len();
    let Some(file) = files.into_iter().next() else {
        return false;
    };
    if total > 1 {
        log::warn!("{} files dropped, only {} is analyzed", total, file.name());
    }

    let preview_url = ObjectUrl::from(file.clone());
    model.selected = Some(FileData { file, preview_url });
    model.archived_url = None;
    model.notice = None;
    ctx.link().send_message(Msg::Submit);
    true
}

pub fn handle_clear_selection(model: &mut Model) -> bool {
    model.selected = None;
    model.archived_url = None;
    model.notice = None;
    model.workflow.reset();
    true
}

pub fn handle_submit(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(predictor) = model.predictor.clone() else {
        model.notice = Some("Prediction service is not configured.".into());
        return true;
    };
    let Some(file_data) = &model.selected else {
        model.notice = Some("No file selected for analysis.".into());
        return true;
    };

    let file = candidate(&file_data.file);
    let ticket = match model.workflow.begin(&file) {
        Ok(ticket) => ticket,
        // The workflow already shows the rejection.
        Err(e) if e.is_validation() => return true,
        Err(e) => {
            model.notice = Some(e.to_string());
            return true;
        }
    };

    model.archived_url = None;
    let link = ctx.link().clone();
    let locale = model.locale;
    spawn_local(async move {
        let outcome = transfer(&*predictor, &file, locale).await;
        link.send_message(Msg::PredictionSettled(ticket, outcome));
    });

    true
}

pub fn handle_prediction_settled(
    model: &mut Model,
    ticket: Ticket,
    outcome: Result<PredictionResult, UploadError>,
) -> bool {
    match model.workflow.resolve(ticket, outcome) {
        Some(result) => {
            log::info!("Showing verdict {} for upload {}", result.disease_name, ticket);
            // The service saved a new row; the next history visit refetches.
            model.history.loaded = false;
            true
        }
        None => model.workflow.state().error().is_some(),
    }
}

pub fn handle_archive_image(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(store) = model.store.clone() else {
        model.notice = Some("Image storage is not configured.".into());
        return true;
    };
    let Some(file_data) = &model.selected else {
        return false;
    };

    let file = candidate(&file_data.file);
    let link = ctx.link().clone();
    spawn_local(async move {
        let bucket = store.bucket().to_string();
        let now = js_sys::Date::now() as u64;
        let outcome = archive_file(&*store, &bucket, &file, now).await;
        link.send_message(Msg::ImageArchived(outcome));
    });

    false
}

pub fn handle_image_archived(model: &mut Model, outcome: Result<String, StoreError>) -> bool {
    match outcome {
        Ok(url) => {
            log::info!("Image stored at {}", url);
            model.archived_url = Some(url);
        }
        Err(e) => {
            log::error!("Failed to store image: {}", e);
            model.notice = Some(format!("Could not save the image: {}", e));
        }
    }
    true
}

pub fn handle_load_history(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(store) = model.store.clone() else {
        model.history.error = Some("History is not configured.".into());
        return true;
    };
    if model.history.loading {
        return false;
    }

    model.history.loading = true;
    model.history.error = None;
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = store.list_predictions().await;
        link.send_message(Msg::HistoryLoaded(outcome));
    });
    true
}

pub fn handle_history_loaded(
    model: &mut Model,
    outcome: Result<Vec<PredictionRecord>, StoreError>,
) -> bool {
    model.history.loading = false;
    model.history.loaded = true;
    match outcome {
        Ok(records) => {
            model.history.records = records;
            model.history.error = None;
        }
        Err(e) => {
            gloo_console::error!(format!("Error fetching predictions: {}", e));
            model.history.error = Some(e.to_string());
        }
    }
    true
}

pub fn handle_delete_prediction(model: &mut Model, ctx: &Context<Model>, id: String) -> bool {
    let Some(store) = model.store.clone() else {
        return false;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = store.delete_prediction(&id).await;
        link.send_message(Msg::PredictionDeleted(id, outcome));
    });
    false
}

pub fn handle_prediction_deleted(
    model: &mut Model,
    id: String,
    outcome: Result<(), StoreError>,
) -> bool {
    match outcome {
        Ok(()) => model.history.records.retain(|r| r.id != id),
        Err(e) => {
            log::error!("Failed to delete prediction {}: {}", id, e);
            model.history.error = Some(format!("Could not delete prediction: {}", e));
        }
    }
    true
}

pub fn handle_show_view(model: &mut Model, ctx: &Context<Model>, view: View) -> bool {
    if model.view == view {
        return false;
    }
    model.view = view;
    if view == View::History && !model.history.loaded {
        ctx.link().send_message(Msg::LoadHistory);
    }
    true
}

pub fn handle_set_locale(model: &mut Model, ctx: &Context<Model>, locale: Locale) -> bool {
    if model.locale == locale {
        return false;
    }
    log::info!("Switching locale to {}", locale);
    model.locale = locale;
    model.history.loaded = false;
    if model.view == View::History {
        ctx.link().send_message(Msg::LoadHistory);
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;
    if model.workflow.state().is_submitting() {
        return true;
    }

    if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
        let files = collect_files(&file_list);
        if !files.is_empty() {
            ctx.link().send_message(Msg::FilesAdded(files));
        }
    }

    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if model.view != View::Upload || model.workflow.state().is_submitting() {
        return false;
    }
    if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
        let files = collect_files(&file_list);
        if !files.is_empty() {
            event.prevent_default();
            ctx.link().send_message(Msg::FilesAdded(files));
            return true;
        }
    }
    false
}
