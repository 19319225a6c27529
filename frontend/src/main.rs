mod api;
mod components;
mod config;

use api::{BrowserPredictionService, SupabaseStore};
use components::handlers;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{
    CropFilter, HistoryQuery, Locale, PredictionRecord, PredictionResult, SortOrder, StoreError,
    Ticket, UploadError, UploadWorkflow,
};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

// Models
#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Upload,
    History,
}

struct FileData {
    file: GlooFile,
    preview_url: ObjectUrl,
}

#[derive(Default)]
struct HistoryState {
    records: Vec<PredictionRecord>,
    query: HistoryQuery,
    loading: bool,
    loaded: bool,
    error: Option<String>,
}

// Yew msg components
enum Msg {
    // File operations
    FilesAdded(Vec<GlooFile>),
    ClearSelection,

    // Prediction operations
    Submit,
    PredictionSettled(Ticket, Result<PredictionResult, UploadError>),
    ArchiveImage,
    ImageArchived(Result<String, StoreError>),

    // History operations
    LoadHistory,
    HistoryLoaded(Result<Vec<PredictionRecord>, StoreError>),
    DeletePrediction(String),
    PredictionDeleted(String, Result<(), StoreError>),
    SetSearch(String),
    SetCropFilter(CropFilter),
    SetSortOrder(SortOrder),

    // UI states
    ShowView(View),
    SetLocale(Locale),
    SetNotice(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
struct Model {
    predictor: Option<Rc<BrowserPredictionService>>,
    store: Option<Rc<SupabaseStore>>,
    view: View,
    locale: Locale,
    workflow: UploadWorkflow,
    selected: Option<FileData>,
    archived_url: Option<String>,
    history: HistoryState,
    notice: Option<String>,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            predictor: None,
            store: None,
            view: View::Upload,
            locale: Locale::default(),
            workflow: UploadWorkflow::new(),
            selected: None,
            archived_url: None,
            history: HistoryState::default(),
            notice: None,
            is_dragging: false,
            paste_listener: None,
        };

        match config::load() {
            Ok(config) => {
                log::info!(
                    "Prediction endpoint: {} (locale via {})",
                    config.prediction.request_url(config.default_locale),
                    config.prediction.transport()
                );
                model.locale = config.default_locale;
                model.predictor = Some(Rc::new(BrowserPredictionService::new(config.prediction)));
                match config.store {
                    Some(store) => model.store = Some(Rc::new(SupabaseStore::new(store))),
                    None => log::warn!("SUPABASE_URL/SUPABASE_KEY not set, history is disabled"),
                }
            }
            Err(e) => {
                log::error!("Invalid build configuration: {}", e);
                model.notice = Some(format!("Configuration error: {}", e));
            }
        }

        let link = ctx.link().clone();
        match web_sys::window() {
            Some(window) => {
                let listener = EventListener::new(&window, "paste", move |event| {
                    if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                        link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                    }
                });
                model.paste_listener = Some(listener);
            }
            None => log::warn!("No global `window`, paste uploads are disabled"),
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // File operations
            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::ClearSelection => handlers::handle_clear_selection(self),

            // Prediction operations
            Msg::Submit => handlers::handle_submit(self, ctx),
            Msg::PredictionSettled(ticket, outcome) => {
                handlers::handle_prediction_settled(self, ticket, outcome)
            }
            Msg::ArchiveImage => handlers::handle_archive_image(self, ctx),
            Msg::ImageArchived(outcome) => handlers::handle_image_archived(self, outcome),

            // History operations
            Msg::LoadHistory => handlers::handle_load_history(self, ctx),
            Msg::HistoryLoaded(outcome) => handlers::handle_history_loaded(self, outcome),
            Msg::DeletePrediction(id) => handlers::handle_delete_prediction(self, ctx, id),
            Msg::PredictionDeleted(id, outcome) => {
                handlers::handle_prediction_deleted(self, id, outcome)
            }
            Msg::SetSearch(search) => {
                self.history.query.search = search;
                true
            }
            Msg::SetCropFilter(crop) => {
                self.history.query.crop = crop;
                true
            }
            Msg::SetSortOrder(sort) => {
                self.history.query.sort = sort;
                true
            }

            // UI states
            Msg::ShowView(view) => handlers::handle_show_view(self, ctx, view),
            Msg::SetLocale(locale) => handlers::handle_set_locale(self, ctx, locale),
            Msg::SetNotice(notice) => {
                self.notice = notice;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header(self, ctx) }

                <main class="main-content">
                { components::utils::render_error_message(self, ctx) }
                {
                    match self.view {
                        View::Upload => html! {
                            <>
                                { components::upload_section::render_upload_section(self, ctx) }
                                { components::results::render_results(self, ctx) }
                            </>
                        },
                        View::History => components::history::render_history(self, ctx),
                    }
                }
                </main>

                <footer class="app-footer">
                    <p>{"Crop Leaf Disease Checker | Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
