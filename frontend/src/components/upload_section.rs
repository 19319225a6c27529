use super::super::{Model, Msg};
use super::utils::{collect_files, debounce};
use shared::MAX_UPLOAD_BYTES;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_selected_preview(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let busy = model.workflow.state().is_submitting();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files().map(|list| collect_files(&list)).unwrap_or_default();

        input.set_value("");

        if !files.is_empty() {
            Msg::FilesAdded(files)
        } else {
            Msg::SetNotice(Some("No file selected.".into()))
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(input) = document.get_element_by_id("file-input") {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
                disabled={busy}
            />

            <button
                id="upload-button"
                class="analyze-btn"
                disabled={busy}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <i class="fa-solid fa-upload"></i> {" Select Image"}
            </button>

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"), busy.then_some("disabled"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop a leaf photo here, paste, or click"}</p>
                    <p class="file-types">
                        { format!("Images only, up to {:.0} MB", MAX_UPLOAD_BYTES as f64 / 1_000_000.0) }
                    </p>
                </div>
            </div>
        </>
    }
}

fn render_selected_preview(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(file_data) = &model.selected else {
        return html! {};
    };

    let link = ctx.link().clone();
    let busy = model.workflow.state().is_submitting();
    let name = file_data.file.name();

    html! {
        <div id="preview-container">
            <img id="actual-image-preview"
                src={file_data.preview_url.to_string()}
                alt={name.clone()}
                style="max-width:100%; max-height: 400px; object-fit: contain; margin-bottom: 10px;" />
            <p class="preview-name">{ name }</p>
            <div class="button-container">
                <button
                    class="analyze-btn"
                    style="background-color: var(--danger-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::ClearSelection)
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear"}
                </button>
                <button
                    class="analyze-btn"
                    disabled={busy}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Submit)
                    })}
                >
                    <i class="fa-solid fa-rotate-right"></i>{" Analyze again"}
                </button>
            </div>
        </div>
    }
}
