use super::super::{Model, Msg};
use shared::{PredictionResult, SeverityBand, UploadError, WorkflowState};
use yew::prelude::*;

pub fn severity_class(band: SeverityBand) -> &'static str {
    match band {
        SeverityBand::High => "severity-high",
        SeverityBand::Medium => "severity-medium",
        SeverityBand::Low => "severity-low",
        SeverityBand::Unknown => "severity-unknown",
    }
}

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    match model.workflow.state() {
        WorkflowState::Idle => html! {},
        WorkflowState::Submitting { file_name, .. } => html! {
            <div class="results-container loading">
                <i class="fa-solid fa-spinner fa-spin"></i>
                <p>{ format!("Analyzing \"{}\"...", file_name) }</p>
            </div>
        },
        WorkflowState::Succeeded(result) => render_prediction(model, ctx, result),
        WorkflowState::Failed(err) => render_failure(err),
    }
}

fn render_prediction(model: &Model, ctx: &Context<Model>, result: &PredictionResult) -> Html {
    let band = SeverityBand::of(Some(result.severity));
    let percentage = result.severity * 100.0;
    let can_archive = model.store.is_some() && model.selected.is_some();

    html! {
        <div class={classes!("results-container", severity_class(band))}>
            <div class="result-header">
                <h2 title={result.disease_name.clone()}>
                    <i class="fa-solid fa-leaf"></i>{ format!(" {}", result.display_name()) }
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Severity:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", percentage.clamp(0.0, 100.0))}></div>
                    </div>
                    <div class="meter-value">{ format!("{:.2}", result.severity) }</div>
                </div>
            </div>
            <div class="detailed-results">
                <h3>{"Treatment"}</h3>
                <p>{ &result.treatment }</p>
            </div>
            {
                if result.image_url.is_empty() {
                    html! {}
                } else {
                    html! { <img class="stored-image" src={result.image_url.clone()} alt={result.disease_name.clone()} /> }
                }
            }
            {
                match (&model.archived_url, can_archive) {
                    (Some(url), _) => html! {
                        <p class="archived-link"><a href={url.clone()} target="_blank">{"Saved copy"}</a></p>
                    },
                    (None, true) => html! {
                        <button class="analyze-btn" onclick={ctx.link().callback(|_| Msg::ArchiveImage)}>
                            <i class="fa-solid fa-floppy-disk"></i>{" Save image"}
                        </button>
                    },
                    (None, false) => html! {},
                }
            }
        </div>
    }
}

fn render_failure(err: &UploadError) -> Html {
    html! {
        <div class="results-container failed">
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p><strong>{ err.reason() }</strong>{ format!(": {}", err) }</p>
            </div>
        </div>
    }
}
