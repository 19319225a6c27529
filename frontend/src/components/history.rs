use super::super::{Model, Msg};
use super::results::severity_class;
use shared::{CropFilter, PredictionRecord, SortOrder};
use strum::IntoEnumIterator;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

fn crop_label(crop: CropFilter) -> &'static str {
    match crop {
        CropFilter::All => "All crops",
        CropFilter::Maize => "Maize",
        CropFilter::Beans => "Beans",
        CropFilter::Tomato => "Tomato",
    }
}

fn sort_label(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Newest => "Newest first",
        SortOrder::Oldest => "Oldest first",
    }
}

pub fn render_history(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let history = &model.history;

    let body = if model.store.is_none() {
        html! { <p class="no-results-message">{"History is not configured."}</p> }
    } else if history.loading {
        html! {
            <div class="history-grid">
                { for (0..6).map(|_| html! { <div class="history-card placeholder"></div> }) }
            </div>
        }
    } else {
        let visible = history.query.apply(&history.records);
        if visible.is_empty() {
            html! { <p class="no-results-message">{"No predictions found."}</p> }
        } else {
            html! {
                <div class="history-grid">
                    { for visible.iter().map(|record| render_record(model, link, record)) }
                </div>
            }
        }
    };

    html! {
        <div class="history-section">
            <h2>{"Prediction history"}</h2>
            { render_filters(model, link) }
            {
                if let Some(error) = &history.error {
                    html! {
                        <div class="error-message">
                            <i class="fa-solid fa-circle-exclamation"></i>
                            <p>{ error }</p>
                            <button class="analyze-btn" onclick={link.callback(|_| Msg::LoadHistory)}>
                                {"Retry"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            { body }
        </div>
    }
}

fn render_filters(model: &Model, link: &Scope<Model>) -> Html {
    let query = &model.history.query;

    let on_search = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetSearch(input.value())
    });
    let on_crop = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetCropFilter(select.value().parse().unwrap_or_default())
    });
    let on_sort = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetSortOrder(select.value().parse().unwrap_or_default())
    });

    html! {
        <div class="history-filters">
            <input
                type="text"
                placeholder="Search by disease"
                value={query.search.clone()}
                oninput={on_search}
            />
            <select onchange={on_crop}>
                { for CropFilter::iter().map(|crop| html! {
                    <option value={crop.to_string()} selected={crop == query.crop}>{ crop_label(crop) }</option>
                })}
            </select>
            <select onchange={on_sort}>
                { for SortOrder::iter().map(|sort| html! {
                    <option value={sort.to_string()} selected={sort == query.sort}>{ sort_label(sort) }</option>
                })}
            </select>
        </div>
    }
}

fn render_record(model: &Model, link: &Scope<Model>, record: &PredictionRecord) -> Html {
    let id = record.id.clone();
    let created = record
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown date".to_string());

    html! {
        <div key={record.id.clone()} class={classes!("history-card", severity_class(record.severity_band()))}>
            {
                match &record.image_url {
                    Some(url) => html! { <img src={url.clone()} alt={record.disease_or_unknown().to_string()} /> },
                    None => html! {},
                }
            }
            <div class="history-card-body">
                <div class="history-card-title">
                    <h3>{ record.disease_name.as_deref().unwrap_or("Unknown") }</h3>
                    <span class="locale-tag">{ model.locale.tag().to_uppercase() }</span>
                </div>
                <p><strong>{"Crop: "}</strong>{ record.crop_name.as_deref().unwrap_or("N/A") }</p>
                <p><strong>{"Severity: "}</strong>{ record.severity_text() }</p>
                <p><strong>{"Treatment: "}</strong>{ record.treatment.as_deref().unwrap_or("N/A") }</p>
                <p class="history-date">{ created }</p>
                <button
                    class="remove-btn"
                    title="Delete this prediction"
                    onclick={link.callback(move |_| Msg::DeletePrediction(id.clone()))}
                >
                    <i class="fa-solid fa-trash"></i>{" Delete"}
                </button>
            </div>
        </div>
    }
}
