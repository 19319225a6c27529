use super::super::{Model, Msg, View};
use super::locale_switcher::render_locale_switcher;
use yew::prelude::*;

/// Title bar with the two views and the locale picker.
pub fn render_header(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let tab = |view: View, label: &'static str, icon: &'static str| {
        html! {
            <button
                class={classes!("nav-link", (model.view == view).then_some("active"))}
                onclick={link.callback(move |_| Msg::ShowView(view))}
            >
                <i class={classes!("fa-solid", icon)}></i>{ format!(" {}", label) }
            </button>
        }
    };

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-seedling"></i> {" Crop Leaf Disease Checker"}</h1>
            <nav class="app-nav">
                { tab(View::Upload, "Home", "fa-upload") }
                { tab(View::History, "History", "fa-clock-rotate-left") }
            </nav>
            { render_locale_switcher(model.locale, link) }
        </header>
    }
}
