use super::super::{Model, Msg};
use shared::Locale;
use strum::IntoEnumIterator;
use web_sys::HtmlSelectElement;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_locale_switcher(current: Locale, link: &Scope<Model>) -> Html {
    let onchange = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        match Locale::parse_tag(&select.value()) {
            Ok(locale) => Msg::SetLocale(locale),
            Err(e) => Msg::SetNotice(Some(e.to_string())),
        }
    });

    html! {
        <label class="locale-switcher">
            <span class="sr-only">{"Language"}</span>
            <select {onchange}>
                { for Locale::iter().map(|locale| html! {
                    <option value={locale.tag().to_string()} selected={locale == current}>
                        { locale.label() }
                    </option>
                })}
            </select>
        </label>
    }
}
