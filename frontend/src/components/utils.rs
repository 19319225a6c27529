use super::super::{Model, Msg};
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

/// Every file in the list. Type checks happen when the upload starts.
pub fn collect_files(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .map(GlooFile::from)
        .collect()
}

pub fn render_error_message(model: &Model, ctx: &Context<Model>) -> Html {
    if let Some(error_msg) = &model.notice {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
                <button
                    class="dismiss-btn"
                    title="Dismiss"
                    onclick={ctx.link().callback(|_| Msg::SetNotice(None))}
                >
                    <i class="fa-solid fa-times"></i>
                </button>
            </div>
        }
    } else {
        html! {}
    }
}
