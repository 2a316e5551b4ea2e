use leptos::{ev::SubmitEvent, html::Form, prelude::*};

/// Comment form of the default theme. Submission is handled in the
/// background by [`super::comment_form::CommentForm`].
#[component]
pub fn CommentEditor(action: String) -> impl IntoView {
    let form_ref = NodeRef::<Form>::new();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        submit_in_background(form_ref);
    };

    view! {
        <form
            class="comment-form"
            action=action
            method="post"
            node_ref=form_ref
            on:submit=on_submit
        >
            <div class="alert alert-error" style="display:none"></div>
            <div class="control-group field-name">
                <input type="text" name="name" placeholder="Your name" class="input-large" />
            </div>
            <div class="control-group field-email">
                <input type="email" name="email" placeholder="Your email" class="input-large" />
            </div>
            <div class="control-group field-content">
                <textarea
                    name="content"
                    placeholder="Your comment..."
                    class="input-xxlarge"
                    rows="5"
                ></textarea>
            </div>
            <button type="submit" class="btn btn-primary">
                <i class="icon-comment"></i>
                " Submit"
            </button>
        </form>
    }
}

#[cfg(not(target_family = "wasm"))]
fn submit_in_background(_form_ref: NodeRef<Form>) {}

#[cfg(target_family = "wasm")]
fn submit_in_background(form_ref: NodeRef<Form>) {
    use super::comment_form::CommentForm;
    use crate::{
        common::config::FeedbackConfig,
        frontend::{
            api::{transport::BrowserTransport, ApiClient},
            dom::{web::WebDom, DomRef},
        },
    };
    use log::warn;
    use std::rc::Rc;

    let Some(form) = form_ref.get() else {
        return;
    };
    let web = match WebDom::new() {
        Ok(dom) => Rc::new(dom),
        Err(e) => {
            warn!("{e}");
            return;
        }
    };
    let node = web.intern(form.into());
    let dom: DomRef = web;
    let client = ApiClient::new(BrowserTransport);
    match CommentForm::new(dom, node, client, &FeedbackConfig::default()) {
        Ok(handler) => {
            Rc::new(handler).handle_submit();
        }
        Err(e) => warn!("{e}"),
    }
}
