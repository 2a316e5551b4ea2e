use crate::{
    common::{config::FeedbackConfig, Ack, Fields},
    frontend::{
        api::{ApiClient, Transport},
        components::{error_banner::ErrorBanner, loading::LoadingToggle},
        dom::{DomError, DomRef, NodeId, Selector},
        utils::errors::FrontendResult,
    },
};
use log::{info, warn};
use std::rc::Rc;

/// Input types which are never part of a serialized form.
const SKIPPED_INPUTS: [&str; 5] = ["submit", "button", "reset", "file", "image"];

/// Submits a comment form in the background and reports errors inline.
pub struct CommentForm<T> {
    dom: DomRef,
    form: NodeId,
    client: ApiClient<T>,
    banner: ErrorBanner,
    loading: LoadingToggle,
}

impl<T: Transport + 'static> CommentForm<T> {
    pub fn new(
        dom: DomRef,
        form: NodeId,
        client: ApiClient<T>,
        config: &FeedbackConfig,
    ) -> Result<Self, DomError> {
        let banner =
            ErrorBanner::new(dom.clone(), form, config)?.with_banner(Selector::parse(".alert")?);
        let loading = LoadingToggle::new(dom.clone(), form, config)?;
        Ok(Self {
            dom,
            form,
            client,
            banner,
            loading,
        })
    }

    /// Named, enabled controls of the form in document order.
    pub fn serialize(&self) -> Result<Fields, DomError> {
        let controls = self.dom.query_all(self.form, &Selector::parse("[name]")?);
        Ok(controls
            .into_iter()
            .filter(|c| self.dom.attr(*c, "disabled").is_none())
            .filter(|c| match self.dom.tag(*c).as_str() {
                "textarea" | "select" => true,
                "input" => {
                    let kind = self.dom.attr(*c, "type").unwrap_or_default();
                    match kind.as_str() {
                        "checkbox" | "radio" => self.dom.attr(*c, "checked").is_some(),
                        kind => !SKIPPED_INPUTS.contains(&kind),
                    }
                }
                _ => false,
            })
            .filter_map(|c| Some((self.dom.attr(c, "name")?, self.dom.value(c))))
            .collect())
    }

    /// Post the form to its `action`. On success the page is reloaded, on
    /// failure the error is shown in the form and the submit button enabled
    /// again.
    pub async fn submit(&self) -> FrontendResult<Ack> {
        self.banner.clear()?;
        let action = self
            .dom
            .attr(self.form, "action")
            .ok_or_else(|| DomError::NotFound("form[action]".to_string()))?;
        let fields = self.serialize()?;
        self.loading.set(true);
        info!("Posting comment to {action}");
        match self.client.create_comment(&action, fields).await {
            Ok(ack) => {
                self.dom.reload();
                Ok(ack)
            }
            Err(e) => {
                warn!("Failed to post comment: {e}");
                if let Err(dom_err) = self.banner.show(Some(&e.message()), e.field()) {
                    warn!("Failed to show error: {dom_err}");
                }
                self.loading.set(false);
                Err(e)
            }
        }
    }

    /// Start [`CommentForm::submit`] in the background. Always returns
    /// `false` so the browser does not submit the form itself.
    ///
    /// The submission is spawned on the global [`Executor`]. Leptos sets it up
    /// when mounting in the browser; elsewhere call one of the
    /// `Executor::init_*` functions first, for example
    /// `Executor::init_tokio()` inside a tokio `LocalSet`.
    ///
    /// # Panics
    ///
    /// Debug builds panic when no executor has been initialized.
    ///
    /// [`Executor`]: leptos::task::Executor
    pub fn handle_submit(self: &Rc<Self>) -> bool {
        let this = Rc::clone(self);
        leptos::task::spawn_local(async move {
            _ = this.submit().await;
        });
        false
    }
}
