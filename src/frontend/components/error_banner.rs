use crate::{
    common::config::FeedbackConfig,
    frontend::dom::{scroll_into_view, DomRef, DomResult, NodeId, Selector},
};

/// Inline error banner plus highlighting of the form group at fault.
pub struct ErrorBanner {
    dom: DomRef,
    container: NodeId,
    banner: Selector,
    groups: Selector,
    scroll_margin: Option<f64>,
    error_class: String,
}

impl ErrorBanner {
    /// Banner `.alert-error` inside `container`, as used by the admin pages.
    pub fn new(dom: DomRef, container: NodeId, config: &FeedbackConfig) -> DomResult<Self> {
        Ok(Self {
            dom,
            container,
            banner: Selector::parse(".alert-error")?,
            groups: Selector::parse("div.control-group")?,
            scroll_margin: Some(config.error_scroll_margin),
            error_class: config.error_class.clone(),
        })
    }

    pub fn with_banner(mut self, banner: Selector) -> Self {
        self.banner = banner;
        self
    }

    pub fn without_scroll(mut self) -> Self {
        self.scroll_margin = None;
        self
    }

    /// Clear all field highlighting, then show `message` and highlight
    /// `.field-<field>`. Without a message the banner is emptied and hidden.
    ///
    /// Returns `false` so it can be used directly as result of a submit
    /// handler.
    pub fn show(&self, message: Option<&str>, field: Option<&str>) -> DomResult<bool> {
        for group in self.dom.query_all(self.container, &self.groups) {
            self.dom.remove_class(group, &self.error_class);
        }
        let banner = self.dom.query(self.container, &self.banner)?;
        let Some(message) = message.filter(|m| !m.is_empty()) else {
            self.dom.set_text(banner, "");
            self.dom.set_visible(banner, false);
            return Ok(false);
        };
        self.dom.set_text(banner, message);
        self.dom.set_visible(banner, true);
        if let Some(margin) = self.scroll_margin {
            scroll_into_view(self.dom.as_ref(), banner, margin);
        }
        if let Some(field) = field.filter(|f| !f.is_empty()) {
            let group = self
                .dom
                .query(self.container, &Selector::class(&format!("field-{field}")))?;
            self.dom.add_class(group, &self.error_class);
        }
        Ok(false)
    }

    pub fn clear(&self) -> DomResult<bool> {
        self.show(None, None)
    }
}
