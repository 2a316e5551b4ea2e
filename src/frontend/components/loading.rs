use crate::{
    common::config::FeedbackConfig,
    frontend::dom::{DomRef, DomResult, NodeId, Selector},
};

/// Disables submit buttons and spins their icons while a request is pending.
pub struct LoadingToggle {
    dom: DomRef,
    container: NodeId,
    buttons: Selector,
    icons: Selector,
    loading_class: String,
}

impl LoadingToggle {
    pub fn new(dom: DomRef, container: NodeId, config: &FeedbackConfig) -> DomResult<Self> {
        Ok(Self {
            dom,
            container,
            buttons: Selector::parse("button[type=submit]")?,
            icons: Selector::parse("button[type=submit] > i")?,
            loading_class: config.loading_class.clone(),
        })
    }

    /// Returns the number of submit buttons changed.
    pub fn set(&self, loading: bool) -> usize {
        let buttons = self.dom.query_all(self.container, &self.buttons);
        for button in &buttons {
            if loading {
                self.dom.set_attr(*button, "disabled", "disabled");
            } else {
                self.dom.remove_attr(*button, "disabled");
            }
        }
        for icon in self.dom.query_all(self.container, &self.icons) {
            if loading {
                self.dom.add_class(icon, &self.loading_class);
            } else {
                self.dom.remove_class(icon, &self.loading_class);
            }
        }
        buttons.len()
    }
}
