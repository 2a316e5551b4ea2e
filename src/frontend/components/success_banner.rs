use crate::{
    common::config::FeedbackConfig,
    frontend::dom::{scroll_into_view, DomRef, DomResult, NodeId, Selector},
};
use std::time::Duration;

pub struct SuccessBanner {
    dom: DomRef,
    container: NodeId,
    banner: Selector,
    delay: Duration,
    slide: Duration,
}

impl SuccessBanner {
    pub fn new(dom: DomRef, container: NodeId, config: &FeedbackConfig) -> DomResult<Self> {
        Ok(Self {
            dom,
            container,
            banner: Selector::parse(".alert-success")?,
            delay: Duration::from_millis(config.success_delay_ms),
            slide: Duration::from_millis(config.success_slide_ms),
        })
    }

    /// Reveal the banner and let it slide away after the configured delay.
    pub fn show(&self) -> DomResult<()> {
        let banner = self.dom.query(self.container, &self.banner)?;
        self.dom.set_visible(banner, true);
        self.dom.slide_up(banner, self.delay, self.slide);
        scroll_into_view(self.dom.as_ref(), banner, 0.0);
        Ok(())
    }
}
