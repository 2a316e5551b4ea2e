use crate::{
    common::config::FeedbackConfig,
    frontend::{
        dom::{DomRef, DomResult, NodeId, Selector},
        utils::formatting::cache_bust_url,
    },
};
use chrono::Utc;
use std::cell::Cell;

/// Reloads the current page with a cache busting query parameter.
pub struct PageRefresh {
    dom: DomRef,
    param: String,
    last: Cell<i64>,
}

impl PageRefresh {
    pub fn new(dom: DomRef, config: &FeedbackConfig) -> Self {
        Self {
            dom,
            param: config.cache_bust_param.clone(),
            last: Cell::new(0),
        }
    }

    /// Navigate to `?<param>=<millis>` and return that url. The timestamp
    /// increases with every call, even within the same millisecond.
    pub fn refresh(&self) -> String {
        let url = cache_bust_url(&self.param, self.next_stamp());
        self.dom.assign_location(&url);
        url
    }

    fn next_stamp(&self) -> i64 {
        let stamp = Utc::now().timestamp_millis().max(self.last.get() + 1);
        self.last.set(stamp);
        stamp
    }
}

/// Activate tooltips on all `a[data-toggle=tooltip]` links in `container`.
pub fn init_tooltips(dom: &DomRef, container: NodeId) -> DomResult<usize> {
    let links = dom.query_all(container, &Selector::parse("a[data-toggle=tooltip]")?);
    for link in &links {
        dom.enable_tooltip(*link);
    }
    Ok(links.len())
}
