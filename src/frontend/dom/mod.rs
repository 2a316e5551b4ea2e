//! Access to the page markup.
//!
//! Components never touch a global document. They receive a [`DomRef`] plus
//! the [`NodeId`] of the container they operate in, so several instances can
//! live on one page and everything runs against [`memory::MemoryDom`] in tests.

pub mod memory;
pub mod selector;
#[cfg(target_family = "wasm")]
pub mod web;

pub use selector::Selector;
use std::{fmt::Display, rc::Rc, time::Duration};

/// Opaque handle of an element, only meaningful for the [`Dom`] which
/// returned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

pub type DomRef = Rc<dyn Dom>;
pub type DomResult<T> = Result<T, DomError>;
pub type Handler = Rc<dyn Fn()>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// No element matched the selector.
    NotFound(String),
    InvalidSelector(String),
    /// Position could not be computed, eg for a detached element.
    Layout(String),
    /// Error thrown by the browser.
    Js(String),
}

impl Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::NotFound(selector) => write!(f, "No element matches '{selector}'"),
            DomError::InvalidSelector(reason) => write!(f, "Invalid selector: {reason}"),
            DomError::Layout(reason) => write!(f, "Layout unavailable: {reason}"),
            DomError::Js(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Operations the feedback components need from a document.
///
/// Mutations of detached or unknown nodes are ignored, reads return empty
/// values. Lookups that callers depend on go through [`Dom::query`], which
/// reports missing markup as [`DomError::NotFound`].
pub trait Dom {
    /// The `<body>` element.
    fn body(&self) -> NodeId;

    /// All elements below `scope` matching `selector`, in document order.
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    fn query(&self, scope: NodeId, selector: &Selector) -> DomResult<NodeId> {
        self.query_all(scope, selector)
            .into_iter()
            .next()
            .ok_or_else(|| DomError::NotFound(selector.to_string()))
    }

    fn create_element(&self, tag: &str) -> DomResult<NodeId>;
    fn prepend_child(&self, parent: NodeId, child: NodeId) -> DomResult<()>;
    fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()>;
    /// Detach `node` from the document.
    fn remove(&self, node: NodeId);
    /// Whether `node` is part of the document.
    fn is_attached(&self, node: NodeId) -> bool;

    fn tag(&self, node: NodeId) -> String;
    fn add_class(&self, node: NodeId, class: &str);
    fn remove_class(&self, node: NodeId, class: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&self, node: NodeId, name: &str);

    /// Text content of `node` and its descendants.
    fn text(&self, node: NodeId) -> String;
    /// Replace all children of `node` with `text`.
    fn set_text(&self, node: NodeId, text: &str);
    fn inner_html(&self, node: NodeId) -> String;
    /// Replace all children of `node` with raw markup.
    fn set_inner_html(&self, node: NodeId, html: &str);
    /// Current value of a form control.
    fn value(&self, node: NodeId) -> String;

    fn set_visible(&self, node: NodeId, visible: bool);
    fn is_visible(&self, node: NodeId) -> bool;
    /// Hide `node` with a slide animation once `delay` has passed.
    fn slide_up(&self, node: NodeId, delay: Duration, duration: Duration);

    fn show_modal(&self, node: NodeId);
    /// Hide a modal and fire its hidden handlers.
    fn hide_modal(&self, node: NodeId);
    fn on_click(&self, node: NodeId, handler: Handler);
    /// Register a handler which runs after the modal `node` was hidden.
    fn on_hidden(&self, node: NodeId, handler: Handler);
    fn enable_tooltip(&self, node: NodeId);

    /// Distance from the top of the document to `node`.
    fn offset_top(&self, node: NodeId) -> DomResult<f64>;
    fn scroll_top(&self) -> DomResult<f64>;
    /// Smoothly scroll the page to `top`.
    fn scroll_to(&self, top: f64);

    fn assign_location(&self, url: &str);
    fn reload(&self);
}

/// Scroll up to `node` when it sits above the visible area.
///
/// Layout errors are logged and otherwise ignored, a missing scroll is
/// not worth failing the caller for.
pub fn scroll_into_view(dom: &dyn Dom, node: NodeId, margin: f64) {
    let target = dom
        .offset_top(node)
        .and_then(|top| Ok((top, dom.scroll_top()?)));
    match target {
        Ok((top, scroll_top)) if top < scroll_top - margin => dom.scroll_to(top - margin),
        Ok(_) => {}
        Err(e) => log::debug!("Not scrolling to element: {e}"),
    }
}
