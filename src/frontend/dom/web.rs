//! [`Dom`] backed by the browser document.

use super::{Dom, DomError, DomResult, Handler, NodeId, Selector};
use leptos::prelude::set_timeout;
use std::{cell::RefCell, collections::HashMap, time::Duration};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{
    Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    ScrollBehavior, ScrollToOptions, Window,
};

/// Class which the stylesheet uses for the slide-up transition.
const SLIDING_CLASS: &str = "sliding-up";

pub struct WebDom {
    window: Window,
    elements: RefCell<Vec<Element>>,
    hidden: RefCell<HashMap<NodeId, Vec<Handler>>>,
}

impl WebDom {
    pub fn new() -> DomResult<Self> {
        let window = web_sys::window().ok_or_else(|| DomError::Js("no window".to_string()))?;
        let body = window
            .document()
            .and_then(|d| d.body())
            .ok_or_else(|| DomError::NotFound("body".to_string()))?;
        Ok(Self {
            window,
            elements: RefCell::new(vec![body.into()]),
            hidden: RefCell::new(HashMap::new()),
        })
    }

    /// Handle for `element`, reusing the existing one if it was seen before.
    pub fn intern(&self, element: Element) -> NodeId {
        let mut elements = self.elements.borrow_mut();
        let node: &web_sys::Node = element.as_ref();
        if let Some(i) = elements.iter().position(|e| e.is_same_node(Some(node))) {
            return NodeId(i);
        }
        elements.push(element);
        NodeId(elements.len() - 1)
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.elements.borrow().get(node.0).cloned()
    }

    fn html_element(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    fn document(&self) -> DomResult<web_sys::Document> {
        self.window
            .document()
            .ok_or_else(|| DomError::Js("no document".to_string()))
    }
}

fn js_error(value: JsValue) -> DomError {
    DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl Dom for WebDom {
    fn body(&self) -> NodeId {
        NodeId(0)
    }

    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let Some(scope) = self.element(scope) else {
            return vec![];
        };
        let Ok(list) = scope.query_selector_all(&selector.to_string()) else {
            return vec![];
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .map(|e| self.intern(e))
            .collect()
    }

    fn create_element(&self, tag: &str) -> DomResult<NodeId> {
        let element = self.document()?.create_element(tag).map_err(js_error)?;
        Ok(self.intern(element))
    }

    fn prepend_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent = self
            .element(parent)
            .ok_or_else(|| DomError::NotFound(format!("node {}", parent.0)))?;
        let child = self
            .element(child)
            .ok_or_else(|| DomError::NotFound(format!("node {}", child.0)))?;
        parent.prepend_with_node_1(&child).map_err(js_error)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent = self
            .element(parent)
            .ok_or_else(|| DomError::NotFound(format!("node {}", parent.0)))?;
        let child = self
            .element(child)
            .ok_or_else(|| DomError::NotFound(format!("node {}", child.0)))?;
        parent.append_child(&child).map(|_| ()).map_err(js_error)
    }

    fn remove(&self, node: NodeId) {
        if let Some(e) = self.element(node) {
            e.remove();
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.element(node).map(|e| e.is_connected()).unwrap_or(false)
    }

    fn tag(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(e) = self.element(node) {
            _ = e.class_list().add_1(class);
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(e) = self.element(node) {
            _ = e.class_list().remove_1(class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|e| e.class_list().contains(class))
            .unwrap_or(false)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node).and_then(|e| e.get_attribute(name))
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element(node) {
            _ = e.set_attribute(name, value);
        }
    }

    fn remove_attr(&self, node: NodeId, name: &str) {
        if let Some(e) = self.element(node) {
            _ = e.remove_attribute(name);
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(e) = self.element(node) {
            e.set_text_content(Some(text));
        }
    }

    fn inner_html(&self, node: NodeId) -> String {
        self.element(node).map(|e| e.inner_html()).unwrap_or_default()
    }

    fn set_inner_html(&self, node: NodeId, html: &str) {
        if let Some(e) = self.element(node) {
            e.set_inner_html(html);
        }
    }

    fn value(&self, node: NodeId) -> String {
        let Some(e) = self.element(node) else {
            return String::new();
        };
        if let Some(input) = e.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(textarea) = e.dyn_ref::<HtmlTextAreaElement>() {
            textarea.value()
        } else if let Some(select) = e.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            e.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        if let Some(e) = self.html_element(node) {
            let style = e.style();
            _ = if visible {
                _ = e.class_list().remove_1("hide");
                style.remove_property("display").map(|_| ())
            } else {
                style.set_property("display", "none")
            };
        }
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.html_element(node)
            .map(|e| e.offset_parent().is_some())
            .unwrap_or(false)
    }

    fn slide_up(&self, node: NodeId, delay: Duration, duration: Duration) {
        let Some(e) = self.html_element(node) else {
            return;
        };
        set_timeout(
            move || {
                let style = e.style();
                _ = style.set_property("transition", &format!("max-height {}ms", duration.as_millis()));
                _ = e.class_list().add_1(SLIDING_CLASS);
                set_timeout(
                    move || {
                        _ = e.class_list().remove_1(SLIDING_CLASS);
                        _ = e.style().set_property("display", "none");
                    },
                    duration,
                );
            },
            delay,
        );
    }

    fn show_modal(&self, node: NodeId) {
        self.set_visible(node, true);
        self.add_class(node, "in");
        self.add_class(node, "modal-open");
    }

    fn hide_modal(&self, node: NodeId) {
        if !self.has_class(node, "in") {
            return;
        }
        self.remove_class(node, "in");
        self.remove_class(node, "modal-open");
        self.set_visible(node, false);
        let handlers = self.hidden.borrow().get(&node).cloned().unwrap_or_default();
        for handler in handlers {
            handler();
        }
    }

    fn on_click(&self, node: NodeId, handler: Handler) {
        let Some(e) = self.element(node) else {
            return;
        };
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            ev.prevent_default();
            handler();
        });
        _ = e.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        // the listener lives as long as the element
        closure.forget();
    }

    fn on_hidden(&self, node: NodeId, handler: Handler) {
        self.hidden.borrow_mut().entry(node).or_default().push(handler);
    }

    fn enable_tooltip(&self, node: NodeId) {
        let Some(e) = self.element(node) else {
            return;
        };
        if let Some(title) = e.get_attribute("title") {
            _ = e.set_attribute("data-tip", &title);
            _ = e.remove_attribute("title");
        }
        _ = e.class_list().add_1("tooltip");
    }

    fn offset_top(&self, node: NodeId) -> DomResult<f64> {
        let e = self
            .element(node)
            .ok_or_else(|| DomError::NotFound(format!("node {}", node.0)))?;
        if !e.is_connected() {
            return Err(DomError::Layout(format!("node {} is detached", node.0)));
        }
        Ok(e.get_bounding_client_rect().top() + self.scroll_top()?)
    }

    fn scroll_top(&self) -> DomResult<f64> {
        self.window.scroll_y().map_err(js_error)
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn assign_location(&self, url: &str) {
        _ = self.window.location().assign(url);
    }

    fn reload(&self) {
        _ = self.window.location().reload();
    }
}
