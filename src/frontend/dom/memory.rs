//! A document kept entirely in memory.

use super::{
    selector::{Combinator, Selector},
    Dom, DomError, DomResult, Handler, NodeId,
};
use crate::frontend::utils::formatting::html_escape;
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    time::Duration,
};

/// Navigation requested through [`Dom::assign_location`] or [`Dom::reload`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Assign(String),
    Reload,
}

#[derive(Debug)]
enum Content {
    Element,
    Text(String),
    /// Markup inserted with `set_inner_html`, kept unparsed.
    Raw(String),
}

struct Node {
    tag: String,
    content: Content,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visible: bool,
    tooltip: bool,
    offset_top: f64,
    click: Vec<Handler>,
    hidden: Vec<Handler>,
}

impl Node {
    fn new(tag: &str, content: Content) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            content,
            classes: vec![],
            attrs: BTreeMap::new(),
            parent: None,
            children: vec![],
            visible: true,
            tooltip: false,
            offset_top: 0.0,
            click: vec![],
            hidden: vec![],
        }
    }
}

struct Timer {
    due: Duration,
    node: NodeId,
}

/// In-memory [`Dom`] with a virtual clock, scroll position and navigation
/// log. Layout is not computed; tests place elements with
/// [`MemoryDom::set_offset_top`].
pub struct MemoryDom {
    nodes: RefCell<Vec<Node>>,
    body: NodeId,
    now: Cell<Duration>,
    timers: RefCell<Vec<Timer>>,
    scroll_top: Cell<f64>,
    scrolls: RefCell<Vec<f64>>,
    navigations: RefCell<Vec<Navigation>>,
    /// When false, layout reads fail like in a document without rendering.
    layout: Cell<bool>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut html = Node::new("html", Content::Element);
        let mut body = Node::new("body", Content::Element);
        html.children.push(NodeId(1));
        body.parent = Some(NodeId(0));
        Self {
            nodes: RefCell::new(vec![html, body]),
            body: NodeId(1),
            now: Cell::new(Duration::ZERO),
            timers: RefCell::new(vec![]),
            scroll_top: Cell::new(0.0),
            scrolls: RefCell::new(vec![]),
            navigations: RefCell::new(vec![]),
            layout: Cell::new(true),
        }
    }

    /// Append a new element to `parent`. `classes` is a space separated list.
    pub fn add(&self, parent: NodeId, tag: &str, classes: &str) -> NodeId {
        let id = self.push(Node::new(tag, Content::Element));
        {
            let mut nodes = self.nodes.borrow_mut();
            nodes[id.0].classes = classes.split_whitespace().map(String::from).collect();
        }
        self.attach(parent, id, false);
        id
    }

    /// Append a new element with attributes to `parent`.
    pub fn add_with_attrs(
        &self,
        parent: NodeId,
        tag: &str,
        classes: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        let id = self.add(parent, tag, classes);
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        id
    }

    pub fn set_offset_top(&self, node: NodeId, top: f64) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node.0) {
            n.offset_top = top;
        }
    }

    /// Make `offset_top` and `scroll_top` fail with [`DomError::Layout`].
    pub fn set_layout_available(&self, available: bool) {
        self.layout.set(available);
    }

    /// Place the viewport without recording a scroll animation.
    pub fn set_scroll_top(&self, top: f64) {
        self.scroll_top.set(top);
    }

    /// Targets of all `scroll_to` calls so far.
    pub fn scrolls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.borrow().clone()
    }

    pub fn has_tooltip(&self, node: NodeId) -> bool {
        self.with_node(node, |n| n.tooltip).unwrap_or(false)
    }

    /// Number of timers which have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move the virtual clock forward and run every timer that became due.
    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);
        let due: Vec<NodeId> = {
            let mut timers = self.timers.borrow_mut();
            let (due, pending): (Vec<Timer>, Vec<Timer>) =
                timers.drain(..).partition(|t| t.due <= now);
            *timers = pending;
            due.into_iter().map(|t| t.node).collect()
        };
        for node in due {
            self.set_visible(node, false);
        }
    }

    /// Simulate a user click on `node`. Disabled buttons ignore clicks.
    pub fn click(&self, node: NodeId) {
        let handlers = self
            .with_node(node, |n| {
                if n.tag == "button" && n.attrs.contains_key("disabled") {
                    vec![]
                } else {
                    n.click.clone()
                }
            })
            .unwrap_or_default();
        for handler in handlers {
            handler();
        }
    }

    fn push(&self, node: Node) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        NodeId(nodes.len() - 1)
    }

    fn with_node<T>(&self, node: NodeId, f: impl FnOnce(&Node) -> T) -> Option<T> {
        self.nodes.borrow().get(node.0).map(f)
    }

    fn with_node_mut(&self, node: NodeId, f: impl FnOnce(&mut Node)) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node.0) {
            f(n)
        }
    }

    fn attach(&self, parent: NodeId, child: NodeId, first: bool) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        let children = &mut nodes[parent.0].children;
        if first {
            children.insert(0, child);
        } else {
            children.push(child);
        }
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes.get_mut(node.0).and_then(|n| n.parent.take()) {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn check(&self, node: NodeId) -> DomResult<()> {
        if node.0 < self.nodes.borrow().len() {
            Ok(())
        } else {
            Err(DomError::NotFound(format!("node {}", node.0)))
        }
    }

    fn replace_children(&self, node: NodeId, content: Content) {
        if self.check(node).is_err() {
            return;
        }
        let old = self.with_node(node, |n| n.children.clone()).unwrap_or_default();
        for child in old {
            self.detach(child);
        }
        let child = self.push(Node::new("#text", content));
        self.attach(node, child, false);
    }

    fn descendants(nodes: &[Node], node: NodeId, out: &mut Vec<NodeId>) {
        for child in &nodes[node.0].children {
            out.push(*child);
            Self::descendants(nodes, *child, out);
        }
    }

    /// Whether `node` matches `selector`, using the ancestors of `node` for
    /// combinators.
    fn matches(nodes: &[Node], node: NodeId, selector: &Selector) -> bool {
        fn compound_matches(
            nodes: &[Node],
            node: NodeId,
            compound: &super::selector::Compound,
        ) -> bool {
            let n = &nodes[node.0];
            matches!(n.content, Content::Element)
                && compound.matches(
                    &n.tag,
                    |c| n.classes.iter().any(|x| x == c),
                    |a| n.attrs.get(a).map(String::as_str),
                )
        }

        fn match_from(
            nodes: &[Node],
            node: NodeId,
            parts: &[(Combinator, super::selector::Compound)],
        ) -> bool {
            let Some(((combinator, compound), rest)) = parts.split_last() else {
                return false;
            };
            if !compound_matches(nodes, node, compound) {
                return false;
            }
            if rest.is_empty() {
                return true;
            }
            let mut parent = nodes[node.0].parent;
            while let Some(p) = parent {
                if match_from(nodes, p, rest) {
                    return true;
                }
                if *combinator == Combinator::Child {
                    return false;
                }
                parent = nodes[p.0].parent;
            }
            false
        }

        match_from(nodes, node, selector.parts())
    }

    fn collect_text(nodes: &[Node], node: NodeId, out: &mut String) {
        match &nodes[node.0].content {
            Content::Text(text) => out.push_str(text),
            Content::Raw(html) => out.push_str(&strip_tags(html)),
            Content::Element => {
                for child in &nodes[node.0].children {
                    Self::collect_text(nodes, *child, out);
                }
            }
        }
    }

    fn serialize(nodes: &[Node], node: NodeId, out: &mut String) {
        let n = &nodes[node.0];
        match &n.content {
            Content::Text(text) => out.push_str(&html_escape(text)),
            Content::Raw(html) => out.push_str(html),
            Content::Element => {
                out.push('<');
                out.push_str(&n.tag);
                if !n.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", n.classes.join(" ")));
                }
                for (name, value) in &n.attrs {
                    out.push_str(&format!(" {name}=\"{}\"", html_escape(value)));
                }
                out.push('>');
                for child in &n.children {
                    Self::serialize(nodes, *child, out);
                }
                out.push_str(&format!("</{}>", n.tag));
            }
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

impl Dom for MemoryDom {
    fn body(&self) -> NodeId {
        self.body
    }

    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        if scope.0 >= nodes.len() {
            return vec![];
        }
        let mut candidates = vec![];
        Self::descendants(&nodes, scope, &mut candidates);
        candidates
            .into_iter()
            .filter(|n| Self::matches(&nodes, *n, selector))
            .collect()
    }

    fn create_element(&self, tag: &str) -> DomResult<NodeId> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomError::Js(format!("Invalid tag name '{tag}'")));
        }
        Ok(self.push(Node::new(tag, Content::Element)))
    }

    fn prepend_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check(parent)?;
        self.check(child)?;
        self.attach(parent, child, true);
        Ok(())
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check(parent)?;
        self.check(child)?;
        self.attach(parent, child, false);
        Ok(())
    }

    fn remove(&self, node: NodeId) {
        self.detach(node);
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        while let Some(n) = current {
            if n == NodeId(0) {
                return true;
            }
            current = nodes.get(n.0).and_then(|n| n.parent);
        }
        false
    }

    fn tag(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.tag.clone()).unwrap_or_default()
    }

    fn add_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        })
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| n.classes.retain(|c| c != class))
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_node(node, |n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_node(node, |n| n.attrs.get(name).cloned()).flatten()
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.with_node_mut(node, |n| {
            n.attrs.insert(name.to_string(), value.to_string());
        })
    }

    fn remove_attr(&self, node: NodeId, name: &str) {
        self.with_node_mut(node, |n| {
            n.attrs.remove(name);
        })
    }

    fn text(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut text = String::new();
        if node.0 < nodes.len() {
            Self::collect_text(&nodes, node, &mut text);
        }
        text
    }

    fn set_text(&self, node: NodeId, text: &str) {
        self.replace_children(node, Content::Text(text.to_string()))
    }

    fn inner_html(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut html = String::new();
        if let Some(n) = nodes.get(node.0) {
            for child in &n.children {
                Self::serialize(&nodes, *child, &mut html);
            }
        }
        html
    }

    fn set_inner_html(&self, node: NodeId, html: &str) {
        self.replace_children(node, Content::Raw(html.to_string()))
    }

    fn value(&self, node: NodeId) -> String {
        if self.tag(node) == "textarea" {
            self.text(node)
        } else {
            self.attr(node, "value").unwrap_or_default()
        }
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        self.with_node_mut(node, |n| n.visible = visible)
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.with_node(node, |n| n.visible).unwrap_or(false)
    }

    fn slide_up(&self, node: NodeId, delay: Duration, duration: Duration) {
        let due = self.now.get() + delay + duration;
        self.timers.borrow_mut().push(Timer { due, node });
    }

    fn show_modal(&self, node: NodeId) {
        self.set_visible(node, true);
        self.add_class(node, "in");
    }

    fn hide_modal(&self, node: NodeId) {
        if !self.is_visible(node) {
            return;
        }
        self.set_visible(node, false);
        self.remove_class(node, "in");
        let handlers = self.with_node(node, |n| n.hidden.clone()).unwrap_or_default();
        for handler in handlers {
            handler();
        }
    }

    fn on_click(&self, node: NodeId, handler: Handler) {
        self.with_node_mut(node, |n| n.click.push(handler))
    }

    fn on_hidden(&self, node: NodeId, handler: Handler) {
        self.with_node_mut(node, |n| n.hidden.push(handler))
    }

    fn enable_tooltip(&self, node: NodeId) {
        self.with_node_mut(node, |n| n.tooltip = true)
    }

    fn offset_top(&self, node: NodeId) -> DomResult<f64> {
        if !self.layout.get() {
            return Err(DomError::Layout("layout unavailable".to_string()));
        }
        if !self.is_attached(node) {
            return Err(DomError::Layout(format!("node {} is detached", node.0)));
        }
        Ok(self.with_node(node, |n| n.offset_top).unwrap_or_default())
    }

    fn scroll_top(&self) -> DomResult<f64> {
        if !self.layout.get() {
            return Err(DomError::Layout("layout unavailable".to_string()));
        }
        Ok(self.scroll_top.get())
    }

    fn scroll_to(&self, top: f64) {
        self.scroll_top.set(top);
        self.scrolls.borrow_mut().push(top);
    }

    fn assign_location(&self, url: &str) {
        self.navigations
            .borrow_mut()
            .push(Navigation::Assign(url.to_string()));
    }

    fn reload(&self) {
        self.navigations.borrow_mut().push(Navigation::Reload);
    }
}
