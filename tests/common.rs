#![allow(dead_code)]

use async_trait::async_trait;
use formkit::frontend::{
    api::{ApiClient, JsonPost, RawResponse, Transport},
    dom::{memory::MemoryDom, Dom, DomRef, NodeId},
    utils::errors::{FrontendError, FrontendResult},
};
use std::{cell::RefCell, collections::VecDeque, rc::Rc};

/// Transport answering with queued responses and remembering every request.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    responses: Rc<RefCell<VecDeque<FrontendResult<RawResponse>>>>,
    sent: Rc<RefCell<Vec<JsonPost>>>,
}

impl RecordingTransport {
    pub fn respond(&self, status: u16, text: &str) -> &Self {
        self.responses.borrow_mut().push_back(Ok(RawResponse {
            status,
            text: text.to_string(),
            url: String::new(),
        }));
        self
    }

    pub fn fail(&self, error: &str) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Err(FrontendError::Transport(error.to_string())));
        self
    }

    pub fn sent(&self) -> Vec<JsonPost> {
        self.sent.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for RecordingTransport {
    async fn send(&self, request: &JsonPost) -> FrontendResult<RawResponse> {
        self.sent.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FrontendError::Transport("no response queued".to_string())))
            .map(|res| RawResponse {
                url: request.url.clone(),
                ..res
            })
    }
}

pub fn client(transport: &RecordingTransport) -> ApiClient<RecordingTransport> {
    ApiClient::new(transport.clone())
}

pub fn dom_ref(dom: &Rc<MemoryDom>) -> DomRef {
    dom.clone()
}

/// Comment form of the default theme.
pub struct CommentPage {
    pub dom: Rc<MemoryDom>,
    pub form: NodeId,
    pub alert: NodeId,
    pub name: NodeId,
    pub email: NodeId,
    pub content: NodeId,
    pub submit: NodeId,
    pub icon: NodeId,
}

pub fn comment_form(dom: &Rc<MemoryDom>, action: Option<&str>) -> CommentPage {
    let form = dom.add(dom.body(), "form", "comment-form");
    if let Some(action) = action {
        dom.set_attr(form, "action", action);
    }
    let alert = dom.add(form, "div", "alert alert-error");
    dom.set_visible(alert, false);
    let name = dom.add(form, "div", "control-group field-name");
    dom.add_with_attrs(name, "input", "", &[("type", "text"), ("name", "name"), ("value", "Bob")]);
    let email = dom.add(form, "div", "control-group field-email");
    dom.add_with_attrs(
        email,
        "input",
        "",
        &[("type", "email"), ("name", "email"), ("value", "bob@example.com")],
    );
    let content = dom.add(form, "div", "control-group field-content");
    let textarea = dom.add_with_attrs(content, "textarea", "", &[("name", "content")]);
    dom.set_text(textarea, "Nice post");
    let submit = dom.add_with_attrs(form, "button", "btn", &[("type", "submit")]);
    let icon = dom.add(submit, "i", "icon-comment");
    CommentPage {
        dom: dom.clone(),
        form,
        alert,
        name,
        email,
        content,
        submit,
        icon,
    }
}

/// Admin page with two forms, both banners and some tooltip links.
pub struct AdminPage {
    pub dom: Rc<MemoryDom>,
    pub error: NodeId,
    pub success: NodeId,
    pub groups: Vec<NodeId>,
    pub buttons: Vec<NodeId>,
    pub icons: Vec<NodeId>,
    pub tooltips: Vec<NodeId>,
}

pub fn admin_page() -> AdminPage {
    let dom = Rc::new(MemoryDom::new());
    let body = dom.body();
    let error = dom.add(body, "div", "alert alert-error");
    dom.set_visible(error, false);
    let success = dom.add(body, "div", "alert alert-success");
    dom.set_visible(success, false);

    let mut groups = vec![];
    let mut buttons = vec![];
    let mut icons = vec![];
    for fields in [&["name", "email"][..], &["title"][..]] {
        let form = dom.add(body, "form", "form-horizontal");
        for field in fields {
            let group = dom.add(form, "div", &format!("control-group field-{field}"));
            dom.add_with_attrs(group, "input", "", &[("name", *field)]);
            groups.push(group);
        }
        let button = dom.add_with_attrs(form, "button", "btn", &[("type", "submit")]);
        icons.push(dom.add(button, "i", "icon-ok"));
        buttons.push(button);
        dom.add_with_attrs(form, "button", "btn", &[("type", "button")]);
    }

    let nav = dom.add(body, "div", "nav");
    let tooltips = vec![
        dom.add_with_attrs(nav, "a", "", &[("data-toggle", "tooltip"), ("title", "Edit")]),
        dom.add_with_attrs(nav, "a", "", &[("data-toggle", "tooltip"), ("title", "Delete")]),
    ];
    dom.add_with_attrs(nav, "a", "", &[("data-toggle", "dropdown")]);

    AdminPage {
        dom,
        error,
        success,
        groups,
        buttons,
        icons,
        tooltips,
    }
}
