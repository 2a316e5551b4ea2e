use crate::frontend::{
    dom::{DomRef, DomResult, NodeId, Selector},
    utils::formatting::{html_escape, is_markup},
};
use std::{cell::RefCell, rc::Rc};

/// Attribute set on the modal once the primary button was clicked.
pub const RESULT_ATTR: &str = "result";
pub const RESULT_OK: &str = "ok";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogBody {
    /// Inserted as is.
    Markup(String),
    /// Escaped and wrapped in a paragraph.
    Text(String),
}

impl DialogBody {
    pub fn parse(text_or_html: &str) -> Self {
        if is_markup(text_or_html) {
            DialogBody::Markup(text_or_html.to_string())
        } else {
            DialogBody::Text(text_or_html.to_string())
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            DialogBody::Markup(html) => html.clone(),
            DialogBody::Text(text) => format!("<p>{}</p>", html_escape(text)),
        }
    }
}

/// Handed to the confirm callback; hides the dialog once the confirmed
/// action has finished.
pub struct Completion {
    dom: DomRef,
    modal: NodeId,
    button: NodeId,
}

impl Completion {
    /// The primary button which was clicked.
    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn done(self) {
        self.dom.hide_modal(self.modal);
    }
}

pub type OnOk = Box<dyn FnOnce(Completion)>;
pub type OnCancel = Box<dyn FnOnce()>;

/// A modal built on the fly and removed from the document once hidden.
pub struct ConfirmDialog {
    dom: DomRef,
    modal: NodeId,
    primary: NodeId,
}

impl ConfirmDialog {
    /// Insert the dialog at the start of `container` and show it.
    ///
    /// Note that once the primary button was clicked, hiding the dialog runs
    /// `on_cancel`; a dialog dismissed without confirming runs nothing.
    pub fn open(
        dom: DomRef,
        container: NodeId,
        title: &str,
        body: &str,
        on_ok: Option<OnOk>,
        on_cancel: Option<OnCancel>,
    ) -> DomResult<Self> {
        let modal = element(&dom, "div", "modal hide fade")?;

        let header = element(&dom, "div", "modal-header")?;
        let close = element(&dom, "button", "close")?;
        dom.set_attr(close, "type", "button");
        dom.set_attr(close, "data-dismiss", "modal");
        dom.set_text(close, "\u{d7}");
        let heading = element(&dom, "h3", "")?;
        dom.set_text(heading, title);
        dom.append_child(header, close)?;
        dom.append_child(header, heading)?;

        let content = element(&dom, "div", "modal-body")?;
        dom.set_inner_html(content, &DialogBody::parse(body).to_html());

        let footer = element(&dom, "div", "modal-footer")?;
        let primary = button(&dom, "btn btn-primary", "icon-ok icon-white", " OK")?;
        let cancel = button(&dom, "btn", "icon-remove", " Cancel")?;
        dom.set_attr(cancel, "data-dismiss", "modal");
        dom.append_child(footer, primary)?;
        dom.append_child(footer, cancel)?;

        for part in [header, content, footer] {
            dom.append_child(modal, part)?;
        }
        dom.prepend_child(container, modal)?;
        dom.show_modal(modal);

        let on_ok = RefCell::new(on_ok);
        let ok_dom = dom.clone();
        dom.on_click(
            primary,
            Rc::new(move || {
                ok_dom.set_attr(modal, RESULT_ATTR, RESULT_OK);
                ok_dom.set_attr(primary, "disabled", "disabled");
                if let Ok(icon) = ok_dom.query(primary, &Selector::class("icon-ok")) {
                    ok_dom.add_class(icon, "loading");
                }
                if let Some(on_ok) = on_ok.borrow_mut().take() {
                    on_ok(Completion {
                        dom: ok_dom.clone(),
                        modal,
                        button: primary,
                    });
                }
            }),
        );

        for dismiss in dom.query_all(modal, &Selector::parse("[data-dismiss=modal]")?) {
            let dismiss_dom = dom.clone();
            dom.on_click(dismiss, Rc::new(move || dismiss_dom.hide_modal(modal)));
        }

        let on_cancel = RefCell::new(on_cancel);
        let hidden_dom = dom.clone();
        dom.on_hidden(
            modal,
            Rc::new(move || {
                hidden_dom.remove(modal);
                if hidden_dom.attr(modal, RESULT_ATTR).as_deref() == Some(RESULT_OK) {
                    if let Some(on_cancel) = on_cancel.borrow_mut().take() {
                        on_cancel();
                    }
                }
            }),
        );

        Ok(Self {
            dom,
            modal,
            primary,
        })
    }

    pub fn modal(&self) -> NodeId {
        self.modal
    }

    pub fn primary_button(&self) -> NodeId {
        self.primary
    }

    pub fn hide(&self) {
        self.dom.hide_modal(self.modal);
    }
}

fn element(dom: &DomRef, tag: &str, classes: &str) -> DomResult<NodeId> {
    let node = dom.create_element(tag)?;
    for class in classes.split_whitespace() {
        dom.add_class(node, class);
    }
    Ok(node)
}

fn button(dom: &DomRef, classes: &str, icon_classes: &str, label: &str) -> DomResult<NodeId> {
    let link = element(dom, "a", classes)?;
    dom.set_attr(link, "href", "#");
    let icon = element(dom, "i", icon_classes)?;
    let text = element(dom, "span", "")?;
    dom.set_text(text, label);
    dom.append_child(link, icon)?;
    dom.append_child(link, text)?;
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn body_markup_or_text() {
        assert_eq!("<b>hi</b>", DialogBody::parse("<b>hi</b>").to_html());
        assert_eq!("<p>hi</p>", DialogBody::parse("hi").to_html());
        assert_eq!(
            "<p>1 &lt; 2 &amp; 3</p>",
            DialogBody::parse("1 < 2 & 3").to_html()
        );
        assert_eq!("<p></p>", DialogBody::parse("").to_html());
    }
}
