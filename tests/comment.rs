mod common;

use common::{client, comment_form, dom_ref, RecordingTransport};
use formkit::{
    common::{config::FeedbackConfig, Ack, ApiErrorBody, Fields, Payload},
    frontend::{
        components::comment_form::CommentForm,
        dom::{memory::MemoryDom, memory::Navigation, Dom, DomError},
        utils::errors::{FrontendError, FrontendResult},
    },
};
use http::Method;
use leptos::task::Executor;
use pretty_assertions::assert_eq;
use serde::Serialize;
use std::rc::Rc;
use tokio::task::LocalSet;

const ACTION: &str = "/photo/comment";

fn handler(
    page: &common::CommentPage,
    transport: &RecordingTransport,
) -> Result<CommentForm<RecordingTransport>, DomError> {
    CommentForm::new(
        dom_ref(&page.dom),
        page.form,
        client(transport),
        &FeedbackConfig::default(),
    )
}

#[tokio::test]
async fn test_comment_success_reloads() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport.respond(200, r#"{"id":"0013","content":"Nice post"}"#);

    handler(&page, &transport)?.submit().await?;

    assert_eq!(vec![Navigation::Reload], dom.navigations());
    let sent = transport.sent();
    assert_eq!(1, sent.len());
    assert_eq!(ACTION, sent[0].url);
    assert_eq!(
        "name=Bob&email=bob%40example.com&content=Nice+post",
        sent[0].body
    );
    // the page goes away, so the button stays disabled
    assert!(dom.attr(page.submit, "disabled").is_some());
    assert!(dom.has_class(page.icon, "loading"));
    Ok(())
}

#[tokio::test]
async fn test_comment_error_is_shown_inline() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport.respond(200, r#"{"error":"bad","data":"email"}"#);

    let res = handler(&page, &transport)?.submit().await;

    assert_eq!(
        Err(FrontendError::Api(ApiErrorBody::new("bad").with_data("email"))),
        res
    );
    assert_eq!("bad", dom.text(page.alert));
    assert!(dom.is_visible(page.alert));
    assert!(dom.has_class(page.email, "error"));
    assert!(!dom.has_class(page.name, "error"));
    assert!(!dom.has_class(page.content, "error"));
    assert_eq!(None, dom.attr(page.submit, "disabled"));
    assert!(!dom.has_class(page.icon, "loading"));
    assert!(dom.navigations().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_comment_error_prefers_message() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport.respond(
        200,
        r#"{"error":"value:invalid","data":"content","message":"Comment is empty"}"#,
    );

    let res = handler(&page, &transport)?.submit().await;

    assert!(res.is_err());
    assert_eq!("Comment is empty", dom.text(page.alert));
    assert!(dom.has_class(page.content, "error"));
    Ok(())
}

#[tokio::test]
async fn test_comment_rejected_with_message_only() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport.respond(400, r#"{"message":"Name required","data":"name"}"#);

    let res = handler(&page, &transport)?.submit().await;

    assert_eq!(
        Err(FrontendError::Api(
            ApiErrorBody::new("")
                .with_data("name")
                .with_message("Name required")
        )),
        res
    );
    assert_eq!("Name required", dom.text(page.alert));
    assert!(dom.has_class(page.name, "error"));
    assert!(!dom.has_class(page.email, "error"));
    assert_eq!(None, dom.attr(page.submit, "disabled"));
    Ok(())
}

#[tokio::test]
async fn test_comment_transport_failure() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport.fail("Network unreachable");
    transport.respond(502, "");

    let form = handler(&page, &transport)?;
    let res = form.submit().await;
    assert_eq!(
        Err(FrontendError::Transport("Network unreachable".to_string())),
        res
    );
    assert_eq!("Network unreachable", dom.text(page.alert));
    assert!([page.name, page.email, page.content]
        .iter()
        .all(|g| !dom.has_class(*g, "error")));
    assert_eq!(None, dom.attr(page.submit, "disabled"));

    // the user retries by hand
    let res = form.submit().await;
    assert_eq!("Request failed with status 502", dom.text(page.alert));
    assert!(res.is_err());
    assert_eq!(2, transport.sent().len());
    Ok(())
}

#[tokio::test]
async fn test_comment_resubmit_clears_previous_error() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport
        .respond(200, r#"{"error":"value:invalid","data":"name","message":"Name required"}"#)
        .respond(200, "{}");

    let form = handler(&page, &transport)?;
    assert!(form.submit().await.is_err());
    assert!(dom.has_class(page.name, "error"));

    form.submit().await?;
    assert!(!dom.has_class(page.name, "error"));
    assert!(!dom.is_visible(page.alert));
    assert_eq!("", dom.text(page.alert));
    Ok(())
}

#[tokio::test]
async fn test_handle_submit_posts_in_background() -> FrontendResult<()> {
    // may already be set by another test in this binary
    _ = Executor::init_tokio();
    let dom = Rc::new(MemoryDom::new());
    let accepted = comment_form(&dom, Some(ACTION));
    let rejected = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport
        .respond(200, r#"{"error":"bad","data":"email"}"#)
        .respond(200, "{}");
    let rejected_form = Rc::new(handler(&rejected, &transport)?);
    let accepted_form = Rc::new(handler(&accepted, &transport)?);

    LocalSet::new()
        .run_until(async {
            assert!(!rejected_form.handle_submit());
            assert!(transport.sent().is_empty());
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            assert_eq!("bad", dom.text(rejected.alert));
            assert!(dom.has_class(rejected.email, "error"));
            assert_eq!(None, dom.attr(rejected.submit, "disabled"));
            assert!(dom.navigations().is_empty());

            assert!(!accepted_form.handle_submit());
            assert!(dom.navigations().is_empty());
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
        })
        .await;

    assert_eq!(2, transport.sent().len());
    assert_eq!(vec![Navigation::Reload], dom.navigations());
    Ok(())
}

#[tokio::test]
async fn test_comment_without_action() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, None);
    let transport = RecordingTransport::default();

    let res = handler(&page, &transport)?.submit().await;

    assert_eq!(
        Err(FrontendError::Dom(DomError::NotFound("form[action]".to_string()))),
        res
    );
    assert!(transport.sent().is_empty());
    assert_eq!(None, dom.attr(page.submit, "disabled"));
    Ok(())
}

#[tokio::test]
async fn test_forms_are_independent() -> FrontendResult<()> {
    let dom = Rc::new(MemoryDom::new());
    let first = comment_form(&dom, Some(ACTION));
    let second = comment_form(&dom, Some(ACTION));
    let transport = RecordingTransport::default();
    transport.respond(200, r#"{"error":"bad","data":"email"}"#);

    let res = handler(&first, &transport)?.submit().await;

    assert!(res.is_err());
    assert!(dom.has_class(first.email, "error"));
    assert!(!dom.has_class(second.email, "error"));
    assert!(!dom.is_visible(second.alert));
    assert_eq!(None, dom.attr(second.submit, "disabled"));
    Ok(())
}

#[test]
fn test_serialize_skips_unsuccessful_controls() -> Result<(), DomError> {
    let dom = Rc::new(MemoryDom::new());
    let page = comment_form(&dom, Some(ACTION));
    dom.add_with_attrs(page.form, "input", "", &[("type", "hidden"), ("name", "article_id"), ("value", "42")]);
    dom.add_with_attrs(page.form, "input", "", &[("type", "checkbox"), ("name", "notify"), ("value", "1")]);
    dom.add_with_attrs(
        page.form,
        "input",
        "",
        &[("type", "checkbox"), ("name", "subscribe"), ("value", "yes"), ("checked", "checked")],
    );
    dom.add_with_attrs(page.form, "input", "", &[("name", "legacy"), ("value", "x"), ("disabled", "disabled")]);
    dom.add_with_attrs(page.form, "input", "", &[("type", "submit"), ("name", "go"), ("value", "Go")]);
    dom.set_attr(page.submit, "name", "submit");

    let fields = handler(&page, &RecordingTransport::default())?.serialize()?;

    let expected: Fields = [
        ("name", "Bob"),
        ("email", "bob@example.com"),
        ("content", "Nice post"),
        ("article_id", "42"),
        ("subscribe", "yes"),
    ]
    .into_iter()
    .collect();
    assert_eq!(expected, fields);
    Ok(())
}

#[tokio::test]
async fn test_post_json_is_always_a_json_post() -> FrontendResult<()> {
    #[derive(Serialize)]
    struct Form {
        title: String,
        draft: bool,
    }

    let transport = RecordingTransport::default();
    let api = client(&transport);
    let payloads = vec![
        Payload::from(Fields::new().with("a", "1")),
        Payload::from("b=2"),
        Payload::from_form(&Form {
            title: "Hello".to_string(),
            draft: true,
        })?,
        Payload::from(Fields::new()),
    ];
    for payload in payloads {
        transport.respond(200, "{}");
        api.post_json::<Ack>("/api/articles/create", payload).await?;
    }

    let sent = transport.sent();
    assert_eq!(4, sent.len());
    for request in &sent {
        assert_eq!(Method::POST, request.method());
        let headers = request.headers();
        assert!(headers
            .iter()
            .any(|(n, v)| *n == "accept" && v.starts_with("application/json")));
    }
    assert_eq!(
        vec!["a=1", "b=2", "title=Hello&draft=true", ""],
        sent.iter().map(|r| r.body.as_str()).collect::<Vec<_>>()
    );
    Ok(())
}
