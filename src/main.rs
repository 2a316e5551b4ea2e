#[cfg(not(target_family = "wasm"))]
pub fn main() -> anyhow::Result<()> {
    use formkit::common::config::FeedbackConfig;
    use log::{info, LevelFilter};

    if std::env::args().collect::<Vec<_>>().get(1) == Some(&"--print-config".to_string()) {
        println!("{}", doku::to_toml::<FeedbackConfig>());
        std::process::exit(0);
    }

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("formkit", LevelFilter::Info)
        .init();

    let config = FeedbackConfig::read()?;
    info!("Configuration is valid: {config:?}");
    Ok(())
}

#[cfg(target_family = "wasm")]
fn main() {
    use formkit::{
        common::config::FeedbackConfig,
        frontend::components::comment_editor::CommentEditor,
    };
    use leptos::{mount::mount_to_body, prelude::*};

    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    let action = FeedbackConfig::default().comment_action;
    mount_to_body(move || {
        view! { <CommentEditor action=action.clone() /> }
    });
}
