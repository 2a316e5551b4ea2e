use doku::Document;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct FeedbackConfig {
    /// Space in pixels kept above the error banner when scrolling to it
    #[default(41.0)]
    #[doku(example = "41.0")]
    pub error_scroll_margin: f64,
    /// How long the success banner stays visible before sliding up
    #[default(3000)]
    #[doku(example = "3000")]
    pub success_delay_ms: u64,
    /// Duration of the slide-up animation of the success banner
    #[default(300)]
    #[doku(example = "300")]
    pub success_slide_ms: u64,
    /// Query parameter used to bypass caches on page refresh
    #[default("t")]
    #[doku(example = "t")]
    pub cache_bust_param: String,
    /// Class added to submit button icons while a request is pending
    #[default("loading")]
    #[doku(example = "loading")]
    pub loading_class: String,
    /// Class added to a form group which failed validation
    #[default("error")]
    #[doku(example = "error")]
    pub error_class: String,
    /// Action of the comment form rendered by the comment editor
    #[default("/photo/comment")]
    #[doku(example = "/photo/comment")]
    pub comment_action: String,
}

#[cfg(not(target_family = "wasm"))]
impl FeedbackConfig {
    pub fn read() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("formkit.toml").required(false))
            // Cant use _ as separator due to https://github.com/mehcode/config-rs/issues/391
            .add_source(config::Environment::with_prefix("FORMKIT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
