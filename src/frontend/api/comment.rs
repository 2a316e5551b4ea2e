use super::{ApiClient, Transport};
use crate::{
    common::{Ack, Fields},
    frontend::utils::errors::FrontendResult,
};

impl<T: Transport> ApiClient<T> {
    /// Submit a serialized comment form to its `action` url.
    pub async fn create_comment(&self, action: &str, fields: Fields) -> FrontendResult<Ack> {
        self.post_json(action, fields).await
    }
}
