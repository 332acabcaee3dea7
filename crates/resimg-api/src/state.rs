use std::sync::Arc;

use resimg_processing::ImageStore;

use crate::auth::Authorizer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ImageStore>,
    pub authorizer: Arc<dyn Authorizer>,
    /// Prefix joined with an asset path to form its public URL.
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<ImageStore>,
        authorizer: Arc<dyn Authorizer>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            authorizer,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), path)
    }
}
