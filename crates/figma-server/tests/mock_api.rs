use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use figma_core::error::Error;
use figma_core::traits::{FigmaApi, FigmaApiFactory};
use figma_core::types::{Credential, GetComments, GetFile, GetFileNodes, GetImage, GetImageFills};

/// In-memory Figma API answering every call with the same body.
pub struct MockFigmaApi {
    response: Value,
    failure: Option<(u16, String)>,
    calls: Arc<AtomicUsize>,
}

impl MockFigmaApi {
    fn answer(&self) -> Result<Value, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some((status, message)) => Err(Error::network(Some(*status), message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

#[async_trait]
impl FigmaApi for MockFigmaApi {
    async fn get_file(&self, _params: &GetFile) -> Result<Value, Error> {
        self.answer()
    }

    async fn get_file_nodes(&self, _params: &GetFileNodes) -> Result<Value, Error> {
        self.answer()
    }

    async fn get_image(&self, _params: &GetImage) -> Result<Value, Error> {
        self.answer()
    }

    async fn get_image_fills(&self, _params: &GetImageFills) -> Result<Value, Error> {
        self.answer()
    }

    async fn get_comments(&self, _params: &GetComments) -> Result<Value, Error> {
        self.answer()
    }

    async fn get_team_projects(&self, _team_id: &str) -> Result<Value, Error> {
        self.answer()
    }

    async fn get_project_files(&self, _project_id: &str) -> Result<Value, Error> {
        self.answer()
    }
}

/// Factory that hands out [`MockFigmaApi`]s and records what it was asked for.
pub struct MockApiFactory {
    response: Value,
    failure: Option<(u16, String)>,
    calls: Arc<AtomicUsize>,
    tokens: Mutex<Vec<String>>,
}

impl MockApiFactory {
    pub fn answering(response: Value) -> Self {
        Self {
            response,
            failure: None,
            calls: Arc::new(AtomicUsize::new(0)),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::answering(Value::Null)
        }
    }

    /// Number of API calls made by all clients from this factory.
    pub fn api_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens passed to `connect`, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

impl FigmaApiFactory for MockApiFactory {
    fn connect(&self, credential: Credential) -> Arc<dyn FigmaApi> {
        self.tokens
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        Arc::new(MockFigmaApi {
            response: self.response.clone(),
            failure: self.failure.clone(),
            calls: Arc::clone(&self.calls),
        })
    }
}
