use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use super::{Method, RemoteResponse, RemoteSource};
use crate::error::RemoteError;
use crate::models::Notifications;

/// Records every call and replays queued results (default: success).
#[derive(Default)]
pub struct MockRemote {
    pub listing: Mutex<Option<Result<Notifications, String>>>,
    pub calls: Mutex<Vec<(String, String, Option<Value>)>>,
    pub do_results: Mutex<VecDeque<Result<Value, RemoteError>>>,
    pub request_results: Mutex<VecDeque<Result<RemoteResponse, RemoteError>>>,
}

impl MockRemote {
    pub fn with_listing(listing: Notifications) -> Self {
        let mock = Self::default();
        *mock.listing.lock().unwrap() = Some(Ok(listing));
        mock
    }

    pub fn failing_listing(message: &str) -> Self {
        let mock = Self::default();
        *mock.listing.lock().unwrap() = Some(Err(message.to_string()));
        mock
    }

    pub fn push_do(&self, result: Result<Value, RemoteError>) {
        self.do_results.lock().unwrap().push_back(result);
    }

    pub fn push_request(&self, result: Result<RemoteResponse, RemoteError>) {
        self.request_results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<(String, String, Option<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &Method, url: &str, body: Option<&Value>) {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), url.to_string(), body.cloned()));
    }
}

impl RemoteSource for MockRemote {
    fn list(&self) -> Result<Notifications, RemoteError> {
        self.record(&Method::GET, "list", None);
        match self.listing.lock().unwrap().clone() {
            Some(Ok(listing)) => Ok(listing),
            Some(Err(message)) => Err(RemoteError::Transport {
                url: "list".into(),
                message,
            }),
            None => Ok(Notifications::new()),
        }
    }

    fn do_request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, RemoteError> {
        self.record(&method, url, body);
        self.do_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Object(Default::default())))
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<RemoteResponse, RemoteError> {
        self.record(&method, url, body);
        self.request_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(RemoteResponse {
                status: 204,
                body: String::new(),
            }))
    }
}
