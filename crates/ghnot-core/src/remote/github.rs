use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::Method;
use serde_json::Value;

use super::{RemoteResponse, RemoteSource};
use crate::config::EndpointConfig;
use crate::constants::{self, API_ACCEPT, API_VERSION};
use crate::error::RemoteError;
use crate::models::{Notification, Notifications};

/// GitHub notifications API client
pub struct GithubClient {
    client: Client,
    token: String,
    api_url: String,
    per_page: u32,
    max_pages: u32,
}

impl GithubClient {
    pub fn new(token: String, endpoint: &EndpointConfig) -> Self {
        Self {
            client: Client::new(),
            token,
            api_url: endpoint.api_url.trim_end_matches('/').to_string(),
            per_page: endpoint.per_page.max(1),
            max_pages: endpoint.max_pages.max(1),
        }
    }

    /// Build a client with the token from `GHNOT_TOKEN` or `GITHUB_TOKEN`.
    pub fn from_env(endpoint: &EndpointConfig) -> Result<Self, RemoteError> {
        let token = std::env::var(constants::ENV_TOKEN)
            .or_else(|_| std::env::var(constants::ENV_TOKEN_FALLBACK))
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(RemoteError::MissingToken)?;
        Ok(Self::new(token, endpoint))
    }

    fn builder(&self, method: Method, url: &str, body: Option<&Value>) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, API_ACCEPT)
            .header(USER_AGENT, constants::USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response, RemoteError> {
        tracing::debug!("github: {} {}", method, url);
        self.builder(method, url, body)
            .send()
            .map_err(|e| RemoteError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn read_body(url: &str, response: Response) -> Result<String, RemoteError> {
        response.text().map_err(|e| RemoteError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn check_status(method: &Method, url: &str, response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(RemoteError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

impl RemoteSource for GithubClient {
    fn list(&self) -> Result<Notifications, RemoteError> {
        let mut url = Some(format!(
            "{}/notifications?all=false&per_page={}",
            self.api_url, self.per_page
        ));
        let mut notifications = Vec::new();
        let mut pages = 0;

        while let Some(page_url) = url.take() {
            if pages == self.max_pages {
                tracing::warn!(
                    "github: stopping after {} pages, more notifications remain",
                    self.max_pages
                );
                break;
            }
            pages += 1;

            let response = Self::check_status(&Method::GET, &page_url, self.send(Method::GET, &page_url, None)?)?;
            url = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link);
            let body = Self::read_body(&page_url, response)?;
            let page: Vec<Notification> =
                serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
                    url: page_url.clone(),
                    message: e.to_string(),
                })?;
            notifications.extend(page);
        }

        tracing::info!("github: fetched {} notifications in {} pages", notifications.len(), pages);
        Ok(Notifications::from(notifications))
    }

    fn do_request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, RemoteError> {
        let response = Self::check_status(&method, url, self.send(method.clone(), url, body)?)?;
        let text = Self::read_body(url, response)?;
        if text.trim().is_empty() {
            return Err(RemoteError::EmptyBody);
        }
        serde_json::from_str(&text).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<RemoteResponse, RemoteError> {
        let response = self.send(method, url, body)?;
        let status = response.status().as_u16();
        let body = Self::read_body(url, response)?;
        Ok(RemoteResponse { status, body })
    }
}

/// Extract the `rel="next"` target from a `Link` header.
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
