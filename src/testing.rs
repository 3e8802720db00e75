//! Scripted transport for tests.

use crate::error::TransportError;
use crate::transport::{HttpRequest, RequestStrategy};
use crate::types::CookieMap;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Plays back scripted responses and records every request it executes.
///
/// Responses are keyed by URL. An exact match wins; otherwise the longest
/// scripted key contained in the request URL is used. Each key holds a
/// queue consumed one response per request, and running dry panics so a
/// test can never silently make more requests than it scripted.
pub(crate) struct ScriptedStrategy {
    responses: Mutex<HashMap<String, VecDeque<(String, CookieMap)>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedStrategy {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn script(self, url: &str, body: &str) -> Self {
        self.script_with_cookies(url, body, CookieMap::new())
    }

    pub fn script_with_cookies(self, url: &str, body: &str, cookies: CookieMap) -> Self {
        self.responses.lock().unwrap()
            .entry(url.into())
            .or_default()
            .push_back((body.into(), cookies));
        self
    }

    /// The requests made to URLs containing `url_part`, in order.
    pub fn requests_to(&self, url_part: &str) -> Vec<HttpRequest> {
        self.requests.lock().unwrap()
            .iter()
            .filter(|request| request.url.contains(url_part))
            .cloned()
            .collect()
    }

    fn pop_response(&self, url: &str) -> (String, CookieMap) {
        let mut responses = self.responses.lock().unwrap();
        let key = if responses.contains_key(url) {
            url.to_string()
        } else {
            responses.keys()
                .filter(|part| url.contains(part.as_str()))
                .max_by_key(|part| part.len())
                .cloned()
                .unwrap_or_else(|| panic!("no scripted response for {url}"))
        };

        responses.get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("scripted responses exhausted for {url}"))
    }
}

#[async_trait]
impl RequestStrategy for ScriptedStrategy {
    async fn request(&self, request: HttpRequest) -> Result<String, TransportError> {
        let (body, _cookies) = self.request_with_cookies(request).await?;

        Ok(body)
    }

    async fn request_with_cookies(
        &self,
        request: HttpRequest,
    ) -> Result<(String, CookieMap), TransportError> {
        let response = self.pop_response(&request.url);

        self.requests.lock().unwrap().push(request);

        Ok(response)
    }
}
