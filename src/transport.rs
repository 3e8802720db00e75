//! The transport seam. Every network call this crate makes goes through a
//! [`RequestStrategy`], so requests can be proxied, instrumented, or replaced
//! with scripted responses in tests.

use crate::error::TransportError;
use crate::helpers::{cookies_to_header, get_default_client, parse_set_cookie, USER_AGENT_STRING};
use crate::types::{CookieMap, HttpClient};
use async_trait::async_trait;
use lazy_regex::regex_is_match;
use reqwest::header;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A request to execute. Cookies are carried on the request itself; the
/// underlying client never retains them.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Cookies to send, merged into a `Cookie` header.
    pub cookies: CookieMap,
    /// Query parameters.
    pub params: Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Form body, urlencoded on send.
    pub form: Option<Vec<(String, String)>>,
}

impl HttpRequest {
    pub fn new<U>(method: Method, url: U) -> Self
    where
        U: Into<String>,
    {
        Self {
            method,
            url: url.into(),
            cookies: CookieMap::new(),
            params: Vec::new(),
            headers: Vec::new(),
            form: None,
        }
    }

    pub fn get<U>(url: U) -> Self
    where
        U: Into<String>,
    {
        Self::new(Method::GET, url)
    }

    pub fn post<U>(url: U) -> Self
    where
        U: Into<String>,
    {
        Self::new(Method::POST, url)
    }

    pub fn with_cookie<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Merges `cookies` into the request. Later values win.
    pub fn with_cookies(mut self, cookies: CookieMap) -> Self {
        self.cookies.extend(cookies);
        self
    }

    pub fn with_param<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_header<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the form body from a serializable value. The value must
    /// serialize to an object; nested values are JSON-encoded.
    pub fn with_form<T>(mut self, form: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize,
    {
        self.form = Some(to_form_pairs(form)?);
        Ok(self)
    }

    pub fn with_form_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.form = Some(pairs);
        self
    }

    /// The value submitted for a form field, if any.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form.as_deref()?
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// The value of a query parameter, if any.
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params.iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

fn to_form_pairs<T>(form: &T) -> Result<Vec<(String, String)>, serde_json::Error>
where
    T: Serialize,
{
    let map = match serde_json::to_value(form)? {
        Value::Object(map) => map,
        _ => return Err(serde::ser::Error::custom("form must serialize to an object")),
    };
    let mut pairs = Vec::with_capacity(map.len());

    for (name, value) in map {
        let value = match value {
            Value::Null => continue,
            Value::String(value) => value,
            Value::Bool(value) => value.to_string(),
            Value::Number(value) => value.to_string(),
            value => value.to_string(),
        };

        pairs.push((name, value));
    }

    Ok(pairs)
}

/// Executes requests on behalf of the crate.
#[async_trait]
pub trait RequestStrategy: Send + Sync {
    /// Executes a request and returns the response body.
    async fn request(&self, request: HttpRequest) -> Result<String, TransportError>;

    /// Executes a request and returns the response body along with any
    /// cookies the response set.
    async fn request_with_cookies(&self, request: HttpRequest) -> Result<(String, CookieMap), TransportError>;
}

/// The default strategy, backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestRequestStrategy {
    client: HttpClient,
}

impl ReqwestRequestStrategy {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<reqwest::Response, TransportError> {
        let HttpRequest { method, url, cookies, params, headers, form } = request;
        let mut builder = self.client.request(method, &url);

        if !params.is_empty() {
            builder = builder.query(&params);
        }

        if !cookies.is_empty() {
            builder = builder.header(header::COOKIE, cookies_to_header(&cookies));
        }

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(form) = &form {
            builder = builder.form(form);
        }

        check_status(builder.send().await?)
    }
}

impl Default for ReqwestRequestStrategy {
    fn default() -> Self {
        Self::new(get_default_client(USER_AGENT_STRING))
    }
}

#[async_trait]
impl RequestStrategy for ReqwestRequestStrategy {
    async fn request(&self, request: HttpRequest) -> Result<String, TransportError> {
        let response = self.execute(request).await?;

        Ok(response.text().await?)
    }

    async fn request_with_cookies(&self, request: HttpRequest) -> Result<(String, CookieMap), TransportError> {
        let response = self.execute(request).await?;
        let cookies = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(parse_set_cookie)
            .collect();
        let body = response.text().await?;

        Ok((body, cookies))
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();

    match status.as_u16() {
        429 => Err(TransportError::RateLimited),
        401 => Err(TransportError::Unauthorized),
        300..=399 if is_login_redirect(response.headers().get(header::LOCATION)) => {
            // an expired session redirects to the login page rather than
            // responding with an error status
            Err(TransportError::Unauthorized)
        },
        _ if !status.is_success() => Err(TransportError::Status(status)),
        _ => Ok(response),
    }
}

fn is_login_redirect(location: Option<&header::HeaderValue>) -> bool {
    location
        .and_then(|location| location.to_str().ok())
        .map(|location| regex_is_match!("/login", location))
        .unwrap_or(false)
}
