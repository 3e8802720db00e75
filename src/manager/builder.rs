use super::{AuthManager, RetryPolicy};
use crate::captcha::CaptchaSolver;
use crate::storage::{CookieStore, MemoryCookieStore};
use crate::transport::{ReqwestRequestStrategy, RequestStrategy};
use std::sync::Arc;

pub struct AuthManagerBuilder {
    /// Where session cookies are persisted.
    pub store: Arc<dyn CookieStore>,
    /// Executes the HTTP requests.
    pub strategy: Arc<dyn RequestStrategy>,
    /// Answers CAPTCHA challenges during login. Without one a CAPTCHA
    /// challenge fails the login.
    pub captcha_solver: Option<Arc<dyn CaptchaSolver>>,
    /// Retry budget for login submissions.
    pub retry_policy: RetryPolicy,
}

impl AuthManagerBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryCookieStore::default()),
            strategy: Arc::new(ReqwestRequestStrategy::default()),
            captcha_solver: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.store = store;
        self
    }

    pub fn request_strategy(mut self, strategy: Arc<dyn RequestStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn captcha_solver(mut self, solver: Arc<dyn CaptchaSolver>) -> Self {
        self.captcha_solver = Some(solver);
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn build(self) -> AuthManager {
        AuthManager::from(self)
    }
}

impl Default for AuthManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
