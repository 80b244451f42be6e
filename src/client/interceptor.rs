//! Client-side token cache and the layer that attaches it to outgoing calls.
//!
//! [`ClientAuthInterceptor::start`] logs in once up front, then keeps the
//! cached token fresh from a background task. Each refresh that fails is
//! retried after [`RETRY_INTERVAL`] until one succeeds, after which the
//! regular interval applies again. A call going out always reads whichever
//! token was stored last.

use std::collections::HashSet;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use http::HeaderValue;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::{Layer, Service};
use tracing::{debug, info, warn};

use super::error::ClientError;
use super::token::TokenSource;
use crate::auth::AUTHORIZATION_HEADER;

/// Delay before retrying a failed refresh.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Where the refresh loop stands after its last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSchedule {
    /// Last refresh succeeded; wait the configured interval.
    Steady,
    /// Last refresh failed; retry after [`RETRY_INTERVAL`].
    Retrying,
}

impl RefreshSchedule {
    pub fn next(self, refreshed: bool) -> Self {
        if refreshed {
            RefreshSchedule::Steady
        } else {
            RefreshSchedule::Retrying
        }
    }

    pub fn delay(self, interval: Duration) -> Duration {
        match self {
            RefreshSchedule::Steady => interval,
            RefreshSchedule::Retrying => RETRY_INTERVAL,
        }
    }
}

/// Owns the token cache and its refresh task.
///
/// Dropping the interceptor stops the refresh task; layers handed out by
/// [`layer`](Self::layer) keep the last token they saw.
pub struct ClientAuthInterceptor {
    token: watch::Receiver<String>,
    auth_methods: Arc<HashSet<String>>,
    refresher: JoinHandle<()>,
}

impl ClientAuthInterceptor {
    /// Fetch the first token and start refreshing every `refresh_interval`.
    ///
    /// Fails if the first fetch fails.
    pub async fn start<T, I, M>(
        source: T,
        auth_methods: I,
        refresh_interval: Duration,
    ) -> Result<Self, ClientError>
    where
        T: TokenSource,
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let token = source.fetch().await?;
        info!("obtained initial access token");

        let (tx, rx) = watch::channel(token);
        let refresher = tokio::spawn(refresh_loop(source, tx, refresh_interval));

        Ok(Self {
            token: rx,
            auth_methods: Arc::new(auth_methods.into_iter().map(Into::into).collect()),
            refresher,
        })
    }

    /// The token currently cached.
    pub fn token(&self) -> String {
        self.token.borrow().clone()
    }

    pub fn requires_auth(&self, method: &str) -> bool {
        self.auth_methods.contains(method)
    }

    /// A tower layer that attaches the cached token to protected calls.
    pub fn layer(&self) -> ClientAuthLayer {
        ClientAuthLayer {
            token: self.token.clone(),
            auth_methods: self.auth_methods.clone(),
        }
    }
}

impl Drop for ClientAuthInterceptor {
    fn drop(&mut self) {
        self.refresher.abort();
    }
}

async fn refresh_loop<T: TokenSource>(
    source: T,
    token: watch::Sender<String>,
    interval: Duration,
) {
    let mut schedule = RefreshSchedule::Steady;
    loop {
        tokio::time::sleep(schedule.delay(interval)).await;

        let refreshed = match source.fetch().await {
            Ok(fresh) => {
                token.send_replace(fresh);
                debug!("access token refreshed");
                true
            }
            Err(err) => {
                warn!(error = %err, retry_in = ?RETRY_INTERVAL, "cannot refresh access token");
                false
            }
        };
        schedule = schedule.next(refreshed);
    }
}

/// Tower layer produced by [`ClientAuthInterceptor::layer`].
#[derive(Clone)]
pub struct ClientAuthLayer {
    token: watch::Receiver<String>,
    auth_methods: Arc<HashSet<String>>,
}

impl<S> Layer<S> for ClientAuthLayer {
    type Service = ClientAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientAuth {
            inner,
            token: self.token.clone(),
            auth_methods: self.auth_methods.clone(),
        }
    }
}

/// Adds the `authorization` header to calls whose method needs it.
#[derive(Clone)]
pub struct ClientAuth<S> {
    inner: S,
    token: watch::Receiver<String>,
    auth_methods: Arc<HashSet<String>>,
}

impl<S, B> Service<http::Request<B>> for ClientAuth<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: http::Request<B>) -> Self::Future {
        if self.auth_methods.contains(request.uri().path()) {
            let token = self.token.borrow().clone();
            match HeaderValue::from_str(&token) {
                Ok(value) => {
                    request.headers_mut().insert(AUTHORIZATION_HEADER, value);
                }
                Err(_) => warn!("cached access token is not a valid header value"),
            }
        }
        self.inner.call(request)
    }
}
