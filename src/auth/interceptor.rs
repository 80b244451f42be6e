//! Server-side authorization: one decision per inbound call.
//!
//! [`Authorizer`] holds the decision logic; [`AuthLayer`] is the tower layer
//! that applies it to every request reaching the tonic server, before the
//! request is routed to a service. Streams are authorized once, when they are
//! opened; a token that expires mid-stream does not end the stream.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::HeaderValue;
use tonic::body::{empty_body, BoxBody};
use tonic::Status;
use tower::{Layer, Service};
use tracing::{debug, warn};

use super::access::AccessRoles;
use super::error::AuthError;
use super::jwt::{Claims, JwtManager};
use crate::service::ServiceError;

/// Metadata key carrying the bearer token (raw token, no scheme prefix).
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Decides whether a call to a method may proceed.
#[derive(Clone)]
pub struct Authorizer {
    jwt: Arc<JwtManager>,
    access: Arc<AccessRoles>,
}

impl Authorizer {
    pub fn new(jwt: Arc<JwtManager>, access: AccessRoles) -> Self {
        Self {
            jwt,
            access: Arc::new(access),
        }
    }

    /// Authorize a call to `method` carrying `token`.
    ///
    /// Returns `Ok(None)` for public methods (no token needed) and
    /// `Ok(Some(claims))` when a protected method is allowed.
    pub fn authorize(&self, method: &str, token: Option<&str>) -> Result<Option<Claims>, AuthError> {
        let roles = match self.access.roles_for(method) {
            Some(roles) => roles,
            None => return Ok(None),
        };

        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Unauthenticated("authorization token is not provided".into()))?;

        let claims = self
            .jwt
            .verify(token)
            .map_err(|e| AuthError::Unauthenticated(format!("invalid authorization token: {}", e)))?;

        if !roles.contains(&claims.role) {
            return Err(AuthError::PermissionDenied(format!(
                "role {} may not call {}",
                claims.role, method
            )));
        }

        Ok(Some(claims))
    }
}

/// Tower layer applying an [`Authorizer`] to every inbound request.
///
/// Allowed requests carry the verified [`Claims`] in their extensions
/// (`request.extensions().get::<Claims>()` inside a handler).
#[derive(Clone)]
pub struct AuthLayer {
    authorizer: Authorizer,
}

impl AuthLayer {
    pub fn new(authorizer: Authorizer) -> Self {
        Self { authorizer }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            authorizer: self.authorizer.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    authorizer: Authorizer,
}

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

impl<S, B> Service<http::Request<B>> for AuthMiddleware<S>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: http::Request<B>) -> Self::Future {
        let method = request.uri().path().to_string();
        let token = request
            .headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok());

        match self.authorizer.authorize(&method, token) {
            Ok(claims) => {
                debug!(%method, subject = claims.as_ref().map(|c| c.sub.as_str()), "call authorized");
                if let Some(claims) = claims {
                    request.extensions_mut().insert(claims);
                }

                // The ready service is the one poll_ready was called on.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(request).await })
            }
            Err(err) => {
                warn!(%method, error = %err, "call rejected");
                let status = Status::from(ServiceError::from(err));
                Box::pin(async move { Ok(status_response(status)) })
            }
        }
    }
}

/// A trailers-only gRPC response carrying `status`.
fn status_response(status: Status) -> http::Response<BoxBody> {
    let mut response = http::Response::new(empty_body());
    let headers = response.headers_mut();
    headers.insert("content-type", HeaderValue::from_static("application/grpc"));
    if status.add_header(headers).is_err() {
        headers.insert("grpc-status", HeaderValue::from(status.code() as i32));
    }
    response
}
