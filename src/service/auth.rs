//! AuthService handler: exchanges credentials for an access token.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::error::ServiceError;
use super::grpc::{AuthService, LoginRequest, LoginResponse};
use crate::auth::{AuthError, JwtManager, UserStore};

pub struct AuthServer {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtManager>,
}

impl AuthServer {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtManager>) -> Self {
        Self { users, jwt }
    }

    async fn login_user(&self, username: &str, password: String) -> Result<String, AuthError> {
        // The store lookup and bcrypt both block; keep them off the async workers.
        let users = self.users.clone();
        let username = username.to_string();
        let (matches, user) = tokio::task::spawn_blocking(move || {
            let user = users
                .find(&username)?
                .ok_or(AuthError::InvalidCredentials)?;
            let matches = user.is_correct_password(&password);
            Ok::<_, AuthError>((matches, user))
        })
        .await
        .map_err(|e| AuthError::Hashing(format!("task join error: {}", e)))??;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.jwt.issue(&user)?)
    }
}

#[tonic::async_trait]
impl AuthService for AuthServer {
    async fn login(&self, request: Request<LoginRequest>) -> Result<Response<LoginResponse>, Status> {
        let LoginRequest { username, password } = request.into_inner();

        match self.login_user(&username, password).await {
            Ok(access_token) => {
                info!(%username, "user logged in");
                Ok(Response::new(LoginResponse { access_token }))
            }
            Err(err) => {
                warn!(%username, error = %err, "login failed");
                Err(ServiceError::from(err).into())
            }
        }
    }
}
