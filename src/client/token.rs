//! Where the client gets its access tokens from.

use tonic::transport::Channel;

use super::error::ClientError;
use crate::service::grpc::{AuthServiceClient, LoginRequest};

/// Produces a fresh access token on demand.
#[tonic::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<String, ClientError>;
}

/// Logs in over `devicebook.AuthService` with fixed credentials.
#[derive(Clone)]
pub struct AuthClient {
    service: AuthServiceClient<Channel>,
    username: String,
    password: String,
}

impl AuthClient {
    pub fn new(channel: Channel, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            service: AuthServiceClient::new(channel),
            username: username.into(),
            password: password.into(),
        }
    }

    pub async fn login(&self) -> Result<String, ClientError> {
        let mut service = self.service.clone();
        let response = service
            .login(LoginRequest {
                username: self.username.clone(),
                password: self.password.clone(),
            })
            .await?;
        Ok(response.into_inner().access_token)
    }
}

#[tonic::async_trait]
impl TokenSource for AuthClient {
    async fn fetch(&self) -> Result<String, ClientError> {
        self.login().await
    }
}
