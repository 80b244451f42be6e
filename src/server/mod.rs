//! Server assembly: stores, services and the auth layer wired into one
//! tonic router.
//!
//! ```ignore
//! use devicebook::server::{self, ServerConfig, Stores};
//!
//! let config = ServerConfig::new("change-me");
//! let stores = Stores::from_config(&config)?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! server::serve_with_incoming(&config, &stores, listener).await?;
//! ```

mod config;

use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tower::layer::util::{Identity, Stack};
use tracing::info;

use crate::auth::{seed_users, AuthError, AuthLayer, Authorizer, InMemoryUserStore, JwtManager, UserStore};
use crate::service::grpc::{AuthServiceServer, DeviceServiceServer};
use crate::service::{AuthServer, DeviceServer};
use crate::store::{
    AttachmentStore, DeviceStore, DiskAttachmentStore, InMemoryAttachmentStore,
    InMemoryDeviceStore, InMemoryRatingStore, RatingStore,
};

pub use config::ServerConfig;

/// The router type [`router`] returns.
pub type CatalogRouter = Router<Stack<AuthLayer, Identity>>;

/// Every store a server needs, as shared trait objects.
#[derive(Clone)]
pub struct Stores {
    pub devices: Arc<dyn DeviceStore>,
    pub attachments: Arc<dyn AttachmentStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// In-memory stores, with attachments on disk when the config names a
    /// directory. Seeds the default accounts unless disabled.
    pub fn from_config(config: &ServerConfig) -> Result<Self, AuthError> {
        let attachments: Arc<dyn AttachmentStore> = match &config.attachment_dir {
            Some(dir) => Arc::new(DiskAttachmentStore::new(dir.clone())),
            None => Arc::new(InMemoryAttachmentStore::new()),
        };

        let users = InMemoryUserStore::new();
        if config.seed_users {
            seed_users(&users, config.password_cost)?;
        }

        Ok(Self {
            devices: Arc::new(InMemoryDeviceStore::new()),
            attachments,
            ratings: Arc::new(InMemoryRatingStore::new()),
            users: Arc::new(users),
        })
    }
}

/// Build the router serving `DeviceService` and `AuthService` behind the
/// auth layer.
pub fn router(config: &ServerConfig, stores: &Stores) -> CatalogRouter {
    let jwt = Arc::new(JwtManager::new(config.secret_key.clone(), config.token_duration));
    let authorizer = Authorizer::new(jwt.clone(), config.access_roles.clone());

    let devices = DeviceServer::new(
        stores.devices.clone(),
        stores.attachments.clone(),
        stores.ratings.clone(),
    );
    let auth = AuthServer::new(stores.users.clone(), jwt);

    Server::builder()
        .layer(AuthLayer::new(authorizer))
        .add_service(DeviceServiceServer::new(devices))
        .add_service(AuthServiceServer::new(auth))
}

/// Serve on an already bound listener until the server stops.
pub async fn serve_with_incoming(
    config: &ServerConfig,
    stores: &Stores,
    listener: TcpListener,
) -> Result<(), tonic::transport::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "start catalog server");
    }
    router(config, stores)
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await
}

/// Build the default stores from `config` and serve on `addr`.
pub async fn serve(config: &ServerConfig, addr: SocketAddr) -> Result<(), ServerError> {
    let stores = Stores::from_config(config)?;
    info!(%addr, "start catalog server");
    router(config, &stores).serve(addr).await?;
    Ok(())
}

/// Error type for [`serve`].
#[derive(Debug)]
pub enum ServerError {
    Setup(AuthError),
    Transport(tonic::transport::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Setup(e) => write!(f, "cannot set up stores: {}", e),
            ServerError::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

impl Error for ServerError {}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        ServerError::Setup(err)
    }
}

impl From<tonic::transport::Error> for ServerError {
    fn from(err: tonic::transport::Error) -> Self {
        ServerError::Transport(err)
    }
}
