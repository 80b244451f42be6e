//! auth: tokens, credentials and per-call authorization.
//!
//! - [`JwtManager`] issues and verifies HS256 tokens carrying subject, role
//!   and expiry.
//! - [`UserStore`] maps login names to bcrypt hashes and roles.
//! - [`AccessRoles`] is the method → permitted-roles table; methods not in it
//!   are public.
//! - [`Authorizer`] / [`AuthLayer`] gate every inbound call once, at open.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use devicebook::auth::{AccessRoles, AuthLayer, Authorizer, JwtManager};
//!
//! let jwt = Arc::new(JwtManager::new("secret", Duration::from_secs(600)));
//! let layer = AuthLayer::new(Authorizer::new(jwt, AccessRoles::standard()));
//!
//! tonic::transport::Server::builder()
//!     .layer(layer)
//!     .add_service(device_service)
//!     .serve(addr)
//!     .await?;
//! ```

mod access;
mod error;
mod interceptor;
mod jwt;
mod user;

pub use access::AccessRoles;
pub use error::{AuthError, TokenError};
pub use interceptor::{AuthLayer, AuthMiddleware, Authorizer, AUTHORIZATION_HEADER};
pub use jwt::{Claims, JwtManager, DEFAULT_TOKEN_DURATION};
pub use user::{seed_users, InMemoryUserStore, Role, User, UserStore, SEED_USERS};
