//! devicebook integration tests.
//!
//! Every test binds a real tonic server on `127.0.0.1:0` and talks to it
//! through the generated clients.

mod support;
mod auth;
mod client;
mod create;
mod rating;
mod upload;
