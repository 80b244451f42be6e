//! Method → permitted-roles table.

use std::collections::HashMap;

use super::user::Role;
use crate::service::grpc::methods;

/// Which roles may call which gRPC method (full path, e.g.
/// `/devicebook.DeviceService/CreateRecord`).
///
/// Methods absent from the table are public.
///
/// ```ignore
/// let access = AccessRoles::new()
///     .allow(methods::CREATE_RECORD, &[Role::Admin])
///     .allow(methods::RATE_RECORD, &[Role::Admin, Role::User]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccessRoles {
    methods: HashMap<String, Vec<Role>>,
}

impl AccessRoles {
    pub fn new() -> Self {
        Self::default()
    }

    /// The device service's default table: creating and uploading are
    /// admin-only, rating is open to admins and users, search and login are
    /// public.
    pub fn standard() -> Self {
        Self::new()
            .allow(methods::CREATE_RECORD, &[Role::Admin])
            .allow(methods::UPLOAD_ATTACHMENT, &[Role::Admin])
            .allow(methods::RATE_RECORD, &[Role::Admin, Role::User])
    }

    /// Restrict `method` to `roles`. Replaces any previous entry.
    pub fn allow(mut self, method: impl Into<String>, roles: &[Role]) -> Self {
        self.methods.insert(method.into(), roles.to_vec());
        self
    }

    /// Permitted roles for `method`, or `None` if it is public.
    pub fn roles_for(&self, method: &str) -> Option<&[Role]> {
        self.methods.get(method).map(Vec::as_slice)
    }

    /// Every method that requires a token.
    pub fn protected_methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}
