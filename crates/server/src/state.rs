//! Shared application state for handlers.

use gateway::{FormAdmin, ViewGateway};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Visitor operations.
    pub gateway: ViewGateway,

    /// Owner form management.
    pub admin: FormAdmin,

    /// Version reported by the health endpoint.
    pub version: &'static str,
}

impl AppState {
    pub fn new(gateway: ViewGateway, admin: FormAdmin) -> Self {
        Self {
            gateway,
            admin,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
