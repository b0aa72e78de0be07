/// Router Module Index
///
/// Splits routing by access level. Access control is attached to whole
/// routers (via Axum layers), never to individual handlers, so a new admin
/// endpoint cannot be exposed without the administrator guard.

/// Routes accessible without credentials (health checks).
pub mod public;

/// Routes restricted to administrators. Wrapped in `auth::require_administrator`
/// by `create_router`.
pub mod admin;
