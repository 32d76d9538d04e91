/// Router Module Index
///
/// Routes are split by access level so protection is applied per module with
/// Axum layers, never per handler by accident.

/// Routes open to anyone: health and the login/register entry.
pub mod public;

/// Routes behind the session guard (valid session plus an allowed role).
pub mod admin;
