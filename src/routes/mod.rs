/// Router Module Index
///
/// Splits routing by audience. Access control for the admin pages and the admin
/// API lives in the gate each handler runs through, not in router layers.

/// Routes accessible to anyone: health check and the authentication landing.
pub mod public;

/// Server-rendered admin pages. Every handler runs through the admin page gate.
pub mod admin;

/// JSON twins of the admin pages, behind the same gate.
pub mod api;
