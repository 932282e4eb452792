/// Router Module Index
///
/// Routes are split by audience. The admin router carries the admin-scoped edge filter
/// as a route layer; admission itself is decided by the admin gate in the handlers.

/// Routes open to every visitor: health, conversion intake and lander lookup.
pub mod public;

/// Admin pages and admin API paths.
pub mod admin;
