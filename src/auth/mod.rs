//! Authentication: session token codec and the role-scoped request guard.

pub mod guard;
pub mod token;

pub use guard::{require_role, AuthUser, RoleGuard};
pub use token::{Claims, Role, TokenCodec};
