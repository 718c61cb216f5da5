//! JWT bearer authentication: token issuing/validation, request middleware and claims extractor.

mod extractor;
mod middleware;
mod token;

pub use extractor::AuthUser;
pub use middleware::auth_middleware;
pub use token::{Claims, IssuedToken, TokenService};
