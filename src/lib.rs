pub mod error;
pub mod token;
pub mod identity;
pub mod realm;
pub mod filter;
pub mod config;
pub mod server;

pub use error::{AppError, AppResult};
pub use filter::{protect, SessionFilter};
pub use identity::{AllowAll, Authorizer, Principal, RequestContext, RouteAuth, Subject};
pub use realm::{RealmConfig, RealmRegistry};
pub use token::{StoredToken, TokenError, XorKey};
