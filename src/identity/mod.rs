//! Identity types shared by the token codec and the session filter.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod subject;
mod request_context;
mod authorizer;

pub use principal::Principal;
pub use subject::Subject;
pub use request_context::RequestContext;
pub use authorizer::{Authorizer, AllowAll, AllowList, RouteAuth};
