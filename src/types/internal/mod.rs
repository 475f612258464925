pub mod auth;
pub mod choices;
pub mod context;

pub use context::{RequestContext, RequestId, RequestSource};
