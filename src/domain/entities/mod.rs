//! Core entities of the routing domain.

pub mod node;
pub mod route;
pub mod site_domain;

pub use node::ContentNode;
pub use route::{Route, RouteParseError};
pub use site_domain::SiteDomain;
