pub mod auth_service;
pub mod profile_service;
pub mod relationship_service;
pub mod user_service;

pub use auth_service::{AuthService, TokenResponse};
pub use profile_service::ProfileService;
pub use relationship_service::RelationshipService;
pub use user_service::UserService;

pub(crate) fn page_query(skip: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("skip", skip.to_string()), ("limit", limit.to_string())]
}
