pub mod auth;
pub mod profiles;
pub mod relationships;
pub mod users;
