pub mod profile;
pub mod relationship;
pub mod user;

pub use profile::{NewProfile, Profile, ProfileUpdate};
pub use relationship::{NewRelationship, Relationship, RelationshipUpdate};
pub use user::{NewUser, User, UserUpdate};

/// Backend-assigned integer primary key
pub type EntityId = i64;

/// Anything listed on a screen, keyed by its backend id
pub trait Record {
    fn id(&self) -> EntityId;
}
