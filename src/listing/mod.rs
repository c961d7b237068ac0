//! Paginated list screens (profiles, relationships, users) and the
//! enrichment that turns referenced user ids into display strings.

pub mod decode;
pub mod enrich;
pub mod messages;
pub mod pager;
pub mod resources;
pub mod screen;

pub use enrich::{Resolution, UserDirectory, LOAD_FAILED, UNASSIGNED};
pub use messages::ScreenMessages;
pub use pager::Pager;
pub use resources::{
    ListResource, ProfileRow, ProfilesResource, RelationshipRow, RelationshipsResource, UsersResource,
};
pub use screen::{DeleteOutcome, ListScreen, ListState, LoadOutcome};
