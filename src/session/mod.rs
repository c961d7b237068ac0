pub mod context;
pub mod guard;

pub use context::{CurrentUser, LoginOutcome, ModalState, SessionContext, SessionSnapshot};
pub use guard::{LogNavigator, Navigator, RecoveryPolicy, SessionGuard};
