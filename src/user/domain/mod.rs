//! Domain model for user admission and moderation.
//!
//! Users enter the system through a self-registration request and move
//! between `Requested`, `Approved`, and `Banned` only through admin actions.

mod error;
mod ids;
mod moderation;
mod user;

pub use error::{ParseUserStatusError, UserDomainError};
pub use ids::UserId;
pub use moderation::{AccessDecision, ModerationKind, UserListing};
pub use user::{DisplayName, PersistedUserData, User, UserRole, UserStatus, UserStatusChange};
