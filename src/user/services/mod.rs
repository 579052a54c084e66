//! Application services for user admission and moderation.

mod access;

pub use access::{
    AccessRequestOutcome, AccessService, AccessServiceError, AccessServiceResult,
    DecisionOutcome, ModerationOutcome,
};
