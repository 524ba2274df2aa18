//! Relationship maintenance between users, thoughts, reactions and friends.

pub mod outcome;
pub mod thoughts;
pub mod users;
pub mod validation;

pub use outcome::Outcome;
pub use thoughts::ThoughtService;
pub use users::UserService;
