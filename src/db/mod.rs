pub mod models;
pub mod pool;
pub mod users;
pub mod thoughts;

pub use models::{Reaction, Thought, User, UserDetail};
pub use pool::{connect, migrate};
pub use users::UserRepository;
pub use thoughts::ThoughtRepository;
