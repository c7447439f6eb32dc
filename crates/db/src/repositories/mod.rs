//! Repositories for database operations.

mod reel;
mod user;

pub use reel::ReelRepository;
pub use user::UserRepository;
