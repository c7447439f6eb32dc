//! Database entities.

pub mod reel;
pub mod user;

pub use reel::Entity as Reel;
pub use user::Entity as User;
