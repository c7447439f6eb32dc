//! Business logic services.

#![allow(missing_docs)]

pub mod authorization;
pub mod comment;
pub mod reel;
pub mod user;

pub use authorization::AdminPolicy;
pub use comment::{CommentLikeOutcome, CommentService, CreateCommentInput, UpdateCommentInput};
pub use reel::{CreateReelInput, ReelListing, ReelService, UpdateReelInput};
pub use user::{CreateUserInput, UserService};
