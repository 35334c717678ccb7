pub mod entities;
pub mod requests;

pub use entities::{User, UserStatus};
pub use requests::{CreateUserRequest, UpdateProfileRequest};
