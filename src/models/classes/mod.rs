pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::Class;
pub use requests::{CreateClassRequest, JoinClassRequest};
pub use responses::{ClassDetailResponse, UserClassEntry, UserClassListResponse};
