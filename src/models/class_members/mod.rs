pub mod entities;
pub mod responses;

pub use entities::{ClassMember, ClassMemberRole};
pub use responses::{ClassMemberEntry, ClassMemberListResponse};
