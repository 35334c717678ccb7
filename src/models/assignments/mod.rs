pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::Assignment;
pub use requests::{
    AssignmentListParams, AssignmentWatchQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
};
pub use responses::AssignmentListResponse;
