//! 业务模型定义
//!
//! 请求、响应与业务实体，均派生 ts-rs 导出给客户端使用。

pub mod assignments;
pub mod auth;
pub mod class_members;
pub mod classes;
pub mod common;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo};
