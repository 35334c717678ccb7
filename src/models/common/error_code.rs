use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码，随 ApiResponse 返回给客户端
///
/// 0 表示成功，其余按领域分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/error-code.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用 1xxx
    BadRequest = 1400,
    Unauthorized = 1401,
    NotFound = 1404,
    RateLimitExceeded = 1429,
    InternalServerError = 1500,

    // 认证 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 用户 3xxx
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserNameAlreadyExists = 3002,
    UserEmailInvalid = 3003,
    UserEmailAlreadyExists = 3004,
    UserPasswordInvalid = 3005,

    // 班级 4xxx
    ClassNotFound = 4000,
    ClassCreationFailed = 4001,
    ClassCodeInvalid = 4002,
    ClassAlreadyJoined = 4003,
    ClassFull = 4004,
    ClassJoinFailed = 4005,
    ClassPermissionDenied = 4006,

    // 作业 5xxx
    AssignmentNotFound = 5000,
}
