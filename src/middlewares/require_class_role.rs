/*!
 * 班级角色访问控制中间件
 *
 * 必须挂在 RequireJWT 之后，依据路径参数 `class_id` 查询请求用户的
 * 班级成员关系：非成员 403，角色不符 403，成员关系写进请求扩展供
 * 处理器取用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/{class_id}/assignments")
 *     .wrap(RequireClassRole::new(&ClassMemberRole::Teacher))
 *     .route("", web::post().to(create_assignment));
 * ```
 *
 * 任一角色即可时：
 *
 * ```rust,ignore
 * .wrap(RequireClassRole::new_any(ClassMemberRole::all_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::class_members::entities::{ClassMember, ClassMemberRole};
use crate::models::users::entities::User;
use crate::storage::Storage;

#[derive(Clone)]
pub struct RequireClassRole {
    required_roles: Vec<ClassMemberRole>,
    /// true 要求同时具备全部角色，false 任一命中即可
    require_all: bool,
}

impl RequireClassRole {
    pub fn new(role: &ClassMemberRole) -> Self {
        Self {
            required_roles: vec![*role],
            require_all: true,
        }
    }

    pub fn new_any(roles: &[&ClassMemberRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
            require_all: false,
        }
    }

    /// 从请求扩展中取当前班级的成员关系，仅在本中间件之后的处理器里可用
    pub fn extract_class_member(req: &actix_web::HttpRequest) -> Option<ClassMember> {
        req.extensions().get::<ClassMember>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassRoleMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RequireClassRoleMiddleware<S> {
    service: Rc<S>,
    config: RequireClassRole,
}

impl<S, B> Service<ServiceRequest> for RequireClassRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let deny = |status: StatusCode, code: ErrorCode, message: &str| {
                create_error_response(status, code, message).map_into_right_body()
            };

            // RequireJWT 在外层时扩展里必有用户
            let user = req.extensions().get::<User>().cloned();
            let user = match user {
                Some(user) => user,
                None => {
                    return Ok(req.into_response(deny(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Unauthorized: missing user claims",
                    )));
                }
            };

            let class_id = match req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
            {
                Some(cid) => cid,
                None => {
                    return Ok(req.into_response(deny(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        "Missing or invalid class_id",
                    )));
                }
            };

            let member = match membership_for(&req, class_id, user.id).await {
                Some(member) => member,
                None => {
                    return Ok(req.into_response(deny(
                        StatusCode::FORBIDDEN,
                        ErrorCode::ClassPermissionDenied,
                        "No permission for this class",
                    )));
                }
            };

            let allowed = if config.require_all {
                config.required_roles.iter().all(|r| *r == member.role)
            } else {
                config.required_roles.contains(&member.role)
            };

            if !allowed {
                return Ok(req.into_response(deny(
                    StatusCode::FORBIDDEN,
                    ErrorCode::ClassPermissionDenied,
                    "Access denied for this class role",
                )));
            }

            tracing::debug!(
                "Class member {} authorized as {:?} in class {}",
                member.user_id,
                member.role,
                class_id
            );
            req.extensions_mut().insert(member);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

/// 查询 (class_id, user_id) 的成员关系，存储错误按不可访问处理
async fn membership_for(
    req: &ServiceRequest,
    class_id: i64,
    user_id: i64,
) -> Option<ClassMember> {
    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    storage
        .get_class_member(class_id, user_id)
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_role_requires_all() {
        let guard = RequireClassRole::new(&ClassMemberRole::Teacher);
        assert!(guard.require_all);
        assert_eq!(guard.required_roles, vec![ClassMemberRole::Teacher]);
    }

    #[test]
    fn test_any_role_accepts_each() {
        let guard = RequireClassRole::new_any(ClassMemberRole::all_roles());
        assert!(!guard.require_all);
        assert!(guard.required_roles.contains(&ClassMemberRole::Teacher));
        assert!(guard.required_roles.contains(&ClassMemberRole::Student));
    }
}
