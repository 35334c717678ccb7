//! ClassHub - 班级协作平台后端服务
//!
//! 教师建班、学生凭加入码进班、作业发布与实时订阅，
//! 基于 Actix Web 和 SeaORM 实现。
//!
//! 分层自下而上：`entity`/`storage` 负责持久化，`services` 承载业务
//! 规则，`routes` 挂中间件并暴露 REST 与 WebSocket 接口；`cache` 与
//! `config` 为横向支撑。

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
