/*!
 * 作业列表实时订阅服务
 *
 * 班级成员通过 WebSocket 订阅班级作业列表，任何作业变更后
 * 服务端向该班级的所有会话重新推送全量列表。
 *
 * ## 使用方法
 *
 * 客户端通过以下 URL 连接：
 * ```text
 * ws://host/api/v1/classes/{class_id}/assignments/ws?token=<access_token>
 * ```
 *
 * ## 消息格式
 *
 * ### 服务端推送
 * ```json
 * {
 *     "type": "assignments",
 *     "payload": {
 *         "class_id": 1,
 *         "items": [{"id": 1, "title": "第一周作业", "...": "..."}],
 *         "pushed_at": "2026-03-02T12:00:00Z"
 *     }
 * }
 * ```
 *
 * ### 心跳
 * ```json
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 */

use std::sync::Arc;

use actix_ws::Message;
use dashmap::DashMap;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;

/// 全局订阅中心
static WATCH_HUB: Lazy<AssignmentWatchHub> = Lazy::new(AssignmentWatchHub::new);

/// WebSocket 消息类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// 作业列表全量快照
    Assignments { payload: AssignmentSnapshot },
    /// 心跳请求
    Ping,
    /// 心跳响应
    Pong,
    /// 连接成功
    Connected { class_id: i64 },
}

/// 作业列表快照载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentSnapshot {
    pub class_id: i64,
    pub items: Vec<Assignment>,
    pub pushed_at: chrono::DateTime<chrono::Utc>,
}

impl AssignmentSnapshot {
    pub fn new(class_id: i64, items: Vec<Assignment>) -> Self {
        Self {
            class_id,
            items,
            pushed_at: chrono::Utc::now(),
        }
    }
}

/// 订阅中心
pub struct AssignmentWatchHub {
    /// 班级 ID -> 广播发送器
    classes: DashMap<i64, broadcast::Sender<WsMessage>>,
}

impl AssignmentWatchHub {
    fn new() -> Self {
        Self {
            classes: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &WATCH_HUB
    }

    /// 注册班级订阅
    pub fn register(&self, class_id: i64) -> broadcast::Receiver<WsMessage> {
        let entry = self.classes.entry(class_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(100);
            tx
        });
        entry.subscribe()
    }

    /// 移除班级订阅通道
    pub fn unregister(&self, class_id: i64) {
        // 只有当没有订阅者时才移除
        if let Some(entry) = self.classes.get(&class_id)
            && entry.receiver_count() == 0
        {
            self.classes.remove(&class_id);
        }
    }

    /// 向班级的所有会话广播消息
    pub fn broadcast(&self, class_id: i64, message: WsMessage) -> bool {
        if let Some(sender) = self.classes.get(&class_id) {
            sender.send(message).is_ok()
        } else {
            false
        }
    }

    /// 检查班级是否有在线订阅者
    pub fn has_watchers(&self, class_id: i64) -> bool {
        self.classes
            .get(&class_id)
            .is_some_and(|s| s.receiver_count() > 0)
    }
}

/// 订阅会话服务
pub struct WatchService;

impl WatchService {
    /// 处理一条订阅连接，入口处已完成鉴权和成员校验
    pub async fn handle_connection(
        class_id: i64,
        user_id: i64,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
        initial: AssignmentSnapshot,
    ) {
        info!(
            "Assignment watch connected for user {} on class {}",
            user_id, class_id
        );

        // 注册订阅
        let mut rx = AssignmentWatchHub::get().register(class_id);

        // 发送连接成功消息
        let connected_msg = WsMessage::Connected { class_id };
        if let Ok(json) = serde_json::to_string(&connected_msg) {
            let _ = session.text(json).await;
        }

        // 连接时先推一次全量列表
        let initial_msg = WsMessage::Assignments { payload: initial };
        if let Ok(json) = serde_json::to_string(&initial_msg) {
            let _ = session.text(json).await;
        }

        // 心跳间隔
        let heartbeat_interval = std::time::Duration::from_secs(30);
        let mut heartbeat = tokio::time::interval(heartbeat_interval);

        loop {
            tokio::select! {
                msg = stream.next() => {
                    if !Self::on_client_message(user_id, &mut session, msg).await {
                        break;
                    }
                }

                // 列表推送，Lagged 的会话下一条推送仍是全量快照，丢帧无所谓
                msg = rx.recv() => {
                    match msg {
                        Ok(ws_msg) => {
                            if let Ok(json) = serde_json::to_string(&ws_msg)
                                && session.text(json).await.is_err() {
                                    break;
                                }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Assignment watch for class {} lagged by {} messages", class_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            break;
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        // 清理订阅，先释放自己的接收端再检查订阅者计数
        drop(rx);
        AssignmentWatchHub::get().unregister(class_id);
        info!(
            "Assignment watch disconnected for user {} on class {}",
            user_id, class_id
        );
    }

    /// 处理一条客户端消息，返回 false 表示会话应当结束
    async fn on_client_message(
        user_id: i64,
        session: &mut actix_ws::Session,
        msg: Option<Result<Message, actix_ws::ProtocolError>>,
    ) -> bool {
        match msg {
            Some(Ok(Message::Text(text))) => {
                let Ok(ws_msg) = serde_json::from_str::<WsMessage>(&text) else {
                    debug!("Unparseable watch message from user {}", user_id);
                    return true;
                };
                match ws_msg {
                    WsMessage::Ping => {
                        let pong = serde_json::to_string(&WsMessage::Pong)
                            .unwrap_or_else(|_| r#"{"type":"pong"}"#.to_string());
                        session.text(pong).await.is_ok()
                    }
                    other => {
                        debug!("Ignoring watch message from user {}: {:?}", user_id, other);
                        true
                    }
                }
            }
            Some(Ok(Message::Ping(data))) => session.pong(&data).await.is_ok(),
            Some(Ok(Message::Close(_))) | None => {
                info!("Assignment watch closed for user: {}", user_id);
                false
            }
            Some(Err(e)) => {
                warn!("Assignment watch error for user {}: {:?}", user_id, e);
                false
            }
            _ => true,
        }
    }
}

/// 作业变更后向班级订阅者重新推送全量列表
///
/// 推送失败只记日志，不影响触发它的写操作。
pub async fn publish_assignments(storage: &Arc<dyn Storage>, class_id: i64) {
    let hub = AssignmentWatchHub::get();
    if !hub.has_watchers(class_id) {
        return;
    }

    match storage.list_all_class_assignments(class_id).await {
        Ok(items) => {
            let message = WsMessage::Assignments {
                payload: AssignmentSnapshot::new(class_id, items),
            };
            hub.broadcast(class_id, message);
        }
        Err(e) => {
            error!(
                "Failed to load assignments for class {} push: {}",
                class_id, e
            );
        }
    }
}
