use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业实体
//
// 除固定字段外，创建时调用方附带的任意字段原样保存在 extra 中，
// 序列化时平铺回响应体顶层。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    pub created_by: i64,
    pub updated_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_flattened_into_json() {
        let mut extra = serde_json::Map::new();
        extra.insert("points".into(), serde_json::json!(100));

        let assignment = Assignment {
            id: 1,
            class_id: 2,
            title: "Week 1".into(),
            description: None,
            deadline: None,
            extra,
            created_by: 3,
            updated_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["points"], serde_json::json!(100));
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn test_timestamps_serialize_as_iso8601() {
        let assignment = Assignment {
            id: 1,
            class_id: 2,
            title: "Week 1".into(),
            description: None,
            deadline: None,
            extra: serde_json::Map::new(),
            created_by: 3,
            updated_by: None,
            created_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            updated_at: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&assignment).unwrap();
        let created = json["created_at"].as_str().unwrap();
        assert!(created.starts_with("2023-11-14T"));
    }
}
