use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级内角色
//
// 身份只挂在成员关系上，同一用户可以在不同班级里分别是教师和学生。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../app/src/types/generated/class-member.ts")]
pub enum ClassMemberRole {
    Student, // 学生
    Teacher, // 教师
}

impl ClassMemberRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";

    pub fn class_teacher_roles() -> &'static [&'static ClassMemberRole] {
        &[&Self::Teacher]
    }
    pub fn all_roles() -> &'static [&'static ClassMemberRole] {
        &[&Self::Student, &Self::Teacher]
    }
}

impl<'de> Deserialize<'de> for ClassMemberRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            ClassMemberRole::STUDENT => Ok(ClassMemberRole::Student),
            ClassMemberRole::TEACHER => Ok(ClassMemberRole::Teacher),
            _ => Err(serde::de::Error::custom(format!(
                "无效的班级角色: '{s}'. 支持的角色: student, teacher"
            ))),
        }
    }
}

impl std::fmt::Display for ClassMemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassMemberRole::Student => write!(f, "{}", ClassMemberRole::STUDENT),
            ClassMemberRole::Teacher => write!(f, "{}", ClassMemberRole::TEACHER),
        }
    }
}

impl std::str::FromStr for ClassMemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(ClassMemberRole::Student),
            "teacher" => Ok(ClassMemberRole::Teacher),
            _ => Err(format!("Invalid class member role: {s}")),
        }
    }
}

// 班级成员关系
//
// display_name 和 email 是加入时刻的快照，之后用户改名不回写。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../app/src/types/generated/class-member.ts")]
pub struct ClassMember {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub role: ClassMemberRole,
    pub display_name: Option<String>,
    pub email: String,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(ClassMemberRole::Teacher.to_string(), "teacher");
        assert_eq!(
            ClassMemberRole::from_str("student").unwrap(),
            ClassMemberRole::Student
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(ClassMemberRole::from_str("admin").is_err());
        let parsed: Result<ClassMemberRole, _> = serde_json::from_str("\"principal\"");
        assert!(parsed.is_err());
    }
}
