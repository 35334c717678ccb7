//! 班级成员关联实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub role: String,
    pub display_name: Option<String>,
    pub email: String,
    pub joined_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_class_member(self) -> crate::models::class_members::entities::ClassMember {
        use crate::models::class_members::entities::{ClassMember, ClassMemberRole};

        ClassMember {
            id: self.id,
            class_id: self.class_id,
            user_id: self.user_id,
            // 角色串来自受控写入，坏值按学生处理
            role: self
                .role
                .parse::<ClassMemberRole>()
                .unwrap_or(ClassMemberRole::Student),
            display_name: self.display_name,
            email: self.email,
            joined_at: super::datetime_from_secs(self.joined_at),
        }
    }
}
