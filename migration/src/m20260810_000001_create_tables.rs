use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// 列定义速记，时间戳统一为秒级整型
fn pk(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .take()
}

fn big_int(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name).big_integer().not_null().take()
}

fn big_int_null(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name).big_integer().null().take()
}

fn string(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name).string().not_null().take()
}

fn string_unique(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name).string().not_null().unique_key().take()
}

fn string_null(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name).string().null().take()
}

fn text_null(name: impl IntoIden) -> ColumnDef {
    ColumnDef::new(name).text().null().take()
}

fn cascade_fk(
    from_table: impl IntoTableRef,
    from_col: impl IntoIden,
    to_table: impl IntoTableRef,
    to_col: impl IntoIden,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from(from_table, from_col)
        .to(to_table, to_col)
        .on_delete(ForeignKeyAction::Cascade)
        .take()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(string_unique(Users::Username))
                    .col(string_unique(Users::Email))
                    .col(string(Users::PasswordHash))
                    .col(string(Users::Status))
                    .col(string_null(Users::DisplayName))
                    .col(big_int_null(Users::LastLogin))
                    .col(big_int(Users::CreatedAt))
                    .col(big_int(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(pk(Classes::Id))
                    .col(string(Classes::Name))
                    .col(text_null(Classes::Description))
                    .col(
                        ColumnDef::new(Classes::MaxUsers)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(big_int(Classes::CreatedBy))
                    .col(string_unique(Classes::ClassCode))
                    .col(
                        ColumnDef::new(Classes::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(big_int(Classes::CreatedAt))
                    .col(big_int(Classes::UpdatedAt))
                    .foreign_key(&mut cascade_fk(
                        Classes::Table,
                        Classes::CreatedBy,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClassMembers::Table)
                    .if_not_exists()
                    .col(pk(ClassMembers::Id))
                    .col(big_int(ClassMembers::ClassId))
                    .col(big_int(ClassMembers::UserId))
                    .col(string(ClassMembers::Role))
                    .col(string_null(ClassMembers::DisplayName))
                    .col(string(ClassMembers::Email))
                    .col(big_int(ClassMembers::JoinedAt))
                    .foreign_key(&mut cascade_fk(
                        ClassMembers::Table,
                        ClassMembers::ClassId,
                        Classes::Table,
                        Classes::Id,
                    ))
                    .foreign_key(&mut cascade_fk(
                        ClassMembers::Table,
                        ClassMembers::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(pk(Assignments::Id))
                    .col(big_int(Assignments::ClassId))
                    .col(string(Assignments::Title))
                    .col(text_null(Assignments::Description))
                    .col(big_int_null(Assignments::Deadline))
                    .col(text_null(Assignments::Extra))
                    .col(big_int(Assignments::CreatedBy))
                    .col(big_int_null(Assignments::UpdatedBy))
                    .col(big_int(Assignments::CreatedAt))
                    .col(big_int(Assignments::UpdatedAt))
                    .foreign_key(&mut cascade_fk(
                        Assignments::Table,
                        Assignments::ClassId,
                        Classes::Table,
                        Classes::Id,
                    ))
                    .foreign_key(&mut cascade_fk(
                        Assignments::Table,
                        Assignments::CreatedBy,
                        Users::Table,
                        Users::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 同一用户在同一班级最多一条成员记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_class_members_class_user")
                    .table(ClassMembers::Table)
                    .col(ClassMembers::ClassId)
                    .col(ClassMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_members_user_id")
                    .table(ClassMembers::Table)
                    .col(ClassMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_created_by")
                    .table(Classes::Table)
                    .col(Classes::CreatedBy)
                    .to_owned(),
            )
            .await?;

        // 作业列表按创建时间倒序查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_class_created")
                    .table(Assignments::Table)
                    .col(Assignments::ClassId)
                    .col(Assignments::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 逆序删除，先子表后父表
        for table in [
            Table::drop().table(Assignments::Table).to_owned(),
            Table::drop().table(ClassMembers::Table).to_owned(),
            Table::drop().table(Classes::Table).to_owned(),
            Table::drop().table(Users::Table).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    Name,
    Description,
    MaxUsers,
    CreatedBy,
    ClassCode,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassMembers {
    #[sea_orm(iden = "class_members")]
    Table,
    Id,
    ClassId,
    UserId,
    Role,
    DisplayName,
    Email,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    ClassId,
    Title,
    Description,
    Deadline,
    Extra,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
