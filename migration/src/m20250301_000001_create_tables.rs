use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建文件夹表（自引用树）
        manager
            .create_table(
                Table::create()
                    .table(Folders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Folders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Folders::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Folders::Name).string().not_null())
                    .col(ColumnDef::new(Folders::ParentId).big_integer().null())
                    .col(ColumnDef::new(Folders::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Folders::Table, Folders::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Folders::Table, Folders::ParentId)
                            .to(Folders::Table, Folders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建文件表
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // 用户删除后文件保留，owner_id 置空
                    .col(ColumnDef::new(Files::OwnerId).big_integer().null())
                    .col(ColumnDef::new(Files::FolderId).big_integer().null())
                    .col(ColumnDef::new(Files::FileName).string().not_null())
                    .col(ColumnDef::new(Files::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Files::StoredPath).string().not_null())
                    .col(ColumnDef::new(Files::MimeType).string().not_null())
                    .col(ColumnDef::new(Files::UploadedAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(Files::DownloadCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Files::Table, Files::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Files::Table, Files::FolderId)
                            .to(Folders::Table, Folders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建文件权限表（与文件一对一）
        manager
            .create_table(
                Table::create()
                    .table(FilePermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FilePermissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FilePermissions::FileId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FilePermissions::AccessType)
                            .string()
                            .not_null()
                            .default("only_me"),
                    )
                    .col(
                        ColumnDef::new(FilePermissions::ShareToken)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FilePermissions::ExpiryTime)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FilePermissions::Table, FilePermissions::FileId)
                            .to(Files::Table, Files::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 同一用户同一父目录下文件夹名唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_folder_name_parent_owner")
                    .table(Folders::Table)
                    .col(Folders::Name)
                    .col(Folders::ParentId)
                    .col(Folders::OwnerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 根目录的 parent_id 为 NULL，上面的索引不约束它，另建部分唯一索引
        // MySQL 不支持部分索引，只能依赖应用层检查
        let backend = manager.get_database_backend();
        if backend != sea_orm_migration::sea_orm::DatabaseBackend::MySql {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_root_folder_name_owner")
                        .table(Folders::Table)
                        .col(Folders::OwnerId)
                        .col(Folders::Name)
                        .and_where(Expr::col(Folders::ParentId).is_null())
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_folders_owner_id")
                    .table(Folders::Table)
                    .col(Folders::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_folders_parent_id")
                    .table(Folders::Table)
                    .col(Folders::ParentId)
                    .to_owned(),
            )
            .await?;

        // 文件表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_files_owner_id")
                    .table(Files::Table)
                    .col(Files::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_files_folder_id")
                    .table(Files::Table)
                    .col(Files::FolderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(FilePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Folders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Folders {
    #[sea_orm(iden = "folders")]
    Table,
    Id,
    OwnerId,
    Name,
    ParentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Files {
    #[sea_orm(iden = "files")]
    Table,
    Id,
    OwnerId,
    FolderId,
    FileName,
    FileSize,
    StoredPath,
    MimeType,
    UploadedAt,
    DownloadCount,
}

#[derive(DeriveIden)]
enum FilePermissions {
    #[sea_orm(iden = "file_permissions")]
    Table,
    Id,
    FileId,
    AccessType,
    ShareToken,
    ExpiryTime,
}
