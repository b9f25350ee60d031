//! 文件权限实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "file_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub file_id: i64,
    pub access_type: String,
    #[sea_orm(unique)]
    pub share_token: Option<String>,
    pub expiry_time: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::files::Entity",
        from = "Column::FileId",
        to = "super::files::Column::Id",
        on_delete = "Cascade"
    )]
    File,
}

impl Related<super::files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 时间点转换为存储用的 unix 秒，不足一秒向上取整
///
/// 向上取整保证 `now <= expiry_time` 的判定不会因截断提前失效。
pub fn expiry_to_timestamp(time: chrono::DateTime<chrono::Utc>) -> i64 {
    if time.timestamp_subsec_nanos() > 0 {
        time.timestamp() + 1
    } else {
        time.timestamp()
    }
}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_permission(self) -> crate::models::permissions::entities::Permission {
        use crate::models::permissions::entities::{AccessType, Permission};
        use chrono::{DateTime, Utc};

        Permission {
            file_id: self.file_id,
            // 未知取值按最严格的 only_me 处理
            access_type: self
                .access_type
                .parse::<AccessType>()
                .unwrap_or(AccessType::OnlyMe),
            share_token: self.share_token,
            expiry_time: self
                .expiry_time
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
