//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 存储层的 `sea_orm::DbErr` 统一经由 [`DriveError::from_db`] 转换为领域错误。

use std::fmt;

use sea_orm::{DbErr, SqlErr};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_drive_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum DriveError {
            $($variant(String),)*
        }

        impl DriveError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(DriveError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(DriveError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(DriveError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl DriveError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        DriveError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_drive_errors! {
    NotFound("E001", "Resource Not Found"),
    Forbidden("E002", "Forbidden"),
    Conflict("E003", "Conflict"),
    InvalidInput("E004", "Invalid Input"),
    LinkExpired("E005", "Link Expired"),
    StoreUnavailable("E006", "Store Unavailable"),
    DatabaseConfig("E007", "Database Configuration Error"),
    DatabaseConnection("E008", "Database Connection Error"),
    DatabaseOperation("E009", "Database Operation Error"),
    FileOperation("E010", "File Operation Error"),
    Serialization("E011", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
}

impl DriveError {
    /// 将数据库错误转换为领域错误
    ///
    /// 唯一约束 -> `Conflict`，外键约束 -> `NotFound`，
    /// 连接获取失败 -> `StoreUnavailable`，其余 -> `DatabaseOperation`。
    pub fn from_db(err: DbErr, operation: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                return DriveError::conflict(format!("{operation}: {detail}"));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return DriveError::not_found(format!(
                    "{operation}: referenced resource does not exist ({detail})"
                ));
            }
            _ => {}
        }

        match err {
            DbErr::ConnectionAcquire(e) => {
                DriveError::store_unavailable(format!("{operation}: {e}"))
            }
            DbErr::Conn(e) => DriveError::store_unavailable(format!("{operation}: {e}")),
            other => DriveError::database_operation(format!("{operation}: {other}")),
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DriveError {}

// 为常见的错误类型实现 From trait
impl From<DbErr> for DriveError {
    fn from(err: DbErr) -> Self {
        DriveError::from_db(err, "database")
    }
}

impl From<std::io::Error> for DriveError {
    fn from(err: std::io::Error) -> Self {
        DriveError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DriveError {
    fn from(err: serde_json::Error) -> Self {
        DriveError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DriveError::not_found("test").code(), "E001");
        assert_eq!(DriveError::forbidden("test").code(), "E002");
        assert_eq!(DriveError::link_expired("test").code(), "E005");
        assert_eq!(DriveError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(DriveError::conflict("test").error_type(), "Conflict");
        assert_eq!(
            DriveError::invalid_input("test").error_type(),
            "Invalid Input"
        );
    }

    #[test]
    fn test_error_message() {
        let err = DriveError::invalid_input("Invalid access type");
        assert_eq!(err.message(), "Invalid access type");
    }

    #[test]
    fn test_format_simple() {
        let err = DriveError::link_expired("Link already expired");
        let formatted = err.format_simple();
        assert!(formatted.contains("Link Expired"));
        assert!(formatted.contains("Link already expired"));
    }

    #[test]
    fn test_from_db_generic_error() {
        let err = DriveError::from_db(DbErr::Custom("boom".into()), "folder creation");
        assert_eq!(err.code(), "E009");
        assert!(err.message().starts_with("folder creation"));
    }

    #[test]
    fn test_from_db_record_not_found_is_operation_error() {
        let err = DriveError::from_db(DbErr::RecordNotFound("x".into()), "file lookup");
        assert!(matches!(err, DriveError::DatabaseOperation(_)));
    }
}
