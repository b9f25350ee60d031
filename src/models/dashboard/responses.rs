use serde::Serialize;

/// 用户存储概览
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardResponse {
    pub total_files: i64,
    // 字节
    pub total_storage: i64,
    pub total_downloads: i64,
}
