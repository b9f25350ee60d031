use serde::Deserialize;

// 修改文件访问权限请求
//
// 字段保持原始字符串，由访问控制引擎统一校验并返回 InvalidInput
#[derive(Debug, Clone, Deserialize)]
pub struct AccessRequest {
    pub access_type: String,
    pub time_unit: Option<String>,
    pub time_value: Option<i64>,
}
