use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// 文件访问类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    OnlyMe,         // 仅所有者
    AnyoneWithLink, // 持有链接的任何人
    TimedAccess,    // 限时链接
}

impl AccessType {
    pub const ONLY_ME: &'static str = "only_me";
    pub const ANYONE_WITH_LINK: &'static str = "anyone_with_link";
    pub const TIMED_ACCESS: &'static str = "timed_access";
}

impl<'de> Deserialize<'de> for AccessType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AccessType>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessType::OnlyMe => write!(f, "{}", AccessType::ONLY_ME),
            AccessType::AnyoneWithLink => write!(f, "{}", AccessType::ANYONE_WITH_LINK),
            AccessType::TimedAccess => write!(f, "{}", AccessType::TIMED_ACCESS),
        }
    }
}

impl std::str::FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AccessType::ONLY_ME => Ok(AccessType::OnlyMe),
            AccessType::ANYONE_WITH_LINK => Ok(AccessType::AnyoneWithLink),
            AccessType::TIMED_ACCESS => Ok(AccessType::TimedAccess),
            _ => Err(format!(
                "Invalid access type: '{s}'. Supported: only_me, anyone_with_link, timed_access"
            )),
        }
    }
}

// 限时链接的时间单位
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// 计算 `value` 个单位对应的时长，溢出时返回 None
    pub fn duration(&self, value: i64) -> Option<Duration> {
        match self {
            TimeUnit::Minutes => Duration::try_minutes(value),
            TimeUnit::Hours => Duration::try_hours(value),
            TimeUnit::Days => Duration::try_days(value),
        }
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            "days" => Ok(TimeUnit::Days),
            _ => Err(format!(
                "Invalid time unit: '{s}'. Supported: minutes, hours, days"
            )),
        }
    }
}

// 文件权限（与文件一对一）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Permission {
    pub file_id: i64,
    pub access_type: AccessType,
    pub share_token: Option<String>,
    pub expiry_time: Option<DateTime<Utc>>,
}

/// 写入权限记录的完整新状态
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionChange {
    pub access_type: AccessType,
    pub share_token: Option<String>,
    pub expiry_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_round_trip_names() {
        for name in ["only_me", "anyone_with_link", "timed_access"] {
            let parsed: AccessType = name.parse().unwrap();
            assert_eq!(parsed.to_string(), name);
        }
        assert!("public".parse::<AccessType>().is_err());
    }

    #[test]
    fn test_access_type_deserialize_rejects_unknown() {
        let ok: AccessType = serde_json::from_str("\"timed_access\"").unwrap();
        assert_eq!(ok, AccessType::TimedAccess);
        assert!(serde_json::from_str::<AccessType>("\"everyone\"").is_err());
    }

    #[test]
    fn test_time_unit_duration() {
        assert_eq!(
            TimeUnit::Minutes.duration(90),
            Some(Duration::minutes(90))
        );
        assert_eq!(TimeUnit::Hours.duration(2), Some(Duration::hours(2)));
        assert_eq!(TimeUnit::Days.duration(1), Some(Duration::days(1)));
        assert_eq!(TimeUnit::Days.duration(i64::MAX), None);
        assert!("weeks".parse::<TimeUnit>().is_err());
    }
}
