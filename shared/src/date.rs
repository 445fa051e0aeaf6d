//! 时间类型模块
//!
//! 服务端的时间字段可能是 ISO 8601 字符串，也可能是 Unix 秒（带小数）。
//! `CreatedAt` 两者都接受，并按 `ru` 区域习惯格式化：`dd.mm.yyyy, HH:MM:SS`。

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const DISPLAY_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// 可传输的创建时间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    /// RFC 3339 字符串
    Text(String),
    /// Unix 纪元秒
    Epoch(f64),
}

impl CreatedAt {
    /// 解析为 UTC 时间，无法识别时返回 None
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            CreatedAt::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
            CreatedAt::Epoch(secs) => {
                let whole = secs.trunc() as i64;
                let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
                Utc.timestamp_opt(whole, nanos.min(999_999_999)).single()
            }
        }
    }

    /// 在指定时区下格式化；无法解析时原样返回
    pub fn format_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self.to_utc() {
            Some(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
            None => self.raw(),
        }
    }

    pub fn format_with_offset(&self, offset: FixedOffset) -> String {
        self.format_in(&offset)
    }

    fn raw(&self) -> String {
        match self {
            CreatedAt::Text(s) => s.clone(),
            CreatedAt::Epoch(secs) => secs.to_string(),
        }
    }
}

impl Default for CreatedAt {
    fn default() -> Self {
        CreatedAt::Text(String::new())
    }
}
