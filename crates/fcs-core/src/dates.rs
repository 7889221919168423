//! 日期工具

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

/// 無限過去，用作開放的起始邊界
pub const INFINITE_PAST: NaiveDateTime = NaiveDateTime::MIN;

/// 無限未來：整個計劃時界內都找不到產能時的回覆日期
pub const INFINITE_FUTURE: NaiveDateTime = NaiveDateTime::MAX;

/// 日期加上時長，溢出時停在無限邊界
pub fn saturating_add(date: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    date.checked_add_signed(delta).unwrap_or(if delta < Duration::zero() {
        INFINITE_PAST
    } else {
        INFINITE_FUTURE
    })
}

/// 日期減去時長，溢出時停在無限邊界
pub fn saturating_sub(date: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    date.checked_sub_signed(delta).unwrap_or(if delta < Duration::zero() {
        INFINITE_FUTURE
    } else {
        INFINITE_PAST
    })
}

/// 時長（秒）
pub fn duration_seconds(duration: Duration) -> Decimal {
    Decimal::from(duration.num_seconds())
}

/// 時長（小時）
pub fn duration_hours(duration: Duration) -> Decimal {
    duration_seconds(duration) / Decimal::from(3600)
}
