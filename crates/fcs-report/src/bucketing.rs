//! 時間分桶

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{ReportError, Result};

/// 時間分桶策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketingStrategy {
    /// 每日分桶
    Daily,
    /// 每週分桶
    Weekly,
    /// 每月分桶
    Monthly,
}

/// 半開區間 `[start, end)` 的時間桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Bucket {
    /// 時間桶長度
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// 與 `[start, end)` 重疊的時長
    pub fn overlap(&self, start: NaiveDateTime, end: NaiveDateTime) -> Duration {
        let begin = start.max(self.start);
        let finish = end.min(self.end);
        if finish > begin {
            finish.signed_duration_since(begin)
        } else {
            Duration::zero()
        }
    }
}

/// 時間分桶計算器
pub struct BucketingCalculator;

impl BucketingCalculator {
    /// 創建固定週期的時間桶起始日期
    pub fn create_buckets_by_strategy(
        start_date: NaiveDate,
        end_date: NaiveDate,
        strategy: BucketingStrategy,
    ) -> Vec<NaiveDate> {
        let mut buckets = Vec::new();
        let mut current = Some(start_date);

        while let Some(date) = current.filter(|d| *d <= end_date) {
            buckets.push(date);
            current = Self::next(date, strategy);
        }

        buckets
    }

    /// 創建涵蓋 `start_date` 到 `end_date`（含）的時間桶區間
    pub fn create_intervals(
        start_date: NaiveDate,
        end_date: NaiveDate,
        strategy: BucketingStrategy,
    ) -> Result<Vec<Bucket>> {
        if end_date < start_date {
            return Err(ReportError::InvalidRange(format!(
                "{} 早於 {}",
                end_date, start_date
            )));
        }

        let horizon = end_date
            .succ_opt()
            .ok_or_else(|| ReportError::InvalidRange(format!("日期溢出: {}", end_date)))?;
        let starts = Self::create_buckets_by_strategy(start_date, end_date, strategy);
        let intervals = starts
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let end = starts.get(i + 1).copied().unwrap_or(horizon).min(horizon);
                Bucket {
                    start: date.and_time(chrono::NaiveTime::MIN),
                    end: end.and_time(chrono::NaiveTime::MIN),
                }
            })
            .collect();
        Ok(intervals)
    }

    /// 合併重複的日期桶
    pub fn merge_buckets(buckets: &mut Vec<NaiveDate>) {
        buckets.sort();
        buckets.dedup();
    }

    fn next(date: NaiveDate, strategy: BucketingStrategy) -> Option<NaiveDate> {
        match strategy {
            BucketingStrategy::Daily => date.succ_opt(),
            BucketingStrategy::Weekly => date.checked_add_signed(Duration::weeks(1)),
            BucketingStrategy::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}
