//! 資源分桶摘要

use chrono::{Duration, NaiveDateTime};
use fcs_core::dates::duration_hours;
use fcs_core::{Resource, ResourceId, Schedule};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bucketing::Bucket;
use crate::Result;

/// 資源在一個時間桶內的產能使用（單位：產能×小時）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBucket {
    pub resource: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,

    /// 可用產能
    pub available: Decimal,

    /// 負載
    pub load: Decimal,

    /// 其中由換線作業計劃造成的負載
    pub setup: Decimal,

    /// 剩餘產能，最小為零
    pub free: Decimal,
}

/// 依時間桶彙總所有有限產能資源的使用情況
///
/// 各資源平行計算；無限產能資源沒有可用產能的概念，不列入。
pub fn summarize(schedule: &Schedule, buckets: &[Bucket]) -> Result<Vec<ResourceBucket>> {
    let resources: Vec<(ResourceId, &Resource)> = schedule
        .resources()
        .filter(|(_, r)| !r.is_infinite())
        .collect();

    let per_resource = resources
        .par_iter()
        .map(|(id, resource)| summarize_resource(schedule, *id, resource, buckets))
        .collect::<Result<Vec<_>>>()?;

    let rows: Vec<ResourceBucket> = per_resource.into_iter().flatten().collect();
    tracing::info!("資源摘要: {} 個資源, {} 筆", resources.len(), rows.len());
    Ok(rows)
}

fn summarize_resource(
    schedule: &Schedule,
    id: ResourceId,
    resource: &Resource,
    buckets: &[Bucket],
) -> Result<Vec<ResourceBucket>> {
    // (開始, 結束, 負載, 是否換線)
    let mut loads = Vec::new();
    for (_, plan) in schedule.plans() {
        let Some(load) = plan.load_on(id) else {
            continue;
        };
        let event = resource.timeline().get(load.start)?;
        loads.push((plan.start, plan.end, event.quantity, plan.is_setup()));
    }

    let rows = buckets
        .iter()
        .map(|bucket| {
            let mut load = Decimal::ZERO;
            let mut setup = Decimal::ZERO;
            for (start, end, quantity, is_setup) in &loads {
                let hours = *quantity * duration_hours(bucket.overlap(*start, *end));
                load += hours;
                if *is_setup {
                    setup += hours;
                }
            }
            let available = available_hours(resource, bucket);
            ResourceBucket {
                resource: resource.name.clone(),
                start: bucket.start,
                end: bucket.end,
                available,
                load,
                setup,
                free: (available - load).max(Decimal::ZERO),
            }
        })
        .collect();
    Ok(rows)
}

/// 最大產能在時間桶內的積分
fn available_hours(resource: &Resource, bucket: &Bucket) -> Decimal {
    let timeline = resource.timeline();
    let mut cursor = bucket.start;
    let mut max = timeline.max_at(bucket.start);
    let mut total = Decimal::ZERO;

    let changes = timeline
        .iter()
        .filter(|e| e.kind.is_capacity_change() && e.date > bucket.start && e.date < bucket.end);
    for event in changes {
        total += max * segment_hours(cursor, event.date);
        cursor = event.date;
        max = event.max();
    }
    total + max * segment_hours(cursor, bucket.end)
}

fn segment_hours(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    duration_hours(to.signed_duration_since(from).max(Duration::zero()))
}
