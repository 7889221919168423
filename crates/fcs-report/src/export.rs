//! 負載計劃匯出

use chrono::NaiveDateTime;
use fcs_core::Schedule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// 一筆作業計劃在一個資源上的負載
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPlanRow {
    /// 作業計劃外部參照ID
    pub operationplan: Uuid,

    /// 資源名稱
    pub resource: String,

    /// 負載數量
    pub quantity: Decimal,

    pub startdate: NaiveDateTime,
    pub enddate: NaiveDateTime,

    /// 換線代碼
    pub setup: Option<String>,
}

/// 匯出所有作業計劃的負載，依資源與開始日期排序
pub fn export_load_plans(schedule: &Schedule) -> Result<Vec<LoadPlanRow>> {
    let mut rows = Vec::new();
    for (_, plan) in schedule.plans() {
        for load in &plan.loads {
            let resource = schedule.resource(load.resource)?;
            let start = resource.timeline().get(load.start)?;
            let end = resource.timeline().get(load.end)?;
            rows.push(LoadPlanRow {
                operationplan: plan.id,
                resource: resource.name.clone(),
                quantity: start.quantity,
                startdate: start.date,
                enddate: end.date,
                setup: start.setup.clone(),
            });
        }
    }

    rows.sort_by(|a, b| {
        a.resource
            .cmp(&b.resource)
            .then(a.startdate.cmp(&b.startdate))
    });
    tracing::info!("匯出 {} 筆負載計劃", rows.len());
    Ok(rows)
}

/// 序列化為 JSON
pub fn to_json(rows: &[LoadPlanRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
