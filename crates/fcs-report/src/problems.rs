//! 超載問題偵測

use chrono::NaiveDateTime;
use fcs_core::{Resource, Schedule, SolverConfig, INFINITE_FUTURE};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 問題類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Overload,
}

/// 排程問題
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub kind: ProblemKind,

    /// 資源名稱
    pub resource: String,

    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,

    /// 區間內最大的超出量
    pub weight: Decimal,
}

/// 找出所有資源上負載超過最大產能的連續區間
pub fn detect_overloads(schedule: &Schedule, config: &SolverConfig) -> Vec<Problem> {
    let resources: Vec<&Resource> = schedule
        .resources()
        .map(|(_, r)| r)
        .filter(|r| !r.is_infinite())
        .collect();

    let problems: Vec<Problem> = resources
        .par_iter()
        .flat_map_iter(|resource| overloads_on(resource, config))
        .collect();

    if !problems.is_empty() {
        tracing::warn!("偵測到 {} 個超載區間", problems.len());
    }
    problems
}

fn overloads_on(resource: &Resource, config: &SolverConfig) -> Vec<Problem> {
    let mut problems = Vec::new();
    // (開始日期, 最大超出量)
    let mut open: Option<(NaiveDateTime, Decimal)> = None;

    let mut events = resource.timeline().iter().peekable();
    while let Some(event) = events.next() {
        // 同一日期只看最後一個事件
        if events.peek().is_some_and(|next| next.date == event.date) {
            continue;
        }

        let excess = event.onhand() - event.max();
        if config.exceeds(event.onhand(), event.max()) {
            open = match open {
                Some((start, peak)) => Some((start, peak.max(excess))),
                None => Some((event.date, excess)),
            };
        } else if let Some((start, peak)) = open.take() {
            problems.push(overload(resource, start, event.date, peak));
        }
    }

    if let Some((start, peak)) = open {
        problems.push(overload(resource, start, INFINITE_FUTURE, peak));
    }
    problems
}

fn overload(
    resource: &Resource,
    start: NaiveDateTime,
    end: NaiveDateTime,
    weight: Decimal,
) -> Problem {
    Problem {
        kind: ProblemKind::Overload,
        resource: resource.name.clone(),
        description: format!("資源 '{}' 超載 {}", resource.name, weight),
        start,
        end,
        weight,
    }
}
