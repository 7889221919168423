//! 資源負載時間軸（事件帳本）
//!
//! 每個資源擁有一條時間軸，記錄產能變更事件與各作業計劃的負載開始／結束事件。
//! 事件存放在 arena 中（[`EventId`] 為穩定索引），另外維護一份按時間排序的索引，
//! 每次變動後重建累計負載（onhand）與當下生效的最大產能。

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CapacityError, EventId, PlanId, Result};

/// 事件類型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// 負載結束
    LoadEnd,
    /// 最大產能變更
    CapacityChange { max: Decimal },
    /// 負載開始
    LoadStart,
}

impl EventKind {
    /// 同一日期內的處理順序：先結束、再變更產能、最後開始
    fn rank(&self) -> u8 {
        match self {
            EventKind::LoadEnd => 0,
            EventKind::CapacityChange { .. } => 1,
            EventKind::LoadStart => 2,
        }
    }

    pub fn is_capacity_change(&self) -> bool {
        matches!(self, EventKind::CapacityChange { .. })
    }

    pub fn is_load(&self) -> bool {
        !self.is_capacity_change()
    }
}

/// 時間軸事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// 事件日期
    pub date: NaiveDateTime,

    /// 事件類型
    pub kind: EventKind,

    /// 負載增減量（開始為正、結束為負、產能變更為零）
    pub quantity: Decimal,

    /// 所屬作業計劃
    pub owner: Option<PlanId>,

    /// 換線代碼
    pub setup: Option<String>,

    /// 成對的另一個負載事件
    pub other: Option<EventId>,

    onhand: Decimal,
    max: Decimal,
}

impl Event {
    /// 事件發生後的累計負載
    pub fn onhand(&self) -> Decimal {
        self.onhand
    }

    /// 事件發生後生效的最大產能
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// 產能變更事件帶來的新最大產能
    pub fn new_max(&self) -> Option<Decimal> {
        match self.kind {
            EventKind::CapacityChange { max } => Some(max),
            _ => None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.kind == EventKind::LoadStart
    }

    pub fn is_end(&self) -> bool {
        self.kind == EventKind::LoadEnd
    }
}

/// 掃描方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 往較早的日期
    Backward,
    /// 往較晚的日期
    Forward,
}

/// 資源時間軸
#[derive(Debug, Clone)]
pub struct Timeline {
    initial_max: Decimal,
    events: Vec<Event>,
    order: Vec<EventId>,
    positions: Vec<usize>,
}

impl Timeline {
    /// 創建新的時間軸，第一個產能變更之前使用 `initial_max`
    pub fn new(initial_max: Decimal) -> Self {
        Self {
            initial_max,
            events: Vec::new(),
            order: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// 初始最大產能
    pub fn initial_max(&self) -> Decimal {
        self.initial_max
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 依識別碼取得事件
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.index())
    }

    /// 依識別碼取得事件，找不到時回傳錯誤
    pub fn get(&self, id: EventId) -> Result<&Event> {
        self.event(id).ok_or(CapacityError::EventNotFound(id))
    }

    /// 事件在時間順序中的位置
    pub fn position(&self, id: EventId) -> Option<usize> {
        self.positions.get(id.index()).copied()
    }

    /// 取得時間順序中第 `position` 個事件
    pub fn at(&self, position: usize) -> Option<(EventId, &Event)> {
        let id = *self.order.get(position)?;
        Some((id, &self.events[id.index()]))
    }

    /// 成對的另一個負載事件（直接查詢，不搜尋）
    pub fn other(&self, id: EventId) -> Option<EventId> {
        self.event(id).and_then(|e| e.other)
    }

    /// 按時間順序遍歷事件
    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.order.iter().map(move |id| &self.events[id.index()])
    }

    /// 新增產能變更事件
    pub fn add_capacity_change(&mut self, date: NaiveDateTime, max: Decimal) -> EventId {
        let id = self.push(Event {
            date,
            kind: EventKind::CapacityChange { max },
            quantity: Decimal::ZERO,
            owner: None,
            setup: None,
            other: None,
            onhand: Decimal::ZERO,
            max,
        });
        self.rebuild();
        id
    }

    /// 新增一組負載開始／結束事件（呼叫者負責重建）
    pub(crate) fn add_load(
        &mut self,
        owner: PlanId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        quantity: Decimal,
        setup: Option<String>,
    ) -> (EventId, EventId) {
        let start_id = EventId(self.events.len());
        let end_id = EventId(self.events.len() + 1);
        self.push(Event {
            date: start,
            kind: EventKind::LoadStart,
            quantity,
            owner: Some(owner),
            setup: setup.clone(),
            other: Some(end_id),
            onhand: Decimal::ZERO,
            max: Decimal::ZERO,
        });
        self.push(Event {
            date: end,
            kind: EventKind::LoadEnd,
            quantity: -quantity,
            owner: Some(owner),
            setup,
            other: Some(start_id),
            onhand: Decimal::ZERO,
            max: Decimal::ZERO,
        });
        (start_id, end_id)
    }

    /// 移動一組負載事件的日期（呼叫者負責重建）
    pub(crate) fn move_load(
        &mut self,
        start_id: EventId,
        end_id: EventId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) {
        self.events[start_id.index()].date = start;
        self.events[end_id.index()].date = end;
    }

    fn push(&mut self, event: Event) -> EventId {
        let id = EventId(self.events.len());
        self.events.push(event);
        self.order.push(id);
        self.positions.push(self.order.len() - 1);
        id
    }

    /// 重新排序並重算累計負載與生效中的最大產能
    pub(crate) fn rebuild(&mut self) {
        let events = &self.events;
        self.order.sort_by(|a, b| {
            let (ea, eb) = (&events[a.index()], &events[b.index()]);
            ea.date
                .cmp(&eb.date)
                .then(ea.kind.rank().cmp(&eb.kind.rank()))
                .then(a.cmp(b))
        });

        let mut onhand = Decimal::ZERO;
        let mut max = self.initial_max;
        for (position, id) in self.order.iter().enumerate() {
            self.positions[id.index()] = position;
            let event = &mut self.events[id.index()];
            if let EventKind::CapacityChange { max: new_max } = event.kind {
                max = new_max;
            }
            onhand += event.quantity;
            event.onhand = onhand;
            event.max = max;
        }
    }

    /// 從既有事件開始的游標（包含該事件本身）
    pub fn cursor(&self, anchor: EventId, direction: Direction) -> Result<Cursor<'_>> {
        let position = self
            .position(anchor)
            .ok_or(CapacityError::EventNotFound(anchor))?;
        Ok(self.cursor_at(position, direction))
    }

    /// 從指定位置開始的游標
    pub fn cursor_at(&self, position: usize, direction: Direction) -> Cursor<'_> {
        Cursor {
            timeline: self,
            next: (position < self.order.len()).then_some(position),
            direction,
        }
    }

    /// 指定時刻之後（含）生效的最大產能
    pub fn max_at(&self, date: NaiveDateTime) -> Decimal {
        self.last_at_or_before(date)
            .map(|e| e.max)
            .unwrap_or(self.initial_max)
    }

    /// 指定時刻之後（含）的累計負載
    pub fn onhand_at(&self, date: NaiveDateTime) -> Decimal {
        self.last_at_or_before(date)
            .map(|e| e.onhand)
            .unwrap_or(Decimal::ZERO)
    }

    fn last_at_or_before(&self, date: NaiveDateTime) -> Option<&Event> {
        let count = self
            .order
            .partition_point(|id| self.events[id.index()].date <= date);
        count
            .checked_sub(1)
            .map(|position| &self.events[self.order[position].index()])
    }
}

/// 游標的一步
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    /// 時間順序中的位置
    pub position: usize,
    pub id: EventId,
    pub event: &'a Event,
}

/// 時間軸游標：往前或往後依序產出事件，日期單調遞增或遞減
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    timeline: &'a Timeline,
    next: Option<usize>,
    direction: Direction,
}

impl<'a> Cursor<'a> {
    /// 下一個要產出的事件，不前進
    pub fn peek(&self) -> Option<Step<'a>> {
        let position = self.next?;
        let (id, event) = self.timeline.at(position)?;
        Some(Step { position, id, event })
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.peek()?;
        self.next = match self.direction {
            Direction::Backward => step.position.checked_sub(1),
            Direction::Forward => Some(step.position + 1).filter(|p| *p < self.timeline.order.len()),
        };
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample() -> (Timeline, EventId, EventId) {
        let mut timeline = Timeline::new(Decimal::from(10));
        timeline.add_load(PlanId(0), hour(2), hour(6), Decimal::from(4), None);
        let (start, end) = timeline.add_load(PlanId(1), hour(4), hour(8), Decimal::from(3), None);
        timeline.add_capacity_change(hour(5), Decimal::from(6));
        (timeline, start, end)
    }

    #[test]
    fn test_onhand_and_max_bookkeeping() {
        let (timeline, _, _) = sample();

        let onhands: Vec<_> = timeline.iter().map(|e| e.onhand()).collect();
        assert_eq!(
            onhands,
            vec![4, 7, 7, 3, 0].into_iter().map(Decimal::from).collect::<Vec<_>>()
        );

        let maxes: Vec<_> = timeline.iter().map(|e| e.max()).collect();
        assert_eq!(
            maxes,
            vec![10, 10, 6, 6, 6].into_iter().map(Decimal::from).collect::<Vec<_>>()
        );

        assert_eq!(timeline.max_at(hour(1)), Decimal::from(10));
        assert_eq!(timeline.max_at(hour(5)), Decimal::from(6));
        assert_eq!(timeline.onhand_at(hour(4)), Decimal::from(7));
        assert_eq!(timeline.onhand_at(hour(9)), Decimal::ZERO);
    }

    #[test]
    fn test_paired_events() {
        let (timeline, start, end) = sample();

        assert_eq!(timeline.other(start), Some(end));
        assert_eq!(timeline.other(end), Some(start));
        assert!(timeline.get(start).unwrap().is_start());
        assert!(timeline.get(end).unwrap().is_end());
        assert_eq!(timeline.get(end).unwrap().quantity, Decimal::from(-3));
        assert!(timeline.get(EventId(99)).is_err());
    }

    #[test]
    fn test_cursor_directions() {
        let (timeline, start, end) = sample();

        let backward: Vec<_> = timeline
            .cursor(end, Direction::Backward)
            .unwrap()
            .map(|s| s.event.date)
            .collect();
        assert_eq!(backward, vec![hour(8), hour(6), hour(5), hour(4), hour(2)]);

        let forward: Vec<_> = timeline
            .cursor(start, Direction::Forward)
            .unwrap()
            .map(|s| s.event.date)
            .collect();
        assert_eq!(forward, vec![hour(4), hour(5), hour(6), hour(8)]);
    }

    #[test]
    fn test_same_date_ordering() {
        let mut timeline = Timeline::new(Decimal::from(5));
        timeline.add_load(PlanId(0), hour(1), hour(3), Decimal::from(5), None);
        timeline.add_load(PlanId(1), hour(3), hour(4), Decimal::from(5), None);
        timeline.rebuild();

        // 同一時刻先結束再開始，累計負載不會短暫超過 5
        let at_three: Vec<_> = timeline
            .iter()
            .filter(|e| e.date == hour(3))
            .map(|e| (e.is_end(), e.onhand()))
            .collect();
        assert_eq!(at_three, vec![(true, Decimal::ZERO), (false, Decimal::from(5))]);
    }

    #[test]
    fn test_move_load_resorts() {
        let (mut timeline, start, end) = sample();
        timeline.move_load(start, end, hour(0), hour(1));
        timeline.rebuild();

        assert_eq!(timeline.position(start), Some(0));
        assert_eq!(timeline.position(end), Some(1));
        assert_eq!(timeline.onhand_at(hour(4)), Decimal::from(4));
    }
}
