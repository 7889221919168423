//! 排程 arena：資源、作業與作業計劃
//!
//! 作業計劃只持有時間軸事件的索引。所有數量或日期的變更都經過
//! [`Schedule::set_plan_parameters`] 與 [`Schedule::move_plan_end`]，
//! 這兩個原語會一併移動緊接在前的換線作業計劃，並在返回前重建所有受影響的時間軸。

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::dates::saturating_sub;
use crate::{
    CapacityError, LoadPlan, Operation, OperationId, OperationPlan, PlanId, Resource, ResourceId,
    Result,
};

/// 排程資料
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    resources: Vec<Resource>,
    operations: Vec<Operation>,
    plans: Vec<OperationPlan>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增資源
    pub fn add_resource(&mut self, resource: Resource) -> ResourceId {
        self.resources.push(resource);
        ResourceId(self.resources.len() - 1)
    }

    /// 新增作業（負載必須指向既有資源且數量為正）
    pub fn add_operation(&mut self, operation: Operation) -> Result<OperationId> {
        for load in &operation.loads {
            self.resource(load.resource)?;
            if load.quantity <= Decimal::ZERO {
                return Err(CapacityError::InvalidQuantity(format!(
                    "作業 {} 在 {} 上的負載必須為正數: {}",
                    operation.name, load.resource, load.quantity
                )));
            }
        }
        self.operations.push(operation);
        Ok(OperationId(self.operations.len() - 1))
    }

    pub fn resource(&self, id: ResourceId) -> Result<&Resource> {
        self.resources
            .get(id.index())
            .ok_or(CapacityError::ResourceNotFound(id))
    }

    pub fn resource_mut(&mut self, id: ResourceId) -> Result<&mut Resource> {
        self.resources
            .get_mut(id.index())
            .ok_or(CapacityError::ResourceNotFound(id))
    }

    pub fn resources(&self) -> impl Iterator<Item = (ResourceId, &Resource)> + '_ {
        self.resources
            .iter()
            .enumerate()
            .map(|(i, r)| (ResourceId(i), r))
    }

    pub fn operation(&self, id: OperationId) -> Result<&Operation> {
        self.operations
            .get(id.index())
            .ok_or(CapacityError::OperationNotFound(id))
    }

    pub fn plan(&self, id: PlanId) -> Result<&OperationPlan> {
        self.plans.get(id.index()).ok_or(CapacityError::PlanNotFound(id))
    }

    pub fn plans(&self) -> impl Iterator<Item = (PlanId, &OperationPlan)> + '_ {
        self.plans.iter().enumerate().map(|(i, p)| (PlanId(i), p))
    }

    /// 建立作業計劃，對齊指定的結束日期，並在每個負載資源上登記事件對
    pub fn create_plan(
        &mut self,
        operation: OperationId,
        quantity: Decimal,
        end: NaiveDateTime,
    ) -> Result<PlanId> {
        if quantity <= Decimal::ZERO {
            return Err(CapacityError::InvalidQuantity(format!(
                "作業計劃數量必須為正數: {}",
                quantity
            )));
        }

        let op = self.operation(operation)?;
        let (quantity, start, end) = op.duration.plan(quantity, None, Some(end), end);
        let loads: Vec<_> = op
            .loads
            .iter()
            .map(|l| (l.resource, l.quantity, l.setup.clone()))
            .collect();

        let id = PlanId(self.plans.len());
        let mut plan = OperationPlan::new(operation, quantity, start, end);
        plan.loads = self.register_loads(id, start, end, loads)?;
        self.plans.push(plan);

        tracing::trace!("建立作業計劃 {}: {} ~ {}", id, start, end);
        Ok(id)
    }

    /// 在主作業計劃之前串接換線作業計劃，換線負載帶有指定的換線代碼
    pub fn chain_setup(
        &mut self,
        main: PlanId,
        setup_operation: OperationId,
        code: impl Into<String>,
        penalty: Decimal,
    ) -> Result<PlanId> {
        let main_plan = self.plan(main)?;
        if main_plan.setup.is_some() {
            return Err(CapacityError::InvalidRequest(format!(
                "作業計劃 {} 已有換線作業計劃",
                main
            )));
        }
        let (quantity, main_start) = (main_plan.quantity, main_plan.start);

        let op = self.operation(setup_operation)?;
        if !op.is_setup() {
            return Err(CapacityError::InvalidRequest(format!(
                "作業 {} 不是換線作業",
                op.name
            )));
        }
        let code = code.into();
        let (quantity, start, end) = op.duration.plan(quantity, None, Some(main_start), main_start);
        let loads: Vec<_> = op
            .loads
            .iter()
            .map(|l| (l.resource, l.quantity, Some(code.clone())))
            .collect();

        let id = PlanId(self.plans.len());
        let mut plan = OperationPlan::new(setup_operation, quantity, start, end);
        plan.setup_for = Some(main);
        plan.penalty = penalty;
        plan.loads = self.register_loads(id, start, end, loads)?;
        self.plans.push(plan);
        self.plans[main.index()].setup = Some(id);

        tracing::trace!("作業計劃 {} 串接換線 {} ({})", main, id, code);
        Ok(id)
    }

    /// 調整作業計劃的數量與日期（`None` 表示開放邊界），由作業時長公式決定結果
    pub fn set_plan_parameters(
        &mut self,
        plan: PlanId,
        quantity: Decimal,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<()> {
        let current = self.plan(plan)?;
        let op = self.operation(current.operation)?;
        let (quantity, start, end) = op.duration.plan(quantity, start, end, current.end);
        self.place(plan, quantity, start, end)
    }

    /// 維持數量，將作業計劃移到指定的結束日期
    pub fn move_plan_end(&mut self, plan: PlanId, end: NaiveDateTime) -> Result<()> {
        let current = self.plan(plan)?;
        let op = self.operation(current.operation)?;
        let (quantity, start, end) = op.duration.plan(current.quantity, None, Some(end), end);
        self.place(plan, quantity, start, end)
    }

    fn register_loads(
        &mut self,
        owner: PlanId,
        start: NaiveDateTime,
        end: NaiveDateTime,
        loads: Vec<(ResourceId, Decimal, Option<String>)>,
    ) -> Result<Vec<LoadPlan>> {
        let mut registered = Vec::with_capacity(loads.len());
        for (resource, quantity, setup) in loads {
            let timeline = self.resource_mut(resource)?.timeline_mut();
            let (start_event, end_event) = timeline.add_load(owner, start, end, quantity, setup);
            timeline.rebuild();
            registered.push(LoadPlan {
                resource,
                start: start_event,
                end: end_event,
            });
        }
        Ok(registered)
    }

    fn place(
        &mut self,
        id: PlanId,
        quantity: Decimal,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<()> {
        let plan = self
            .plans
            .get_mut(id.index())
            .ok_or(CapacityError::PlanNotFound(id))?;
        plan.quantity = quantity;
        plan.start = start;
        plan.end = end;
        let mut moves: Vec<(LoadPlan, NaiveDateTime, NaiveDateTime)> =
            plan.loads.iter().map(|l| (*l, start, end)).collect();

        // 換線作業計劃緊貼在主作業計劃之前
        if let Some(setup_id) = plan.setup {
            let setup = self
                .plans
                .get_mut(setup_id.index())
                .ok_or(CapacityError::PlanNotFound(setup_id))?;
            let duration = setup.duration();
            setup.end = start;
            setup.start = saturating_sub(start, duration);
            moves.extend(setup.loads.iter().map(|l| (*l, setup.start, setup.end)));
        }

        let mut touched: Vec<ResourceId> = Vec::new();
        for (load, s, e) in moves {
            self.resource_mut(load.resource)?
                .timeline_mut()
                .move_load(load.start, load.end, s, e);
            touched.push(load.resource);
        }
        touched.sort();
        touched.dedup();
        for resource in touched {
            self.resource_mut(resource)?.timeline_mut().rebuild();
        }

        tracing::trace!("作業計劃 {} 調整為 {} @ {} ~ {}", id, quantity, start, end);
        Ok(())
    }
}
