// ==========================================
// 针织样品生产跟踪 - 针织录入表单
// ==========================================
// 每次编辑产生新的表单值，合计同步重算
// 负数重量/工时直接拒绝，表单保持不变
// 提交前要求每个选中衣片的 Weight/Time/MachineNo 均已填写
// ==========================================

use crate::domain::knitting::{KnittingDetail, PanelEntry, PanelMeasurement};
use crate::domain::panel::PanelSelection;
use crate::domain::types::{FieldViolation, Rsn, Totals};
use crate::engine::totals::aggregate_totals;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 衣片的可编辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementField {
    Weight,
    Time,
    MachineNo,
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementField::Weight => write!(f, "Weight"),
            MeasurementField::Time => write!(f, "Time"),
            MeasurementField::MachineNo => write!(f, "MachineNo"),
        }
    }
}

fn field_path(panel: &str, field: MeasurementField) -> String {
    format!("{}.{}", panel, field)
}

// ==========================================
// KnittingForm - 针织录入表单
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct KnittingForm {
    rsn: Rsn,
    size: String,
    panels: BTreeMap<String, PanelEntry>,
    total: Totals,
}

impl KnittingForm {
    /// 按选中衣片生成空白表单
    pub fn new(rsn: Rsn, selection: &PanelSelection) -> Self {
        Self::prefilled(rsn, selection, None)
    }

    /// 按选中衣片生成表单，已有明细中的同名衣片预填
    ///
    /// 已有明细中未被选中的衣片不会进入表单
    pub fn prefilled(rsn: Rsn, selection: &PanelSelection, existing: Option<&KnittingDetail>) -> Self {
        let panels: BTreeMap<String, PanelEntry> = selection
            .selected()
            .into_iter()
            .map(|panel| {
                let entry = existing
                    .and_then(|d| d.panels.get(panel))
                    .map(PanelEntry::from_measurement)
                    .unwrap_or_default();
                (panel.to_string(), entry)
            })
            .collect();
        let size = existing.map(|d| d.size.clone()).unwrap_or_default();
        let total = aggregate_totals(panels.iter());

        Self {
            rsn,
            size,
            panels,
            total,
        }
    }

    pub fn rsn(&self) -> Rsn {
        self.rsn
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn panels(&self) -> &BTreeMap<String, PanelEntry> {
        &self.panels
    }

    /// 当前合计（与衣片数值始终一致）
    pub fn total(&self) -> Totals {
        self.total
    }

    /// 编辑一个衣片字段
    ///
    /// # 返回
    /// - Ok(KnittingForm): 新表单（合计已重算）
    /// - Err: 衣片未选中，或重量/工时为负数
    pub fn edit(
        &self,
        panel: &str,
        field: MeasurementField,
        value: &str,
    ) -> Result<Self, FieldViolation> {
        if !self.panels.contains_key(panel) {
            return Err(FieldViolation::new(
                "Panel",
                format!("衣片未被选中: {}", panel),
            ));
        }

        if matches!(field, MeasurementField::Weight | MeasurementField::Time) {
            if let Ok(n) = value.trim().parse::<f64>() {
                if n < 0.0 {
                    return Err(FieldViolation::new(field_path(panel, field), "不能为负数"));
                }
            }
        }

        let mut next = self.clone();
        if let Some(entry) = next.panels.get_mut(panel) {
            match field {
                MeasurementField::Weight => entry.weight = value.to_string(),
                MeasurementField::Time => entry.time = value.to_string(),
                MeasurementField::MachineNo => entry.machine_no = value.to_string(),
            }
        }
        next.total = aggregate_totals(next.panels.iter());
        Ok(next)
    }

    /// 设置尺码
    pub fn with_size(&self, size: &str) -> Self {
        Self {
            size: size.to_string(),
            ..self.clone()
        }
    }

    /// 提交前校验并生成针织明细
    ///
    /// # 校验顺序
    /// 1. 尺码不能为空
    /// 2. 逐个衣片: Weight → Time → MachineNo 不能为空
    /// 3. Weight/Time 必须是非负数值
    pub fn validate(&self, user_id: &str) -> Result<KnittingDetail, FieldViolation> {
        if self.size.trim().is_empty() {
            return Err(FieldViolation::new("Size", "尺码不能为空"));
        }
        if self.panels.is_empty() {
            return Err(FieldViolation::new("Panel", "没有选中的衣片"));
        }

        let mut panels = BTreeMap::new();
        for (name, entry) in &self.panels {
            for (field, raw) in [
                (MeasurementField::Weight, &entry.weight),
                (MeasurementField::Time, &entry.time),
                (MeasurementField::MachineNo, &entry.machine_no),
            ] {
                if raw.trim().is_empty() {
                    return Err(FieldViolation::new(
                        field_path(name, field),
                        format!("{} 的 Weight、Time、MachineNo 必须全部填写", name),
                    ));
                }
            }

            let weight = parse_non_negative(name, MeasurementField::Weight, &entry.weight)?;
            let time = parse_non_negative(name, MeasurementField::Time, &entry.time)?;
            panels.insert(
                name.clone(),
                PanelMeasurement {
                    weight,
                    time,
                    machine_no: entry.machine_no.trim().to_string(),
                },
            );
        }

        Ok(KnittingDetail {
            rsn: self.rsn,
            size: self.size.trim().to_string(),
            panels,
            user_id: user_id.to_string(),
        })
    }
}

fn parse_non_negative(panel: &str, field: MeasurementField, raw: &str) -> Result<f64, FieldViolation> {
    let n = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FieldViolation::new(field_path(panel, field), format!("不是有效数值: {}", raw)))?;
    if n < 0.0 {
        return Err(FieldViolation::new(field_path(panel, field), "不能为负数"));
    }
    Ok(n)
}
