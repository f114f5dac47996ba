// ==========================================
// 针织样品生产跟踪 - 针织明细领域模型
// ==========================================
// 主键: RSN，每个样品一条记录，聚合可变数量的衣片字段
// 记录形态: {"RSN", "Size", "<衣片>": {Weight, Time, MachineNo}, "Total"}
// 红线: Total 只能由衣片字段实时求和得到，不允许单独编辑
// ==========================================

use crate::domain::types::{FieldViolation, Rsn, Totals};
use crate::engine::totals::{aggregate_totals, coerce_number, Measured};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 保留字段：不属于衣片，不参与合计
pub const RESERVED_KNITTING_KEYS: [&str; 3] = ["RSN", "Size", "Total"];

/// 记录中携带操作用户的字段名
pub const USER_ID_KEY: &str = "userId";

/// 记录中所有非衣片字段，衣片名不得与之重名
pub const RECORD_FIELD_KEYS: [&str; 4] = ["RSN", "Size", "Total", USER_ID_KEY];

/// 判断字段名是否为保留字段
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KNITTING_KEYS.contains(&key)
}

/// 判断字段名是否被记录本身占用（保留字段 + userId）
pub fn is_record_field_key(key: &str) -> bool {
    RECORD_FIELD_KEYS.contains(&key)
}

// ==========================================
// PanelMeasurement - 单个衣片的针织数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelMeasurement {
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "MachineNo")]
    pub machine_no: String,
}

impl Measured for PanelMeasurement {
    fn weight_value(&self) -> f64 {
        self.weight
    }

    fn time_value(&self) -> f64 {
        self.time
    }
}

impl PanelMeasurement {
    /// 重量或工时非零（展示过滤用）
    pub fn is_non_zero(&self) -> bool {
        self.weight != 0.0 || self.time != 0.0
    }
}

// ==========================================
// KnittingField - 动态记录中的一个字段
// ==========================================
// 动态记录的值可能是标量（RSN/Size/userId 等），也可能是衣片对象
#[derive(Debug, Clone, PartialEq)]
pub enum KnittingField {
    Scalar(Value),
    Panel(PanelMeasurement),
}

impl KnittingField {
    /// 从 JSON 值解析；数值字段无法解析时按 0 处理
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => KnittingField::Panel(PanelMeasurement {
                weight: obj.get("Weight").map(coerce_number).unwrap_or(0.0),
                time: obj.get("Time").map(coerce_number).unwrap_or(0.0),
                machine_no: match obj.get("MachineNo") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => String::new(),
                },
            }),
            other => KnittingField::Scalar(other.clone()),
        }
    }
}

impl Measured for KnittingField {
    fn weight_value(&self) -> f64 {
        match self {
            KnittingField::Panel(p) => p.weight,
            KnittingField::Scalar(_) => 0.0,
        }
    }

    fn time_value(&self) -> f64 {
        match self {
            KnittingField::Panel(p) => p.time,
            KnittingField::Scalar(_) => 0.0,
        }
    }
}

// ==========================================
// KnittingDetail - 针织明细
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct KnittingDetail {
    pub rsn: Rsn,
    pub size: String,
    /// 衣片名 → 针织数据（有序）
    pub panels: BTreeMap<String, PanelMeasurement>,
    pub user_id: String,
}

impl KnittingDetail {
    /// 实时合计（读时计算，不存储）
    pub fn total(&self) -> Totals {
        aggregate_totals(self.panels.iter())
    }

    /// 重量或工时非零的衣片
    pub fn non_zero_panels(&self) -> Vec<(&str, &PanelMeasurement)> {
        self.panels
            .iter()
            .filter(|(_, m)| m.is_non_zero())
            .map(|(name, m)| (name.as_str(), m))
            .collect()
    }

    /// 序列化为动态记录形态（Total 在此刻重新计算）
    pub fn to_record_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("RSN".to_string(), Value::from(self.rsn));
        map.insert("Size".to_string(), Value::from(self.size.clone()));
        for (name, measurement) in &self.panels {
            map.insert(
                name.clone(),
                serde_json::to_value(measurement).unwrap_or(Value::Null),
            );
        }
        map.insert(
            "Total".to_string(),
            serde_json::to_value(self.total()).unwrap_or(Value::Null),
        );
        map.insert(USER_ID_KEY.to_string(), Value::from(self.user_id.clone()));
        Value::Object(map)
    }

    /// 从动态记录解析
    ///
    /// # 说明
    /// - 保留字段（RSN/Size/Total）不作为衣片
    /// - 存储中的 Total 被忽略，合计始终由衣片重新计算
    /// - 标量字段除 userId 外忽略
    pub fn from_record_json(value: &Value) -> Result<Self, FieldViolation> {
        let obj = value
            .as_object()
            .ok_or_else(|| FieldViolation::new("record", "针织明细必须是对象"))?;

        let rsn = obj
            .get("RSN")
            .and_then(|v| match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .ok_or_else(|| FieldViolation::new("RSN", "缺少有效的 RSN"))?;

        let size = match obj.get("Size") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let user_id = obj
            .get(USER_ID_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let panels = obj
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .filter_map(|(key, v)| match KnittingField::from_value(v) {
                KnittingField::Panel(m) => Some((key.clone(), m)),
                KnittingField::Scalar(_) => None,
            })
            .collect();

        Ok(Self {
            rsn,
            size,
            panels,
            user_id,
        })
    }
}

// ==========================================
// PanelEntry - 表单中一个衣片的原始输入
// ==========================================
// 保留原始文本，便于区分"未填写"与"填写了 0"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    pub weight: String,
    pub time: String,
    pub machine_no: String,
}

impl PanelEntry {
    pub fn from_measurement(m: &PanelMeasurement) -> Self {
        Self {
            weight: m.weight.to_string(),
            time: m.time.to_string(),
            machine_no: m.machine_no.clone(),
        }
    }
}

impl Measured for PanelEntry {
    fn weight_value(&self) -> f64 {
        coerce_number(&Value::from(self.weight.as_str()))
    }

    fn time_value(&self) -> f64 {
        coerce_number(&Value::from(self.time.as_str()))
    }
}
