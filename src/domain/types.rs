// ==========================================
// 针织样品生产跟踪 - 领域类型定义
// ==========================================
// 职责: 样品号、工作流模式、工作流阶段、重量/工时合计
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// 样品运行序号 (Run Sequence Number)
///
/// 所有工序、针织明细、配色记录都以 RSN 作为租户键。
pub type Rsn = i64;

// ==========================================
// 工作流模式 (Workflow Mode)
// ==========================================
// Add: 新样品首次录入
// Update: 重新录入，配色等阶段先整体删除再重建
// AddUpdate: 从已有样品的展示页补录，写入语义同 Add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowMode {
    Add,
    Update,
    AddUpdate,
}

impl WorkflowMode {
    /// 是否为"整体替换"模式（先删后建）
    pub fn replaces_existing(&self) -> bool {
        matches!(self, WorkflowMode::Update)
    }

    /// 与前端路由参数保持一致的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowMode::Add => "Add",
            WorkflowMode::Update => "update",
            WorkflowMode::AddUpdate => "addUpdate",
        }
    }

    /// 从路由参数解析模式（大小写不敏感）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "add" => Some(WorkflowMode::Add),
            "update" => Some(WorkflowMode::Update),
            "addupdate" => Some(WorkflowMode::AddUpdate),
            _ => None,
        }
    }
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 工作流阶段 (Workflow Stage)
// ==========================================
// 顺序: 工序录入 → 衣片选择 → 针织录入 → 配色 → 复核
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStage {
    ProcessEntry,
    PanelSelection,
    KnittingEntry,
    ColorMatching,
    Review,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStage::ProcessEntry => write!(f, "PROCESS_ENTRY"),
            WorkflowStage::PanelSelection => write!(f, "PANEL_SELECTION"),
            WorkflowStage::KnittingEntry => write!(f, "KNITTING_ENTRY"),
            WorkflowStage::ColorMatching => write!(f, "COLOR_MATCHING"),
            WorkflowStage::Review => write!(f, "REVIEW"),
        }
    }
}

// ==========================================
// 合计 (Totals)
// ==========================================
// 序列化字段名与样品记录中的 Total{Weight, Time} 一致
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Time")]
    pub time: f64,
}

impl Totals {
    pub fn new(weight: f64, time: f64) -> Self {
        Self { weight, time }
    }

    pub fn is_zero(&self) -> bool {
        self.weight == 0.0 && self.time == 0.0
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            weight: self.weight + rhs.weight,
            time: self.time + rhs.time,
        }
    }
}

// ==========================================
// 字段级校验违规 (Field Violation)
// ==========================================
// 领域层只描述"哪个字段、为什么"，由引擎层转换为 WorkflowError
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
