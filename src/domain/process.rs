// ==========================================
// 针织样品生产跟踪 - 工序领域模型
// ==========================================
// 主键: (RSN, ProcessName) 复合键，同一样品内唯一
// "Other" 工序必须以自定义名称作为实际 ProcessName 落库
// 非新建行的 ProcessName 不可修改
// ==========================================

use crate::domain::types::{FieldViolation, Rsn};
use serde::{Deserialize, Serialize};

/// 自定义工序占位名
pub const OTHER_PROCESS: &str = "Other";

/// 标准工序目录（含 Other）
pub const STANDARD_PROCESS_NAMES: [&str; 23] = [
    "Button",
    "Cutting",
    "Embroidery",
    "Kaj",
    "Kachi-Checking",
    "Kachi-Press",
    "Kachi-Wash",
    "Kachian",
    "Lable",
    "Linking",
    "Mending",
    "Overlock",
    "Pakki Packing",
    "Pakki Press",
    "Pakki Wash",
    "Printing",
    "Raffu",
    "Side",
    "Sewing",
    "Tailoring",
    "Thoke/Tanke",
    "Washcare",
    OTHER_PROCESS,
];

// ==========================================
// ProcessRecord - 已落库的工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(rename = "RSN")]
    pub rsn: Rsn,
    #[serde(rename = "ProcessName")]
    pub process_name: String,
    #[serde(rename = "EmpID")]
    pub employee_id: String,
    #[serde(rename = "YarnUsed")]
    pub yarn_used: String,
    #[serde(rename = "YarnCost")]
    pub yarn_cost: f64,
    #[serde(rename = "Material2")]
    pub material2: String,
    #[serde(rename = "Material2Cost")]
    pub material2_cost: f64,
    #[serde(rename = "ManpowerCost")]
    pub manpower_cost: f64,
    #[serde(rename = "UserId")]
    pub user_id: String,
}

// ==========================================
// ProcessPatch - 更新补丁（不含主键字段）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessPatch {
    pub employee_id: String,
    pub yarn_used: String,
    pub yarn_cost: f64,
    pub material2: String,
    pub material2_cost: f64,
    pub manpower_cost: f64,
    pub user_id: String,
}

impl ProcessRecord {
    /// 应用补丁，主键保持不变
    pub fn apply_patch(&mut self, patch: &ProcessPatch) {
        self.employee_id = patch.employee_id.clone();
        self.yarn_used = patch.yarn_used.clone();
        self.yarn_cost = patch.yarn_cost;
        self.material2 = patch.material2.clone();
        self.material2_cost = patch.material2_cost;
        self.manpower_cost = patch.manpower_cost;
        self.user_id = patch.user_id.clone();
    }
}

// ==========================================
// ProcessDraft - 录入表单中的一行
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessDraft {
    pub process_name: String,
    pub custom_process_name: String,
    pub employee_id: String,
    pub yarn_used: String,
    pub yarn_cost: f64,
    pub material2: String,
    pub material2_cost: f64,
    pub manpower_cost: f64,
    /// 是否为尚未落库的新行
    pub is_new: bool,
}

impl ProcessDraft {
    /// 空白新行
    pub fn blank() -> Self {
        Self {
            is_new: true,
            ..Default::default()
        }
    }

    /// 由已落库记录生成编辑行（非新建，名称锁定）
    pub fn from_record(record: &ProcessRecord) -> Self {
        Self {
            process_name: record.process_name.clone(),
            custom_process_name: String::new(),
            employee_id: record.employee_id.clone(),
            yarn_used: record.yarn_used.clone(),
            yarn_cost: record.yarn_cost,
            material2: record.material2.clone(),
            material2_cost: record.material2_cost,
            manpower_cost: record.manpower_cost,
            is_new: false,
        }
    }

    /// 选择工序名；切换到非 Other 时清空自定义名称
    pub fn with_process_name(mut self, name: &str) -> Self {
        self.process_name = name.to_string();
        if name != OTHER_PROCESS {
            self.custom_process_name.clear();
        }
        self
    }

    /// 实际落库的工序名
    ///
    /// # 返回
    /// - Other: 自定义名称（去除首尾空白）
    /// - 其他: 选择的工序名
    pub fn effective_process_name(&self) -> String {
        if self.process_name == OTHER_PROCESS {
            self.custom_process_name.trim().to_string()
        } else {
            self.process_name.trim().to_string()
        }
    }

    /// 校验非主键字段并生成补丁
    pub fn to_patch(&self, user_id: &str) -> Result<ProcessPatch, FieldViolation> {
        if self.employee_id.trim().is_empty() {
            return Err(FieldViolation::new("EmpID", "员工编号不能为空"));
        }
        for (field, value) in [
            ("YarnCost", self.yarn_cost),
            ("Material2Cost", self.material2_cost),
            ("ManpowerCost", self.manpower_cost),
        ] {
            if value < 0.0 {
                return Err(FieldViolation::new(field, "不能为负数"));
            }
            if !value.is_finite() {
                return Err(FieldViolation::new(field, "不是有效数值"));
            }
        }

        Ok(ProcessPatch {
            employee_id: self.employee_id.trim().to_string(),
            yarn_used: self.yarn_used.trim().to_string(),
            yarn_cost: self.yarn_cost,
            material2: self.material2.trim().to_string(),
            material2_cost: self.material2_cost,
            manpower_cost: self.manpower_cost,
            user_id: user_id.to_string(),
        })
    }

    /// 校验新行并生成待创建记录
    ///
    /// # 参数
    /// - rsn: 样品号
    /// - user_id: 当前操作用户
    /// - catalog: 允许的工序目录
    pub fn to_record(
        &self,
        rsn: Rsn,
        user_id: &str,
        catalog: &[String],
    ) -> Result<ProcessRecord, FieldViolation> {
        let name = self.effective_process_name();
        if name.is_empty() {
            let field = if self.process_name == OTHER_PROCESS {
                "CustomProcessName"
            } else {
                "ProcessName"
            };
            return Err(FieldViolation::new(field, "工序名称不能为空"));
        }
        if self.process_name != OTHER_PROCESS && !catalog.iter().any(|c| c == &name) {
            return Err(FieldViolation::new(
                "ProcessName",
                format!("未知工序: {}", name),
            ));
        }

        let patch = self.to_patch(user_id)?;
        Ok(ProcessRecord {
            rsn,
            process_name: name,
            employee_id: patch.employee_id,
            yarn_used: patch.yarn_used,
            yarn_cost: patch.yarn_cost,
            material2: patch.material2,
            material2_cost: patch.material2_cost,
            manpower_cost: patch.manpower_cost,
            user_id: patch.user_id,
        })
    }
}

/// 默认工序目录
pub fn default_process_catalog() -> Vec<String> {
    STANDARD_PROCESS_NAMES.iter().map(|s| s.to_string()).collect()
}
