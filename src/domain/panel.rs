// ==========================================
// 针织样品生产跟踪 - 衣片选择集
// ==========================================
// 临时数据，不落库；由外部选择界面产生
// 针织录入与配色两个阶段共用同一 RSN 的选择集
// ==========================================

use crate::domain::knitting::is_record_field_key;
use crate::domain::types::FieldViolation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSelection {
    states: BTreeMap<String, bool>,
}

impl PanelSelection {
    /// 从 衣片名 → 是否选中 映射构建
    ///
    /// # 校验
    /// - 衣片名不能为空
    /// - 衣片名不能与针织记录自身字段冲突（RSN/Size/Total/userId）
    pub fn new(states: BTreeMap<String, bool>) -> Result<Self, FieldViolation> {
        for name in states.keys() {
            if name.trim().is_empty() {
                return Err(FieldViolation::new("Panel", "衣片名不能为空"));
            }
            if is_record_field_key(name) {
                return Err(FieldViolation::new(
                    "Panel",
                    format!("衣片名与保留字段冲突: {}", name),
                ));
            }
        }
        Ok(Self { states })
    }

    /// 便捷构造：给定衣片全部选中
    pub fn of<I, S>(panels: I) -> Result<Self, FieldViolation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(panels.into_iter().map(|p| (p.into(), true)).collect())
    }

    /// 选中的衣片（按名称排序）
    pub fn selected(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_selected(&self, panel: &str) -> bool {
        self.states.get(panel).copied().unwrap_or(false)
    }

    pub fn has_selection(&self) -> bool {
        self.states.values().any(|v| *v)
    }

    /// 原始状态映射
    pub fn states(&self) -> &BTreeMap<String, bool> {
        &self.states
    }
}
