// ==========================================
// 针织样品生产跟踪 - 样品领域模型
// ==========================================
// 样品按 RSN 建档一次，下游各阶段只读
// 本核心不删除样品
// ==========================================

use crate::domain::types::{Rsn, Totals};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Sample - 样品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "RSN")]
    pub rsn: Rsn,
    #[serde(rename = "ArticleNo")]
    pub article_no: Option<String>,

    // 针织明细提交后同步的合计
    #[serde(rename = "Total")]
    pub total: Totals,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Sample {
    /// 新建样品（合计为零）
    pub fn new(rsn: Rsn, article_no: Option<String>) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            rsn,
            article_no,
            total: Totals::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 列表展示用的款号（缺省显示 N/A）
    pub fn article_no_display(&self) -> &str {
        match self.article_no.as_deref() {
            Some(v) if !v.trim().is_empty() => v,
            _ => "N/A",
        }
    }
}
