// ==========================================
// 针织样品生产跟踪 - 配色记录领域模型
// ==========================================
// 主键: ColorId（由 衣片/RSN/配色名/尺码 派生）
// 每个 RSN 下有多条：选中衣片 × 配色名
// ==========================================

use crate::domain::types::Rsn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMatching {
    #[serde(rename = "ColorId")]
    pub color_id: String,
    #[serde(rename = "RSN")]
    pub rsn: Rsn,
    #[serde(rename = "MatchingName")]
    pub matching_name: String,
    #[serde(rename = "Panel")]
    pub panel: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}
