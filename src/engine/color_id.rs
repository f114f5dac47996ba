// ==========================================
// 针织样品生产跟踪 - 配色编号派生器
// ==========================================
// ColorId = 衣片中的 [A-Z0-9] 字符
//         + RSN 十进制
//         + 配色名首字符(大写) + 第二字符(大写) + 末字符(大写)
//         + 尺码（原样）
// 纯函数: 相同输入必得相同输出
// ==========================================

use crate::domain::types::Rsn;
use thiserror::Error;

/// 配色名最小长度（需取第 1、2 和末位字符）
pub const MIN_COLOR_NAME_LEN: usize = 3;

/// 配色编号派生错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorIdError {
    #[error("无效输入 (field={field}): {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

impl ColorIdError {
    pub fn field(&self) -> &'static str {
        match self {
            ColorIdError::InvalidInput { field, .. } => field,
        }
    }
}

/// 衣片前缀：仅保留 ASCII 大写字母与数字，保持顺序
pub fn panel_prefix(panel: &str) -> String {
    panel
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// 派生配色编号
///
/// # 参数
/// - panel: 衣片名
/// - rsn: 样品号
/// - color_name: 配色名（至少 3 个字符）
/// - size: 尺码
///
/// # 错误
/// - 配色名不足 3 个字符
/// - 衣片名中没有 [A-Z0-9] 字符（前缀为空）
///
/// # 示例
/// ```
/// use knit_sample_tracker::engine::color_id::derive_color_id;
/// let id = derive_color_id("Front-A1", 74, "Navy", "M").unwrap();
/// assert_eq!(id, "FA174NAYM");
/// ```
pub fn derive_color_id(
    panel: &str,
    rsn: Rsn,
    color_name: &str,
    size: &str,
) -> Result<String, ColorIdError> {
    let chars: Vec<char> = color_name.chars().collect();
    if chars.len() < MIN_COLOR_NAME_LEN {
        return Err(ColorIdError::InvalidInput {
            field: "MatchingName",
            reason: format!(
                "配色名至少需要{}个字符: {:?}",
                MIN_COLOR_NAME_LEN, color_name
            ),
        });
    }

    let prefix = panel_prefix(panel);
    if prefix.is_empty() {
        return Err(ColorIdError::InvalidInput {
            field: "Panel",
            reason: format!("衣片名不含大写字母或数字，无法生成编号前缀: {:?}", panel),
        });
    }

    let mut id = prefix;
    id.push_str(&rsn.to_string());
    for c in [chars[0], chars[1], chars[chars.len() - 1]] {
        id.extend(c.to_uppercase());
    }
    id.push_str(size);
    Ok(id)
}
