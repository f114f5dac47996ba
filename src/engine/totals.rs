// ==========================================
// 针织样品生产跟踪 - 合计聚合器
// ==========================================
// 职责: 将衣片字段折叠为 {Weight, Time} 合计
// 规则:
// - 排除保留字段 RSN / Size / Total
// - 非数值或缺失按 0 计入，解析失败不报错
// - 每次字段编辑后同步重算，不保留过期合计
// ==========================================

use crate::domain::knitting::is_reserved_key;
use crate::domain::types::Totals;
use serde_json::Value;

/// 可参与合计的字段值
pub trait Measured {
    /// 重量贡献
    fn weight_value(&self) -> f64;

    /// 工时贡献
    fn time_value(&self) -> f64;
}

/// 聚合字段合计
///
/// # 参数
/// - entries: (字段名, 字段值) 迭代器
///
/// # 返回
/// 所有非保留字段的重量/工时之和
pub fn aggregate_totals<'a, K, M>(entries: impl IntoIterator<Item = (K, &'a M)>) -> Totals
where
    K: AsRef<str>,
    M: Measured + 'a,
{
    entries
        .into_iter()
        .filter(|(key, _)| !is_reserved_key(key.as_ref()))
        .fold(Totals::default(), |acc, (_, value)| {
            acc + Totals::new(
                finite_or_zero(value.weight_value()),
                finite_or_zero(value.time_value()),
            )
        })
}

/// JSON 值强制转换为数值
///
/// - 数值: 原值
/// - 字符串: 去空白后解析，失败为 0
/// - 其他: 0
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    finite_or_zero(n)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
