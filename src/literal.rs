//! 字面量渲染：数字、IN 列表、LIKE 模式与原样透传的函数调用。

use crate::quote::QuoteProvider;
use crate::value::ConditionValue;
use regex::Regex;
use std::sync::OnceLock;

/// Int 与有限的 Float 渲染为裸数字，其余返回 `None`。
pub(crate) fn numeric(value: &ConditionValue) -> Option<String> {
    match value {
        ConditionValue::Int(n) => Some(n.to_string()),
        ConditionValue::Float(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

/// 标量转为待 Quote 的文本；Bool 记作 `1` / `0`。
pub(crate) fn scalar_text(value: &ConditionValue) -> Option<String> {
    match value {
        ConditionValue::String(s) => Some(s.clone()),
        ConditionValue::Bool(b) => Some(bool_literal(*b).to_string()),
        other => numeric(other),
    }
}

pub(crate) fn bool_literal(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

/// 渲染 IN 列表：数字裸写，其余交给 QuoteProvider，逗号相连且保持顺序。
///
/// 遇到不能作为列表元素的值时返回该值的类型名。
pub fn array_literal(
    values: &[ConditionValue],
    quoter: &dyn QuoteProvider,
) -> Result<String, &'static str> {
    let mut items = Vec::with_capacity(values.len());
    for v in values {
        let item = match v {
            ConditionValue::Int(_) | ConditionValue::Float(_) => numeric(v),
            ConditionValue::String(_) | ConditionValue::Bool(_) => {
                scalar_text(v).map(|s| quoter.quote_literal(&s))
            }
            _ => None,
        };
        items.push(item.ok_or(v.kind())?);
    }
    Ok(items.join(","))
}

/// 通配符简写转 LIKE 模式：
/// 末尾 `_` 换成 `%`；首尾已有 `%` 的原样保留；其余包成 `%item%`。
pub fn normalize_like(item: &str) -> String {
    if let Some(head) = item.strip_suffix('_') {
        format!("{head}%")
    } else if item.is_empty() || item.starts_with('%') || item.ends_with('%') {
        item.to_string()
    } else {
        format!("%{item}%")
    }
}

/// 是否形如 `NOW()` / `DATE_ADD(x, 1)` 的大写函数调用。
pub fn is_function_call(s: &str) -> bool {
    static FUNCTION_CALL_RE: OnceLock<Regex> = OnceLock::new();
    FUNCTION_CALL_RE
        .get_or_init(|| {
            Regex::new(r"^[A-Z0-9_]+\([^)]*\)$").expect("invalid built-in function call regex")
        })
        .is_match(s)
}
