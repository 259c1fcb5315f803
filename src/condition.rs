//! 条件编译器：把嵌套的条件映射递归编译为 WHERE 布尔表达式。
//!
//! 键语法：`['#'] column-path ['[' op ']']`，或逻辑分组键 `AND` / `OR`（可带 `#注释`）。
//! 值按类型决定 SQL 形式，字符串一律经由 [`QuoteProvider`] 转成字面量，
//! 只有数字与带 `#` 标记的值会被原样写入。

use crate::column::{ColumnSpec, compile_columns, quote_column};
use crate::config::UnknownOperatorPolicy;
use crate::flavor::{Flavor, default_flavor};
use crate::key::{ConditionKey, Conjunctor, KeyError, Operator};
use crate::literal::{
    array_literal, bool_literal, is_function_call, normalize_like, numeric, scalar_text,
};
use crate::quote::QuoteProvider;
use crate::value::{ConditionMap, ConditionValue};

/// 编译错误，均带上出错的键。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("malformed condition key `{key}`: {reason}")]
    MalformedKey { key: String, reason: KeyError },
    #[error("range condition `{key}` expects exactly 2 bounds, got {len}")]
    InvalidRangeArity { key: String, len: usize },
    #[error("condition `{key}` does not accept a {kind} value")]
    UnsupportedValueType { key: String, kind: &'static str },
    #[error("column list is empty")]
    EmptyColumnList,
    #[error("malformed identifier `{0}`")]
    MalformedIdentifier(String),
}

fn unsupported(key: &str, kind: &'static str) -> CompileError {
    CompileError::UnsupportedValueType {
        key: key.to_string(),
        kind,
    }
}

/// 条件编译器。无内部可变状态，可跨线程共享。
#[derive(Debug, Clone)]
pub struct Compiler {
    flavor: Flavor,
    quoter: Box<dyn QuoteProvider>,
    unknown_operator: UnknownOperatorPolicy,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(default_flavor())
    }
}

impl Compiler {
    /// 使用 `flavor` 的内置字面量转义创建编译器。
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            quoter: Box::new(flavor),
            unknown_operator: UnknownOperatorPolicy::default(),
        }
    }

    /// 替换字面量 Quote 实现（通常由驱动提供）。
    pub fn with_quoter(mut self, quoter: impl QuoteProvider + 'static) -> Self {
        self.quoter = Box::new(quoter);
        self
    }

    pub(crate) fn with_boxed_quoter(mut self, quoter: Box<dyn QuoteProvider>) -> Self {
        self.quoter = quoter;
        self
    }

    pub fn unknown_operator(mut self, policy: UnknownOperatorPolicy) -> Self {
        self.unknown_operator = policy;
        self
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn quoter(&self) -> &dyn QuoteProvider {
        self.quoter.as_ref()
    }

    pub fn quote_column(&self, name: &str) -> String {
        quote_column(self.flavor, name)
    }

    pub fn compile_columns(&self, spec: &ColumnSpec) -> Result<String, CompileError> {
        compile_columns(self.flavor, spec)
    }

    /// 以 AND 编译顶层条件映射。
    pub fn compile_where(&self, map: &ConditionMap) -> Result<String, CompileError> {
        let sql = self.compile(map, Conjunctor::And)?;
        tracing::trace!(fragment = %sql, "compiled where clause");
        Ok(sql)
    }

    /// 按映射顺序编译每个条件，并用 `conjunctor` 连接。
    pub fn compile(
        &self,
        map: &ConditionMap,
        conjunctor: Conjunctor,
    ) -> Result<String, CompileError> {
        let mut fragments = Vec::with_capacity(map.len());
        for (key, value) in map.iter() {
            let fragment = match (Conjunctor::parse_relation(key), value) {
                (Some(relation), ConditionValue::Map(inner)) => {
                    self.compile_group(key, inner, relation, conjunctor)?
                }
                _ => self.compile_condition(key, value)?,
            };
            fragments.extend(fragment);
        }
        Ok(fragments.join(conjunctor.separator()))
    }

    fn compile_group(
        &self,
        key: &str,
        inner: &ConditionMap,
        relation: Conjunctor,
        outer: Conjunctor,
    ) -> Result<Option<String>, CompileError> {
        if !inner.is_sequential() {
            let sql = self.compile(inner, relation)?;
            return Ok((!sql.is_empty()).then(|| format!("({sql})")));
        }

        // 顺序分组：每个子映射内部沿用外层连接词，子映射之间用分组键的连接词。
        let mut parts = Vec::with_capacity(inner.len());
        for (_, element) in inner.iter() {
            let ConditionValue::Map(element) = element else {
                return Err(unsupported(key, element.kind()));
            };
            let sql = self.compile(element, outer)?;
            if !sql.is_empty() {
                parts.push(format!("({sql})"));
            }
        }
        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!("({})", parts.join(relation.separator()))))
    }

    fn compile_condition(
        &self,
        key_text: &str,
        value: &ConditionValue,
    ) -> Result<Option<String>, CompileError> {
        let key = match ConditionKey::parse(key_text) {
            Ok(key) => key,
            Err(KeyError::UnknownOperator(op))
                if self.unknown_operator == UnknownOperatorPolicy::Skip =>
            {
                tracing::warn!(
                    key = key_text,
                    operator = %op,
                    "unrecognized operator, condition skipped"
                );
                return Ok(None);
            }
            Err(reason) => {
                return Err(CompileError::MalformedKey {
                    key: key_text.to_string(),
                    reason,
                });
            }
        };

        let column = self.quote_column(key.column);
        let sql = match key.operator {
            Operator::Eq => self.equality(key_text, &key, &column, value, false)?,
            Operator::Ne => self.equality(key_text, &key, &column, value, true)?,
            Operator::Between | Operator::NotBetween => {
                self.range(key_text, &key, &column, value)?
            }
            Operator::Like | Operator::NotLike => self.like(key_text, &key, &column, value)?,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
                self.comparison(key_text, &key, &column, value)?
            }
        };
        Ok(Some(sql))
    }

    /// 字符串字面量；`#` 键下形如 `NOW()` 的函数调用原样透传。
    fn quote_value(&self, key: &ConditionKey<'_>, s: &str) -> String {
        if key.raw && is_function_call(s) {
            s.to_string()
        } else {
            self.quoter.quote_literal(s)
        }
    }

    fn equality(
        &self,
        key_text: &str,
        key: &ConditionKey<'_>,
        column: &str,
        value: &ConditionValue,
        negated: bool,
    ) -> Result<String, CompileError> {
        let (is_null, in_list, eq) = if negated {
            ("IS NOT NULL", "NOT IN", "!=")
        } else {
            ("IS NULL", "IN", "=")
        };

        let sql = match value {
            ConditionValue::Null => format!("{column} {is_null}"),
            ConditionValue::List(items) if items.is_empty() => {
                (if negated { "0 = 0" } else { "0 = 1" }).to_string()
            }
            ConditionValue::List(items) => {
                let list = array_literal(items, self.quoter())
                    .map_err(|kind| unsupported(key_text, kind))?;
                format!("{column} {in_list} ({list})")
            }
            ConditionValue::Int(_) | ConditionValue::Float(_) => {
                let n = numeric(value).ok_or_else(|| unsupported(key_text, value.kind()))?;
                format!("{column} {eq} {n}")
            }
            ConditionValue::Bool(b) => format!("{column} {eq} {}", bool_literal(*b)),
            ConditionValue::String(s) => format!("{column} {eq} {}", self.quote_value(key, s)),
            ConditionValue::Map(_) => return Err(unsupported(key_text, value.kind())),
        };
        Ok(sql)
    }

    fn range(
        &self,
        key_text: &str,
        key: &ConditionKey<'_>,
        column: &str,
        value: &ConditionValue,
    ) -> Result<String, CompileError> {
        let ConditionValue::List(bounds) = value else {
            return Err(unsupported(key_text, value.kind()));
        };
        let [low, high] = bounds.as_slice() else {
            return Err(CompileError::InvalidRangeArity {
                key: key_text.to_string(),
                len: bounds.len(),
            });
        };

        let not = if key.operator == Operator::NotBetween { " NOT" } else { "" };
        let (low, high) = match (numeric(low), numeric(high)) {
            (Some(low), Some(high)) => (low, high),
            _ => (self.bound(key_text, low)?, self.bound(key_text, high)?),
        };
        Ok(format!("({column}{not} BETWEEN {low} AND {high})"))
    }

    fn bound(&self, key_text: &str, value: &ConditionValue) -> Result<String, CompileError> {
        scalar_text(value)
            .map(|s| self.quoter.quote_literal(&s))
            .ok_or_else(|| unsupported(key_text, value.kind()))
    }

    fn like(
        &self,
        key_text: &str,
        key: &ConditionKey<'_>,
        column: &str,
        value: &ConditionValue,
    ) -> Result<String, CompileError> {
        let items = match value {
            ConditionValue::List(items) if items.is_empty() => {
                return Err(unsupported(key_text, "empty list"));
            }
            ConditionValue::List(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };

        let not = if key.operator == Operator::NotLike { " NOT" } else { "" };
        let mut clauses = Vec::with_capacity(items.len());
        for item in items {
            let text = scalar_text(item).ok_or_else(|| unsupported(key_text, item.kind()))?;
            let pattern = normalize_like(&text);
            clauses.push(format!("{column}{not} LIKE {}", self.quote_value(key, &pattern)));
        }

        if clauses.len() == 1 {
            Ok(clauses.remove(0))
        } else {
            Ok(format!("({})", clauses.join(" OR ")))
        }
    }

    fn comparison(
        &self,
        key_text: &str,
        key: &ConditionKey<'_>,
        column: &str,
        value: &ConditionValue,
    ) -> Result<String, CompileError> {
        let op = key.operator.token().unwrap_or_default();
        let literal = match value {
            ConditionValue::Int(_) | ConditionValue::Float(_) => {
                numeric(value).ok_or_else(|| unsupported(key_text, value.kind()))?
            }
            ConditionValue::Bool(b) => self.quoter.quote_literal(bool_literal(*b)),
            // `#` 键：允许嵌入 SQL 表达式。
            ConditionValue::String(s) if key.raw => s.clone(),
            ConditionValue::String(s) => self.quoter.quote_literal(s),
            _ => return Err(unsupported(key_text, value.kind())),
        };
        Ok(format!("{column} {op} {literal}"))
    }
}

/// 使用全局默认 Flavor 以 AND 编译条件映射。
pub fn compile_where(map: &ConditionMap) -> Result<String, CompileError> {
    Compiler::default().compile_where(map)
}

/// 使用指定 Flavor 以 AND 编译条件映射。
pub fn compile_where_with_flavor(
    flavor: Flavor,
    map: &ConditionMap,
) -> Result<String, CompileError> {
    Compiler::new(flavor).compile_where(map)
}
