//! 列名 Quote 与 SELECT 列清单编译。

use crate::condition::CompileError;
use crate::flavor::Flavor;
use regex::Regex;
use std::sync::OnceLock;

/// 按 Flavor 对列路径逐段 Quote：去掉 `#` 前缀与 `(JSON)` 标记，按 `.` 切分。
pub fn quote_column(flavor: Flavor, name: &str) -> String {
    let name = name.strip_prefix('#').unwrap_or(name);
    let name = strip_json_marker(name);
    name.split('.')
        .filter(|p| !p.is_empty())
        .map(|p| flavor.quote(p))
        .collect::<Vec<_>>()
        .join(".")
}

/// 校验标识符路径：去掉标记后每个 `.` 分段都必须非空。
pub fn check_identifier(name: &str) -> Result<(), CompileError> {
    let bare = name.strip_prefix('#').unwrap_or(name);
    if strip_json_marker(bare).split('.').any(|p| p.trim().is_empty()) {
        return Err(CompileError::MalformedIdentifier(name.to_string()));
    }
    Ok(())
}

fn strip_json_marker(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find("(JSON)") {
        out.push_str(&rest[..pos]);
        rest = rest[pos + "(JSON)".len()..].trim_start();
    }
    out.push_str(rest);
    out.truncate(out.trim_end().len());
    out
}

/// SELECT 列说明：`*` 或有序的列清单（元素可写作 `expr(alias)`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    All,
    List(Vec<String>),
}

impl From<&str> for ColumnSpec {
    fn from(v: &str) -> Self {
        if v == "*" {
            Self::All
        } else {
            Self::List(vec![v.to_string()])
        }
    }
}

impl From<String> for ColumnSpec {
    fn from(v: String) -> Self {
        Self::from(v.as_str())
    }
}

impl<T: Into<String>> From<Vec<T>> for ColumnSpec {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for ColumnSpec {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

fn alias_re() -> &'static Regex {
    static ALIAS_RE: OnceLock<Regex> = OnceLock::new();
    ALIAS_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_.\-]+)\s*\(([A-Za-z0-9_\-]+)\)$")
            .expect("invalid built-in column alias regex")
    })
}

/// 编译列清单，输出顺序与输入一致，以 `,` 连接。
pub fn compile_columns(flavor: Flavor, spec: &ColumnSpec) -> Result<String, CompileError> {
    let columns = match spec {
        ColumnSpec::All => return Ok("*".to_string()),
        ColumnSpec::List(columns) => columns,
    };
    if columns.is_empty() {
        return Err(CompileError::EmptyColumnList);
    }

    let mut parts = Vec::with_capacity(columns.len());
    for column in columns {
        let part = match alias_re().captures(column) {
            Some(caps) => {
                check_identifier(&caps[1])?;
                format!(
                    "{} AS {}",
                    quote_column(flavor, &caps[1]),
                    quote_column(flavor, &caps[2])
                )
            }
            None => {
                check_identifier(column)?;
                quote_column(flavor, column)
            }
        };
        parts.push(part);
    }
    Ok(parts.join(","))
}
