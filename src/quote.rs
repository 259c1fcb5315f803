//! QuoteProvider：把标量转换为可安全拼接的 SQL 字面量。
//!
//! 编译器本身不做转义，只通过这个 trait 调用驱动（或内置的 Flavor 实现）。

use crate::flavor::Flavor;
use std::fmt;

/// 字面量 Quote 的边界 trait，实现方必须按方言转义引号与反斜杠。
pub trait QuoteProvider: dyn_clone::DynClone + fmt::Debug + Send + Sync {
    fn quote_literal(&self, value: &str) -> String;
}

dyn_clone::clone_trait_object!(QuoteProvider);

impl QuoteProvider for Flavor {
    fn quote_literal(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 3);
        quote_string(&mut out, value, *self);
        out
    }
}

/// 用闭包充当 QuoteProvider，适合把驱动自带的 quote 函数接进来。
#[derive(Clone)]
pub struct QuoteFn<F>(pub F);

impl<F> fmt::Debug for QuoteFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QuoteFn")
    }
}

impl<F> QuoteProvider for QuoteFn<F>
where
    F: Fn(&str) -> String + Clone + Send + Sync + 'static,
{
    fn quote_literal(&self, value: &str) -> String {
        (self.0)(value)
    }
}

fn quote_string(out: &mut String, s: &str, flavor: Flavor) {
    match flavor {
        Flavor::PostgreSQL => out.push('E'),
        Flavor::SQLServer => out.push('N'),
        _ => {}
    }

    out.push('\'');
    match flavor {
        Flavor::MySQL => {
            for ch in s.chars() {
                match ch {
                    '\u{0000}' => out.push_str("\\0"),
                    '\u{0008}' => out.push_str("\\b"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    '\u{001a}' => out.push_str("\\Z"),
                    '\'' => out.push_str("\\'"),
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(ch),
                }
            }
        }
        // E'' 字符串：只有反斜杠与单引号需要处理，其余字符原样保留；
        // NUL 无法出现在 PostgreSQL 文本中，交给服务端报错。
        Flavor::PostgreSQL => {
            for ch in s.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("''"),
                    _ => out.push(ch),
                }
            }
        }
        // 标准 SQL：只需把单引号双写。
        _ => {
            for ch in s.chars() {
                if ch == '\'' {
                    out.push('\'');
                }
                out.push(ch);
            }
        }
    }
    out.push('\'');
}
