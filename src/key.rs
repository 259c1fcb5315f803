//! 条件键的词法解析：一次性把 `#col.path[op]` 解析为带类型的 [`ConditionKey`]。

use std::fmt;

/// 条件运算符。无后缀时为 `Eq`，具体 SQL 形式由值的类型决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Between,
    NotBetween,
    Like,
    NotLike,
}

impl Operator {
    /// 由方括号内的后缀解析运算符。
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "!" => Self::Ne,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "<" => Self::Lt,
            "<=" => Self::Le,
            "<>" => Self::Between,
            "><" => Self::NotBetween,
            "~" => Self::Like,
            "!~" => Self::NotLike,
            _ => return None,
        };
        Some(op)
    }

    /// 键中的后缀写法；`Eq` 没有后缀。
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::Eq => None,
            Self::Ne => Some("!"),
            Self::Gt => Some(">"),
            Self::Ge => Some(">="),
            Self::Lt => Some("<"),
            Self::Le => Some("<="),
            Self::Between => Some("<>"),
            Self::NotBetween => Some("><"),
            Self::Like => Some("~"),
            Self::NotLike => Some("!~"),
        }
    }
}

/// 同组片段之间的连接词。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conjunctor {
    #[default]
    And,
    Or,
}

impl Conjunctor {
    /// 识别逻辑分组键：`AND` / `OR`（大小写不敏感），可跟 `空白 + #注释` 用于区分重复键。
    pub fn parse_relation(key: &str) -> Option<Self> {
        let (conjunctor, rest) = if let Some(rest) = strip_prefix_ignore_case(key, "AND") {
            (Self::And, rest)
        } else if let Some(rest) = strip_prefix_ignore_case(key, "OR") {
            (Self::Or, rest)
        } else {
            return None;
        };

        if rest.is_empty() {
            return Some(conjunctor);
        }
        let comment = rest.trim_start();
        if comment.len() < rest.len() && comment.starts_with('#') {
            Some(conjunctor)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// 用于拼接片段的分隔符（两侧带空格）。
    pub(crate) fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

impl fmt::Display for Conjunctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// 键解析失败的原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("empty column path")]
    Empty,
    #[error("invalid character {0:?} in column path")]
    InvalidCharacter(char),
    #[error("column path has an empty segment")]
    EmptySegment,
    #[error("operator suffix is not closed with `]`")]
    UnclosedOperator,
    #[error("unrecognized operator `[{0}]`")]
    UnknownOperator(String),
}

/// 解析后的简单条件键。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionKey<'a> {
    /// `#` 前缀：值可绕过字面量 Quote。
    pub raw: bool,
    pub column: &'a str,
    pub operator: Operator,
}

impl<'a> ConditionKey<'a> {
    pub fn parse(key: &'a str) -> Result<Self, KeyError> {
        let (raw, rest) = match key.strip_prefix('#') {
            Some(rest) => (true, rest),
            None => (false, key),
        };

        let (column, suffix) = match rest.find('[') {
            Some(open) => (&rest[..open], Some(&rest[open + 1..])),
            None => (rest, None),
        };

        if column.is_empty() {
            return Err(KeyError::Empty);
        }
        if let Some(c) = column
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
        {
            return Err(KeyError::InvalidCharacter(c));
        }
        if column.split('.').any(str::is_empty) {
            return Err(KeyError::EmptySegment);
        }

        let operator = match suffix {
            None => Operator::Eq,
            Some(suffix) => {
                let token = suffix
                    .strip_suffix(']')
                    .ok_or(KeyError::UnclosedOperator)?;
                Operator::from_token(token)
                    .ok_or_else(|| KeyError::UnknownOperator(token.to_string()))?
            }
        };

        Ok(Self {
            raw,
            column,
            operator,
        })
    }
}
