//! 条件值与条件映射。

/// 条件值：与条件映射互相递归的标签联合。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConditionValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ConditionValue>),
    Map(ConditionMap),
}

impl ConditionValue {
    /// 值的类型名，用于错误信息。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// 将 `Option<T>` 映射为条件值：`None => Null`。
    pub fn from_option<T: Into<ConditionValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<()> for ConditionValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for ConditionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ConditionValue {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for ConditionValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for ConditionValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for ConditionValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ConditionValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<ConditionValue>> From<Option<T>> for ConditionValue {
    fn from(v: Option<T>) -> Self {
        Self::from_option(v)
    }
}

impl<T: Into<ConditionValue>> From<Vec<T>> for ConditionValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConditionValue>, const N: usize> From<[T; N]> for ConditionValue {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<ConditionMap> for ConditionValue {
    fn from(v: ConditionMap) -> Self {
        Self::Map(v)
    }
}

impl From<time::PrimitiveDateTime> for ConditionValue {
    fn from(v: time::PrimitiveDateTime) -> Self {
        Self::String(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            v.year(),
            u8::from(v.month()),
            v.day(),
            v.hour(),
            v.minute(),
            v.second()
        ))
    }
}

/// 带时区的时间按其本地时刻渲染，偏移量不写入字面量。
impl From<time::OffsetDateTime> for ConditionValue {
    fn from(v: time::OffsetDateTime) -> Self {
        time::PrimitiveDateTime::new(v.date(), v.time()).into()
    }
}

/// 有序条件映射：一组 AND/OR 条件，插入顺序即片段输出顺序。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionMap {
    entries: Vec<(String, ConditionValue)>,
}

impl ConditionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由若干子映射构造顺序分组（键为 `"0".."n-1"`）。
    pub fn sequence(maps: impl IntoIterator<Item = ConditionMap>) -> Self {
        maps.into_iter()
            .enumerate()
            .map(|(i, m)| (i.to_string(), ConditionValue::Map(m)))
            .collect()
    }

    /// 插入条件；键已存在时原位替换值，保持最初的位置。
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConditionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 链式版本的 [`ConditionMap::insert`]。
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConditionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 键是否恰好依次为 `"0", "1", ..., "n-1"`。
    pub fn is_sequential(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (k, _))| *k == i.to_string())
    }
}

impl<K: Into<String>, V: Into<ConditionValue>> FromIterator<(K, V)> for ConditionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ConditionMap {
    type Item = (String, ConditionValue);
    type IntoIter = std::vec::IntoIter<(String, ConditionValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
