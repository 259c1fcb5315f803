//! 宏集合：用 `key => value` 的字面写法构造条件映射。

/// 构造 [`ConditionMap`](crate::ConditionMap)，保持书写顺序。
///
/// ```
/// use lighthouse::{Compiler, Flavor, conditions};
///
/// let map = conditions! {
///     "id[>]" => 10,
///     "OR" => conditions! { "name[~]" => "bob", "email" => () },
/// };
/// let sql = Compiler::new(Flavor::MySQL).compile_where(&map).unwrap();
/// assert_eq!(sql, "`id` > 10 AND (`name` LIKE '%bob%' OR `email` IS NULL)");
/// ```
#[macro_export]
macro_rules! conditions {
    () => {
        $crate::ConditionMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ConditionMap::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}
