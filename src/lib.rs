//! lighthouse：把嵌套条件映射编译为 SQL WHERE 片段与 SELECT 列清单。

pub mod column;
#[cfg(test)]
mod column_tests;
pub mod condition;
pub mod config;
pub mod database;
#[cfg(test)]
mod database_tests;
pub mod flavor;
pub mod key;
pub mod literal;
pub mod macros;
pub mod quote;
pub mod value;

pub use crate::column::{ColumnSpec, check_identifier, compile_columns, quote_column};
pub use crate::condition::{CompileError, Compiler, compile_where, compile_where_with_flavor};
pub use crate::config::{Config, ConfigError, DatabaseType, UnknownOperatorPolicy};
pub use crate::database::{Connector, Database, Driver, DriverError, Error, Outcome};
pub use crate::flavor::{Flavor, default_flavor, set_default_flavor, set_default_flavor_scoped};
pub use crate::key::{ConditionKey, Conjunctor, KeyError, Operator};
pub use crate::literal::{array_literal, is_function_call, normalize_like};
pub use crate::quote::{QuoteFn, QuoteProvider};
pub use crate::value::{ConditionMap, ConditionValue};
