//! Database：把编译好的 SQL 交给外部驱动执行，并记录语句日志。

use crate::column::{ColumnSpec, check_identifier};
use crate::condition::{CompileError, Compiler};
use crate::config::{Config, ConfigError};
use crate::quote::QuoteProvider;
use crate::value::ConditionMap;

/// 驱动错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("driver error: {0}")]
pub struct DriverError(pub String);

/// 外部驱动：负责执行 SQL 以及提供字面量 Quote。
pub trait Driver {
    type Rows;

    fn query(&mut self, sql: &str) -> Result<Self::Rows, DriverError>;

    /// 执行语句，返回受影响行数。
    fn exec(&mut self, sql: &str) -> Result<u64, DriverError>;

    fn quoter(&self) -> Box<dyn QuoteProvider>;
}

/// 按连接串与凭据建立驱动。
pub trait Connector {
    type Driver: Driver;

    fn connect(
        &self,
        dsn: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self::Driver, DriverError>;
}

impl<D, F> Connector for F
where
    D: Driver,
    F: Fn(&str, Option<&str>, Option<&str>) -> Result<D, DriverError>,
{
    type Driver = D;

    fn connect(
        &self,
        dsn: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<D, DriverError> {
        self(dsn, username, password)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// 语句的执行结果；调试模式下语句不会执行，只返回 SQL 文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Executed(T),
    Debug(String),
}

impl<T> Outcome<T> {
    pub fn executed(self) -> Option<T> {
        match self {
            Self::Executed(v) => Some(v),
            Self::Debug(_) => None,
        }
    }
}

pub struct Database<D: Driver> {
    driver: D,
    config: Config,
    compiler: Compiler,
    logs: Vec<String>,
    debug_mode: bool,
}

impl<D: Driver> Database<D> {
    /// 用配置组装的连接串建立驱动，并执行配置要求的初始化语句。
    pub fn open<C>(config: Config, connector: &C) -> Result<Self, Error>
    where
        C: Connector<Driver = D>,
    {
        let dsn = config.dsn()?;
        let (username, password) = config.login();
        tracing::debug!(dsn = %dsn, "connecting");
        let mut driver = connector.connect(&dsn, username, password)?;
        for command in config.init_commands() {
            tracing::debug!(sql = %command, "init command");
            driver.exec(&command)?;
        }
        let compiler = Compiler::new(config.flavor())
            .with_boxed_quoter(driver.quoter())
            .unknown_operator(config.unknown_operator);
        Ok(Self {
            driver,
            config,
            compiler,
            logs: Vec::new(),
            debug_mode: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// 下一条语句只输出不执行。
    pub fn debug(&mut self) -> &mut Self {
        self.debug_mode = true;
        self
    }

    fn intercept(&mut self, sql: &str) -> Option<String> {
        if !self.debug_mode {
            self.logs.push(sql.to_string());
            return None;
        }
        self.debug_mode = false;
        tracing::info!(sql = %sql, "debug statement");
        Some(sql.to_string())
    }

    pub fn query(&mut self, sql: &str) -> Result<Outcome<D::Rows>, Error> {
        if let Some(sql) = self.intercept(sql) {
            return Ok(Outcome::Debug(sql));
        }
        tracing::debug!(sql = %sql, "query");
        Ok(Outcome::Executed(self.driver.query(sql)?))
    }

    pub fn exec(&mut self, sql: &str) -> Result<Outcome<u64>, Error> {
        if let Some(sql) = self.intercept(sql) {
            return Ok(Outcome::Debug(sql));
        }
        tracing::debug!(sql = %sql, "exec");
        Ok(Outcome::Executed(self.driver.exec(sql)?))
    }

    pub fn quote(&self, value: &str) -> String {
        self.compiler.quoter().quote_literal(value)
    }

    /// 加上前缀并 Quote 后的表名。
    pub fn table_name(&self, table: &str) -> Result<String, CompileError> {
        check_identifier(table)?;
        let name = format!("{}{}", self.config.prefix, table);
        check_identifier(&name)?;
        Ok(self.compiler.quote_column(&name))
    }

    /// 拼出完整的 SELECT；条件为空时省略 WHERE。
    pub fn select_sql(
        &self,
        table: &str,
        columns: &ColumnSpec,
        conditions: Option<&ConditionMap>,
    ) -> Result<String, CompileError> {
        let columns = self.compiler.compile_columns(columns)?;
        let mut sql = format!("SELECT {columns} FROM {}", self.table_name(table)?);
        if let Some(conditions) = conditions {
            let where_sql = self.compiler.compile_where(conditions)?;
            if !where_sql.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&where_sql);
            }
        }
        Ok(sql)
    }

    pub fn select(
        &mut self,
        table: &str,
        columns: impl Into<ColumnSpec>,
        conditions: Option<&ConditionMap>,
    ) -> Result<Outcome<D::Rows>, Error> {
        let sql = self.select_sql(table, &columns.into(), conditions)?;
        self.query(&sql)
    }

    /// 已执行语句的日志（不含调试模式下拦截的语句与初始化语句）。
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn last_query(&self) -> Option<&str> {
        self.logs.last().map(String::as_str)
    }
}
