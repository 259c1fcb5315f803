//! 连接配置：显式列出可识别的字段，推导方言、DSN 与连接后的初始化语句。

use crate::flavor::Flavor;
use std::fmt;
use std::str::FromStr;

/// 遇到无法识别的运算符后缀时的处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOperatorPolicy {
    /// 返回 `CompileError::MalformedKey`。
    #[default]
    Reject,
    /// 兼容模式：丢弃该条件并记录一条 warn 日志。
    Skip,
}

/// 数据库类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseType {
    MySQL,
    MariaDB,
    PostgreSQL,
    Sybase,
    Oracle,
    MSSQL,
    SQLite,
}

impl DatabaseType {
    pub fn flavor(self) -> Flavor {
        match self {
            Self::MySQL | Self::MariaDB => Flavor::MySQL,
            Self::PostgreSQL => Flavor::PostgreSQL,
            Self::Sybase => Flavor::Sybase,
            Self::Oracle => Flavor::Oracle,
            Self::MSSQL => Flavor::SQLServer,
            Self::SQLite => Flavor::SQLite,
        }
    }

    fn supports_set_names(self) -> bool {
        matches!(
            self,
            Self::MySQL | Self::MariaDB | Self::PostgreSQL | Self::Sybase | Self::MSSQL
        )
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "mysql",
            Self::MariaDB => "mariadb",
            Self::PostgreSQL => "pgsql",
            Self::Sybase => "sybase",
            Self::Oracle => "oracle",
            Self::MSSQL => "mssql",
            Self::SQLite => "sqlite",
        };
        f.write_str(s)
    }
}

impl FromStr for DatabaseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.to_ascii_lowercase().as_str() {
            "mysql" => Self::MySQL,
            "mariadb" => Self::MariaDB,
            "pgsql" | "postgres" | "postgresql" => Self::PostgreSQL,
            "sybase" => Self::Sybase,
            "oracle" => Self::Oracle,
            "mssql" => Self::MSSQL,
            "sqlite" => Self::SQLite,
            _ => return Err(ConfigError::UnknownDatabaseType(s.to_string())),
        };
        Ok(ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown database type `{0}`")]
    UnknownDatabaseType(String),
    #[error("{database_type} connection requires `{field}`")]
    MissingField {
        database_type: DatabaseType,
        field: &'static str,
    },
}

/// 连接配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_type: DatabaseType,
    pub database_name: Option<String>,
    pub server: Option<String>,
    pub port: Option<u16>,
    /// MySQL / MariaDB 的 unix socket，优先于 `server`。
    pub socket: Option<String>,
    /// SQLite 数据库文件。
    pub database_file: Option<String>,
    pub charset: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 表名前缀。
    pub prefix: String,
    pub unknown_operator: UnknownOperatorPolicy,
}

impl Config {
    pub fn new(database_type: DatabaseType) -> Self {
        Self {
            database_type,
            database_name: None,
            server: None,
            port: None,
            socket: None,
            database_file: None,
            charset: None,
            username: None,
            password: None,
            prefix: String::new(),
            unknown_operator: UnknownOperatorPolicy::default(),
        }
    }

    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = Some(name.into());
        self
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    pub fn database_file(mut self, file: impl Into<String>) -> Self {
        self.database_file = Some(file.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn unknown_operator(mut self, policy: UnknownOperatorPolicy) -> Self {
        self.unknown_operator = policy;
        self
    }

    pub fn flavor(&self) -> Flavor {
        self.database_type.flavor()
    }

    /// 实际用于登录的用户名与密码；SQLite 不需要凭据。
    pub fn login(&self) -> (Option<&str>, Option<&str>) {
        match self.database_type {
            DatabaseType::SQLite => (None, None),
            _ => (self.username.as_deref(), self.password.as_deref()),
        }
    }

    fn require<'a>(
        &self,
        value: &'a Option<String>,
        field: &'static str,
    ) -> Result<&'a str, ConfigError> {
        value.as_deref().ok_or(ConfigError::MissingField {
            database_type: self.database_type,
            field,
        })
    }

    /// 组装驱动连接串。
    pub fn dsn(&self) -> Result<String, ConfigError> {
        let dsn = match self.database_type {
            DatabaseType::MySQL | DatabaseType::MariaDB => {
                let dbname = self.require(&self.database_name, "database_name")?;
                match &self.socket {
                    Some(socket) => format!("mysql:unix_socket={socket};dbname={dbname}"),
                    None => {
                        let server = self.require(&self.server, "server")?;
                        let port = self.port_part(";port=");
                        format!("mysql:host={server}{port};dbname={dbname}")
                    }
                }
            }
            DatabaseType::PostgreSQL => {
                let dbname = self.require(&self.database_name, "database_name")?;
                let server = self.require(&self.server, "server")?;
                let port = self.port_part(";port=");
                format!("pgsql:host={server}{port};dbname={dbname}")
            }
            DatabaseType::Sybase => self.dblib_dsn()?,
            DatabaseType::Oracle => {
                let dbname = self.require(&self.database_name, "database_name")?;
                let target = match &self.server {
                    Some(server) => {
                        let port = self.port.unwrap_or(1521);
                        format!("//{server}:{port}/{dbname}")
                    }
                    None => dbname.to_string(),
                };
                let charset = self
                    .charset
                    .as_deref()
                    .map(|c| format!(";charset={c}"))
                    .unwrap_or_default();
                format!("oci:dbname={target}{charset}")
            }
            DatabaseType::MSSQL => {
                if cfg!(windows) {
                    let dbname = self.require(&self.database_name, "database_name")?;
                    let server = self.require(&self.server, "server")?;
                    let port = self.port_part(",");
                    format!("sqlsrv:server={server}{port};database={dbname}")
                } else {
                    self.dblib_dsn()?
                }
            }
            DatabaseType::SQLite => {
                let file = self.require(&self.database_file, "database_file")?;
                format!("sqlite:{file}")
            }
        };
        Ok(dsn)
    }

    fn dblib_dsn(&self) -> Result<String, ConfigError> {
        let dbname = self.require(&self.database_name, "database_name")?;
        let server = self.require(&self.server, "server")?;
        let port = self.port_part(":");
        Ok(format!("dblib:host={server}{port};dbname={dbname}"))
    }

    fn port_part(&self, sep: &str) -> String {
        self.port.map(|p| format!("{sep}{p}")).unwrap_or_default()
    }

    /// 建立连接后需要依次执行的语句。
    pub fn init_commands(&self) -> Vec<String> {
        let mut commands = Vec::new();
        match self.database_type {
            DatabaseType::MySQL | DatabaseType::MariaDB => {
                commands.push("SET SQL_MODE=ANSI_QUOTES".to_string());
            }
            DatabaseType::MSSQL => commands.push("SET QUOTED_IDENTIFIER ON".to_string()),
            _ => {}
        }
        if let Some(charset) = &self.charset
            && self.database_type.supports_set_names()
        {
            commands.push(format!("SET NAMES '{charset}'"));
        }
        commands
    }
}
