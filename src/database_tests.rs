#[cfg(test)]
mod tests {
    use crate::column::ColumnSpec;
    use crate::condition::CompileError;
    use crate::conditions;
    use crate::config::{Config, ConfigError, DatabaseType, UnknownOperatorPolicy};
    use crate::database::{Database, Driver, DriverError, Error, Outcome};
    use crate::flavor::Flavor;
    use crate::quote::QuoteProvider;
    use crate::value::ConditionMap;
    use pretty_assertions::assert_eq;

    /// 记录连接参数与所有收到的语句。
    #[derive(Debug, Default)]
    struct RecordingDriver {
        dsn: String,
        login: (Option<String>, Option<String>),
        statements: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl Driver for RecordingDriver {
        type Rows = Vec<String>;

        fn query(&mut self, sql: &str) -> Result<Self::Rows, DriverError> {
            self.statements.push(sql.to_string());
            Ok(vec![sql.to_string()])
        }

        fn exec(&mut self, sql: &str) -> Result<u64, DriverError> {
            if self.fail_on == Some(sql) {
                return Err(DriverError(format!("rejected {sql}")));
            }
            self.statements.push(sql.to_string());
            Ok(1)
        }

        fn quoter(&self) -> Box<dyn QuoteProvider> {
            Box::new(Flavor::SQLite)
        }
    }

    fn connect(
        dsn: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<RecordingDriver, DriverError> {
        Ok(RecordingDriver {
            dsn: dsn.to_string(),
            login: (username.map(String::from), password.map(String::from)),
            ..Default::default()
        })
    }

    fn sqlite() -> Config {
        Config::new(DatabaseType::SQLite).database_file("app.db")
    }

    fn pgsql() -> Config {
        Config::new(DatabaseType::PostgreSQL)
            .server("db")
            .database_name("app")
    }

    fn open(config: Config) -> Database<RecordingDriver> {
        Database::open(config, &connect).unwrap()
    }

    #[test]
    fn open_passes_dsn_and_login_to_connector() {
        let db = open(pgsql().credentials("root", "secret"));
        assert_eq!(db.driver().dsn, "pgsql:host=db;dbname=app");
        assert_eq!(
            db.driver().login,
            (Some("root".to_string()), Some("secret".to_string()))
        );

        let db = open(sqlite().credentials("root", "secret"));
        assert_eq!(db.driver().dsn, "sqlite:app.db");
        assert_eq!(db.driver().login, (None, None));
    }

    #[test]
    fn open_rejects_incomplete_config() {
        let err = Database::open(Config::new(DatabaseType::MySQL).server("db"), &connect)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField {
                database_type: DatabaseType::MySQL,
                field: "database_name",
            })
        ));
    }

    #[test]
    fn open_propagates_connect_error() {
        let refuse = |dsn: &str,
                      _: Option<&str>,
                      _: Option<&str>|
         -> Result<RecordingDriver, DriverError> {
            Err(DriverError(format!("cannot reach {dsn}")))
        };
        let err = Database::open(sqlite(), &refuse).err().unwrap();
        assert_eq!(err.to_string(), "driver error: cannot reach sqlite:app.db");
    }

    #[test]
    fn open_runs_init_commands() {
        let cfg = Config::new(DatabaseType::MySQL)
            .server("db")
            .database_name("app")
            .charset("utf8");
        let db = open(cfg);
        assert_eq!(
            db.driver().statements,
            vec!["SET SQL_MODE=ANSI_QUOTES", "SET NAMES 'utf8'"]
        );
        assert!(db.logs().is_empty());
        assert_eq!(db.compiler().flavor(), Flavor::MySQL);
    }

    #[test]
    fn open_propagates_init_command_error() {
        let failing = |dsn: &str,
                       user: Option<&str>,
                       pass: Option<&str>|
         -> Result<RecordingDriver, DriverError> {
            let mut driver = connect(dsn, user, pass)?;
            driver.fail_on = Some("SET QUOTED_IDENTIFIER ON");
            Ok(driver)
        };
        let cfg = Config::new(DatabaseType::MSSQL)
            .server("sql")
            .database_name("app");
        let err = Database::open(cfg, &failing).err().unwrap();
        assert!(matches!(err, Error::Driver(_)));
        assert_eq!(
            err.to_string(),
            "driver error: rejected SET QUOTED_IDENTIFIER ON"
        );
    }

    #[test]
    fn query_and_exec_are_logged() {
        let mut db = open(sqlite());
        let rows = db.query("SELECT 1").unwrap();
        assert_eq!(rows, Outcome::Executed(vec!["SELECT 1".to_string()]));
        assert_eq!(db.exec("DELETE FROM t").unwrap().executed(), Some(1));
        assert_eq!(db.logs(), ["SELECT 1", "DELETE FROM t"]);
        assert_eq!(db.last_query(), Some("DELETE FROM t"));
    }

    #[test]
    fn debug_mode_skips_one_statement() {
        let mut db = open(sqlite());
        let out = db.debug().query("SELECT 2").unwrap();
        assert_eq!(out, Outcome::Debug("SELECT 2".to_string()));
        assert!(db.driver().statements.is_empty());
        assert!(db.logs().is_empty());

        assert_eq!(db.exec("DELETE FROM t").unwrap(), Outcome::Executed(1));
        assert_eq!(db.logs(), ["DELETE FROM t"]);
    }

    #[test]
    fn quote_uses_driver_quoter() {
        let db = open(pgsql());
        assert_eq!(db.quote("it's"), "'it''s'");
    }

    #[test]
    fn select_sql_with_prefix_and_where() {
        let db = open(pgsql().prefix("app_"));
        let map = conditions! {
            "age[>]" => 18,
            "name[~]" => "bob",
        };
        let sql = db
            .select_sql("users", &ColumnSpec::from(["id", "name(n)"]), Some(&map))
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"id\",\"name\" AS \"n\" FROM \"app_users\" WHERE \"age\" > 18 AND \"name\" LIKE '%bob%'"
        );
    }

    #[test]
    fn select_omits_empty_where() {
        let mut db = open(sqlite());
        let out = db.select("t", "*", Some(&ConditionMap::new())).unwrap();
        assert_eq!(
            out.executed(),
            Some(vec!["SELECT * FROM \"t\"".to_string()])
        );
        assert_eq!(db.last_query(), Some("SELECT * FROM \"t\""));
    }

    #[test]
    fn empty_table_name_is_rejected() {
        let db = open(sqlite().prefix("app_"));
        assert_eq!(
            db.select_sql("", &ColumnSpec::All, None),
            Err(CompileError::MalformedIdentifier(String::new()))
        );
        assert_eq!(
            db.table_name("main..t"),
            Err(CompileError::MalformedIdentifier("main..t".into()))
        );
        assert_eq!(db.table_name("users").unwrap(), "\"app_users\"");
    }

    #[test]
    fn select_respects_unknown_operator_policy() {
        let map = conditions! { "a[?]" => 1, "b" => 2 };

        let mut strict = open(sqlite());
        let err = strict.select("t", "*", Some(&map)).unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
        assert!(strict.logs().is_empty());

        let lenient = open(sqlite().unknown_operator(UnknownOperatorPolicy::Skip));
        let sql = lenient.select_sql("t", &"*".into(), Some(&map)).unwrap();
        assert_eq!(sql, "SELECT * FROM \"t\" WHERE \"b\" = 2");
    }
}
