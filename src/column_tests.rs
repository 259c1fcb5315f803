#[cfg(test)]
mod tests {
    use crate::column::{ColumnSpec, check_identifier, compile_columns, quote_column};
    use crate::condition::CompileError;
    use crate::flavor::Flavor;
    use pretty_assertions::assert_eq;

    #[test]
    fn quote_column_paths() {
        let cases = vec![
            ("id", "\"id\""),
            ("user.id", "\"user\".\"id\""),
            ("#created", "\"created\""),
            ("data(JSON)", "\"data\""),
            ("data (JSON) ", "\"data\""),
            ("a..b", "\"a\".\"b\""),
        ];
        for (input, expected) in cases {
            assert_eq!(quote_column(Flavor::PostgreSQL, input), expected, "{input}");
        }
        assert_eq!(quote_column(Flavor::MySQL, "t.c"), "`t`.`c`");
    }

    #[test]
    fn star_passes_through() {
        assert_eq!(
            compile_columns(Flavor::MySQL, &ColumnSpec::from("*")).unwrap(),
            "*"
        );
    }

    #[test]
    fn list_with_alias_keeps_order() {
        let spec = ColumnSpec::from(["id", "name(alias)", "user.email (mail)"]);
        assert_eq!(
            compile_columns(Flavor::PostgreSQL, &spec).unwrap(),
            "\"id\",\"name\" AS \"alias\",\"user\".\"email\" AS \"mail\""
        );

        let spec = ColumnSpec::from(vec!["b", "a"]);
        assert_eq!(compile_columns(Flavor::MySQL, &spec).unwrap(), "`b`,`a`");
    }

    #[test]
    fn single_column_string() {
        assert_eq!(
            compile_columns(Flavor::MySQL, &ColumnSpec::from("name")).unwrap(),
            "`name`"
        );
    }

    #[test]
    fn empty_list_is_rejected() {
        let spec = ColumnSpec::List(Vec::new());
        assert_eq!(
            compile_columns(Flavor::MySQL, &spec),
            Err(CompileError::EmptyColumnList)
        );
    }

    #[test]
    fn empty_path_segments_are_rejected() {
        let cases = vec![
            (vec!["."], "."),
            (vec!["id", "a..b"], "a..b"),
            (vec![".(x)"], "."),
            (vec!["t.(x)"], "t."),
            (vec![""], ""),
            (vec!["#(JSON)"], "#(JSON)"),
        ];
        for (columns, bad) in cases {
            assert_eq!(
                compile_columns(Flavor::MySQL, &ColumnSpec::from(columns)),
                Err(CompileError::MalformedIdentifier(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn check_identifier_accepts_markers() {
        for name in ["id", "#user.id", "data (JSON)", "a.b.c"] {
            assert_eq!(check_identifier(name), Ok(()), "{name}");
        }
        assert!(check_identifier("a. .b").is_err());
    }
}
