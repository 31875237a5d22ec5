// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Postgres binding for statements built with `exo-sqlgen`.
//!
//! [prepare_for_postgres] renders a statement with `$n` placeholders and converts its
//! parameters into `tokio_postgres` [ToSql](tokio_postgres::types::ToSql) values:
//!
//! ```no_run
//! # async fn run(client: &tokio_postgres::Client) -> Result<(), Box<dyn std::error::Error>> {
//! use exo_sqlgen::{Select, condition};
//! use exo_sqlgen_pg::prepare_for_postgres;
//!
//! let select = Select::new().from("concerts").filter(condition("id", "=", 1));
//! let (sql, params) = prepare_for_postgres(&select)?;
//! let rows = client.query(&sql, &params.as_refs()).await?;
//! # Ok(())
//! # }
//! ```

mod array;
mod params;

use exo_sqlgen::{BindError, BuilderError, PlaceholderStyle, RenderConfig, Statement};
use thiserror::Error;

pub use array::{ArrayElement, to_pg_array};
pub use params::{PgParam, PgParams};

#[derive(Error, Debug)]
pub enum PgPrepareError {
    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Render a statement with numbered placeholders (quoting identifiers per `config`) and bind its
/// parameters.
pub fn prepare_with(
    statement: &(impl Statement + ?Sized),
    config: &RenderConfig,
) -> Result<(String, PgParams), PgPrepareError> {
    let config = RenderConfig {
        placeholder_style: PlaceholderStyle::Numbered,
        ..config.clone()
    };
    let (sql, values) = statement.render_prepared_with(&config)?.into_parts();
    let params = PgParams::from_values(&values)?;

    tracing::debug!(%sql, params = params.len(), "Prepared statement for Postgres");
    Ok((sql, params))
}

/// Render a statement with `$n` placeholders and quoted identifiers and bind its parameters.
pub fn prepare_for_postgres(
    statement: &(impl Statement + ?Sized),
) -> Result<(String, PgParams), PgPrepareError> {
    prepare_with(statement, &RenderConfig::postgres())
}

#[cfg(test)]
mod tests {
    use exo_sqlgen::{Expression, Insert, Select, SqlValue, condition, condition_any};
    use tokio_postgres::types::{ToSql, Type};

    use super::*;

    #[test_log::test]
    fn select_with_array_parameter() {
        let select = Select::new()
            .column(Expression::column("title"))
            .from(Expression::column("concerts"))
            .filter(
                condition(Expression::column("year"), ">", 2000).and(condition_any(
                    Expression::column("genre"),
                    "=",
                    Expression::value(vec!["jazz", "blues"]).cast("text[]"),
                )),
            );

        let (sql, params) = prepare_for_postgres(&select).unwrap();

        assert_eq!(
            sql,
            r#"SELECT "title" FROM "concerts" WHERE "year" > $1 AND "genre" = ANY($2::text[])"#
        );
        assert_eq!(params.len(), 2);

        let mut buf = bytes::BytesMut::new();
        assert!(params.as_refs()[1]
            .to_sql_checked(&Type::TEXT_ARRAY, &mut buf)
            .is_ok());
    }

    #[test_log::test]
    fn placeholders_are_always_numbered() {
        let insert = Insert::into("people")
            .columns(["name", "age"])
            .values([Expression::value("Sam"), Expression::value(SqlValue::Int16(5))]);

        let (sql, params) = prepare_with(
            &insert,
            &RenderConfig::new(PlaceholderStyle::Question, false),
        )
        .unwrap();

        assert_eq!(sql, "INSERT INTO people (name, age) VALUES ($1, $2)");
        assert_eq!(params.len(), 2);
    }

    #[test_log::test]
    fn bind_errors_surface() {
        let select = Select::new().filter(condition(
            "tags",
            "=",
            Expression::value(SqlValue::Array(vec![
                SqlValue::Array(vec![SqlValue::Int32(1)]),
                SqlValue::Array(vec![]),
            ])),
        ));

        assert!(matches!(
            prepare_for_postgres(&select),
            Err(PgPrepareError::Bind(BindError { index: 1, .. }))
        ));
    }
}
