// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt::Debug, sync::Arc};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    error::BuilderError,
    format::Formatter,
    tree::Assemble,
    value::{SqlValue, quote_string},
};

/// How the text of a [`ExpressionKind::Text`] expression is turned into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionType {
    /// Rendered as-is (raw SQL). Never replaced by a placeholder.
    Default,
    /// Single-quoted, with every embedded quote doubled
    StringConstant,
    /// `$tag$...$tag$`
    DollarString { tag: String },
    /// Dot-separated name. `quoted: None` defers to [`RenderConfig::quote_identifiers`](crate::RenderConfig).
    ColumnReference { quoted: Option<bool> },
    /// Dot-separated name, never quoted (e.g. `(composite).field` selections)
    FieldSelection,
}

/// A sub-statement embedded in an expression (`(SELECT ...)`). It is assembled into its own tree
/// when the enclosing statement is rendered.
pub type SubQuery = Arc<dyn Assemble + Send + Sync>;

#[derive(Clone)]
pub enum ExpressionKind {
    Text { text: String, typ: ExpressionType },
    /// A preparable constant
    Value(SqlValue),
    /// `(e1, e2, ...)`
    List(Vec<Expression>),
    /// `ARRAY[e1, e2, ...]`
    Array(Vec<Expression>),
    /// `NAME(args)`
    Function { name: String, args: Vec<Expression> },
    /// `(<statement>)`
    SubQuery(SubQuery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub columns: Vec<String>,
}

/// A leaf that knows how to render itself, with optional `::type` cast and `AS alias` suffixes.
#[derive(Clone)]
pub struct Expression {
    kind: ExpressionKind,
    cast: Option<String>,
    alias: Option<Alias>,
}

impl Expression {
    fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            cast: None,
            alias: None,
        }
    }

    fn text(text: impl Into<String>, typ: ExpressionType) -> Self {
        Self::new(ExpressionKind::Text {
            text: text.into(),
            typ,
        })
    }

    /// Raw SQL, rendered verbatim
    pub fn raw(text: impl Into<String>) -> Self {
        Self::text(text, ExpressionType::Default)
    }

    /// An inline string constant (never turned into a parameter; use [`Expression::value`] for that)
    pub fn string(text: impl Into<String>) -> Self {
        Self::text(text, ExpressionType::StringConstant)
    }

    pub fn dollar_string(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::text(text, ExpressionType::DollarString { tag: tag.into() })
    }

    /// A (possibly qualified) column, quoted according to the render configuration
    pub fn column(name: impl Into<String>) -> Self {
        Self::text(name, ExpressionType::ColumnReference { quoted: None })
    }

    pub fn quoted_column(name: impl Into<String>) -> Self {
        Self::text(name, ExpressionType::ColumnReference { quoted: Some(true) })
    }

    pub fn unquoted_column(name: impl Into<String>) -> Self {
        Self::text(name, ExpressionType::ColumnReference { quoted: Some(false) })
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::text(name, ExpressionType::FieldSelection)
    }

    /// A preparable constant
    pub fn value(value: impl Into<SqlValue>) -> Self {
        Self::new(ExpressionKind::Value(value.into()))
    }

    pub fn list<E: Into<Expression>>(elems: impl IntoIterator<Item = E>) -> Self {
        Self::new(ExpressionKind::List(
            elems.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn array<E: Into<Expression>>(elems: impl IntoIterator<Item = E>) -> Self {
        Self::new(ExpressionKind::Array(
            elems.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn function<E: Into<Expression>>(
        name: impl Into<String>,
        args: impl IntoIterator<Item = E>,
    ) -> Self {
        Self::new(ExpressionKind::Function {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    pub fn subquery(statement: impl Assemble + Send + Sync + 'static) -> Self {
        Self::new(ExpressionKind::SubQuery(Arc::new(statement)))
    }

    pub fn shared_subquery(statement: SubQuery) -> Self {
        Self::new(ExpressionKind::SubQuery(statement))
    }

    /// Append a `::typ` cast
    pub fn cast(mut self, typ: impl Into<String>) -> Self {
        self.cast = Some(typ.into());
        self
    }

    /// Append `AS name`
    pub fn alias(self, name: impl Into<String>) -> Self {
        self.alias_with_columns(name, Vec::<String>::new())
    }

    /// Append `AS name(col1, col2, ...)`
    pub fn alias_with_columns<C: Into<String>>(
        mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        self.alias = Some(Alias {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    pub fn get_cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn get_alias(&self) -> Option<&Alias> {
        self.alias.as_ref()
    }

    /// The token name: the text for textual expressions, the function name for calls, and a
    /// fixed label for the other composites.
    pub fn name(&self) -> &str {
        match &self.kind {
            ExpressionKind::Text { text, .. } => text,
            ExpressionKind::Value(_) => "?",
            ExpressionKind::List(_) => "LIST",
            ExpressionKind::Array(_) => "ARRAY",
            ExpressionKind::Function { name, .. } => name,
            ExpressionKind::SubQuery(_) => "SUBQUERY",
        }
    }

    /// Whether this expression may be replaced by a placeholder when preparing a statement
    pub fn is_preparable(&self) -> bool {
        matches!(&self.kind, ExpressionKind::Value(value) if value.is_preparable())
    }

    fn is_values_call(&self) -> bool {
        matches!(&self.kind, ExpressionKind::Function { name, .. } if name.eq_ignore_ascii_case("VALUES"))
    }

    /// Lists and subqueries carry their own parentheses, so a call with one such argument doesn't
    /// add another pair.
    fn is_self_parenthesized(&self) -> bool {
        self.cast.is_none()
            && self.alias.is_none()
            && matches!(
                &self.kind,
                ExpressionKind::List(_) | ExpressionKind::SubQuery(_)
            )
    }

    pub(crate) fn render(&self, formatter: &mut Formatter) -> Result<String, BuilderError> {
        let mut rendered = match &self.kind {
            ExpressionKind::Text { text, typ } => render_text(text, typ, formatter),
            ExpressionKind::Value(value) => formatter.push_value(value),
            ExpressionKind::List(elems) => format!("({})", render_all(elems, formatter)?),
            ExpressionKind::Array(elems) => format!("ARRAY[{}]", render_all(elems, formatter)?),
            ExpressionKind::Function { name, args } => {
                if self.is_values_call() {
                    let rows = args
                        .iter()
                        .map(|arg| {
                            let rendered = arg.render(formatter)?;
                            Ok::<_, BuilderError>(if arg.is_self_parenthesized() {
                                rendered
                            } else {
                                format!("({rendered})")
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    let values = format!("{name}{}", rows.join(", "));
                    if self.alias.is_some() {
                        format!("({values})")
                    } else {
                        values
                    }
                } else {
                    match args.as_slice() {
                        [arg] if arg.is_self_parenthesized() => {
                            format!("{name}{}", arg.render(formatter)?)
                        }
                        _ => format!("{name}({})", render_all(args, formatter)?),
                    }
                }
            }
            ExpressionKind::SubQuery(statement) => {
                format!("({})", formatter.render_statement(statement.as_ref())?)
            }
        };

        if let Some(cast) = &self.cast {
            rendered.push_str("::");
            rendered.push_str(cast);
        }

        if let Some(Alias { name, columns }) = &self.alias {
            rendered.push_str(" AS ");
            rendered.push_str(name);
            if !columns.is_empty() {
                rendered.push('(');
                rendered.push_str(&columns.join(", "));
                rendered.push(')');
            }
        }

        Ok(rendered)
    }
}

fn render_all(elems: &[Expression], formatter: &mut Formatter) -> Result<String, BuilderError> {
    Ok(elems
        .iter()
        .map(|elem| elem.render(formatter))
        .collect::<Result<Vec<_>, _>>()?
        .join(", "))
}

fn render_text(text: &str, typ: &ExpressionType, formatter: &Formatter) -> String {
    match typ {
        ExpressionType::Default => text.to_string(),
        ExpressionType::StringConstant => quote_string(text),
        ExpressionType::DollarString { tag } => format!("${tag}${text}${tag}$"),
        ExpressionType::ColumnReference { quoted } => qualified_name(
            text,
            quoted.unwrap_or(formatter.config().quote_identifiers),
        ),
        ExpressionType::FieldSelection => qualified_name(text, false),
    }
}

/// Split a dotted name and rejoin it, optionally double-quoting every segment. An empty segment
/// (`a..b`, `.a`, `a.`) is logged and kept as-is.
fn qualified_name(name: &str, quoted: bool) -> String {
    name.split('.')
        .enumerate()
        .map(|(index, segment)| {
            if segment.is_empty() {
                tracing::warn!(name, index, "Empty segment in qualified name");
            }
            if quoted && segment != "*" {
                format!("\"{}\"", segment.replace('"', "\"\""))
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Expression");
        match &self.kind {
            ExpressionKind::Text { text, typ } => debug.field("text", text).field("type", typ),
            ExpressionKind::Value(value) => debug.field("value", value),
            ExpressionKind::List(elems) => debug.field("list", elems),
            ExpressionKind::Array(elems) => debug.field("array", elems),
            ExpressionKind::Function { name, args } => {
                debug.field("function", name).field("args", args)
            }
            ExpressionKind::SubQuery(_) => debug.field("subquery", &".."),
        };
        debug
            .field("cast", &self.cast)
            .field("alias", &self.alias)
            .finish()
    }
}

/// Bare strings are raw SQL (typically column names or expressions)
impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Expression::raw(text)
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Expression::raw(text)
    }
}

macro_rules! value_expression {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::value(value)
                }
            }
        )*
    };
}

value_expression!(
    SqlValue,
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    Bytes,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    Uuid,
    serde_json::Value,
);

/// `(v1, v2, ...)` of preparable constants
pub fn as_list<V: Into<SqlValue>>(values: impl IntoIterator<Item = V>) -> Expression {
    Expression::list(values.into_iter().map(Expression::value))
}

/// `ARRAY[v1, v2, ...]` of preparable constants
pub fn as_array<V: Into<SqlValue>>(values: impl IntoIterator<Item = V>) -> Expression {
    Expression::array(values.into_iter().map(Expression::value))
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::{
        config::{PlaceholderStyle, RenderConfig},
        format::Mode,
    };

    fn literal(expression: &Expression) -> String {
        let config = RenderConfig::default();
        let mut formatter = Formatter::new(Mode::Literal, &config);
        expression.render(&mut formatter).unwrap()
    }

    fn prepared(expression: &Expression) -> (String, Vec<SqlValue>) {
        let config = RenderConfig::new(PlaceholderStyle::Numbered, false);
        let mut formatter = Formatter::new(Mode::Prepared, &config);
        let sql = expression.render(&mut formatter).unwrap();
        (sql, formatter.into_params())
    }

    #[multiplatform_test]
    fn text_types() {
        assert_eq!(literal(&Expression::raw("now()")), "now()");
        assert_eq!(literal(&Expression::string("I'm Timur")), "'I''m Timur'");
        assert_eq!(
            literal(&Expression::dollar_string("it's", "")),
            "$$it's$$"
        );
        assert_eq!(
            literal(&Expression::dollar_string("body", "fn")),
            "$fn$body$fn$"
        );
        assert_eq!(literal(&Expression::field("item.price")), "item.price");
    }

    #[multiplatform_test]
    fn column_references() {
        assert_eq!(literal(&Expression::column("users.id")), "users.id");
        assert_eq!(
            literal(&Expression::quoted_column("public.users.id")),
            r#""public"."users"."id""#
        );
        assert_eq!(literal(&Expression::quoted_column("u.*")), r#""u".*"#);
        assert_eq!(
            literal(&Expression::quoted_column(r#"we"ird"#)),
            r#""we""ird""#
        );

        let config = RenderConfig::new(PlaceholderStyle::Question, true);
        let mut formatter = Formatter::new(Mode::Literal, &config);
        assert_eq!(
            Expression::column("users.id").render(&mut formatter).unwrap(),
            r#""users"."id""#
        );
        assert_eq!(
            Expression::unquoted_column("users.id")
                .render(&mut formatter)
                .unwrap(),
            "users.id"
        );
    }

    #[test_log::test]
    fn empty_segment_is_kept() {
        assert_eq!(literal(&Expression::column("users..id")), "users..id");
        assert_eq!(
            literal(&Expression::quoted_column(".id")),
            r#"""."id""#
        );
    }

    #[multiplatform_test]
    fn lists_and_arrays() {
        assert_eq!(literal(&as_list([1, 2, 3])), "(1, 2, 3)");
        assert_eq!(literal(&as_array([1, 2, 3])), "ARRAY[1, 2, 3]");
        assert_eq!(literal(&as_list(["a", "b"])), "('a', 'b')");

        let (sql, params) = prepared(&as_array([1, 2, 3]));
        assert_eq!(sql, "ARRAY[$1, $2, $3]");
        assert_eq!(
            params,
            vec![SqlValue::Int32(1), SqlValue::Int32(2), SqlValue::Int32(3)]
        );
    }

    #[multiplatform_test]
    fn functions() {
        assert_eq!(
            literal(&Expression::function("coalesce", ["a", "b"])),
            "coalesce(a, b)"
        );
        assert_eq!(
            literal(&Expression::function("now", Vec::<Expression>::new())),
            "now()"
        );
        assert_eq!(
            literal(&Expression::function("ANY", [as_array([1, 2])])),
            "ANY(ARRAY[1, 2])"
        );
        assert_eq!(
            literal(&Expression::function("f", [as_list([1, 2])])),
            "f(1, 2)"
        );
    }

    #[multiplatform_test]
    fn values_call() {
        let values = Expression::function("VALUES", [as_list([1, 2]), as_list([3, 4])]);
        assert_eq!(literal(&values), "VALUES(1, 2), (3, 4)");

        let aliased = values.alias_with_columns("t", ["a", "b"]);
        assert_eq!(literal(&aliased), "(VALUES(1, 2), (3, 4)) AS t(a, b)");
    }

    #[multiplatform_test]
    fn cast_and_alias() {
        assert_eq!(
            literal(&Expression::value(5).cast("bigint").alias("n")),
            "5::bigint AS n"
        );
        assert_eq!(
            literal(&Expression::string("{}").cast("jsonb")),
            "'{}'::jsonb"
        );

        let (sql, params) = prepared(&Expression::value("x").cast("text").alias("label"));
        assert_eq!(sql, "$1::text AS label");
        assert_eq!(params, vec![SqlValue::Text("x".to_string())]);
    }

    #[multiplatform_test]
    fn raw_and_null_never_prepared() {
        let (sql, params) = prepared(&Expression::list([
            Expression::raw("DEFAULT"),
            Expression::value(SqlValue::Null),
            Expression::string("inline"),
            Expression::value(7),
        ]));
        assert_eq!(sql, "(DEFAULT, NULL, 'inline', $1)");
        assert_eq!(params, vec![SqlValue::Int32(7)]);
    }
}
