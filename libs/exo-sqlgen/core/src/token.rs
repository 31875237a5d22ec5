// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::borrow::Cow;

use crate::{error::BuilderError, expression::Expression, format::Formatter};

/// A leaf of the tree: keyword, operator, or an expression that renders itself.
#[derive(Debug, Clone)]
pub enum Token {
    Keyword(Cow<'static, str>),
    Operator(Cow<'static, str>),
    Expression(Expression),
}

impl Token {
    pub fn keyword(name: impl Into<Cow<'static, str>>) -> Self {
        Token::Keyword(name.into())
    }

    pub fn operator(name: impl Into<Cow<'static, str>>) -> Self {
        Token::Operator(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Token::Keyword(name) | Token::Operator(name) => name,
            Token::Expression(expression) => expression.name(),
        }
    }

    pub(crate) fn render(&self, formatter: &mut Formatter) -> Result<String, BuilderError> {
        match self {
            Token::Keyword(name) | Token::Operator(name) => Ok(name.to_string()),
            Token::Expression(expression) => expression.render(formatter),
        }
    }
}

impl From<Expression> for Token {
    fn from(expression: Expression) -> Self {
        Token::Expression(expression)
    }
}

/// Bare strings are raw SQL leaves
impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Expression(Expression::raw(text))
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Expression(Expression::raw(text))
    }
}

pub mod keyword {
    pub const ALL: &str = "ALL";
    pub const AND: &str = "AND";
    pub const AND_NOT: &str = "AND NOT";
    pub const ANY: &str = "ANY";
    pub const AS: &str = "AS";
    pub const ASC: &str = "ASC";
    pub const BETWEEN: &str = "BETWEEN";
    pub const CROSS_JOIN: &str = "CROSS JOIN";
    pub const DEFAULT_VALUES: &str = "DEFAULT VALUES";
    pub const DELETE_FROM: &str = "DELETE FROM";
    pub const DESC: &str = "DESC";
    pub const DISTINCT: &str = "DISTINCT";
    pub const EXISTS: &str = "EXISTS";
    pub const FROM: &str = "FROM";
    pub const FULL_JOIN: &str = "FULL JOIN";
    pub const GROUP_BY: &str = "GROUP BY";
    pub const HAVING: &str = "HAVING";
    pub const IN: &str = "IN";
    pub const INNER_JOIN: &str = "INNER JOIN";
    pub const INSERT_INTO: &str = "INSERT INTO";
    pub const IS_NOT_NULL: &str = "IS NOT NULL";
    pub const IS_NULL: &str = "IS NULL";
    pub const LEFT_JOIN: &str = "LEFT JOIN";
    pub const LIMIT: &str = "LIMIT";
    pub const NOT: &str = "NOT";
    pub const NOT_BETWEEN: &str = "NOT BETWEEN";
    pub const NOT_EXISTS: &str = "NOT EXISTS";
    pub const NOT_IN: &str = "NOT IN";
    pub const NULLS_FIRST: &str = "NULLS FIRST";
    pub const NULLS_LAST: &str = "NULLS LAST";
    pub const OFFSET: &str = "OFFSET";
    pub const ON: &str = "ON";
    pub const ON_CONFLICT_DO_NOTHING: &str = "ON CONFLICT DO NOTHING";
    pub const OR: &str = "OR";
    pub const OR_NOT: &str = "OR NOT";
    pub const ORDER_BY: &str = "ORDER BY";
    pub const RETURNING: &str = "RETURNING";
    pub const RIGHT_JOIN: &str = "RIGHT JOIN";
    pub const SELECT: &str = "SELECT";
    pub const SELECT_DISTINCT: &str = "SELECT DISTINCT";
    pub const SET: &str = "SET";
    pub const SOME: &str = "SOME";
    pub const UNION: &str = "UNION";
    pub const UNION_ALL: &str = "UNION ALL";
    pub const UPDATE: &str = "UPDATE";
    pub const USING: &str = "USING";
    pub const VALUES: &str = "VALUES";
    pub const WHERE: &str = "WHERE";
    pub const WITH: &str = "WITH";
    pub const WITH_RECURSIVE: &str = "WITH RECURSIVE";
}
