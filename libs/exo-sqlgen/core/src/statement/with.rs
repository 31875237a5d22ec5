// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt::Debug, sync::Arc};

use crate::{
    expression::{Expression, SubQuery},
    node::NodeMetadata,
    token::keyword,
    tree::{Assemble, Tree},
};

/// A named sub-statement of a `WITH` clause: `name[(col1, col2)] AS (<statement>)`
#[derive(Debug, Clone)]
pub struct CommonTableExpression {
    name: String,
    columns: Vec<String>,
    statement: Expression,
}

impl CommonTableExpression {
    pub fn new(name: impl Into<String>, statement: impl Assemble + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            statement: Expression::subquery(statement),
        }
    }

    pub fn with_columns<C: Into<String>>(mut self, columns: impl IntoIterator<Item = C>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Assemble for CommonTableExpression {
    fn assemble(&self, tree: &mut Tree) {
        let name = if self.columns.is_empty() {
            Expression::raw(self.name.clone())
        } else {
            Expression::function(self.name.clone(), self.columns.iter().map(String::as_str))
        };

        tree.start_node(NodeMetadata::operator(keyword::AS, 1));
        tree.add_leaf(name);
        tree.add_leaf(self.statement.clone());
        tree.end_node();
    }
}

/// `WITH [RECURSIVE] cte1 AS (...), cte2 AS (...) <body>`
#[derive(Clone, Default)]
pub struct With {
    recursive: bool,
    expressions: Vec<CommonTableExpression>,
    body: Option<SubQuery>,
}

impl With {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn expression(mut self, expression: CommonTableExpression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Shorthand for adding a [`CommonTableExpression`] without a column list
    pub fn cte(self, name: impl Into<String>, statement: impl Assemble + Send + Sync + 'static) -> Self {
        self.expression(CommonTableExpression::new(name, statement))
    }

    /// The statement that uses the common table expressions
    pub fn body(mut self, statement: impl Assemble + Send + Sync + 'static) -> Self {
        self.body = Some(Arc::new(statement));
        self
    }
}

impl Debug for With {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("With")
            .field("recursive", &self.recursive)
            .field("expressions", &self.expressions)
            .field("body", &self.body.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Assemble for With {
    fn assemble(&self, tree: &mut Tree) {
        tree.start_node(NodeMetadata::empty());

        if !self.expressions.is_empty() {
            let with = if self.recursive {
                keyword::WITH_RECURSIVE
            } else {
                keyword::WITH
            };
            tree.start_node_with_delimiter(NodeMetadata::keyword(with).joining_nodes(true), ", ");
            for expression in &self.expressions {
                tree.peek(expression);
            }
            tree.end_node();
        }

        if let Some(body) = &self.body {
            tree.peek(body.as_ref());
        }

        tree.end_node();
    }
}
