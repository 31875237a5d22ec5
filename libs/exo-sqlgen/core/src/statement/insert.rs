// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    expression::Expression,
    node::NodeMetadata,
    token::keyword,
    tree::{Assemble, Tree},
};

use super::{Select, list_clause};

#[derive(Debug, Clone)]
enum Source {
    Values(Vec<Vec<Expression>>),
    Select(Box<Select>),
}

/// An `INSERT INTO` statement with either literal rows or a `SELECT` source.
#[derive(Debug, Clone)]
pub struct Insert {
    table: Expression,
    columns: Vec<Expression>,
    source: Source,
    on_conflict_do_nothing: bool,
    returning: Vec<Expression>,
}

impl Insert {
    pub fn into(table: impl Into<Expression>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            source: Source::Values(Vec::new()),
            on_conflict_do_nothing: false,
            returning: Vec::new(),
        }
    }

    pub fn columns<E: Into<Expression>>(mut self, columns: impl IntoIterator<Item = E>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a row of values. Replaces a `SELECT` source set earlier.
    pub fn values<E: Into<Expression>>(mut self, row: impl IntoIterator<Item = E>) -> Self {
        let row = row.into_iter().map(Into::into).collect();
        match &mut self.source {
            Source::Values(rows) => rows.push(row),
            Source::Select(_) => self.source = Source::Values(vec![row]),
        }
        self
    }

    /// Insert the result of a query instead of literal rows
    pub fn select(mut self, select: Select) -> Self {
        self.source = Source::Select(Box::new(select));
        self
    }

    pub fn on_conflict_do_nothing(mut self) -> Self {
        self.on_conflict_do_nothing = true;
        self
    }

    pub fn returning<E: Into<Expression>>(mut self, columns: impl IntoIterator<Item = E>) -> Self {
        self.returning.extend(columns.into_iter().map(Into::into));
        self
    }
}

impl Assemble for Insert {
    fn assemble(&self, tree: &mut Tree) {
        tree.start_node(NodeMetadata::empty());

        tree.start_node(NodeMetadata::keyword(keyword::INSERT_INTO));
        tree.add_leaf(self.table.clone());
        if !self.columns.is_empty() {
            tree.add_leaf(Expression::list(self.columns.iter().cloned()));
        }
        tree.end_node();

        match &self.source {
            Source::Values(rows) if rows.is_empty() => {
                tree.start_node(NodeMetadata::keyword(keyword::DEFAULT_VALUES));
                tree.end_node();
            }
            Source::Values(rows) => {
                let rows: Vec<_> = rows
                    .iter()
                    .map(|row| Expression::list(row.iter().cloned()))
                    .collect();
                list_clause(tree, keyword::VALUES, &rows);
            }
            Source::Select(select) => tree.peek(select.as_ref()),
        }

        if self.on_conflict_do_nothing {
            tree.start_node(NodeMetadata::keyword(keyword::ON_CONFLICT_DO_NOTHING));
            tree.end_node();
        }

        list_clause(tree, keyword::RETURNING, &self.returning);

        tree.end_node();
    }
}
