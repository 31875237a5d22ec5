// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    condition::Conditions,
    expression::Expression,
    node::NodeMetadata,
    token::keyword,
    tree::{Assemble, Tree},
};

use super::{
    Join, JoinKind, OrderByElement, conditions_clause, conjoin, expression_clause, list_clause,
    order::assemble_order_by,
};

/// A `SELECT` statement.
///
/// Clauses are assembled in SQL order regardless of the order the builder methods are called in.
/// `ORDER BY`, `LIMIT` and `OFFSET` follow any `UNION`s and so apply to the combined result.
#[derive(Debug, Clone, Default)]
pub struct Select {
    distinct: bool,
    /// Selected columns; `*` when empty
    columns: Vec<Expression>,
    from: Vec<Expression>,
    joins: Vec<Join>,
    filter: Option<Conditions>,
    group_by: Vec<Expression>,
    having: Option<Conditions>,
    unions: Vec<Union>,
    order_by: Vec<OrderByElement>,
    limit: Option<Expression>,
    offset: Option<Expression>,
}

#[derive(Debug, Clone)]
struct Union {
    all: bool,
    select: Select,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn column(mut self, column: impl Into<Expression>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns<E: Into<Expression>>(mut self, columns: impl IntoIterator<Item = E>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a table, aliased subquery, or `VALUES` list to the FROM clause
    pub fn from(mut self, table: impl Into<Expression>) -> Self {
        self.from.push(table.into());
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn inner_join(self, table: impl Into<Expression>, on: impl Into<Conditions>) -> Self {
        self.join(Join::new(JoinKind::Inner, table, Some(on.into())))
    }

    pub fn left_join(self, table: impl Into<Expression>, on: impl Into<Conditions>) -> Self {
        self.join(Join::new(JoinKind::Left, table, Some(on.into())))
    }

    pub fn right_join(self, table: impl Into<Expression>, on: impl Into<Conditions>) -> Self {
        self.join(Join::new(JoinKind::Right, table, Some(on.into())))
    }

    pub fn full_join(self, table: impl Into<Expression>, on: impl Into<Conditions>) -> Self {
        self.join(Join::new(JoinKind::Full, table, Some(on.into())))
    }

    pub fn cross_join(self, table: impl Into<Expression>) -> Self {
        self.join(Join::new(JoinKind::Cross, table, None))
    }

    /// Add a WHERE condition. Calling it again ANDs the new conditions with the existing ones.
    pub fn filter(mut self, conditions: impl Into<Conditions>) -> Self {
        self.filter = Some(conjoin(self.filter.take(), conditions.into()));
        self
    }

    pub fn group_by<E: Into<Expression>>(mut self, columns: impl IntoIterator<Item = E>) -> Self {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn having(mut self, conditions: impl Into<Conditions>) -> Self {
        self.having = Some(conjoin(self.having.take(), conditions.into()));
        self
    }

    pub fn union(mut self, select: Select) -> Self {
        self.unions.push(Union { all: false, select });
        self
    }

    pub fn union_all(mut self, select: Select) -> Self {
        self.unions.push(Union { all: true, select });
        self
    }

    pub fn order_by(mut self, element: OrderByElement) -> Self {
        self.order_by.push(element);
        self
    }

    pub fn limit(mut self, limit: impl Into<Expression>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn offset(mut self, offset: impl Into<Expression>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Whether the statement would be ambiguous as a `UNION` member without parentheses: its own
    /// unions would otherwise associate with the enclosing ones.
    fn needs_parentheses_in_union(&self) -> bool {
        !self.unions.is_empty()
            || !self.order_by.is_empty()
            || self.limit.is_some()
            || self.offset.is_some()
    }

    fn assemble_with(&self, tree: &mut Tree, parentheses: bool) {
        tree.start_node(NodeMetadata::empty().parenthesized(parentheses));

        let select = if self.distinct {
            keyword::SELECT_DISTINCT
        } else {
            keyword::SELECT
        };
        tree.start_node_with_delimiter(NodeMetadata::keyword(select), ", ");
        if self.columns.is_empty() {
            tree.add_leaf(Expression::raw("*"));
        } else {
            tree.add_leaves(self.columns.iter().cloned());
        }
        tree.end_node();

        list_clause(tree, keyword::FROM, &self.from);
        for join in &self.joins {
            tree.peek(join);
        }
        conditions_clause(tree, keyword::WHERE, self.filter.as_ref());
        list_clause(tree, keyword::GROUP_BY, &self.group_by);
        conditions_clause(tree, keyword::HAVING, self.having.as_ref());

        for union in &self.unions {
            let union_keyword = if union.all {
                keyword::UNION_ALL
            } else {
                keyword::UNION
            };
            tree.start_node(NodeMetadata::keyword(union_keyword));
            union
                .select
                .assemble_with(tree, union.select.needs_parentheses_in_union());
            tree.end_node();
        }

        assemble_order_by(tree, &self.order_by);
        expression_clause(tree, keyword::LIMIT, self.limit.as_ref());
        expression_clause(tree, keyword::OFFSET, self.offset.as_ref());

        tree.end_node();
    }
}

impl Assemble for Select {
    fn assemble(&self, tree: &mut Tree) {
        self.assemble_with(tree, false)
    }
}
