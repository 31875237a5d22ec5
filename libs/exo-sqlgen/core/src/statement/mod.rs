// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Statement builders. Each one collects its clauses and assembles them in canonical order, so a
//! builder can be filled in any order and still produce a well-formed tree.

mod delete;
mod insert;
mod join;
mod order;
mod select;
mod update;
mod with;

pub use delete::Delete;
pub use insert::Insert;
pub use join::{Join, JoinKind};
pub use order::{NullsOrder, OrderByElement, Ordering};
pub use select::Select;
pub use update::Update;
pub use with::{CommonTableExpression, With};

use crate::{
    condition::Conditions,
    config::RenderConfig,
    error::BuilderError,
    expression::Expression,
    format::{self, PreparedStatement},
    node::NodeMetadata,
    tree::{Assemble, Tree},
};

/// Rendering entry points for anything that can assemble itself. Each call builds a fresh tree.
pub trait Statement: Assemble {
    fn render(&self) -> Result<String, BuilderError> {
        self.render_with(&RenderConfig::default())
    }

    fn render_with(&self, config: &RenderConfig) -> Result<String, BuilderError> {
        format::render(&self.to_tree(), config)
    }

    fn render_prepared(&self) -> Result<PreparedStatement, BuilderError> {
        self.render_prepared_with(&RenderConfig::default())
    }

    fn render_prepared_with(
        &self,
        config: &RenderConfig,
    ) -> Result<PreparedStatement, BuilderError> {
        format::render_prepared(&self.to_tree(), config)
    }

    fn to_tree(&self) -> Tree {
        let mut tree = Tree::new();
        self.assemble(&mut tree);
        tree
    }
}

impl<T: Assemble + ?Sized> Statement for T {}

/// `KEYWORD item1, item2, ...`, omitted when there are no items
pub(crate) fn list_clause(tree: &mut Tree, keyword: &'static str, items: &[Expression]) {
    if items.is_empty() {
        return;
    }
    tree.start_node_with_delimiter(NodeMetadata::keyword(keyword), ", ");
    tree.add_leaves(items.iter().cloned());
    tree.end_node();
}

/// `KEYWORD expression`, omitted for `None`
pub(crate) fn expression_clause(
    tree: &mut Tree,
    keyword: &'static str,
    expression: Option<&Expression>,
) {
    if let Some(expression) = expression {
        tree.start_node(NodeMetadata::keyword(keyword));
        tree.add_leaf(expression.clone());
        tree.end_node();
    }
}

/// `KEYWORD <conditions>` (WHERE, HAVING, ON), omitted for `None`
pub(crate) fn conditions_clause(
    tree: &mut Tree,
    keyword: &'static str,
    conditions: Option<&Conditions>,
) {
    if let Some(conditions) = conditions {
        tree.start_node(NodeMetadata::keyword(keyword));
        tree.peek(conditions);
        tree.end_node();
    }
}

/// Repeated filters are ANDed together. A compound existing chain is grouped first so the new
/// conditions apply to all of it (`(a OR b) AND c`, not `a OR b AND c`).
pub(crate) fn conjoin(existing: Option<Conditions>, conditions: Conditions) -> Conditions {
    match existing {
        Some(existing) if existing.has_nested() => existing.grouped().and(conditions),
        Some(existing) => existing.and(conditions),
        None => conditions,
    }
}
