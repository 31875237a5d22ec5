// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    config::RenderConfig,
    error::BuilderError,
    node::Node,
    tree::{Assemble, Tree},
    value::SqlValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Values are inlined as SQL literals
    Literal,
    /// Preparable values become placeholders and are collected in visitation order
    Prepared,
}

/// The SQL text with placeholders and the parameters to bind to them (in placeholder order).
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl PreparedStatement {
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

/// Renders nodes recursively, collecting parameters when in [`Mode::Prepared`]. A formatter lives
/// for the rendering of one top-level statement, including any subqueries, so that parameter
/// indices are assigned across the whole statement.
pub struct Formatter<'a> {
    mode: Mode,
    config: &'a RenderConfig,
    params: Vec<SqlValue>,
}

impl<'a> Formatter<'a> {
    pub fn new(mode: Mode, config: &'a RenderConfig) -> Self {
        Self {
            mode,
            config,
            params: Vec::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Render a value: a placeholder (recording the value) if it is preparable and we are
    /// preparing, its literal text otherwise.
    pub fn push_value(&mut self, value: &SqlValue) -> String {
        if self.mode == Mode::Prepared && value.is_preparable() {
            self.params.push(value.clone());
            self.config.placeholder_style.placeholder(self.params.len())
        } else {
            value.literal()
        }
    }

    pub fn into_params(self) -> Vec<SqlValue> {
        self.params
    }

    pub fn render_tree(&mut self, tree: &Tree) -> Result<String, BuilderError> {
        self.render_node(tree.root()?)
    }

    /// Assemble a (sub-)statement into a tree of its own and render it with this formatter, so
    /// that its parameters take their place in the overall order.
    pub fn render_statement(&mut self, statement: &dyn Assemble) -> Result<String, BuilderError> {
        let mut tree = Tree::new();
        statement.assemble(&mut tree);
        self.render_tree(&tree)
    }

    /// Render a node:
    /// - leaves are split at the metadata position with the node's token spliced in between
    /// - children follow, either joined with the leaves (join mode) or as space-separated clauses
    /// - the result is parenthesized if requested.
    pub fn render_node(&mut self, node: &Node) -> Result<String, BuilderError> {
        let metadata = node.metadata();
        let delimiter = node.delimiter();

        let leaves = node
            .leaves()
            .iter()
            .map(|leaf| leaf.render(self))
            .collect::<Result<Vec<_>, _>>()?;

        let position = metadata.position().min(leaves.len());
        let (prefix, body) = leaves.split_at(position);

        let mut parts = Vec::new();
        push_joined(&mut parts, prefix, delimiter);

        if let Some(token) = metadata.token() {
            parts.push(token.render(self)?);
        }

        let mut body = body.to_vec();
        let mut clauses = Vec::new();

        if !node.is_empty() {
            for child in node.children() {
                let rendered = self.render_node(child)?;
                if metadata.join_nodes() {
                    body.push(rendered);
                } else {
                    clauses.push(rendered);
                }
            }
        }

        push_joined(&mut parts, &body, delimiter);
        parts.extend(clauses.into_iter().filter(|clause| !clause.is_empty()));

        let rendered = parts.join(" ");

        Ok(if metadata.parentheses() {
            format!("({rendered})")
        } else {
            rendered
        })
    }
}

fn push_joined(parts: &mut Vec<String>, items: &[String], delimiter: &str) {
    let items: Vec<_> = items
        .iter()
        .filter(|item| !item.is_empty())
        .map(String::as_str)
        .collect();

    if !items.is_empty() {
        parts.push(items.join(delimiter));
    }
}

/// Render an assembled tree as literal SQL. Rendering doesn't modify the tree, so rendering
/// twice yields the same text.
pub fn render(tree: &Tree, config: &RenderConfig) -> Result<String, BuilderError> {
    let sql = Formatter::new(Mode::Literal, config).render_tree(tree)?;
    tracing::debug!(%sql, "Rendered statement");
    Ok(sql)
}

/// Render an assembled tree with placeholders, returning the parameters in placeholder order.
pub fn render_prepared(tree: &Tree, config: &RenderConfig) -> Result<PreparedStatement, BuilderError> {
    let mut formatter = Formatter::new(Mode::Prepared, config);
    let sql = formatter.render_tree(tree)?;
    let params = formatter.into_params();
    tracing::debug!(%sql, params = params.len(), "Rendered prepared statement");
    Ok(PreparedStatement { sql, params })
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::{
        config::PlaceholderStyle, expression::Expression, node::NodeMetadata, token::keyword,
    };

    fn assignment(tree: &mut Tree, column: &str, value: i32) {
        tree.start_node(NodeMetadata::operator("=", 1));
        tree.add_leaf(Expression::column(column));
        tree.add_leaf(Expression::value(value));
        tree.end_node();
    }

    fn update_tree() -> Tree {
        let mut tree = Tree::new();
        tree.start_node(NodeMetadata::empty());
        {
            tree.start_node(NodeMetadata::keyword(keyword::UPDATE));
            tree.add_leaf(Expression::column("t"));
            tree.end_node();

            tree.start_node_with_delimiter(
                NodeMetadata::keyword(keyword::SET).joining_nodes(true),
                ", ",
            );
            assignment(&mut tree, "a", 1);
            assignment(&mut tree, "b", 2);
            tree.end_node();

            tree.start_node(NodeMetadata::keyword(keyword::WHERE));
            assignment(&mut tree, "id", 3);
            tree.end_node();
        }
        tree.end_node();
        tree
    }

    #[multiplatform_test]
    fn splices_token_at_position() {
        let mut tree = Tree::new();
        tree.start_node_with_delimiter(NodeMetadata::keyword(keyword::SELECT), ", ");
        tree.add_leaves(["a", "b"]);
        tree.end_node();
        assert_eq!(
            render(&tree, &RenderConfig::default()).unwrap(),
            "SELECT a, b"
        );

        let mut tree = Tree::new();
        tree.start_node(NodeMetadata::operator("BETWEEN", 1));
        tree.add_leaf("x");
        tree.start_node(NodeMetadata::operator(keyword::AND, 1));
        tree.add_leaves(["1", "5"]);
        tree.end_node();
        tree.end_node();
        assert_eq!(
            render(&tree, &RenderConfig::default()).unwrap(),
            "x BETWEEN 1 AND 5"
        );
    }

    #[multiplatform_test]
    fn join_mode_and_clauses() {
        let tree = update_tree();
        assert_eq!(
            render(&tree, &RenderConfig::default()).unwrap(),
            "UPDATE t SET a = 1, b = 2 WHERE id = 3"
        );
    }

    #[multiplatform_test]
    fn prepared_in_document_order() {
        let tree = update_tree();
        let prepared =
            render_prepared(&tree, &RenderConfig::new(PlaceholderStyle::Numbered, false))
                .unwrap();
        assert_eq!(prepared.sql, "UPDATE t SET a = $1, b = $2 WHERE id = $3");
        assert_eq!(
            prepared.params,
            vec![SqlValue::Int32(1), SqlValue::Int32(2), SqlValue::Int32(3)]
        );
    }

    #[multiplatform_test]
    fn parentheses_wrap_everything() {
        let mut tree = Tree::new();
        tree.start_node(NodeMetadata::operator("+", 1).parenthesized(true));
        tree.add_leaves(["1", "2"]);
        tree.end_node();
        assert_eq!(render(&tree, &RenderConfig::default()).unwrap(), "(1 + 2)");
    }

    #[multiplatform_test]
    fn position_beyond_leaves_appends_token() {
        let mut tree = Tree::new();
        tree.start_node(NodeMetadata::operator(keyword::IS_NULL, 5));
        tree.add_leaf("deleted_at");
        tree.end_node();
        assert_eq!(
            render(&tree, &RenderConfig::default()).unwrap(),
            "deleted_at IS NULL"
        );
    }

    #[multiplatform_test]
    fn rendering_is_idempotent() {
        let tree = update_tree();
        let config = RenderConfig::default();
        assert_eq!(
            render(&tree, &config).unwrap(),
            render(&tree, &config).unwrap()
        );
        assert_eq!(
            render_prepared(&tree, &config).unwrap(),
            render_prepared(&tree, &config).unwrap()
        );
    }

    #[multiplatform_test]
    fn broken_tree_is_rejected() {
        let mut tree = Tree::new();
        tree.start_node(NodeMetadata::empty());
        assert!(matches!(
            render(&tree, &RenderConfig::default()),
            Err(BuilderError::BrokenTree(_))
        ));
    }
}
