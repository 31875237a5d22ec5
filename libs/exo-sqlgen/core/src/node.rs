// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::borrow::Cow;

use crate::token::Token;

/// Rendering metadata of a node. Never mutated once the node exists; the `with_*` methods derive
/// a modified copy.
#[derive(Debug, Clone, Default)]
pub struct NodeMetadata {
    /// Keyword or operator spliced into the rendered leaves
    token: Option<Token>,
    /// Index in the leaf list at which the token is spliced
    position: usize,
    /// Wrap the whole rendering in parentheses
    parentheses: bool,
    /// Render children as additional delimiter-joined body items instead of space-separated
    /// clauses
    join_nodes: bool,
}

impl NodeMetadata {
    /// Metadata without a token (a plain grouping node)
    pub fn empty() -> Self {
        Self::default()
    }

    /// A keyword that precedes the node's leaves (`SELECT a, b`)
    pub fn keyword(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_token(Token::keyword(name), 0)
    }

    /// An operator placed after the first `position` leaves (`a = b` has position 1)
    pub fn operator(name: impl Into<Cow<'static, str>>, position: usize) -> Self {
        Self::with_token(Token::operator(name), position)
    }

    pub fn with_token(token: Token, position: usize) -> Self {
        Self {
            token: Some(token),
            position,
            parentheses: false,
            join_nodes: false,
        }
    }

    pub fn parenthesized(&self, parentheses: bool) -> Self {
        Self {
            parentheses,
            ..self.clone()
        }
    }

    pub fn joining_nodes(&self, join_nodes: bool) -> Self {
        Self {
            join_nodes,
            ..self.clone()
        }
    }

    pub fn at_position(&self, position: usize) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn parentheses(&self) -> bool {
        self.parentheses
    }

    pub fn join_nodes(&self) -> bool {
        self.join_nodes
    }
}

pub const DEFAULT_DELIMITER: &str = " ";

#[derive(Debug, Clone)]
pub struct Node {
    metadata: NodeMetadata,
    leaves: Vec<Token>,
    children: Vec<Node>,
    /// Separator among this node's own leaves (and among children in join mode)
    delimiter: Cow<'static, str>,
}

impl Node {
    pub fn new(metadata: NodeMetadata) -> Self {
        Self::with_delimiter(metadata, DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(metadata: NodeMetadata, delimiter: impl Into<Cow<'static, str>>) -> Self {
        Self {
            metadata,
            leaves: Vec::new(),
            children: Vec::new(),
            delimiter: delimiter.into(),
        }
    }

    pub fn add_leaf(&mut self, leaf: impl Into<Token>) {
        self.leaves.push(leaf.into());
    }

    pub fn add_leaves<T: Into<Token>>(&mut self, leaves: impl IntoIterator<Item = T>) {
        self.leaves.extend(leaves.into_iter().map(Into::into));
    }

    pub fn add_child_node(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn set_delimiter(&mut self, delimiter: impl Into<Cow<'static, str>>) {
        self.delimiter = delimiter.into();
    }

    pub fn clear(&mut self) {
        self.leaves.clear();
        self.children.clear();
    }

    /// Whether the node has no child nodes (leaves are not considered)
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn leaves(&self) -> &[Token] {
        &self.leaves
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;

    #[multiplatform_test]
    fn metadata_copies() {
        let metadata = NodeMetadata::operator("=", 1);
        let grouped = metadata.parenthesized(true).joining_nodes(true);

        assert!(!metadata.parentheses());
        assert!(!metadata.join_nodes());
        assert!(grouped.parentheses());
        assert!(grouped.join_nodes());
        assert_eq!(grouped.position(), 1);
        assert_eq!(grouped.token().map(Token::name), Some("="));
        assert_eq!(grouped.at_position(0).position(), 0);
    }

    #[multiplatform_test]
    fn append_only() {
        let mut node = Node::new(NodeMetadata::keyword("SELECT"));
        node.add_leaf("a");
        node.add_leaves(["b", "c"]);
        assert_eq!(
            node.leaves().iter().map(Token::name).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
        assert!(node.is_empty());
        assert_eq!(node.delimiter(), " ");

        node.add_child_node(Node::new(NodeMetadata::empty()));
        assert!(!node.is_empty());

        node.set_delimiter(", ");
        assert_eq!(node.delimiter(), ", ");

        node.clear();
        assert!(node.leaves().is_empty());
        assert!(node.is_empty());
    }
}
