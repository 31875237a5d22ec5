// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{borrow::Cow, sync::Arc};

use crate::{
    error::BuilderError,
    node::{Node, NodeMetadata},
    token::Token,
};

/// A trait for anything that can push itself onto a [`Tree`].
///
/// Every statement, clause, and condition group implements this, and it is the only contract a
/// builder needs to satisfy to take part in rendering. Implementations either open and close
/// their own nodes or add leaves to the node currently on top of the tree's stack.
pub trait Assemble {
    fn assemble(&self, tree: &mut Tree);
}

impl<T: Assemble + ?Sized> Assemble for &T {
    fn assemble(&self, tree: &mut Tree) {
        (**self).assemble(tree)
    }
}

impl<T: Assemble + ?Sized> Assemble for Box<T> {
    fn assemble(&self, tree: &mut Tree) {
        self.as_ref().assemble(tree)
    }
}

impl<T: Assemble + ?Sized> Assemble for Arc<T> {
    fn assemble(&self, tree: &mut Tree) {
        self.as_ref().assemble(tree)
    }
}

/// Stack-disciplined builder producing one rooted node graph per statement.
///
/// A tree is scratch space for a single build: obtain a fresh one (or [`Tree::reinitialize`] it)
/// for each top-level statement and don't interleave builds on the same instance.
#[derive(Debug, Default)]
pub struct Tree {
    stack: Vec<Node>,
    root: Option<Node>,
    /// First misuse seen while building (e.g. a leaf added with no open node)
    misuse: Option<&'static str>,
    /// First reason a statement gave for refusing to render (e.g. `UPDATE` without assignments)
    rejection: Option<&'static str>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a node with the default delimiter. It becomes a child of the currently open node (if
    /// any) once closed.
    pub fn start_node(&mut self, metadata: NodeMetadata) {
        self.push(Node::new(metadata));
    }

    pub fn start_node_with_delimiter(
        &mut self,
        metadata: NodeMetadata,
        delimiter: impl Into<Cow<'static, str>>,
    ) {
        self.push(Node::with_delimiter(metadata, delimiter));
    }

    fn push(&mut self, node: Node) {
        if self.stack.is_empty() && self.root.is_some() {
            self.record_misuse("a second root node was started");
        }
        self.stack.push(node);
    }

    /// Close the node on top of the stack. Closing the last open node makes it the root.
    pub fn end_node(&mut self) {
        match self.stack.pop() {
            Some(node) => match self.stack.last_mut() {
                Some(parent) => parent.add_child_node(node),
                None => self.root = Some(node),
            },
            None => self.record_misuse("end_node called with no open node"),
        }
    }

    pub fn add_leaf(&mut self, leaf: impl Into<Token>) {
        match self.stack.last_mut() {
            Some(node) => node.add_leaf(leaf),
            None => self.record_misuse("leaf added with no open node"),
        }
    }

    pub fn add_leaves<T: Into<Token>>(&mut self, leaves: impl IntoIterator<Item = T>) {
        match self.stack.last_mut() {
            Some(node) => node.add_leaves(leaves),
            None => self.record_misuse("leaves added with no open node"),
        }
    }

    /// Let a composite (nested condition group, sub-select, clause) push its own nodes and leaves
    /// in the current context.
    pub fn peek(&mut self, visitor: &dyn Assemble) {
        visitor.assemble(self);
    }

    /// Clear everything so the tree can be reused for another top-level build.
    pub fn reinitialize(&mut self) {
        self.stack.clear();
        self.root = None;
        self.misuse = None;
        self.rejection = None;
    }

    /// Mark the statement being assembled as invalid SQL. Rendering the tree then fails with
    /// [`BuilderError::InvalidStatement`]. Only the first reason is kept.
    pub fn reject(&mut self, reason: &'static str) {
        tracing::warn!("Invalid statement: {reason}");
        self.rejection.get_or_insert(reason);
    }

    /// Depth of the stack of open nodes
    pub fn open_nodes(&self) -> usize {
        self.stack.len()
    }

    /// The completed root, or an error if the start/end calls were unbalanced.
    pub fn root(&self) -> Result<&Node, BuilderError> {
        if let Some(misuse) = self.misuse {
            return Err(BuilderError::BrokenTree(misuse.to_string()));
        }
        if !self.stack.is_empty() {
            return Err(BuilderError::BrokenTree(format!(
                "{} node(s) still open",
                self.stack.len()
            )));
        }
        if let Some(reason) = self.rejection {
            return Err(BuilderError::InvalidStatement(reason));
        }
        self.root.as_ref().ok_or(BuilderError::EmptyTree)
    }

    fn record_misuse(&mut self, misuse: &'static str) {
        tracing::error!("Broken tree: {misuse}");
        self.misuse.get_or_insert(misuse);
    }
}
