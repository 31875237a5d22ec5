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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => keyword::INNER_JOIN,
            JoinKind::Left => keyword::LEFT_JOIN,
            JoinKind::Right => keyword::RIGHT_JOIN,
            JoinKind::Full => keyword::FULL_JOIN,
            JoinKind::Cross => keyword::CROSS_JOIN,
        }
    }
}

/// A join against the statement's FROM list such as `LEFT JOIN venues ON concerts.venue_id = venues.id`.
#[derive(Debug, Clone)]
pub struct Join {
    kind: JoinKind,
    /// The joined table, subquery, or function (optionally aliased)
    table: Expression,
    /// The join predicate. Cross joins have none.
    on: Option<Conditions>,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<Expression>, on: Option<Conditions>) -> Self {
        Self {
            kind,
            table: table.into(),
            on,
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }
}

impl Assemble for Join {
    fn assemble(&self, tree: &mut Tree) {
        tree.start_node(NodeMetadata::keyword(self.kind.keyword()));
        tree.add_leaf(self.table.clone());
        super::conditions_clause(tree, keyword::ON, self.on.as_ref());
        tree.end_node();
    }
}
