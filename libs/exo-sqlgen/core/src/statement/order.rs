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
    token::{Token, keyword},
    tree::{Assemble, Tree},
};

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum Ordering {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum NullsOrder {
    First,
    Last,
}

/// One `ORDER BY` item: `<expression> ASC|DESC [NULLS FIRST|LAST]`
#[derive(Debug, Clone)]
pub struct OrderByElement {
    expression: Expression,
    ordering: Ordering,
    nulls: Option<NullsOrder>,
}

impl OrderByElement {
    pub fn new(expression: impl Into<Expression>, ordering: Ordering) -> Self {
        Self {
            expression: expression.into(),
            ordering,
            nulls: None,
        }
    }

    pub fn asc(expression: impl Into<Expression>) -> Self {
        Self::new(expression, Ordering::Asc)
    }

    pub fn desc(expression: impl Into<Expression>) -> Self {
        Self::new(expression, Ordering::Desc)
    }

    pub fn nulls_first(self) -> Self {
        Self {
            nulls: Some(NullsOrder::First),
            ..self
        }
    }

    pub fn nulls_last(self) -> Self {
        Self {
            nulls: Some(NullsOrder::Last),
            ..self
        }
    }
}

impl Assemble for OrderByElement {
    fn assemble(&self, tree: &mut Tree) {
        tree.start_node(NodeMetadata::empty());
        tree.add_leaf(self.expression.clone());
        tree.add_leaf(Token::keyword(match self.ordering {
            Ordering::Asc => keyword::ASC,
            Ordering::Desc => keyword::DESC,
        }));
        if let Some(nulls) = self.nulls {
            tree.add_leaf(Token::keyword(match nulls {
                NullsOrder::First => keyword::NULLS_FIRST,
                NullsOrder::Last => keyword::NULLS_LAST,
            }));
        }
        tree.end_node();
    }
}

/// `ORDER BY e1, e2, ...`, omitted when empty
pub(crate) fn assemble_order_by(tree: &mut Tree, elements: &[OrderByElement]) {
    if elements.is_empty() {
        return;
    }
    tree.start_node_with_delimiter(
        NodeMetadata::keyword(keyword::ORDER_BY).joining_nodes(true),
        ", ",
    );
    for element in elements {
        tree.peek(element);
    }
    tree.end_node();
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::{config::RenderConfig, format};

    fn order_by(elements: &[OrderByElement]) -> String {
        let mut tree = Tree::new();
        assemble_order_by(&mut tree, elements);
        format::render(&tree, &RenderConfig::default()).unwrap()
    }

    #[multiplatform_test]
    fn single() {
        assert_eq!(
            order_by(&[OrderByElement::desc(Expression::column("people.age"))]),
            "ORDER BY people.age DESC"
        );
    }

    #[multiplatform_test]
    fn multiple() {
        assert_eq!(
            order_by(&[
                OrderByElement::asc("name"),
                OrderByElement::desc("age").nulls_last()
            ]),
            "ORDER BY name ASC, age DESC NULLS LAST"
        );

        // Reverse the order and it should be reflected in the statement
        assert_eq!(
            order_by(&[
                OrderByElement::desc("age").nulls_first(),
                OrderByElement::asc("name")
            ]),
            "ORDER BY age DESC NULLS FIRST, name ASC"
        );
    }
}
