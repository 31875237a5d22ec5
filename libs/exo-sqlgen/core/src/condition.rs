// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::borrow::Cow;

use crate::{
    expression::Expression,
    node::NodeMetadata,
    token::keyword,
    tree::{Assemble, Tree},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    Some,
    All,
}

impl Quantifier {
    fn keyword(&self) -> &'static str {
        match self {
            Quantifier::Any => keyword::ANY,
            Quantifier::Some => keyword::SOME,
            Quantifier::All => keyword::ALL,
        }
    }
}

/// A leaf predicate. The right operand of the composite forms (BETWEEN, EXISTS, IN, ANY/SOME/ALL)
/// is an expression (a pair, subquery, list, array, or function), never another condition group.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `left <operator> right`
    Compare {
        left: Expression,
        operator: Cow<'static, str>,
        right: Expression,
    },
    /// `operand <operator>` (e.g. `IS NULL`)
    Postfix {
        operand: Expression,
        operator: Cow<'static, str>,
    },
    /// `left [NOT] BETWEEN low AND high`
    Between {
        left: Expression,
        low: Expression,
        high: Expression,
        negated: bool,
    },
    /// `[NOT] EXISTS (subquery)`
    Exists { subquery: Expression, negated: bool },
    /// `left [NOT] IN right`
    In {
        left: Expression,
        right: Expression,
        negated: bool,
    },
    /// `left <operator> ANY|SOME|ALL(right)`
    Quantified {
        left: Expression,
        operator: Cow<'static, str>,
        quantifier: Quantifier,
        right: Expression,
    },
    /// A whole chain in parentheses, standing as one predicate
    Group(Box<Conditions>),
}

impl Assemble for Predicate {
    fn assemble(&self, tree: &mut Tree) {
        match self {
            Predicate::Compare {
                left,
                operator,
                right,
            } => {
                tree.start_node(NodeMetadata::operator(operator.clone(), 1));
                tree.add_leaf(left.clone());
                tree.add_leaf(right.clone());
                tree.end_node();
            }
            Predicate::Postfix { operand, operator } => {
                tree.start_node(NodeMetadata::operator(operator.clone(), 1));
                tree.add_leaf(operand.clone());
                tree.end_node();
            }
            Predicate::Between {
                left,
                low,
                high,
                negated,
            } => {
                let operator = if *negated {
                    keyword::NOT_BETWEEN
                } else {
                    keyword::BETWEEN
                };
                tree.start_node(NodeMetadata::operator(operator, 1));
                tree.add_leaf(left.clone());
                {
                    tree.start_node(NodeMetadata::operator(keyword::AND, 1));
                    tree.add_leaf(low.clone());
                    tree.add_leaf(high.clone());
                    tree.end_node();
                }
                tree.end_node();
            }
            Predicate::Exists { subquery, negated } => {
                let operator = if *negated {
                    keyword::NOT_EXISTS
                } else {
                    keyword::EXISTS
                };
                tree.start_node(NodeMetadata::keyword(operator));
                tree.add_leaf(subquery.clone());
                tree.end_node();
            }
            Predicate::In {
                left,
                right,
                negated,
            } => {
                let operator = if *negated {
                    keyword::NOT_IN
                } else {
                    keyword::IN
                };
                tree.start_node(NodeMetadata::operator(operator, 1));
                tree.add_leaf(left.clone());
                tree.add_leaf(right.clone());
                tree.end_node();
            }
            Predicate::Quantified {
                left,
                operator,
                quantifier,
                right,
            } => {
                tree.start_node(NodeMetadata::operator(operator.clone(), 1));
                tree.add_leaf(left.clone());
                tree.add_leaf(Expression::function(
                    quantifier.keyword(),
                    [right.clone()],
                ));
                tree.end_node();
            }
            Predicate::Group(conditions) => conditions.assemble_chain(tree, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    AndNot,
    Or,
    OrNot,
}

impl Connector {
    fn keyword(&self) -> &'static str {
        match self {
            Connector::And => keyword::AND,
            Connector::AndNot => keyword::AND_NOT,
            Connector::Or => keyword::OR,
            Connector::OrNot => keyword::OR_NOT,
        }
    }
}

/// A connector together with the condition chain it attaches.
#[derive(Debug, Clone)]
pub struct Attached {
    pub connector: Connector,
    pub conditions: Conditions,
}

impl Attached {
    /// The attached chain is grouped in parentheses iff it has connectors of its own: a bare
    /// predicate joins the surrounding chain as-is, while `.and(a.or(b))` renders
    /// `AND (a OR b)`.
    pub fn needs_parentheses(&self) -> bool {
        self.conditions.has_nested()
    }
}

/// A predicate followed by connector-attached sub-chains (`a AND b OR NOT (c AND d)`).
#[derive(Debug, Clone)]
pub struct Conditions {
    predicate: Predicate,
    attached: Vec<Attached>,
}

impl Conditions {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            attached: Vec::new(),
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn attached(&self) -> &[Attached] {
        &self.attached
    }

    /// Whether this chain has any attached sub-condition
    pub fn has_nested(&self) -> bool {
        !self.attached.is_empty()
    }

    fn attach(mut self, connector: Connector, conditions: impl Into<Conditions>) -> Self {
        self.attached.push(Attached {
            connector,
            conditions: conditions.into(),
        });
        self
    }

    /// Wrap the chain in parentheses so that connectors attached afterwards apply to all of it:
    /// `a.or(b).grouped().and(c)` is `(a OR b) AND c`.
    pub fn grouped(self) -> Self {
        Conditions::new(Predicate::Group(Box::new(self)))
    }

    pub fn and(self, conditions: impl Into<Conditions>) -> Self {
        self.attach(Connector::And, conditions)
    }

    pub fn and_not(self, conditions: impl Into<Conditions>) -> Self {
        self.attach(Connector::AndNot, conditions)
    }

    pub fn or(self, conditions: impl Into<Conditions>) -> Self {
        self.attach(Connector::Or, conditions)
    }

    pub fn or_not(self, conditions: impl Into<Conditions>) -> Self {
        self.attach(Connector::OrNot, conditions)
    }

    fn assemble_chain(&self, tree: &mut Tree, parentheses: bool) {
        tree.start_node(NodeMetadata::empty().parenthesized(parentheses));
        tree.peek(&self.predicate);
        for attached in &self.attached {
            tree.start_node(NodeMetadata::keyword(attached.connector.keyword()));
            attached
                .conditions
                .assemble_chain(tree, attached.needs_parentheses());
            tree.end_node();
        }
        tree.end_node();
    }
}

impl Assemble for Conditions {
    /// The outermost chain is never parenthesized.
    fn assemble(&self, tree: &mut Tree) {
        self.assemble_chain(tree, false)
    }
}

impl From<Predicate> for Conditions {
    fn from(predicate: Predicate) -> Self {
        Conditions::new(predicate)
    }
}

/// `("year", ">", 2000)` shorthand for [`condition`]
impl<L, R> From<(L, &'static str, R)> for Conditions
where
    L: Into<Expression>,
    R: Into<Expression>,
{
    fn from((left, operator, right): (L, &'static str, R)) -> Self {
        condition(left, operator, right)
    }
}

/// `left <operator> right`
pub fn condition(
    left: impl Into<Expression>,
    operator: impl Into<Cow<'static, str>>,
    right: impl Into<Expression>,
) -> Conditions {
    Predicate::Compare {
        left: left.into(),
        operator: operator.into(),
        right: right.into(),
    }
    .into()
}

pub fn condition_is_null(operand: impl Into<Expression>) -> Conditions {
    Predicate::Postfix {
        operand: operand.into(),
        operator: Cow::Borrowed(keyword::IS_NULL),
    }
    .into()
}

pub fn condition_is_not_null(operand: impl Into<Expression>) -> Conditions {
    Predicate::Postfix {
        operand: operand.into(),
        operator: Cow::Borrowed(keyword::IS_NOT_NULL),
    }
    .into()
}

pub fn condition_between(
    left: impl Into<Expression>,
    low: impl Into<Expression>,
    high: impl Into<Expression>,
) -> Conditions {
    between(left, low, high, false)
}

pub fn condition_not_between(
    left: impl Into<Expression>,
    low: impl Into<Expression>,
    high: impl Into<Expression>,
) -> Conditions {
    between(left, low, high, true)
}

fn between(
    left: impl Into<Expression>,
    low: impl Into<Expression>,
    high: impl Into<Expression>,
    negated: bool,
) -> Conditions {
    Predicate::Between {
        left: left.into(),
        low: low.into(),
        high: high.into(),
        negated,
    }
    .into()
}

pub fn condition_exists(subquery: impl Assemble + Send + Sync + 'static) -> Conditions {
    Predicate::Exists {
        subquery: Expression::subquery(subquery),
        negated: false,
    }
    .into()
}

pub fn condition_not_exists(subquery: impl Assemble + Send + Sync + 'static) -> Conditions {
    Predicate::Exists {
        subquery: Expression::subquery(subquery),
        negated: true,
    }
    .into()
}

/// `left IN right`, where `right` is a list, array, function, or subquery expression
pub fn condition_in(left: impl Into<Expression>, right: impl Into<Expression>) -> Conditions {
    Predicate::In {
        left: left.into(),
        right: right.into(),
        negated: false,
    }
    .into()
}

pub fn condition_not_in(left: impl Into<Expression>, right: impl Into<Expression>) -> Conditions {
    Predicate::In {
        left: left.into(),
        right: right.into(),
        negated: true,
    }
    .into()
}

fn quantified(
    left: impl Into<Expression>,
    operator: impl Into<Cow<'static, str>>,
    quantifier: Quantifier,
    right: impl Into<Expression>,
) -> Conditions {
    Predicate::Quantified {
        left: left.into(),
        operator: operator.into(),
        quantifier,
        right: right.into(),
    }
    .into()
}

pub fn condition_any(
    left: impl Into<Expression>,
    operator: impl Into<Cow<'static, str>>,
    right: impl Into<Expression>,
) -> Conditions {
    quantified(left, operator, Quantifier::Any, right)
}

pub fn condition_some(
    left: impl Into<Expression>,
    operator: impl Into<Cow<'static, str>>,
    right: impl Into<Expression>,
) -> Conditions {
    quantified(left, operator, Quantifier::Some, right)
}

pub fn condition_all(
    left: impl Into<Expression>,
    operator: impl Into<Cow<'static, str>>,
    right: impl Into<Expression>,
) -> Conditions {
    quantified(left, operator, Quantifier::All, right)
}
