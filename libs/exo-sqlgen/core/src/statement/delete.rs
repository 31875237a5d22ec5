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

use super::{conditions_clause, conjoin, list_clause};

/// A `DELETE FROM` statement
#[derive(Debug, Clone)]
pub struct Delete {
    table: Expression,
    using: Vec<Expression>,
    filter: Option<Conditions>,
    returning: Vec<Expression>,
}

impl Delete {
    pub fn from(table: impl Into<Expression>) -> Self {
        Self {
            table: table.into(),
            using: Vec::new(),
            filter: None,
            returning: Vec::new(),
        }
    }

    pub fn using(mut self, table: impl Into<Expression>) -> Self {
        self.using.push(table.into());
        self
    }

    pub fn filter(mut self, conditions: impl Into<Conditions>) -> Self {
        self.filter = Some(conjoin(self.filter.take(), conditions.into()));
        self
    }

    pub fn returning<E: Into<Expression>>(mut self, columns: impl IntoIterator<Item = E>) -> Self {
        self.returning.extend(columns.into_iter().map(Into::into));
        self
    }
}

impl Assemble for Delete {
    fn assemble(&self, tree: &mut Tree) {
        tree.start_node(NodeMetadata::empty());

        tree.start_node(NodeMetadata::keyword(keyword::DELETE_FROM));
        tree.add_leaf(self.table.clone());
        tree.end_node();

        list_clause(tree, keyword::USING, &self.using);
        conditions_clause(tree, keyword::WHERE, self.filter.as_ref());
        list_clause(tree, keyword::RETURNING, &self.returning);

        tree.end_node();
    }
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::{
        condition::{condition, condition_not_in},
        expression::as_list,
        statement::Statement,
    };

    #[multiplatform_test]
    fn unfiltered() {
        assert_eq!(Delete::from("people").render().unwrap(), "DELETE FROM people");
    }

    #[multiplatform_test]
    fn repeated_filters_group_compound_chains() {
        let delete = Delete::from("sessions")
            .filter(condition("expired", "=", true).or(("revoked", "=", true)))
            .filter(("user_id", "=", 42));

        assert_binding!(
            delete.render_prepared(),
            "DELETE FROM sessions WHERE (expired = ? OR revoked = ?) AND user_id = ?",
            true,
            true,
            42
        );
    }

    #[multiplatform_test]
    fn using_and_returning() {
        let delete = Delete::from("tickets")
            .using("concerts")
            .filter(
                condition("tickets.concert_id", "=", "concerts.id")
                    .and(condition_not_in("concerts.status", as_list(["live", "sold out"]))),
            )
            .returning(["tickets.id"]);

        assert_binding!(
            delete.render_prepared(),
            "DELETE FROM tickets USING concerts WHERE tickets.concert_id = concerts.id AND concerts.status NOT IN (?, ?) RETURNING tickets.id",
            "live",
            "sold out"
        );
    }
}
