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

/// An `UPDATE` statement. Assignments render as one comma-joined `SET` clause.
#[derive(Debug, Clone)]
pub struct Update {
    table: Expression,
    assignments: Vec<(Expression, Expression)>,
    from: Vec<Expression>,
    filter: Option<Conditions>,
    returning: Vec<Expression>,
}

impl Update {
    pub fn table(table: impl Into<Expression>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            from: Vec::new(),
            filter: None,
            returning: Vec::new(),
        }
    }

    pub fn set(mut self, column: impl Into<Expression>, value: impl Into<Expression>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn from(mut self, table: impl Into<Expression>) -> Self {
        self.from.push(table.into());
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

impl Assemble for Update {
    fn assemble(&self, tree: &mut Tree) {
        tree.start_node(NodeMetadata::empty());

        tree.start_node(NodeMetadata::keyword(keyword::UPDATE));
        tree.add_leaf(self.table.clone());
        tree.end_node();

        if self.assignments.is_empty() {
            tree.reject("UPDATE without any SET assignment");
        }
        tree.start_node_with_delimiter(
            NodeMetadata::keyword(keyword::SET).joining_nodes(true),
            ", ",
        );
        for (column, value) in &self.assignments {
            tree.start_node(NodeMetadata::operator("=", 1));
            tree.add_leaf(column.clone());
            tree.add_leaf(value.clone());
            tree.end_node();
        }
        tree.end_node();

        list_clause(tree, keyword::FROM, &self.from);
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
        BuilderError, SqlValue,
        condition::{condition, condition_is_null},
        statement::Statement,
    };

    #[multiplatform_test]
    fn assignments_and_filter() {
        let update = Update::table("people")
            .set("name", Expression::value("Sam"))
            .set("age", 30)
            .set("updated_at", "now()")
            .filter(condition("id", "=", 7).and(condition_is_null("deleted_at")))
            .returning(["id", "name"]);

        assert_binding!(
            update.render_prepared(),
            "UPDATE people SET name = ?, age = ?, updated_at = now() WHERE id = ? AND deleted_at IS NULL RETURNING id, name",
            "Sam",
            30,
            7
        );
    }

    #[multiplatform_test]
    fn update_from() {
        let update = Update::table("concerts")
            .set("venue_name", "venues.name")
            .from("venues")
            .filter(("concerts.venue_id", "=", "venues.id"));

        assert_eq!(
            update.render().unwrap(),
            "UPDATE concerts SET venue_name = venues.name FROM venues WHERE concerts.venue_id = venues.id"
        );
    }

    #[multiplatform_test]
    fn assignments_are_required() {
        let update = Update::table("people").filter(("id", "=", 1));
        assert!(matches!(
            update.render(),
            Err(BuilderError::InvalidStatement(_))
        ));
        assert!(matches!(
            update.render_prepared(),
            Err(BuilderError::InvalidStatement(_))
        ));
    }

    #[multiplatform_test]
    fn repeated_filters_group_compound_chains() {
        let update = Update::table("accounts")
            .set("locked", true)
            .filter(condition("role", "=", "'guest'").or(("role", "=", "'trial'")))
            .filter(("last_login", "<", "now() - interval '1 year'"));

        assert_eq!(
            update.render().unwrap(),
            "UPDATE accounts SET locked = true WHERE (role = 'guest' OR role = 'trial') AND last_login < now() - interval '1 year'"
        );
    }

    #[multiplatform_test]
    fn null_assignment_is_literal() {
        assert_binding!(
            Update::table("people")
                .set("nickname", SqlValue::Null)
                .render_prepared(),
            "UPDATE people SET nickname = NULL"
        );
    }
}
