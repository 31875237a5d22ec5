// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use exo_sqlgen::{
    Assemble, BuilderError, Delete, Expression, Insert, NodeMetadata, PlaceholderStyle,
    RenderConfig, Select, SqlValue, Statement, Tree, Update, With, as_array, as_list, condition,
    condition_any, condition_between, condition_exists, condition_in, keyword, render,
    render_prepared,
};

#[test]
fn prepared_parameters_match_placeholders() {
    let tickets = Select::new()
        .column("concert_id")
        .from("tickets")
        .filter(("price", ">", 100));

    let select = Select::new()
        .columns(["c.title", "v.name"])
        .from(Expression::raw("concerts").alias("c"))
        .inner_join(
            Expression::raw("venues").alias("v"),
            condition("c.venue_id", "=", "v.id").and(("v.capacity", ">=", 500)),
        )
        .filter(
            condition_between("c.year", 2000, 2010)
                .and(condition_in("c.id", Expression::subquery(tickets)))
                .or(condition_any("c.genre", "=", as_array(["jazz", "blues"]))),
        )
        .limit(25i64);

    let prepared = select
        .render_prepared_with(&RenderConfig::postgres())
        .unwrap();

    assert_eq!(
        prepared.sql,
        "SELECT c.title, v.name FROM concerts AS c INNER JOIN venues AS v ON c.venue_id = v.id AND v.capacity >= $1 \
         WHERE c.year BETWEEN $2 AND $3 AND c.id IN (SELECT concert_id FROM tickets WHERE price > $4) \
         OR c.genre = ANY(ARRAY[$5, $6]) LIMIT $7"
    );
    assert_eq!(
        prepared.params,
        vec![
            SqlValue::Int32(500),
            SqlValue::Int32(2000),
            SqlValue::Int32(2010),
            SqlValue::Int32(100),
            SqlValue::from("jazz"),
            SqlValue::from("blues"),
            SqlValue::Int64(25),
        ]
    );

    // Literal rendering of the same statement inlines every value
    assert_eq!(
        select.render().unwrap(),
        "SELECT c.title, v.name FROM concerts AS c INNER JOIN venues AS v ON c.venue_id = v.id AND v.capacity >= 500 \
         WHERE c.year BETWEEN 2000 AND 2010 AND c.id IN (SELECT concert_id FROM tickets WHERE price > 100) \
         OR c.genre = ANY(ARRAY['jazz', 'blues']) LIMIT 25"
    );
}

#[test]
fn raw_expressions_are_never_placeholders() {
    let prepared = Update::table("counters")
        .set("hits", "hits + 1")
        .set("touched_at", Expression::raw("now()"))
        .filter(("name", "=", Expression::string("home")))
        .render_prepared()
        .unwrap();

    assert_eq!(
        prepared.sql,
        "UPDATE counters SET hits = hits + 1, touched_at = now() WHERE name = 'home'"
    );
    assert!(prepared.params.is_empty());
}

#[test]
fn rendering_is_idempotent() {
    let mut tree = Tree::new();
    Delete::from("sessions")
        .filter(("expires_at", "<", "now()"))
        .assemble(&mut tree);

    let config = RenderConfig::default();
    let first = render(&tree, &config).unwrap();
    assert_eq!(first, render(&tree, &config).unwrap());
    assert_eq!(first, "DELETE FROM sessions WHERE expires_at < now()");

    let prepared = render_prepared(&tree, &config).unwrap();
    assert_eq!(prepared, render_prepared(&tree, &config).unwrap());
}

#[test]
fn reinitialized_tree_is_reusable() {
    let mut tree = Tree::new();
    Select::new().from("a").assemble(&mut tree);
    tree.reinitialize();
    Select::new().from("b").assemble(&mut tree);

    assert_eq!(
        render(&tree, &RenderConfig::default()).unwrap(),
        "SELECT * FROM b"
    );
}

#[test]
fn unbalanced_tree_fails() {
    let mut tree = Tree::new();
    tree.start_node(NodeMetadata::keyword(keyword::SELECT));
    tree.add_leaf("1");

    assert!(matches!(
        render(&tree, &RenderConfig::default()),
        Err(BuilderError::BrokenTree(_))
    ));

    tree.end_node();
    assert_eq!(render(&tree, &RenderConfig::default()).unwrap(), "SELECT 1");
}

#[test]
fn empty_tree_fails() {
    assert!(matches!(
        render(&Tree::new(), &RenderConfig::default()),
        Err(BuilderError::EmptyTree)
    ));
}

#[test]
fn quoted_identifiers() {
    let config = RenderConfig::new(PlaceholderStyle::Question, true);

    let statement = Insert::into(Expression::column("public.people"))
        .columns([Expression::column("name"), Expression::unquoted_column("age")])
        .values([Expression::value("Sam"), Expression::value(5)])
        .returning([Expression::column("people.*")]);

    assert_eq!(
        statement.render_with(&config).unwrap(),
        r#"INSERT INTO "public"."people" ("name", age) VALUES ('Sam', 5) RETURNING "people".*"#
    );
}

#[test]
fn exists_subquery_inside_with() {
    let with = With::new()
        .cte(
            "active",
            Select::new()
                .column("id")
                .from("users")
                .filter(("active", "=", true)),
        )
        .body(
            Select::new()
                .column("count(*)")
                .from("active")
                .filter(condition_exists(
                    Select::new()
                        .column("1")
                        .from("orders")
                        .filter(condition("orders.user_id", "=", "active.id").and((
                            "orders.total",
                            ">",
                            SqlValue::Float64(9.99),
                        ))),
                )),
        );

    let (sql, params) = with.render_prepared().unwrap().into_parts();
    assert_eq!(
        sql,
        "WITH active AS (SELECT id FROM users WHERE active = ?) SELECT count(*) FROM active \
         WHERE EXISTS (SELECT 1 FROM orders WHERE orders.user_id = active.id AND orders.total > ?)"
    );
    assert_eq!(params, vec![SqlValue::Bool(true), SqlValue::Float64(9.99)]);
}

#[test]
fn lists_and_arrays() {
    let select = Select::new()
        .column(as_array([1, 2, 3]).alias("ids"))
        .filter(condition_in("1", as_list([1, 2, 3])));

    assert_eq!(
        select.render().unwrap(),
        "SELECT ARRAY[1, 2, 3] AS ids WHERE 1 IN (1, 2, 3)"
    );
}

#[test_log::test]
fn malformed_qualified_name_still_renders() {
    let select = Select::new().column(Expression::quoted_column("people..name"));

    // The empty segment is logged and kept
    assert_eq!(
        select.render().unwrap(),
        r##"SELECT "people".""."name""##
    );
}
