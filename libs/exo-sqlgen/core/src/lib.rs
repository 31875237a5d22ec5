// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A programmatic SQL statement builder.
//!
//! Statements ([Select], [Insert], [Update], [Delete], [With]) and condition chains
//! ([Conditions]) assemble themselves into a [Tree] of [Node]s through the [Assemble] visitor.
//! The formatter then renders that tree either as literal SQL or as SQL with placeholders plus
//! the ordered list of [SqlValue]s to bind to them ([PreparedStatement]). Values from nested
//! subqueries take their place in that list in the order they appear in the text.
//!
//! Binding the parameters to a driver goes through [BindTarget]; the `exo-sqlgen-pg` crate
//! provides the Postgres implementation.
//!
//! ```no_run
//! use exo_sqlgen::{Select, Statement, condition};
//!
//! let statement = Select::new()
//!     .from("concerts")
//!     .filter(condition("id", "=", 1).and(("year", ">", 2000)));
//! let prepared = statement.render_prepared()?;
//! assert_eq!(prepared.sql, "SELECT * FROM concerts WHERE id = ? AND year > ?");
//! # Ok::<(), exo_sqlgen::BuilderError>(())
//! ```
#[macro_use]
mod test_util;

mod binding;
mod condition;
mod config;
mod error;
mod expression;
mod format;
mod node;
mod statement;
mod token;
mod tree;
mod value;

pub use binding::{BindTarget, bind_parameters};
pub use condition::{
    Attached, Conditions, Connector, Predicate, Quantifier, condition, condition_all,
    condition_any, condition_between, condition_exists, condition_in, condition_is_not_null,
    condition_is_null, condition_not_between, condition_not_exists, condition_not_in,
    condition_some,
};
pub use config::{
    ConfigError, PLACEHOLDER_STYLE_KEY, PlaceholderStyle, QUOTE_IDENTIFIERS_KEY, RenderConfig,
};
pub use error::{BindError, BindErrorReason, BuilderError};
pub use expression::{
    Alias, Expression, ExpressionKind, ExpressionType, SubQuery, as_array, as_list,
};
pub use format::{Formatter, Mode, PreparedStatement, render, render_prepared};
pub use node::{DEFAULT_DELIMITER, Node, NodeMetadata};
pub use statement::{
    CommonTableExpression, Delete, Insert, Join, JoinKind, NullsOrder, OrderByElement, Ordering,
    Select, Statement, Update, With,
};
pub use token::{Token, keyword};
pub use tree::{Assemble, Tree};
pub use value::{SqlValue, ValueKind};
