// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::{config::ConfigError, value::ValueKind};

#[derive(Error, Debug)]
pub enum BuilderError {
    /// Formatting was requested on a tree whose `start_node`/`end_node` calls were unbalanced (or
    /// that was otherwise misused while building).
    #[error("Broken tree: {0}")]
    BrokenTree(String),

    /// Formatting was requested on a tree that never had a node started on it.
    #[error("Nothing has been assembled into the tree")]
    EmptyTree,

    /// A statement builder was missing a clause required for valid SQL.
    #[error("Invalid statement: {0}")]
    InvalidStatement(&'static str),

    #[error("Unsupported constant type: {0}")]
    UnsupportedConstantType(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failure to hand one parameter to a driver.
#[derive(Error, Debug)]
#[error("Failed to bind parameter {index} ({kind}): {reason}")]
pub struct BindError {
    /// 1-based position of the parameter (matching its placeholder)
    pub index: usize,
    pub kind: ValueKind,
    pub reason: BindErrorReason,
}

#[derive(Error, Debug)]
pub enum BindErrorReason {
    #[error("the target doesn't support this kind of value")]
    Unsupported,

    #[error("could not construct array: {0}")]
    ArrayConstruction(String),

    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}
