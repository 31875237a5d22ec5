// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

//! Test assertions to check rendered SQL statements and their parameters.

/// Assert that the given parameters match the expected ones, in order.
///
/// # Usage:
/// ```no_run
/// assert_params!(actual_params, expected_param1, expected_param2, ...);
/// ```
macro_rules! assert_params {
    ($actual_params:expr) => {
        assert!($actual_params.is_empty(), "Extra actual parameters: {:?}", $actual_params);
    };
    ($actual_params:expr, $expected_param:expr $(, $rest:expr)* $(,)?) => {
        match $actual_params.split_first() {
            Some((actual_head, actual_tail)) => {
                let expected: $crate::SqlValue = $expected_param.into();
                assert_eq!(actual_head, &expected, "Parameter mismatch");
                assert_params!(actual_tail $(, $rest)*);
            }
            None => panic!("Missing actual parameter (expected {:?})", $expected_param),
        }
    };
}

/// Assert that a prepared rendering produced the expected SQL and parameters.
///
/// # Usage:
/// ```no_run
/// assert_binding!(statement.render_prepared(), "SELECT * FROM t WHERE id = ?", 1);
/// ```
macro_rules! assert_binding {
    ($actual:expr, $expected_stmt:expr $(, $rest:expr)* $(,)?) => {
        let (actual_stmt, actual_params) = $actual.unwrap().into_parts();
        assert_eq!(actual_stmt, $expected_stmt);
        assert_params!(actual_params.as_slice() $(, $rest)*);
    };
}
