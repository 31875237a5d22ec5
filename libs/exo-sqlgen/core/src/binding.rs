// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Dispatch of an ordered parameter list to driver-level bind calls.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    error::{BindError, BindErrorReason},
    value::SqlValue,
};

/// A driver-side destination for parameters. Each method receives the 1-based index of the
/// placeholder being bound. Kinds a target doesn't handle are reported as unsupported.
pub trait BindTarget {
    fn bind_null(&mut self, _index: usize) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_bool(&mut self, _index: usize, _value: bool) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_i16(&mut self, _index: usize, _value: i16) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_i32(&mut self, _index: usize, _value: i32) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_i64(&mut self, _index: usize, _value: i64) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_f32(&mut self, _index: usize, _value: f32) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_f64(&mut self, _index: usize, _value: f64) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_text(&mut self, _index: usize, _value: &str) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_bytes(&mut self, _index: usize, _value: &Bytes) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_date(&mut self, _index: usize, _value: NaiveDate) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_time(&mut self, _index: usize, _value: NaiveTime) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_timestamp(
        &mut self,
        _index: usize,
        _value: NaiveDateTime,
    ) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_timestamp_tz(
        &mut self,
        _index: usize,
        _value: DateTime<Utc>,
    ) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_uuid(&mut self, _index: usize, _value: Uuid) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_json(
        &mut self,
        _index: usize,
        _value: &serde_json::Value,
    ) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }

    fn bind_array(&mut self, _index: usize, _elements: &[SqlValue]) -> Result<(), BindErrorReason> {
        Err(BindErrorReason::Unsupported)
    }
}

/// Bind every parameter in order, stopping at the first failure.
pub fn bind_parameters(
    params: &[SqlValue],
    target: &mut impl BindTarget,
) -> Result<(), BindError> {
    for (offset, value) in params.iter().enumerate() {
        let index = offset + 1;
        tracing::trace!(index, kind = %value.kind(), "Binding parameter");

        bind_value(target, index, value).map_err(|reason| BindError {
            index,
            kind: value.kind(),
            reason,
        })?;
    }

    Ok(())
}

fn bind_value(
    target: &mut impl BindTarget,
    index: usize,
    value: &SqlValue,
) -> Result<(), BindErrorReason> {
    match value {
        SqlValue::Null => target.bind_null(index),
        SqlValue::Bool(value) => target.bind_bool(index, *value),
        SqlValue::Int16(value) => target.bind_i16(index, *value),
        SqlValue::Int32(value) => target.bind_i32(index, *value),
        SqlValue::Int64(value) => target.bind_i64(index, *value),
        SqlValue::Float32(value) => target.bind_f32(index, *value),
        SqlValue::Float64(value) => target.bind_f64(index, *value),
        SqlValue::Text(value) => target.bind_text(index, value),
        SqlValue::Bytes(value) => target.bind_bytes(index, value),
        SqlValue::Date(value) => target.bind_date(index, *value),
        SqlValue::Time(value) => target.bind_time(index, *value),
        SqlValue::Timestamp(value) => target.bind_timestamp(index, *value),
        SqlValue::TimestampTz(value) => target.bind_timestamp_tz(index, *value),
        SqlValue::Uuid(value) => target.bind_uuid(index, *value),
        SqlValue::Json(value) => target.bind_json(index, value),
        SqlValue::Array(elements) => target.bind_array(index, elements),
    }
}

#[cfg(test)]
mod tests {
    use multiplatform_test::multiplatform_test;

    use super::*;
    use crate::value::ValueKind;

    /// Records the calls it receives; handles scalars only.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl BindTarget for Recorder {
        fn bind_i32(&mut self, index: usize, value: i32) -> Result<(), BindErrorReason> {
            self.calls.push(format!("{index}: i32 {value}"));
            Ok(())
        }

        fn bind_text(&mut self, index: usize, value: &str) -> Result<(), BindErrorReason> {
            self.calls.push(format!("{index}: text {value}"));
            Ok(())
        }

        fn bind_bool(&mut self, index: usize, value: bool) -> Result<(), BindErrorReason> {
            self.calls.push(format!("{index}: bool {value}"));
            Ok(())
        }

        fn bind_json(
            &mut self,
            _index: usize,
            _value: &serde_json::Value,
        ) -> Result<(), BindErrorReason> {
            Err(BindErrorReason::Driver("connection closed".into()))
        }
    }

    #[multiplatform_test]
    fn binds_in_order() {
        let mut recorder = Recorder::default();
        bind_parameters(
            &[SqlValue::Int32(1), "two".into(), SqlValue::Bool(true)],
            &mut recorder,
        )
        .unwrap();

        assert_eq!(recorder.calls, vec!["1: i32 1", "2: text two", "3: bool true"]);
    }

    #[multiplatform_test]
    fn unsupported_kind_reports_index() {
        let mut recorder = Recorder::default();
        let error = bind_parameters(
            &[SqlValue::Int32(1), SqlValue::Float64(2.5), SqlValue::Int32(3)],
            &mut recorder,
        )
        .unwrap_err();

        assert_eq!(error.index, 2);
        assert_eq!(error.kind, ValueKind::Float64);
        assert!(matches!(error.reason, BindErrorReason::Unsupported));
        assert_eq!(
            error.to_string(),
            "Failed to bind parameter 2 (float64): the target doesn't support this kind of value"
        );
        // Binding stops at the first failure
        assert_eq!(recorder.calls, vec!["1: i32 1"]);
    }

    #[multiplatform_test]
    fn driver_failure_is_propagated() {
        let mut recorder = Recorder::default();
        let error =
            bind_parameters(&[SqlValue::Json(serde_json::json!({"a": 1}))], &mut recorder)
                .unwrap_err();

        assert_eq!(error.index, 1);
        assert_eq!(error.kind, ValueKind::Json);
        assert!(matches!(error.reason, BindErrorReason::Driver(_)));
    }
}
