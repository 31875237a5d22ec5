// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{any::Any, fmt::Display};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::BuilderError;

/// A constant value carried by a preparable expression. In prepared mode, this is what ends up in
/// the ordered parameter list; in literal mode, it renders through [`SqlValue::literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Bytes),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
    Array(Vec<SqlValue>),
}

/// The runtime kind of a [`SqlValue`], without the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
    Array,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int16 => "int16",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Text => "text",
            ValueKind::Bytes => "bytes",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::Timestamp => "timestamp",
            ValueKind::TimestampTz => "timestamptz",
            ValueKind::Uuid => "uuid",
            ValueKind::Json => "json",
            ValueKind::Array => "array",
        };
        f.write_str(name)
    }
}

impl SqlValue {
    pub fn bytes(value: impl Into<Bytes>) -> Self {
        SqlValue::Bytes(value.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            SqlValue::Null => ValueKind::Null,
            SqlValue::Bool(_) => ValueKind::Bool,
            SqlValue::Int16(_) => ValueKind::Int16,
            SqlValue::Int32(_) => ValueKind::Int32,
            SqlValue::Int64(_) => ValueKind::Int64,
            SqlValue::Float32(_) => ValueKind::Float32,
            SqlValue::Float64(_) => ValueKind::Float64,
            SqlValue::Text(_) => ValueKind::Text,
            SqlValue::Bytes(_) => ValueKind::Bytes,
            SqlValue::Date(_) => ValueKind::Date,
            SqlValue::Time(_) => ValueKind::Time,
            SqlValue::Timestamp(_) => ValueKind::Timestamp,
            SqlValue::TimestampTz(_) => ValueKind::TimestampTz,
            SqlValue::Uuid(_) => ValueKind::Uuid,
            SqlValue::Json(_) => ValueKind::Json,
            SqlValue::Array(_) => ValueKind::Array,
        }
    }

    /// `NULL` is always rendered inline, even when preparing a statement.
    pub fn is_preparable(&self) -> bool {
        !matches!(self, SqlValue::Null)
    }

    /// The literal SQL text for this value.
    pub fn literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(value) => value.to_string(),
            SqlValue::Int16(value) => value.to_string(),
            SqlValue::Int32(value) => value.to_string(),
            SqlValue::Int64(value) => value.to_string(),
            SqlValue::Float32(value) => float_literal(*value),
            SqlValue::Float64(value) => float_literal(*value),
            SqlValue::Text(value) => quote_string(value),
            SqlValue::Bytes(value) => {
                array_literal(value.iter().map(|byte| byte.to_string()))
            }
            SqlValue::Date(value) => quote_string(&value.format("%Y-%m-%d").to_string()),
            SqlValue::Time(value) => quote_string(&value.format("%H:%M:%S%.f").to_string()),
            SqlValue::Timestamp(value) => {
                quote_string(&value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            SqlValue::TimestampTz(value) => quote_string(&value.to_rfc3339()),
            SqlValue::Uuid(value) => quote_string(&value.hyphenated().to_string()),
            SqlValue::Json(value) => quote_string(&value.to_string()),
            SqlValue::Array(values) => array_literal(values.iter().map(SqlValue::literal)),
        }
    }

    /// Convert a value whose type is only known at runtime. Unlike the `From` implementations,
    /// which are checked at compile time, this rejects unknown types with
    /// [`BuilderError::UnsupportedConstantType`] naming the offending type.
    pub fn try_from_any<T: Any>(value: T) -> Result<SqlValue, BuilderError> {
        let any = &value as &dyn Any;

        macro_rules! downcast_into {
            ($($ty:ty),* $(,)?) => {
                $(
                    if let Some(value) = any.downcast_ref::<$ty>() {
                        return Ok(value.clone().into());
                    }
                )*
            };
        }

        downcast_into!(
            SqlValue,
            bool,
            i16,
            i32,
            i64,
            f32,
            f64,
            String,
            &'static str,
            Bytes,
            NaiveDate,
            NaiveTime,
            NaiveDateTime,
            DateTime<Utc>,
            Uuid,
            serde_json::Value,
        );

        Err(BuilderError::UnsupportedConstantType(
            std::any::type_name::<T>(),
        ))
    }
}

/// Wrap in single quotes, doubling any embedded single quote.
pub(crate) fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push('\'');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

fn array_literal(elems: impl Iterator<Item = String>) -> String {
    format!("ARRAY[{}]", elems.collect::<Vec<_>>().join(", "))
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    SqlValue::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    bool => Bool,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => Text,
    Bytes => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
    serde_json::Value => Json,
);

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => SqlValue::Null,
        }
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(values: Vec<T>) -> Self {
        SqlValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Postgres spells non-finite floats as quoted strings
fn float_literal<F: Into<f64> + Copy + ToString>(value: F) -> String {
    let wide: f64 = value.into();
    if wide.is_nan() {
        "'NaN'".to_string()
    } else if wide == f64::INFINITY {
        "'Infinity'".to_string()
    } else if wide == f64::NEG_INFINITY {
        "'-Infinity'".to_string()
    } else {
        value.to_string()
    }
}
