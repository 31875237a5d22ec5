// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{HashMap, hash_map::Entry};

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use exo_sqlgen::{BindErrorReason, SqlValue, ValueKind};
use postgres_array::{Array, Dimension};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use uuid::Uuid;

/// A scalar element of a Postgres array parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl ToSql for ArrayElement {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            ArrayElement::Null => Ok(IsNull::Yes),
            ArrayElement::Bool(value) => value.to_sql_checked(ty, out),
            ArrayElement::Int16(value) => value.to_sql_checked(ty, out),
            ArrayElement::Int32(value) => value.to_sql_checked(ty, out),
            ArrayElement::Int64(value) => value.to_sql_checked(ty, out),
            ArrayElement::Float32(value) => value.to_sql_checked(ty, out),
            ArrayElement::Float64(value) => value.to_sql_checked(ty, out),
            ArrayElement::Text(value) => value.to_sql_checked(ty, out),
            ArrayElement::Bytes(value) => value.to_sql_checked(ty, out),
            ArrayElement::Date(value) => value.to_sql_checked(ty, out),
            ArrayElement::Time(value) => value.to_sql_checked(ty, out),
            ArrayElement::Timestamp(value) => value.to_sql_checked(ty, out),
            ArrayElement::TimestampTz(value) => value.to_sql_checked(ty, out),
            ArrayElement::Uuid(value) => value.to_sql_checked(ty, out),
            ArrayElement::Json(value) => value.to_sql_checked(ty, out),
        }
    }

    // Each variant checks the actual type when encoding
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Accumulates the flattened elements and the length seen at each depth
#[derive(Default)]
struct Flattened {
    elements: Vec<ArrayElement>,
    dimensions: HashMap<usize, usize>,
    /// Depth at which scalars were found
    scalar_depth: Option<usize>,
    /// Kind of the non-null scalars
    kind: Option<ValueKind>,
}

/// Convert a (possibly nested) list of values into a Postgres array.
///
/// Postgres's multi-dimensional arrays are represented as a single array of elements in a
/// row-major order, so every nested list at the same depth must have the same length, scalars
/// must all be at the innermost depth, and all non-null scalars must be of the same kind.
pub fn to_pg_array(values: &[SqlValue]) -> Result<Array<ArrayElement>, BindErrorReason> {
    let mut flattened = Flattened::default();
    process_array(values, &mut flattened, 0)?;

    if flattened.elements.is_empty() && flattened.scalar_depth.is_none() {
        // No elements at any depth (`[]`, `[[], []]`)
        return Ok(Array::from_parts(Vec::new(), Vec::new()));
    }

    let mut dimension_lens = flattened.dimensions.into_iter().collect::<Vec<_>>();
    dimension_lens.sort_by_key(|(depth, _)| *depth);
    let dimensions = dimension_lens
        .into_iter()
        .map(|(depth, len)| {
            Ok(Dimension {
                len: i32::try_from(len).map_err(|_| {
                    BindErrorReason::ArrayConstruction(format!(
                        "Dimension {depth} is too long ({len} elements)"
                    ))
                })?,
                lower_bound: 1,
            })
        })
        .collect::<Result<Vec<_>, BindErrorReason>>()?;

    let expected = dimensions
        .iter()
        .map(|dimension| dimension.len as usize)
        .product::<usize>();
    if expected != flattened.elements.len() {
        return Err(BindErrorReason::ArrayConstruction(format!(
            "Array dimensions describe {expected} elements, found {}",
            flattened.elements.len()
        )));
    }

    Ok(Array::from_parts(flattened.elements, dimensions))
}

fn process_array(
    values: &[SqlValue],
    result: &mut Flattened,
    depth: usize,
) -> Result<(), BindErrorReason> {
    for value in values {
        match value {
            SqlValue::Array(nested) => {
                if result.scalar_depth.is_some_and(|scalar_depth| scalar_depth <= depth) {
                    return Err(BindErrorReason::ArrayConstruction(format!(
                        "Nested array found at dimension {depth} alongside scalar elements"
                    )));
                }
                process_array(nested, result, depth + 1)?;
            }
            scalar => {
                match result.scalar_depth {
                    Some(scalar_depth) if scalar_depth != depth => {
                        return Err(BindErrorReason::ArrayConstruction(format!(
                            "Scalar element found at dimension {depth}, expected dimension {scalar_depth}"
                        )));
                    }
                    _ => result.scalar_depth = Some(depth),
                }

                let kind = scalar.kind();
                if kind != ValueKind::Null {
                    match result.kind {
                        Some(expected) if expected != kind => {
                            return Err(BindErrorReason::ArrayConstruction(format!(
                                "Array elements must be of the same kind. Expected {expected}, got {kind}"
                            )));
                        }
                        _ => result.kind = Some(kind),
                    }
                }

                result.elements.push(to_element(scalar));
            }
        }
    }

    // The first visit at a depth sets its length; later visits must match it
    match result.dimensions.entry(depth) {
        Entry::Vacant(entry) => {
            entry.insert(values.len());
        }
        Entry::Occupied(entry) => {
            if *entry.get() != values.len() {
                return Err(BindErrorReason::ArrayConstruction(format!(
                    "Array dimensions do not match in dimension {}. Expected {}, got {}",
                    depth,
                    *entry.get(),
                    values.len()
                )));
            }
        }
    }

    Ok(())
}

fn to_element(value: &SqlValue) -> ArrayElement {
    match value {
        SqlValue::Null | SqlValue::Array(_) => ArrayElement::Null,
        SqlValue::Bool(value) => ArrayElement::Bool(*value),
        SqlValue::Int16(value) => ArrayElement::Int16(*value),
        SqlValue::Int32(value) => ArrayElement::Int32(*value),
        SqlValue::Int64(value) => ArrayElement::Int64(*value),
        SqlValue::Float32(value) => ArrayElement::Float32(*value),
        SqlValue::Float64(value) => ArrayElement::Float64(*value),
        SqlValue::Text(value) => ArrayElement::Text(value.clone()),
        SqlValue::Bytes(value) => ArrayElement::Bytes(value.to_vec()),
        SqlValue::Date(value) => ArrayElement::Date(*value),
        SqlValue::Time(value) => ArrayElement::Time(*value),
        SqlValue::Timestamp(value) => ArrayElement::Timestamp(*value),
        SqlValue::TimestampTz(value) => ArrayElement::TimestampTz(*value),
        SqlValue::Uuid(value) => ArrayElement::Uuid(*value),
        SqlValue::Json(value) => ArrayElement::Json(value.clone()),
    }
}
