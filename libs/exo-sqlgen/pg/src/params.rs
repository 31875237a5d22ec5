// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Debug;

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use exo_sqlgen::{BindError, BindErrorReason, BindTarget, SqlValue, bind_parameters};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use uuid::Uuid;

use crate::array::to_pg_array;

pub type PgParam = Box<dyn ToSql + Sync + Send>;

/// An untyped SQL `NULL` (accepted for a parameter of any type)
#[derive(Debug)]
struct Null;

impl ToSql for Null {
    fn to_sql(
        &self,
        _ty: &Type,
        _out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        Ok(IsNull::Yes)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Parameters ready to be passed to `tokio_postgres` (in placeholder order)
#[derive(Default)]
pub struct PgParams {
    params: Vec<PgParam>,
}

impl PgParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            params: Vec::with_capacity(capacity),
        }
    }

    pub fn from_values(values: &[SqlValue]) -> Result<Self, BindError> {
        let mut params = Self::with_capacity(values.len());
        bind_parameters(values, &mut params)?;
        Ok(params)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The shape `tokio_postgres::Client::query` and friends expect
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_inner(self) -> Vec<PgParam> {
        self.params
    }

    fn push(&mut self, param: impl ToSql + Sync + Send + 'static) {
        self.params.push(Box::new(param));
    }
}

impl Debug for PgParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.params.iter()).finish()
    }
}

impl BindTarget for PgParams {
    fn bind_null(&mut self, _index: usize) -> Result<(), BindErrorReason> {
        self.push(Null);
        Ok(())
    }

    fn bind_bool(&mut self, _index: usize, value: bool) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_i16(&mut self, _index: usize, value: i16) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_i32(&mut self, _index: usize, value: i32) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_i64(&mut self, _index: usize, value: i64) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_f32(&mut self, _index: usize, value: f32) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_f64(&mut self, _index: usize, value: f64) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_text(&mut self, _index: usize, value: &str) -> Result<(), BindErrorReason> {
        self.push(value.to_string());
        Ok(())
    }

    fn bind_bytes(&mut self, _index: usize, value: &Bytes) -> Result<(), BindErrorReason> {
        self.push(value.to_vec());
        Ok(())
    }

    fn bind_date(&mut self, _index: usize, value: NaiveDate) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_time(&mut self, _index: usize, value: NaiveTime) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_timestamp(
        &mut self,
        _index: usize,
        value: NaiveDateTime,
    ) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_timestamp_tz(
        &mut self,
        _index: usize,
        value: DateTime<Utc>,
    ) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_uuid(&mut self, _index: usize, value: Uuid) -> Result<(), BindErrorReason> {
        self.push(value);
        Ok(())
    }

    fn bind_json(
        &mut self,
        _index: usize,
        value: &serde_json::Value,
    ) -> Result<(), BindErrorReason> {
        self.push(value.clone());
        Ok(())
    }

    fn bind_array(&mut self, index: usize, elements: &[SqlValue]) -> Result<(), BindErrorReason> {
        let array = to_pg_array(elements)?;
        tracing::trace!(index, dimensions = array.dimensions().len(), "Binding array");
        self.push(array);
        Ok(())
    }
}
