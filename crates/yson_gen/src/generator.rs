//! Row generator that walks a schema and produces value trees.
//!
//! Each row visits the columns in schema order. A non-required column is
//! first passed through a null gate; otherwise the column kind decides how
//! the value is built, with [`ValueGenerator`] drawing every scalar leaf.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::scalar::ValueGenerator;
use crate::schema::{Column, ColumnKind, Schema};
use crate::types::{ScalarType, TypeDescriptor};
use crate::value::{Row, Value};
use rand::Rng;

/// Generates rows for one schema.
///
/// The generator holds no random state of its own: callers pass the rng for
/// every call, so the same seeded rng and schema reproduce the same rows.
#[derive(Debug, Clone, Copy)]
pub struct RecordGenerator<'a> {
    schema: &'a Schema,
    config: &'a GeneratorConfig,
    values: ValueGenerator<'a>,
}

impl<'a> RecordGenerator<'a> {
    /// Fails with `MalformedSchema` or `InvalidConfig` when a draw could
    /// not be made (empty variant, zero length bound, probability outside
    /// `[0, 1]`). Generation itself cannot fail afterwards.
    pub fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> Result<Self> {
        schema.validate()?;
        let values = ValueGenerator::new(config)?;
        Ok(Self {
            schema,
            config,
            values,
        })
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Generate `row_count` rows eagerly.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, row_count: usize) -> Vec<Row> {
        tracing::debug!(
            rows = row_count,
            columns = self.schema.len(),
            "generating rows"
        );
        self.rows(rng, row_count).collect()
    }

    /// Lazily generate `row_count` rows, one per `next()`.
    pub fn rows<'r, R: Rng + ?Sized>(&'r self, rng: &'r mut R, row_count: usize) -> Rows<'r, R> {
        Rows {
            generator: self,
            rng,
            remaining: row_count,
        }
    }

    pub fn generate_row<R: Rng + ?Sized>(&self, rng: &mut R) -> Row {
        let mut row = Row::with_capacity(self.schema.len());
        for column in self.schema.columns() {
            let value = self.column_value(rng, column);
            row.push(column.name.as_str(), value);
        }
        row
    }

    fn column_value<R: Rng + ?Sized>(&self, rng: &mut R, column: &Column) -> Value {
        if !column.required && self.null_draw(rng) {
            return Value::Null;
        }

        match &column.kind {
            ColumnKind::Scalar(ty) => self.scalar(rng, *ty),
            ColumnKind::Composite(desc) => self.composite(rng, desc),
        }
    }

    fn composite<R: Rng + ?Sized>(&self, rng: &mut R, desc: &TypeDescriptor) -> Value {
        match desc {
            // Second, independent gate on top of the column-level one
            TypeDescriptor::Optional { item } => {
                if self.null_draw(rng) {
                    Value::Null
                } else {
                    self.scalar(rng, *item)
                }
            }
            TypeDescriptor::List { item } => {
                let len = self.collection_len(rng);
                Value::List((0..len).map(|_| self.scalar(rng, *item)).collect())
            }
            TypeDescriptor::Struct { members } => Value::Map(
                members
                    .iter()
                    .map(|member| (member.name.clone(), self.scalar(rng, member.ty)))
                    .collect(),
            ),
            TypeDescriptor::Tuple { elements } => {
                Value::List(elements.iter().map(|ty| self.scalar(rng, *ty)).collect())
            }
            TypeDescriptor::Variant { elements } => {
                let tag = rng.random_range(0..elements.len());
                Value::Tagged(tag, Box::new(self.scalar(rng, elements[tag])))
            }
            TypeDescriptor::Dict { key, value } => {
                let len = self.collection_len(rng);
                Value::Pairs(
                    (0..len)
                        .map(|_| {
                            let k = self.scalar(rng, *key);
                            let v = self.scalar(rng, *value);
                            (k, v)
                        })
                        .collect(),
                )
            }
        }
    }

    fn scalar<R: Rng + ?Sized>(&self, rng: &mut R, ty: ScalarType) -> Value {
        self.values.generate(rng, ty)
    }

    fn null_draw<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random_bool(self.config.null_probability)
    }

    fn collection_len<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(1..=self.config.max_collection_len)
    }
}

/// Iterator returned by [`RecordGenerator::rows`].
pub struct Rows<'r, R: ?Sized> {
    generator: &'r RecordGenerator<'r>,
    rng: &'r mut R,
    remaining: usize,
}

impl<R: Rng + ?Sized> Iterator for Rows<'_, R> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.generate_row(&mut *self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng + ?Sized> ExactSizeIterator for Rows<'_, R> {}
