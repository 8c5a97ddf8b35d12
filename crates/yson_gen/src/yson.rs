//! YSON text encoding for generated values and schemas.
//!
//! The writer walks the value tree and emits punctuation only at structural
//! boundaries. String payloads are always quoted and escaped, so a payload
//! such as `"a; b = %true"` can never be mistaken for structure.
//!
//! ```text
//! {"id" = 42; "tags" = ["x"; "y"]; "opt" = #; "flag" = %false}
//! ```

use crate::schema::{Column, ColumnKind, Schema};
use crate::types::TypeDescriptor;
use crate::value::{Row, Value};
use std::fmt::{self, Write};

pub const ENTITY: &str = "#";
pub const TRUE_LITERAL: &str = "%true";
pub const FALSE_LITERAL: &str = "%false";
pub const ITEM_SEPARATOR: &str = "; ";
pub const KEY_VALUE_SEPARATOR: &str = " = ";

/// Attribute name the table format reads the schema from
pub const SCHEMA_ATTRIBUTE: &str = "schema";

/// Structural YSON text writer over any `fmt::Write` sink.
pub struct YsonWriter<W: Write> {
    out: W,
}

impl<W: Write> YsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_value(&mut self, value: &Value) -> fmt::Result {
        match value {
            Value::Null => self.out.write_str(ENTITY),
            Value::Bool(true) => self.out.write_str(TRUE_LITERAL),
            Value::Bool(false) => self.out.write_str(FALSE_LITERAL),
            Value::Int(n) => write!(self.out, "{}", n),
            Value::Uint(n) => write!(self.out, "{}", n),
            Value::Float(f) => self.write_float(*f),
            Value::Str(s) => self.write_string(s),
            Value::List(items) => self.write_list(items.iter(), |w, item| w.write_value(item)),
            Value::Map(entries) => self.write_map(entries),
            Value::Tagged(tag, inner) => {
                self.out.write_char('[')?;
                write!(self.out, "{}", tag)?;
                self.out.write_str(ITEM_SEPARATOR)?;
                self.write_value(inner)?;
                self.out.write_char(']')
            }
            Value::Pairs(pairs) => self.write_list(pairs.iter(), |w, (k, v)| {
                w.out.write_char('[')?;
                w.write_value(k)?;
                w.out.write_str(ITEM_SEPARATOR)?;
                w.write_value(v)?;
                w.out.write_char(']')
            }),
        }
    }

    /// A row is a map keyed by column name
    pub fn write_row(&mut self, row: &Row) -> fmt::Result {
        self.write_map(&row.cells)
    }

    /// Rows joined by the item separator, without the enclosing brackets.
    pub fn write_row_fragment<'r>(
        &mut self,
        rows: impl IntoIterator<Item = &'r Row>,
    ) -> fmt::Result {
        for (i, row) in rows.into_iter().enumerate() {
            if i > 0 {
                self.out.write_str(ITEM_SEPARATOR)?;
            }
            self.write_row(row)?;
        }
        Ok(())
    }

    fn write_map(&mut self, entries: &[(String, Value)]) -> fmt::Result {
        self.out.write_char('{')?;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.out.write_str(ITEM_SEPARATOR)?;
            }
            self.write_string(key)?;
            self.out.write_str(KEY_VALUE_SEPARATOR)?;
            self.write_value(value)?;
        }
        self.out.write_char('}')
    }

    fn write_list<T>(
        &mut self,
        items: impl Iterator<Item = T>,
        mut write_item: impl FnMut(&mut Self, T) -> fmt::Result,
    ) -> fmt::Result {
        self.out.write_char('[')?;
        for (i, item) in items.enumerate() {
            if i > 0 {
                self.out.write_str(ITEM_SEPARATOR)?;
            }
            write_item(self, item)?;
        }
        self.out.write_char(']')
    }

    fn write_float(&mut self, f: f64) -> fmt::Result {
        if f.is_nan() {
            self.out.write_str("%nan")
        } else if f.is_infinite() {
            self.out
                .write_str(if f > 0.0 { "%inf" } else { "%-inf" })
        } else {
            // Debug keeps a '.' or an exponent, so the token stays a double
            write!(self.out, "{:?}", f)
        }
    }

    fn write_string(&mut self, s: &str) -> fmt::Result {
        self.out.write_char('"')?;
        for c in s.chars() {
            match c {
                '"' => self.out.write_str("\\\"")?,
                '\\' => self.out.write_str("\\\\")?,
                '\n' => self.out.write_str("\\n")?,
                '\r' => self.out.write_str("\\r")?,
                '\t' => self.out.write_str("\\t")?,
                c if c.is_ascii_control() => write!(self.out, "\\x{:02X}", c as u32)?,
                c => self.out.write_char(c)?,
            }
        }
        self.out.write_char('"')
    }
}

/// Encode one value tree
pub fn to_string(value: &Value) -> String {
    let mut writer = YsonWriter::new(String::new());
    // Writing into a String cannot fail
    let _ = writer.write_value(value);
    writer.into_inner()
}

/// Encode one row as a map
pub fn row_to_string(row: &Row) -> String {
    let mut writer = YsonWriter::new(String::new());
    let _ = writer.write_row(row);
    writer.into_inner()
}

/// Encode rows as a bare top-level list fragment: `{...}; {...}`
pub fn rows_to_string(rows: &[Row]) -> String {
    let mut writer = YsonWriter::new(String::new());
    let _ = writer.write_row_fragment(rows);
    writer.into_inner()
}

/// The schema as a list of column descriptor maps.
pub fn schema_value(schema: &Schema) -> Value {
    Value::List(schema.columns().iter().map(column_value).collect())
}

fn column_value(column: &Column) -> Value {
    let kind = match &column.kind {
        ColumnKind::Scalar(ty) => ("type", Value::str(ty.name())),
        ColumnKind::Composite(desc) => ("type_v3", type_v3_value(desc)),
    };
    Value::map([
        ("name", Value::str(column.name.as_str())),
        kind,
        ("required", Value::Bool(column.required)),
    ])
}

fn type_v3_value(desc: &TypeDescriptor) -> Value {
    let type_name = ("type_name", Value::str(desc.type_name()));
    let elements = |elements: &[crate::types::ScalarType]| {
        Value::List(
            elements
                .iter()
                .map(|ty| Value::map([("type", Value::str(ty.name()))]))
                .collect(),
        )
    };

    match desc {
        TypeDescriptor::Optional { item } | TypeDescriptor::List { item } => {
            Value::map([type_name, ("item", Value::str(item.name()))])
        }
        TypeDescriptor::Struct { members } => Value::map([
            type_name,
            (
                "members",
                Value::List(
                    members
                        .iter()
                        .map(|m| {
                            Value::map([
                                ("name", Value::str(m.name.as_str())),
                                ("type", Value::str(m.ty.name())),
                            ])
                        })
                        .collect(),
                ),
            ),
        ]),
        TypeDescriptor::Tuple { elements: elems } | TypeDescriptor::Variant { elements: elems } => {
            Value::map([type_name, ("elements", elements(elems))])
        }
        TypeDescriptor::Dict { key, value } => Value::map([
            type_name,
            ("key", Value::str(key.name())),
            ("value", Value::str(value.name())),
        ]),
    }
}

/// Schema wrapped in the attribute header: `<schema = [...]>`
pub fn encode_schema(schema: &Schema) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(SCHEMA_ATTRIBUTE);
    out.push_str(KEY_VALUE_SEPARATOR);
    out.push_str(&to_string(&schema_value(schema)));
    out.push('>');
    out
}
