//! Protobuf schema artifact.
//!
//! Renders one `message` per schema, one field per column, each annotated
//! with the YT column name extension. Scalars use a static wire-type table;
//! composite columns map onto repeated fields, maps and nested messages.

use std::fmt::Write;
use yson_gen::{Column, ColumnKind, ScalarType, Schema, TypeDescriptor};

pub const PROTO_HEADER: &str = "import \"yt/yt_proto/yt/formats/extension.proto\";\n";

const INDENT: &str = "    ";

/// Protobuf wire type for a scalar column type.
///
/// Narrow integers widen to the 32-bit wire types.
pub fn wire_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Uint64 => "uint64",
        ScalarType::Uint32 | ScalarType::Uint16 | ScalarType::Uint8 => "uint32",
        ScalarType::Int64 => "int64",
        ScalarType::Int32 | ScalarType::Int16 | ScalarType::Int8 => "int32",
        ScalarType::Double => "double",
        ScalarType::Float => "float",
        ScalarType::Boolean => "bool",
        ScalarType::String | ScalarType::Utf8 => "string",
    }
}

/// Protobuf map keys must be integral, bool or string
fn is_valid_map_key(ty: ScalarType) -> bool {
    !matches!(ty, ScalarType::Float | ScalarType::Double)
}

/// `struct` -> `TStructMessage`, `order_items` -> `TOrderItemsMessage`
pub fn nested_message_name(column_name: &str) -> String {
    let mut name = String::from("T");
    for part in column_name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name.push_str("Message");
    name
}

/// Render a `message` block for `schema`, preceded by a blank line.
pub fn render_message(schema: &Schema, message_name: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_message(&mut out, schema, message_name);
    out
}

/// Header followed by every message, in order.
pub fn render_file<'a>(messages: impl IntoIterator<Item = (&'a Schema, &'a str)>) -> String {
    let mut out = String::from(PROTO_HEADER);
    for (schema, name) in messages {
        out.push_str(&render_message(schema, name));
    }
    out
}

fn write_message(out: &mut String, schema: &Schema, message_name: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "message {} {{", message_name)?;

    if schema.has_composite_columns() {
        writeln!(out, "{INDENT}option (NYT.default_field_flags) = SERIALIZATION_YT;")?;
        writeln!(out, "{INDENT}option (NYT.default_field_flags) = MAP_AS_DICT;")?;
        writeln!(out)?;
    }

    for column in schema.columns() {
        if let ColumnKind::Composite(TypeDescriptor::Struct { members }) = &column.kind {
            writeln!(out, "{INDENT}message {} {{", nested_message_name(&column.name))?;
            for (i, member) in members.iter().enumerate() {
                write_field(
                    out,
                    &format!("{INDENT}{INDENT}required {}", wire_type(member.ty)),
                    &member.name,
                    i + 1,
                )?;
            }
            writeln!(out, "{INDENT}}}")?;
            writeln!(out)?;
        }
    }

    for (i, column) in schema.columns().iter().enumerate() {
        let declaration = format!("{INDENT}{}", field_declaration(column));
        write_field(out, &declaration, &column.name, i + 1)?;
    }

    writeln!(out, "}}")
}

fn write_field(out: &mut String, declaration: &str, name: &str, number: usize) -> std::fmt::Result {
    writeln!(
        out,
        "{} {} = {} [(NYT.column_name) = \"{}\"];",
        declaration, name, number, name
    )
}

/// Label and type of the field for `column`, without the field name.
fn field_declaration(column: &Column) -> String {
    let label = if column.required {
        "required"
    } else {
        "optional"
    };

    match &column.kind {
        ColumnKind::Scalar(ty) => format!("{} {}", label, wire_type(*ty)),
        ColumnKind::Composite(desc) => match desc {
            TypeDescriptor::Optional { item } => format!("optional {}", wire_type(*item)),
            TypeDescriptor::List { item } => format!("repeated {}", wire_type(*item)),
            TypeDescriptor::Struct { .. } => {
                format!("{} {}", label, nested_message_name(&column.name))
            }
            TypeDescriptor::Dict { key, value } if is_valid_map_key(*key) => {
                format!("map<{}, {}>", wire_type(*key), wire_type(*value))
            }
            TypeDescriptor::Dict { .. }
            | TypeDescriptor::Tuple { .. }
            | TypeDescriptor::Variant { .. } => format!("{} bytes", label),
        },
    }
}
