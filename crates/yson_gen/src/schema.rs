//! Table schema model and the on-disk schema description format.
//!
//! A [`Schema`] is an ordered list of typed [`Column`]s. Schemas are either
//! built in code with the builder methods or loaded from a description file:
//!
//! ```json
//! [
//!   {"name": "id", "type": "uint32", "required": true},
//!   {"name": "tags", "type_v3": {"type_name": "list", "item": "string"}, "required": true}
//! ]
//! ```
//!
//! Descriptions are parsed into the `*Description` serde types first, then
//! resolved into the closed type enums. Unknown scalar names fail with
//! [`Error::UnknownType`], wrong shapes with [`Error::MalformedSchema`].

use crate::error::{Error, Result};
use crate::types::{ScalarType, StructMember, TypeDescriptor};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a column holds: exactly one of a plain scalar or a composite type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Scalar(ScalarType),
    Composite(TypeDescriptor),
}

impl From<ScalarType> for ColumnKind {
    fn from(ty: ScalarType) -> Self {
        ColumnKind::Scalar(ty)
    }
}

impl From<TypeDescriptor> for ColumnKind {
    fn from(desc: TypeDescriptor) -> Self {
        ColumnKind::Composite(desc)
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub required: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: impl Into<ColumnKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ColumnKind::Composite(_))
    }
}

/// Ordered column list. Column names are not checked for uniqueness.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_composite_columns(&self) -> bool {
        self.columns.iter().any(Column::is_composite)
    }

    /// Check every composite descriptor. Schemas parsed from descriptions
    /// are already valid; builder-made schemas are checked when a
    /// [`RecordGenerator`](crate::RecordGenerator) is created.
    pub fn validate(&self) -> Result<()> {
        for column in &self.columns {
            if let ColumnKind::Composite(desc) = &column.kind {
                desc.validate().map_err(|e| match e {
                    Error::MalformedSchema(msg) => {
                        Error::MalformedSchema(format!("column '{}': {}", column.name, msg))
                    }
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    /// Parse a JSON schema description
    pub fn from_json_str(input: &str) -> Result<Self> {
        let descriptions: Vec<ColumnDescription> = serde_json::from_str(input)
            .map_err(|e| Error::MalformedSchema(e.to_string()))?;
        Self::from_descriptions(descriptions)
    }

    /// Parse a YAML schema description
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let descriptions: Vec<ColumnDescription> = serde_yaml_ng::from_str(input)
            .map_err(|e| Error::MalformedSchema(e.to_string()))?;
        Self::from_descriptions(descriptions)
    }

    pub fn from_descriptions(descriptions: Vec<ColumnDescription>) -> Result<Self> {
        let columns = descriptions
            .into_iter()
            .map(Column::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns })
    }

    pub fn to_descriptions(&self) -> Vec<ColumnDescription> {
        self.columns.iter().map(ColumnDescription::from).collect()
    }

    /// Serialize back into the JSON description format
    pub fn to_json_string(&self) -> String {
        // Description types only hold strings, bools and vecs
        serde_json::to_string_pretty(&self.to_descriptions()).unwrap_or_default()
    }
}

/// One column as written in a schema description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescription {
    pub name: String,
    /// Scalar type name; mutually exclusive with `type_v3`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Composite type; mutually exclusive with `type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_v3: Option<TypeV3Description>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type_name", rename_all = "lowercase")]
pub enum TypeV3Description {
    Optional { item: String },
    List { item: String },
    Struct { members: Vec<MemberDescription> },
    Tuple { elements: Vec<ElementDescription> },
    Variant { elements: Vec<ElementDescription> },
    Dict { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MemberDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementDescription {
    #[serde(rename = "type")]
    pub type_name: String,
}

/// JSON Schema of the description file format (a list of columns)
pub fn description_json_schema() -> schemars::Schema {
    schemars::schema_for!(Vec<ColumnDescription>)
}

impl TryFrom<ColumnDescription> for Column {
    type Error = Error;

    fn try_from(desc: ColumnDescription) -> Result<Self> {
        let kind = match (desc.type_name, desc.type_v3) {
            (Some(name), None) => ColumnKind::Scalar(name.parse()?),
            (None, Some(v3)) => ColumnKind::Composite(TypeDescriptor::try_from(v3).map_err(
                |e| match e {
                    Error::MalformedSchema(msg) => {
                        Error::MalformedSchema(format!("column '{}': {}", desc.name, msg))
                    }
                    other => other,
                },
            )?),
            (Some(_), Some(_)) => {
                return Err(Error::MalformedSchema(format!(
                    "column '{}' has both 'type' and 'type_v3'",
                    desc.name
                )))
            }
            (None, None) => {
                return Err(Error::MalformedSchema(format!(
                    "column '{}' has neither 'type' nor 'type_v3'",
                    desc.name
                )))
            }
        };

        Ok(Column {
            name: desc.name,
            kind,
            required: desc.required,
        })
    }
}

impl TryFrom<TypeV3Description> for TypeDescriptor {
    type Error = Error;

    fn try_from(desc: TypeV3Description) -> Result<Self> {
        let elements = |elements: Vec<ElementDescription>| {
            elements
                .into_iter()
                .map(|e| e.type_name.parse::<ScalarType>())
                .collect::<Result<Vec<_>>>()
        };

        let descriptor = match desc {
            TypeV3Description::Optional { item } => TypeDescriptor::Optional {
                item: item.parse()?,
            },
            TypeV3Description::List { item } => TypeDescriptor::List {
                item: item.parse()?,
            },
            TypeV3Description::Struct { members } => TypeDescriptor::Struct {
                members: members
                    .into_iter()
                    .map(|m| {
                        m.type_name
                            .parse::<ScalarType>()
                            .map(|ty| StructMember::new(m.name, ty))
                    })
                    .collect::<Result<Vec<_>>>()?,
            },
            TypeV3Description::Tuple { elements: elems } => TypeDescriptor::Tuple {
                elements: elements(elems)?,
            },
            TypeV3Description::Variant { elements: elems } => TypeDescriptor::Variant {
                elements: elements(elems)?,
            },
            TypeV3Description::Dict { key, value } => TypeDescriptor::Dict {
                key: key.parse()?,
                value: value.parse()?,
            },
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

impl From<&Column> for ColumnDescription {
    fn from(column: &Column) -> Self {
        let (type_name, type_v3) = match &column.kind {
            ColumnKind::Scalar(ty) => (Some(ty.name().to_string()), None),
            ColumnKind::Composite(desc) => (None, Some(TypeV3Description::from(desc))),
        };
        ColumnDescription {
            name: column.name.clone(),
            type_name,
            type_v3,
            required: column.required,
        }
    }
}

impl From<&TypeDescriptor> for TypeV3Description {
    fn from(desc: &TypeDescriptor) -> Self {
        let elements = |elements: &[ScalarType]| -> Vec<ElementDescription> {
            elements
                .iter()
                .map(|ty| ElementDescription {
                    type_name: ty.name().to_string(),
                })
                .collect()
        };

        match desc {
            TypeDescriptor::Optional { item } => TypeV3Description::Optional {
                item: item.name().to_string(),
            },
            TypeDescriptor::List { item } => TypeV3Description::List {
                item: item.name().to_string(),
            },
            TypeDescriptor::Struct { members } => TypeV3Description::Struct {
                members: members
                    .iter()
                    .map(|m| MemberDescription {
                        name: m.name.clone(),
                        type_name: m.ty.name().to_string(),
                    })
                    .collect(),
            },
            TypeDescriptor::Tuple { elements: elems } => TypeV3Description::Tuple {
                elements: elements(elems),
            },
            TypeDescriptor::Variant { elements: elems } => TypeV3Description::Variant {
                elements: elements(elems),
            },
            TypeDescriptor::Dict { key, value } => TypeV3Description::Dict {
                key: key.name().to_string(),
                value: value.name().to_string(),
            },
        }
    }
}
