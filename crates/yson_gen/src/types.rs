//! The closed set of YT scalar types and the composite `type_v3` descriptors
//! built on top of them.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Scalar column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    Boolean,
    String,
    /// Same domain as `String`; kept distinct so schemas keep their spelling
    Utf8,
}

impl ScalarType {
    pub const ALL: [ScalarType; 13] = [
        ScalarType::Int8,
        ScalarType::Int16,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::Uint8,
        ScalarType::Uint16,
        ScalarType::Uint32,
        ScalarType::Uint64,
        ScalarType::Float,
        ScalarType::Double,
        ScalarType::Boolean,
        ScalarType::String,
        ScalarType::Utf8,
    ];

    /// Integer and floating point types
    pub const NUMERIC: [ScalarType; 10] = [
        ScalarType::Int8,
        ScalarType::Int16,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::Uint8,
        ScalarType::Uint16,
        ScalarType::Uint32,
        ScalarType::Uint64,
        ScalarType::Float,
        ScalarType::Double,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Int8 => "int8",
            ScalarType::Int16 => "int16",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint8 => "uint8",
            ScalarType::Uint16 => "uint16",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Boolean => "boolean",
            ScalarType::String => "string",
            ScalarType::Utf8 => "utf8",
        }
    }

    /// Bit width for integer types, `None` otherwise.
    pub fn int_width(&self) -> Option<u32> {
        match self {
            ScalarType::Int8 | ScalarType::Uint8 => Some(8),
            ScalarType::Int16 | ScalarType::Uint16 => Some(16),
            ScalarType::Int32 | ScalarType::Uint32 => Some(32),
            ScalarType::Int64 | ScalarType::Uint64 => Some(64),
            _ => None,
        }
    }

    pub fn is_signed_int(&self) -> bool {
        matches!(
            self,
            ScalarType::Int8 | ScalarType::Int16 | ScalarType::Int32 | ScalarType::Int64
        )
    }

    pub fn is_unsigned_int(&self) -> bool {
        matches!(
            self,
            ScalarType::Uint8 | ScalarType::Uint16 | ScalarType::Uint32 | ScalarType::Uint64
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ScalarType::String | ScalarType::Utf8)
    }
}

impl FromStr for ScalarType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Composite (`type_v3`) column descriptor over scalar leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Optional { item: ScalarType },
    List { item: ScalarType },
    Struct { members: Vec<StructMember> },
    Tuple { elements: Vec<ScalarType> },
    /// Must not be empty; see [`TypeDescriptor::validate`]
    Variant { elements: Vec<ScalarType> },
    Dict { key: ScalarType, value: ScalarType },
}

impl TypeDescriptor {
    /// The `type_name` tag used in schema descriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Optional { .. } => "optional",
            TypeDescriptor::List { .. } => "list",
            TypeDescriptor::Struct { .. } => "struct",
            TypeDescriptor::Tuple { .. } => "tuple",
            TypeDescriptor::Variant { .. } => "variant",
            TypeDescriptor::Dict { .. } => "dict",
        }
    }

    /// Shape checks the enum itself cannot express: a variant needs at
    /// least one alternative to draw a tag from.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            TypeDescriptor::Variant { elements } if elements.is_empty() => Err(
                Error::MalformedSchema("variant must have at least one element".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub ty: ScalarType,
}

impl StructMember {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
