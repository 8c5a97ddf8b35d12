//! Schema-driven random row generator and YSON text encoder for YT table
//! format benchmarks.
//!
//! Generates deterministic, type-correct rows for a column schema, including
//! composite (`type_v3`) columns, and encodes rows and schemas as YSON text.
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use yson_gen::{yson, Column, GeneratorConfig, RecordGenerator, ScalarType, Schema};
//!
//! let schema = Schema::new()
//!     .column(Column::new("id", ScalarType::Uint32).required())
//!     .column(Column::new("data", ScalarType::String).required());
//!
//! // Same seed, same rows
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let config = GeneratorConfig::default();
//! let rows = RecordGenerator::new(&schema, &config)?.generate(&mut rng, 3);
//!
//! println!("{}", yson::rows_to_string(&rows));
//! println!("{}", yson::encode_schema(&schema));
//! # Ok::<(), yson_gen::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod scalar;
pub mod schema;
pub mod types;
pub mod value;
pub mod yson;

pub use config::{GeneratorConfig, UnsignedDomain};
pub use error::{Error, Result};
pub use generator::{RecordGenerator, Rows};
pub use scalar::ValueGenerator;
pub use schema::{Column, ColumnDescription, ColumnKind, Schema};
pub use types::{ScalarType, StructMember, TypeDescriptor};
pub use value::{Row, Value};
