//! JSON Schema generation for the schema description format and the
//! `--json` command outputs.
//!
//! Schemas are generated with schemars and exported via the `json-schema`
//! subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns every exported JSON Schema, keyed by name.
/// BTreeMap keeps the output order stable.
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // data command
    schemas.insert("data", schema_for!(crate::cmd::DataJsonOutput));

    // scenario command
    schemas.insert("scenario", schema_for!(crate::cmd::ScenarioJsonOutput));

    // input of data/schema/proto
    schemas.insert("schema-file", yson_gen::schema::description_json_schema());

    schemas
}

pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
