// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod dataset;
pub mod progress;
pub mod proto;
pub mod scenario;
pub mod writer;
