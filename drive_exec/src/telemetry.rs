//! # Telemetry
//!
//! Fire-and-forget publishing of named numeric values. Nothing in the control path reads
//! telemetry back.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

pub trait Telemetry {
    /// Publish the latest value of `key`.
    fn put_number(&mut self, key: &str, value: f64);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Telemetry sink keeping the latest value of every key, and tracing every value it is given.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MapTelemetry {
    values: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MapTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Telemetry for MapTelemetry {
    fn put_number(&mut self, key: &str, value: f64) {
        trace!("{} = {}", key, value);
        self.values.insert(key.to_string(), value);
    }
}
