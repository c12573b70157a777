//! # Script interpreter module
//!
//! This module provides an interpreter for timed scripts. A script is a list
//! of entries of the form
//!
//! ```text
//! 1.5: {"some": "json"};
//! ```
//!
//! where the number is the time in seconds after the start of the script at
//! which the JSON payload becomes active. The payload is deserialised into
//! the interpreter's item type.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An item which is scripted to occur at a specific time.
struct Entry<T> {
    /// The time the item becomes active at
    exec_time_s: f64,

    item: T,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending` to
/// acquire a list of items whose execution time has passed.
pub struct ScriptInterpreter<T> {
    entries: VecDeque<Entry<T>>,
    duration_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script timestamps must not decrease, found {0} s after {1} s")]
    NonMonotonicTimestamp(f64, f64),

    #[error("Script contains an invalid payload at {0} s: {1}")]
    InvalidPayload(f64, serde_json::Error),

    #[error("Could not build the script parser: {0}")]
    ParserError(regex::Error),
}

/// Items returned from a call to `get_pending`.
#[derive(Debug, PartialEq)]
pub enum Pending<T> {
    None,
    Some(Vec<T>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> ScriptInterpreter<T>
where
    T: DeserializeOwned,
{
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_string_lossy().into_owned(),
            ));
        }

        let script = fs::read_to_string(path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_script_str(&script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        let mut entries: VecDeque<Entry<T>> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::ParserError)?;

        for cap in re.captures_iter(script) {
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue,
            };

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = entries.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::NonMonotonicTimestamp(
                        exec_time_s,
                        prev.exec_time_s,
                    ));
                }
            }

            let item = serde_json::from_str(payload)
                .map_err(|e| ScriptError::InvalidPayload(exec_time_s, e))?;

            entries.push_back(Entry { exec_time_s, item });
        }

        let duration_s = match entries.back() {
            Some(e) => e.exec_time_s,
            None => return Err(ScriptError::ScriptEmpty),
        };

        Ok(ScriptInterpreter {
            entries,
            duration_s,
        })
    }

    /// Return the items whose execution time is at or before `current_time_s`.
    pub fn get_pending(&mut self, current_time_s: f64) -> Pending<T> {
        // If the queue is empty the script is over
        if self.entries.is_empty() {
            return Pending::EndOfScript;
        }

        let mut items: Vec<T> = vec![];

        while let Some(front) = self.entries.front() {
            if front.exec_time_s > current_time_s {
                break;
            }
            if let Some(entry) = self.entries.pop_front() {
                items.push(entry.item);
            }
        }

        if items.is_empty() {
            Pending::None
        } else {
            Pending::Some(items)
        }
    }

    /// Get the number of items still waiting in the script
    pub fn get_num_pending(&self) -> usize {
        self.entries.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        self.duration_s
    }
}
