//! # Diff Engine
//!
//! Field-by-field comparison of two event-detail records.
//!
//! Row order: every key of `a` in `a`'s field order, then the keys only `b`
//! has, in `b`'s field order. Each key appears exactly once.
//!
//! Equality is strict: a missing field differs from any present one, values of
//! different JSON types differ, numbers compare by numeric value, and nested
//! arrays and objects compare structurally. The identity field `"id"` is never
//! reported as differing.

use eventlens_core::Record;
use serde::Serialize;
use serde_json::Value;

/// Field that identifies a record and is expected to differ.
pub const IDENTITY_KEY: &str = "id";

/// One field of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffRow {
    /// Field name
    pub key: String,
    /// Value in the first record, if present
    pub value_a: Option<Value>,
    /// Value in the second record, if present
    pub value_b: Option<Value>,
    /// Whether the values differ
    pub differs: bool,
}

/// Compare two records.
pub fn diff(a: &Record, b: &Record) -> Vec<DiffRow> {
    let from_a = a.iter().map(|(key, value_a)| {
        let value_b = b.get(key);
        row(key, Some(value_a), value_b)
    });
    let only_b = b
        .iter()
        .filter(|(key, _)| !a.contains_key(key))
        .map(|(key, value_b)| row(key, None, Some(value_b)));

    from_a.chain(only_b).collect()
}

fn row(key: &str, value_a: Option<&Value>, value_b: Option<&Value>) -> DiffRow {
    let differs = key != IDENTITY_KEY
        && match (value_a, value_b) {
            (Some(x), Some(y)) => !values_equal(x, y),
            _ => true,
        };
    DiffRow {
        key: key.to_string(),
        value_a: value_a.cloned(),
        value_b: value_b.cloned(),
        differs,
    }
}

/// Strict equality over JSON values.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_f64() || y.is_f64() {
                x.as_f64() == y.as_f64()
            } else {
                x == y
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Counts over a set of diff rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// Number of rows
    pub total: usize,
    /// Rows whose values differ
    pub differing: usize,
}

impl DiffSummary {
    /// Summarize `rows`.
    pub fn of(rows: &[DiffRow]) -> Self {
        Self {
            total: rows.len(),
            differing: rows.iter().filter(|r| r.differs).count(),
        }
    }

    /// Rows whose values match.
    pub fn unchanged(&self) -> usize {
        self.total - self.differing
    }

    /// Whether the records agree on every compared field.
    pub fn is_identical(&self) -> bool {
        self.differing == 0
    }
}
