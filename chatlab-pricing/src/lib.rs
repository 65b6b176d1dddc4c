//! Model pricing table and cost estimation
//!
//! The table maps model-id prefixes to per-token prices and is loaded once
//! at startup from a JSON file:
//!
//! ```json
//! {
//!     "anthropic.claude-3-haiku": { "input": 0.00000025, "output": 0.00000125 },
//!     "anthropic.claude-3-sonnet": { "input": 0.000003, "output": 0.000015 }
//! }
//! ```
//!
//! Pricing never affects control flow: a missing file surfaces as a
//! configuration error at load time, and a model with no matching entry
//! simply has no cost estimate.

#![warn(missing_docs)]
#![deny(unsafe_code)]

use chatlab_core::{Error, Result, UsageRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Per-token prices for one model family, in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per input token
    pub input: f64,
    /// Price per output token
    pub output: f64,
}

/// An estimated cost for one call, in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    /// Cost attributed to input tokens
    pub input_cost: f64,
    /// Cost attributed to output tokens
    pub output_cost: f64,
}

impl CostEstimate {
    /// Total estimated cost
    pub fn total(&self) -> f64 {
        self.input_cost + self.output_cost
    }
}

/// Immutable mapping from model-id prefix to per-token prices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable {
    entries: HashMap<String, ModelPricing>,
}

impl PricingTable {
    /// Load the table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("failed to read pricing file {:?}: {}", path, e))
        })?;
        let table = Self::from_json(&contents)?;
        debug!(entries = table.entries.len(), ?path, "loaded pricing table");
        Ok(table)
    }

    /// Parse the table from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid pricing file: {}", e)))
    }

    /// Build a table from in-memory entries
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ModelPricing)>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry whose key is a prefix of `model_id`
    ///
    /// When several keys match, the longest prefix wins, so the result is
    /// independent of map iteration order.
    pub fn lookup(&self, model_id: &str) -> Option<(&str, &ModelPricing)> {
        self.entries
            .iter()
            .filter(|(prefix, _)| model_id.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, pricing)| (prefix.as_str(), pricing))
    }

    /// Estimate the cost of a call, if the model has a pricing entry
    ///
    /// A pure function of the table, the model id, and the usage counts.
    pub fn estimate(&self, model_id: &str, usage: &UsageRecord) -> Option<CostEstimate> {
        let (_, pricing) = self.lookup(model_id)?;
        Some(CostEstimate {
            input_cost: f64::from(usage.input_tokens) * pricing.input,
            output_cost: f64::from(usage.output_tokens) * pricing.output,
        })
    }
}
