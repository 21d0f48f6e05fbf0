use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use fab_shared::money::{self, Cents};

/// A single flat business setting. Values come from the settings store as
/// loose JSON; numbers may arrive as strings from older admin screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// Read-only typed lookup over the flat key/value settings.
///
/// Every getter degrades to a zero-ish default on a missing or mistyped key
/// instead of failing the calling operation. Each such fallback increments a
/// counter so the degradation stays observable.
#[derive(Debug, Default)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
    fallbacks: AtomicU64,
}

impl Settings {
    pub fn new(values: HashMap<String, SettingValue>) -> Self {
        Self {
            values,
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Last write wins; no history is kept.
    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    /// Numeric setting, `0.0` when absent. Numeric strings are accepted.
    pub fn number(&self, key: &str) -> f64 {
        match self.values.get(key) {
            Some(SettingValue::Number(n)) => *n,
            Some(SettingValue::Text(s)) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => self.fallback(key, 0.0),
            },
            _ => self.fallback(key, 0.0),
        }
    }

    /// Monetary setting converted to cents, `0` when absent.
    pub fn money(&self, key: &str) -> Cents {
        money::from_decimal(self.number(key))
    }

    /// Text setting, empty string when absent.
    pub fn text(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(SettingValue::Text(s)) => s.clone(),
            _ => self.fallback(key, String::new()),
        }
    }

    /// List setting, empty when absent.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(SettingValue::List(items)) => items.clone(),
            _ => self.fallback(key, Vec::new()),
        }
    }

    /// Boolean setting, `false` when absent.
    pub fn flag(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(SettingValue::Flag(b)) => *b,
            _ => self.fallback(key, false),
        }
    }

    /// Number of lookups that fell back to a default since construction.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    fn fallback<T>(&self, key: &str, default: T) -> T {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Setting '{}' missing or mistyped, using default", key);
        default
    }
}
