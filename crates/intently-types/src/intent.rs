//! Intent and intent-detail types.
//!
//! An `Intent` is one (topic, action) classification outcome, either a
//! candidate produced by an extractor or the decision produced by a reducer.
//! Its `details` bag carries auxiliary context such as the classifier
//! confidence and any place names detected in the utterance.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action carried by the sentinel "nothing recognised" intent.
pub const UNKNOWN_ACTION: &str = "none";

/// Detail key holding the classifier confidence.
pub const CONFIDENCE_KEY: &str = "confidence";

/// Detail key holding the detected place names.
pub const LOCATIONS_KEY: &str = "locations";

/// Auxiliary data attached to an intent.
///
/// The two keys every built-in extractor produces are typed fields; anything
/// else lands in the open `extra` map. A key lives in exactly one place, so
/// `contains_key` and [`IntentDetails::merge_missing`] treat typed and open
/// keys uniformly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentDetails {
    /// Classifier confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Title-cased place names detected anywhere in the utterance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    /// Any other detail keys supplied by custom extractors.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntentDetails {
    /// Details carrying only a confidence score.
    pub fn with_confidence(confidence: f64) -> Self {
        Self {
            confidence: Some(confidence),
            ..Self::default()
        }
    }

    /// True when no key is present at all.
    pub fn is_empty(&self) -> bool {
        self.confidence.is_none() && self.locations.is_none() && self.extra.is_empty()
    }

    /// Whether `key` is present, typed or open.
    pub fn contains_key(&self, key: &str) -> bool {
        match key {
            CONFIDENCE_KEY if self.confidence.is_some() => true,
            LOCATIONS_KEY if self.locations.is_some() => true,
            _ => self.extra.contains_key(key),
        }
    }

    /// Read a key as a JSON value, regardless of where it is stored.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            CONFIDENCE_KEY if self.confidence.is_some() => self.confidence.map(Value::from),
            LOCATIONS_KEY if self.locations.is_some() => {
                self.locations.as_ref().map(|l| Value::from(l.clone()))
            }
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Insert a key, routing `confidence`/`locations` to their typed fields
    /// when the value has the expected shape.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match key.as_str() {
            CONFIDENCE_KEY => {
                if let Some(number) = value.as_f64() {
                    self.extra.remove(CONFIDENCE_KEY);
                    self.confidence = Some(number);
                    return;
                }
                self.confidence = None;
            }
            LOCATIONS_KEY => {
                if let Ok(locations) = serde_json::from_value::<Vec<String>>(value.clone()) {
                    self.extra.remove(LOCATIONS_KEY);
                    self.locations = Some(locations);
                    return;
                }
                self.locations = None;
            }
            _ => {}
        }
        self.extra.insert(key, value);
    }

    /// Every key present, typed keys first.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.extra.len() + 2);
        if self.confidence.is_some() {
            keys.push(CONFIDENCE_KEY);
        }
        if self.locations.is_some() {
            keys.push(LOCATIONS_KEY);
        }
        keys.extend(self.extra.keys().map(String::as_str));
        keys
    }

    /// Copy every key of `other` that `self` does not already have.
    ///
    /// Existing keys are never overwritten.
    pub fn merge_missing(&mut self, other: &IntentDetails) {
        if !self.contains_key(CONFIDENCE_KEY) {
            if let Some(confidence) = other.confidence {
                self.confidence = Some(confidence);
            }
        }
        if !self.contains_key(LOCATIONS_KEY) {
            if let Some(locations) = &other.locations {
                self.locations = Some(locations.clone());
            }
        }
        for (key, value) in &other.extra {
            if !self.contains_key(key) {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A decided or candidate classification of user text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Option<String>,
    pub topic: Option<String>,
    #[serde(default)]
    pub details: IntentDetails,
}

impl Intent {
    /// Create a candidate intent for a topic/action pair.
    pub fn new(action: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            topic: Some(topic.into()),
            details: IntentDetails::default(),
        }
    }

    /// The blank intent: no action, no topic, no details.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The sentinel returned when no candidate survives reduction.
    pub fn unknown() -> Self {
        Self {
            action: Some(UNKNOWN_ACTION.to_string()),
            topic: None,
            details: IntentDetails::default(),
        }
    }

    /// Replace the details bag.
    pub fn with_details(mut self, details: IntentDetails) -> Self {
        self.details = details;
        self
    }

    /// True for an intent that carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.topic.is_none() && self.details.is_empty()
    }

    /// True for the "nothing recognised" sentinel.
    pub fn is_unknown(&self) -> bool {
        self.topic.is_none() && self.action.as_deref() == Some(UNKNOWN_ACTION)
    }

    /// Confidence recorded in the details, if any.
    pub fn confidence(&self) -> Option<f64> {
        self.details.confidence
    }
}
