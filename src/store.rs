//! Remote configuration store
//!
//! Holds the last config snapshot fetched from the controller, including the
//! native color range used for every color write.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::ui::Form;

/// Color range assumed until the controller reports its own
pub const DEFAULT_CLR_RANGE: u32 = 255;

/// Key of the native color range setting
pub const CLR_RANGE_KEY: &str = "clr_range";

/// Snapshot of the controller's settings (setting name -> value)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteConfig(BTreeMap<String, Value>);

impl RemoteConfig {
    #[must_use]
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Native color range.
    ///
    /// The controller keeps its settings as text, so both `1023` and
    /// `"1023"` are accepted. Anything missing, non-numeric or not positive
    /// falls back to [`DEFAULT_CLR_RANGE`].
    #[must_use]
    pub fn clr_range(&self) -> u32 {
        let parsed = match self.0.get(CLR_RANGE_KEY) {
            None => return DEFAULT_CLR_RANGE,
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.trunc() as u64)),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(_) => None,
        };

        match parsed.filter(|v| *v > 0).and_then(|v| u32::try_from(v).ok()) {
            Some(range) => range,
            None => {
                warn!(
                    "Ignoring invalid {CLR_RANGE_KEY} {:?}, using {DEFAULT_CLR_RANGE}",
                    self.0.get(CLR_RANGE_KEY)
                );
                DEFAULT_CLR_RANGE
            }
        }
    }

    /// Text shown in a form field for a config value
    #[must_use]
    pub fn field_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Holder of the current [`RemoteConfig`].
///
/// Snapshots are swapped whole, so a reader never sees a half-applied fetch.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<RemoteConfig>>,
}

impl ConfigStore {
    /// Empty store; the color range is [`DEFAULT_CLR_RANGE`] until the first
    /// fetch lands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    #[must_use]
    pub fn get(&self) -> Arc<RemoteConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Color range of the current snapshot, read fresh on every call
    #[must_use]
    pub fn clr_range(&self) -> u32 {
        self.get().clr_range()
    }

    /// Discard the previous snapshot and install `config`, then back-fill
    /// the matching form fields.
    pub fn replace(&self, config: RemoteConfig, form: &mut Form) -> Arc<RemoteConfig> {
        let config = Arc::new(config);
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::clone(&config);
        }
        info!(
            "Controller config updated: {} settings, {} {}",
            config.len(),
            CLR_RANGE_KEY,
            config.clr_range()
        );

        form.backfill(&config);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DeviceColor, DisplayColor, to_device};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn config(value: Value) -> RemoteConfig {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case(json!({}), 255)]
    #[case(json!({"clr_range": 1023}), 1023)]
    #[case(json!({"clr_range": "20000"}), 20000)]
    #[case(json!({"clr_range": " 512 "}), 512)]
    #[case(json!({"clr_range": 99.9}), 99)]
    #[case(json!({"clr_range": 0}), 255)]
    #[case(json!({"clr_range": -4}), 255)]
    #[case(json!({"clr_range": "lots"}), 255)]
    #[case(json!({"clr_range": null}), 255)]
    #[case(json!({"clr_range": 99_999_999_999u64}), 255)]
    fn test_clr_range(#[case] value: Value, #[case] expected: u32) {
        assert_eq!(config(value).clr_range(), expected);
    }

    #[test]
    fn test_store_defaults_before_first_fetch() {
        let store = ConfigStore::new();
        assert_eq!(store.clr_range(), DEFAULT_CLR_RANGE);
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_replace_discards_previous_snapshot() {
        let store = ConfigStore::new();
        let mut form = Form::new(["raspberry_port"]);

        store.replace(config(json!({"clr_range": 1023, "raspberry_port": 3546})), &mut form);
        store.replace(config(json!({"raspberry_ip": "0.0.0.0"})), &mut form);

        let current = store.get();
        assert_eq!(current.len(), 1);
        assert!(current.get("raspberry_port").is_none());
        assert_eq!(store.clr_range(), DEFAULT_CLR_RANGE);
        // Back-fill is one-way and only for present keys
        assert_eq!(form.config_values()["raspberry_port"], "3546");
    }

    #[test]
    fn test_old_snapshot_stays_consistent_after_replace() {
        let store = ConfigStore::new();
        let mut form = Form::default();
        store.replace(config(json!({"clr_range": 1023})), &mut form);

        let held = store.get();
        store.replace(config(json!({"clr_range": 20000})), &mut form);

        assert_eq!(held.clr_range(), 1023);
        assert_eq!(store.clr_range(), 20000);
    }

    #[test]
    fn test_replace_range_drives_encoding() {
        let store = ConfigStore::new();
        let mut form = Form::default();
        store.replace(config(json!({"clr_range": 1023})), &mut form);

        let device = to_device(DisplayColor::new(255, 0, 0), store.get().clr_range());
        assert_eq!(device, DeviceColor { r: 1023, g: 0, b: 0 });
    }
}
