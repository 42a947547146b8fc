//! Form state
//!
//! In-memory stand-in for the control page: the three color inputs, the
//! config inputs and the preview border color. Holds display-domain text
//! only; nothing here talks to the controller.

use std::collections::BTreeMap;

use crate::color::{self, DisplayColor};
use crate::store::RemoteConfig;

/// Input fields of the control page
#[derive(Debug, Clone, Default)]
pub struct Form {
    r: String,
    g: String,
    b: String,
    /// Config inputs keyed by setting name. Only these names are back-filled.
    config_fields: BTreeMap<String, String>,
    preview: String,
}

impl Form {
    /// Create a form with the given config inputs, all empty
    #[must_use]
    pub fn new<I, S>(config_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config_fields = config_fields
            .into_iter()
            .map(|name| (name.into(), String::new()))
            .collect();

        let mut form = Self {
            config_fields,
            ..Self::default()
        };
        form.refresh_preview();
        form
    }

    /// Overwrite the raw text of the color inputs
    pub fn set_color_fields(&mut self, r: &str, g: &str, b: &str) {
        r.clone_into(&mut self.r);
        g.clone_into(&mut self.g);
        b.clone_into(&mut self.b);
    }

    /// Raw text of the color inputs
    #[must_use]
    pub fn color_fields(&self) -> (&str, &str, &str) {
        (&self.r, &self.g, &self.b)
    }

    /// Parse the color inputs; non-numeric text reads as 0
    #[must_use]
    pub fn display_color(&self) -> DisplayColor {
        DisplayColor::from_fields(&self.r, &self.g, &self.b)
    }

    /// Write a display color into the color inputs
    pub fn set_display_color(&mut self, color: DisplayColor) {
        self.r = color.r.to_string();
        self.g = color.g.to_string();
        self.b = color.b.to_string();
    }

    /// Recompute the preview border color from the current inputs
    pub fn refresh_preview(&mut self) -> &str {
        self.preview = color::preview_css(self.display_color());
        &self.preview
    }

    /// Last computed preview border color
    #[must_use]
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Set a config input. Returns `false` if the form has no such field.
    pub fn set_config_field(&mut self, name: &str, value: &str) -> bool {
        match self.config_fields.get_mut(name) {
            Some(field) => {
                value.clone_into(field);
                true
            }
            None => false,
        }
    }

    /// Current config inputs
    #[must_use]
    pub fn config_values(&self) -> &BTreeMap<String, String> {
        &self.config_fields
    }

    /// Copy values from a fetched config into matching config inputs.
    ///
    /// Keys without a field are ignored; fields without a key keep their text.
    pub fn backfill(&mut self, config: &RemoteConfig) {
        for (key, value) in config.iter() {
            if let Some(field) = self.config_fields.get_mut(key) {
                *field = RemoteConfig::field_text(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_form_previews_black() {
        let form = Form::new(["clr_range"]);
        assert_eq!(form.preview(), "rgb(0,0,0)");
        assert_eq!(form.config_values().get("clr_range"), Some(&String::new()));
    }

    #[test]
    fn test_refresh_preview_uses_raw_fields() {
        let mut form = Form::new(Vec::<String>::new());
        form.set_color_fields("255", "", "x");
        assert_eq!(form.refresh_preview(), "rgb(255,0,0)");

        form.set_color_fields("300", "20", "30");
        assert_eq!(form.refresh_preview(), "rgb(0,20,30)");
    }

    #[test]
    fn test_set_config_field_unknown() {
        let mut form = Form::new(["raspberry_port"]);
        assert!(form.set_config_field("raspberry_port", "3546"));
        assert!(!form.set_config_field("nope", "1"));
        assert_eq!(form.config_values().len(), 1);
    }

    #[test]
    fn test_backfill_only_known_fields() {
        let mut form = Form::new(["raspberry_port", "clr_range", "raspberry_ip"]);
        form.set_config_field("raspberry_ip", "10.0.0.2");

        let config: RemoteConfig = serde_json::from_str(
            r#"{"raspberry_port": "3546", "clr_range": 1023, "unrelated": "x"}"#,
        )
        .unwrap();
        form.backfill(&config);

        let values = form.config_values();
        assert_eq!(values["raspberry_port"], "3546");
        assert_eq!(values["clr_range"], "1023");
        assert_eq!(values["raspberry_ip"], "10.0.0.2");
        assert!(!values.contains_key("unrelated"));
    }
}
