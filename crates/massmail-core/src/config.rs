use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed window mapping embeddings onto the canvas in ORIGINAL mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub viewport_size: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            origin_x: -50.0,
            origin_y: -50.0,
            viewport_size: 100.0,
            canvas_width: 600.0,
            canvas_height: 400.0,
        }
    }
}

impl ViewConfig {
    /// Uniform scale factor applied to both axes.
    pub fn scale(&self) -> f64 {
        self.canvas_width / self.viewport_size
    }
}

/// Shelf packing parameters for EXPLODED mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplodedConfig {
    pub row_width_limit: f64,
    pub horizontal_gap: f64,
    pub row_offset: f64,
}

impl Default for ExplodedConfig {
    fn default() -> Self {
        Self {
            row_width_limit: 2000.0,
            horizontal_gap: 30.0,
            row_offset: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HullConfig {
    pub padding: f64,
    pub label_offset: f64,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            label_offset: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub view: ViewConfig,
    pub exploded: ExplodedConfig,
    pub hull: HullConfig,
}

impl LayoutConfig {
    /// Defaults with `overrides` deep-merged on top.
    pub fn with_overrides(overrides: &ConfigLayer) -> Result<Self> {
        let mut base = ConfigLayer::from_value(serde_json::to_value(Self::default())?);
        base.deep_merge(overrides.as_value());
        let config: Self =
            serde_json::from_value(base.0).map_err(|err| Error::InvalidConfig {
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("view.viewportSize", self.view.viewport_size),
            ("view.canvasWidth", self.view.canvas_width),
            ("view.canvasHeight", self.view.canvas_height),
            ("exploded.rowWidthLimit", self.exploded.row_width_limit),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a positive number, got {v}"),
                });
            }
        }
        let non_negative = [
            ("exploded.horizontalGap", self.exploded.horizontal_gap),
            ("exploded.rowOffset", self.exploded.row_offset),
            ("hull.padding", self.hull.padding),
            ("hull.labelOffset", self.hull.label_offset),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be a non-negative number, got {v}"),
                });
            }
        }
        if !(self.view.origin_x.is_finite() && self.view.origin_y.is_finite()) {
            return Err(Error::InvalidConfig {
                message: "view origin must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Untyped configuration overrides, addressed by dotted camelCase paths
/// (`exploded.rowWidthLimit`).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayer(Value);

impl Default for ConfigLayer {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl ConfigLayer {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        cur.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            for (k, v) in incoming_map {
                match base_map.get_mut(k) {
                    Some(existing) => deep_merge_value(existing, v),
                    None => {
                        base_map.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (base_slot, incoming_value) => {
            *base_slot = incoming_value.clone();
        }
    }
}
