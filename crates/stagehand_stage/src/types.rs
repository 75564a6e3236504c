use std::collections::BTreeMap;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// CustomProperties component
// ---------------------------------------------------------------------------

/// Free-form keyed gameplay metadata authored on a stage object.
#[derive(Component, Reflect, Default, Clone, Debug, PartialEq)]
#[reflect(Component, Default)]
pub struct CustomProperties {
    pub properties: BTreeMap<String, PropertyValue>,
}

impl CustomProperties {
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Copy every entry of `other` over this set, replacing existing keys.
    pub fn merge(&mut self, other: &CustomProperties) {
        for (key, value) in &other.properties {
            self.properties.insert(key.clone(), value.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyValue enum
// ---------------------------------------------------------------------------

#[derive(Reflect, Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Human-readable type label for display in UI and error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::String(_) => "String",
        }
    }

    /// Numeric view. Ints widen to floats; everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Integer view. Floats are not truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

// ---------------------------------------------------------------------------
// Keyframed animation component
// ---------------------------------------------------------------------------

/// Which transform property a channel drives.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelProperty {
    Location,
    RotationEuler,
}

/// A channel target: property plus editor-space axis index (0 = X, 1 = Y, 2 = Z).
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelTarget {
    pub property: ChannelProperty,
    pub axis: usize,
}

impl ChannelTarget {
    pub const fn location(axis: usize) -> Self {
        Self {
            property: ChannelProperty::Location,
            axis,
        }
    }

    pub const fn rotation(axis: usize) -> Self {
        Self {
            property: ChannelProperty::RotationEuler,
            axis,
        }
    }
}

#[derive(Reflect, Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub frame: f64,
    pub value: f64,
}

/// Linearly interpolated keyframe curve. Holds the end values outside its range.
#[derive(Reflect, Clone, Debug, Default, PartialEq)]
pub struct KeyframeCurve {
    /// Sorted by frame. Reflection can write this field directly, so
    /// consumers rebuild through `new` before sampling loaded data.
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.frame.total_cmp(&b.frame));
        Self { keys }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn sample(&self, frame: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if frame <= first.frame {
            return first.value;
        }
        if frame >= last.frame {
            return last.value;
        }
        let next = self.keys.partition_point(|k| k.frame <= frame);
        let (a, b) = (self.keys[next - 1], self.keys[next]);
        let span = b.frame - a.frame;
        if span <= 0.0 {
            return b.value;
        }
        a.value + (b.value - a.value) * ((frame - a.frame) / span)
    }
}

#[derive(Reflect, Clone, Debug, PartialEq)]
pub struct KeyframeChannel {
    pub target: ChannelTarget,
    pub curve: KeyframeCurve,
}

/// Transform animation authored on a stage object.
#[derive(Component, Reflect, Default, Clone, Debug, PartialEq)]
#[reflect(Component, Default)]
pub struct StageAnimation {
    pub channels: Vec<KeyframeChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_views_do_not_truncate() {
        assert_eq!(PropertyValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(PropertyValue::Float(3.0).as_i64(), None);
        assert_eq!(PropertyValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn curve_interpolates_and_holds() {
        let curve = KeyframeCurve::new(vec![
            Keyframe { frame: 10.0, value: 4.0 },
            Keyframe { frame: 0.0, value: 0.0 },
        ]);
        assert_eq!(curve.sample(-5.0), 0.0);
        assert_eq!(curve.sample(5.0), 2.0);
        assert_eq!(curve.sample(10.0), 4.0);
        assert_eq!(curve.sample(50.0), 4.0);
        assert_eq!(KeyframeCurve::default().sample(1.0), 0.0);
    }

    #[test]
    fn merge_overwrites() {
        let mut a = CustomProperties::default().with("k", 1_i64.into());
        let b = CustomProperties::default()
            .with("k", 2_i64.into())
            .with("j", true.into());
        a.merge(&b);
        assert_eq!(a, b);
    }
}
