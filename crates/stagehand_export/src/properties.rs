//! Property schemas and the typed reader that lifts a `CustomProperties`
//! bag into descriptor snapshots.

use stagehand_stage::{CustomProperties, PropertyValue};

use crate::error::{SchemaViolation, ViolationKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Int or Float.
    Float,
    Int,
}

impl PropertyKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Int => "Int",
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        match self {
            Self::Float => value.as_f64().is_some(),
            Self::Int => value.as_i64().is_some(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    Float(f64),
    Int(i64),
}

impl DefaultValue {
    pub fn to_property(self) -> PropertyValue {
        match self {
            Self::Float(v) => PropertyValue::Float(v),
            Self::Int(v) => PropertyValue::Int(v),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Requirement {
    Required,
    Optional(DefaultValue),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub requirement: Requirement,
}

impl PropertySpec {
    pub const fn required(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            requirement: Requirement::Required,
        }
    }

    pub const fn float_or(name: &'static str, default: f64) -> Self {
        Self {
            name,
            kind: PropertyKind::Float,
            requirement: Requirement::Optional(DefaultValue::Float(default)),
        }
    }

    pub const fn int_or(name: &'static str, default: i64) -> Self {
        Self {
            name,
            kind: PropertyKind::Int,
            requirement: Requirement::Optional(DefaultValue::Int(default)),
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyReader
// ---------------------------------------------------------------------------

/// Schema-checked view over an object's properties.
///
/// Construction checks every schema entry in order, so the first violation
/// reported is deterministic. NaN and infinite floats are out of range. Getters then only fail for keys missing from the
/// schema, which is a descriptor bug.
pub struct PropertyReader<'a> {
    object: &'a str,
    properties: &'a CustomProperties,
    schema: &'static [PropertySpec],
}

impl<'a> PropertyReader<'a> {
    pub fn new(
        object: &'a str,
        properties: &'a CustomProperties,
        schema: &'static [PropertySpec],
    ) -> Result<Self, SchemaViolation> {
        for spec in schema {
            match (properties.get(spec.name), spec.requirement) {
                (None, Requirement::Required) => {
                    return Err(SchemaViolation::missing(object, spec.name));
                }
                (None, Requirement::Optional(_)) => {}
                (Some(value), _) if !spec.kind.accepts(value) => {
                    return Err(SchemaViolation::new(
                        object,
                        ViolationKind::WrongKind {
                            key: spec.name,
                            expected: spec.kind.label(),
                            found: value.type_label(),
                        },
                    ));
                }
                (Some(PropertyValue::Float(v)), _) if !v.is_finite() => {
                    return Err(SchemaViolation::out_of_range(object, spec.name, v));
                }
                (Some(_), _) => {}
            }
        }
        Ok(Self {
            object,
            properties,
            schema,
        })
    }

    fn value(&self, key: &'static str) -> PropertyValue {
        if let Some(value) = self.properties.get(key) {
            return value.clone();
        }
        match self.spec(key).map(|s| s.requirement) {
            Some(Requirement::Optional(default)) => default.to_property(),
            // Checked in `new`, or not part of the schema at all.
            _ => panic!("property '{key}' is not in the schema of '{}'", self.object),
        }
    }

    fn spec(&self, key: &str) -> Option<&PropertySpec> {
        self.schema.iter().find(|s| s.name == key)
    }

    pub fn float(&self, key: &'static str) -> f64 {
        self.value(key)
            .as_f64()
            .unwrap_or_else(|| panic!("'{key}' was checked as numeric"))
    }

    pub fn int(&self, key: &'static str) -> i64 {
        self.value(key)
            .as_i64()
            .unwrap_or_else(|| panic!("'{key}' was checked as Int"))
    }

    /// Int converted to a narrower type, rejecting values that do not fit.
    pub fn int_in<T: TryFrom<i64>>(&self, key: &'static str) -> Result<T, SchemaViolation> {
        let raw = self.int(key);
        T::try_from(raw).map_err(|_| SchemaViolation::out_of_range(self.object, key, raw))
    }

    /// Int mapped through `f`; `None` means the value is not a valid token.
    pub fn token<T>(
        &self,
        key: &'static str,
        f: impl FnOnce(i64) -> Option<T>,
    ) -> Result<T, SchemaViolation> {
        let raw = self.int(key);
        f(raw).ok_or_else(|| SchemaViolation::out_of_range(self.object, key, raw))
    }
}

/// Property bag holding every schema default.
pub fn defaults_for(schema: &[PropertySpec]) -> CustomProperties {
    let mut properties = CustomProperties::default();
    for spec in schema {
        if let Requirement::Optional(default) = spec.requirement {
            properties.insert(spec.name, default.to_property());
        }
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    static SCHEMA: [PropertySpec; 3] = [
        PropertySpec::required("count", PropertyKind::Int),
        PropertySpec::required("speed", PropertyKind::Float),
        PropertySpec::float_or("spring", 0.5),
    ];

    #[test]
    fn reports_first_missing_required_key() {
        let props = CustomProperties::default();
        let err = PropertyReader::new("obj", &props, &SCHEMA).err().unwrap();
        assert_eq!(err.kind, ViolationKind::MissingProperty { key: "count" });
        assert_eq!(err.object, "obj");
    }

    #[test]
    fn ints_are_accepted_as_floats_but_not_the_reverse() {
        let props = CustomProperties::default()
            .with("count", PropertyValue::Float(3.0))
            .with("speed", PropertyValue::Int(2));
        let err = PropertyReader::new("obj", &props, &SCHEMA).err().unwrap();
        assert_eq!(
            err.kind,
            ViolationKind::WrongKind {
                key: "count",
                expected: "Int",
                found: "Float"
            }
        );

        let props = CustomProperties::default()
            .with("count", PropertyValue::Int(3))
            .with("speed", PropertyValue::Int(2));
        let reader = PropertyReader::new("obj", &props, &SCHEMA).unwrap();
        assert_eq!(reader.float("speed"), 2.0);
        assert_eq!(reader.float("spring"), 0.5);
        assert_eq!(reader.int_in::<u8>("count"), Ok(3));
    }

    #[test]
    fn narrowing_and_tokens_reject_out_of_range() {
        let props = CustomProperties::default()
            .with("count", PropertyValue::Int(-1))
            .with("speed", PropertyValue::Float(1.0));
        let reader = PropertyReader::new("obj", &props, &SCHEMA).unwrap();
        assert!(reader.int_in::<u32>("count").is_err());
        let err = reader
            .token("count", |v| (v >= 0).then_some(v))
            .unwrap_err();
        assert_eq!(err.kind.key(), Some("count"));
    }

    #[test]
    fn non_finite_floats_are_out_of_range() {
        for (bad, shown) in [(f64::NAN, "NaN"), (f64::INFINITY, "inf"), (f64::NEG_INFINITY, "-inf")] {
            let props = CustomProperties::default()
                .with("count", PropertyValue::Int(1))
                .with("speed", PropertyValue::Float(1.0))
                .with("spring", PropertyValue::Float(bad));
            let err = PropertyReader::new("obj", &props, &SCHEMA).err().unwrap();
            assert_eq!(
                err.kind,
                ViolationKind::OutOfRange {
                    key: "spring",
                    value: shown.into()
                }
            );
        }
    }

    #[test]
    fn defaults_cover_optional_entries_only() {
        let defaults = defaults_for(&SCHEMA);
        assert_eq!(defaults.properties.len(), 1);
        assert_eq!(defaults.get("spring"), Some(&PropertyValue::Float(0.5)));
    }
}
