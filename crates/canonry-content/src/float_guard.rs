//! Serializer pass that rejects non-finite floats.
//!
//! `serde_json` writes NaN and ±Infinity as `null`, which would make those
//! values content-equal to each other and to a missing value. This pass walks
//! a `Serialize` value before it is converted to JSON and fails on the first
//! non-finite `f32`/`f64`, reporting where it was found.

use serde::ser::{self, Serialize};
use std::fmt;

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    segments: Vec<String>,
}

impl Path {
    pub(crate) fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

#[derive(Debug)]
pub(crate) enum GuardError {
    /// Path of the offending float.
    NonFinite(String),
    /// Error raised by the value's own `Serialize` impl.
    Custom(String),
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::NonFinite(path) => write!(f, "non-finite number at {}", path),
            GuardError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for GuardError {}

impl ser::Error for GuardError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        GuardError::Custom(msg.to_string())
    }
}

/// Checks every float reachable from `value`.
pub(crate) fn check<T: Serialize + ?Sized>(value: &T) -> Result<(), GuardError> {
    value.serialize(FloatGuard { path: Path::root() })
}

struct FloatGuard {
    path: Path,
}

impl FloatGuard {
    fn float(self, finite: bool) -> Result<(), GuardError> {
        if finite {
            Ok(())
        } else {
            Err(GuardError::NonFinite(self.path.to_string()))
        }
    }

    fn compound(self) -> Compound {
        Compound {
            path: self.path,
            index: 0,
        }
    }
}

struct Compound {
    path: Path,
    index: usize,
}

impl Compound {
    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        let path = self.path.push_index(self.index);
        self.index += 1;
        value.serialize(FloatGuard { path })
    }

    fn field<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), GuardError> {
        value.serialize(FloatGuard {
            path: self.path.push_field(key),
        })
    }
}

impl ser::Serializer for FloatGuard {
    type Ok = ();
    type Error = GuardError;
    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_f32(self, v: f32) -> Result<(), GuardError> {
        self.float(v.is_finite())
    }

    fn serialize_f64(self, v: f64) -> Result<(), GuardError> {
        self.float(v.is_finite())
    }

    fn serialize_bool(self, _: bool) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_char(self, _: char) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), GuardError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), GuardError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), GuardError> {
        value.serialize(FloatGuard {
            path: self.path.push_field(variant),
        })
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Compound, GuardError> {
        Ok(self.compound())
    }

    fn serialize_tuple(self, _: usize) -> Result<Compound, GuardError> {
        Ok(self.compound())
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Compound, GuardError> {
        Ok(self.compound())
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Compound, GuardError> {
        Ok(Compound {
            path: self.path.push_field(variant),
            index: 0,
        })
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Compound, GuardError> {
        Ok(self.compound())
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Compound, GuardError> {
        Ok(self.compound())
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Compound, GuardError> {
        Ok(Compound {
            path: self.path.push_field(variant),
            index: 0,
        })
    }
}

impl ser::SerializeSeq for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        self.element(value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

impl ser::SerializeTuple for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        self.element(value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        self.element(value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        self.element(value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

// Map entries are addressed by position; keys are checked like values.
impl ser::SerializeMap for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), GuardError> {
        key.serialize(FloatGuard {
            path: self.path.push_index(self.index),
        })
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        self.element(value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

impl ser::SerializeStruct for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), GuardError> {
        self.field(key, value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for Compound {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), GuardError> {
        self.field(key, value)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Sample {
        label: String,
        readings: Vec<f64>,
        peak: Option<f32>,
    }

    #[test]
    fn path_renders_nested_segments() {
        let path = Path::root().push_field("items").push_index(2).push_field("v");
        assert_eq!(path.to_string(), "items.[2].v");
        assert_eq!(Path::root().to_string(), "root");
    }

    #[test]
    fn finite_values_pass() {
        let sample = Sample {
            label: "ok".into(),
            readings: vec![1.5, -0.0, f64::MAX],
            peak: Some(2.0),
        };
        assert!(check(&sample).is_ok());
    }

    #[test]
    fn nan_in_sequence_reports_index() {
        let sample = Sample {
            label: "bad".into(),
            readings: vec![1.0, f64::NAN],
            peak: None,
        };
        match check(&sample) {
            Err(GuardError::NonFinite(path)) => assert_eq!(path, "readings.[1]"),
            other => panic!("expected NonFinite, got {:?}", other),
        }
    }

    #[test]
    fn infinity_inside_option_is_rejected() {
        let sample = Sample {
            label: "bad".into(),
            readings: vec![],
            peak: Some(f32::INFINITY),
        };
        assert!(matches!(check(&sample), Err(GuardError::NonFinite(p)) if p == "peak"));
    }

    #[test]
    fn bare_float_reports_root() {
        assert!(matches!(
            check(&f64::NEG_INFINITY),
            Err(GuardError::NonFinite(p)) if p == "root"
        ));
    }

    #[test]
    fn map_values_are_checked() {
        let mut map = BTreeMap::new();
        map.insert("a", 1.0);
        map.insert("b", f64::NAN);
        assert!(matches!(check(&map), Err(GuardError::NonFinite(p)) if p == "[1]"));
    }
}
