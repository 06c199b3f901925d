//! Field flattening
//!
//! Fixed-function state is compared and displayed as an ordered list of
//! scalar leaves. Any serialisable value is walked by a serializer in
//! declaration order; nested structs become dotted paths and sequences become
//! indexed paths, e.g. `blend.targets[0].color.source`. Leaves are JSON values,
//! except that non-finite floats are kept distinct as `inf`, `-inf` and `NaN`.

use serde::{Serialize, ser};
use serde_json::Value;

/// One scalar leaf of a flattened value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub path: String,
    pub value: Value,
}

impl Field {
    /// Returns the value formatted for display
    pub fn display_value(&self) -> String {
        display_value(&self.value)
    }
}

/// Flattens `value` into scalar leaves in declaration order
///
/// # Arguments
/// * `value` - Any serialisable state object
///
/// # Returns
/// * `Ok(Vec<Field>)` - Leaves; `null`, empty sequences and empty maps are kept as leaves
/// * `Err(serde_json::Error)` - If the value cannot be represented as JSON
pub fn flatten<T: Serialize + ?Sized>(value: &T) -> Result<Vec<Field>, serde_json::Error> {
    flatten_prefixed("", value)
}

/// Flattens `value` with every path prefixed by `prefix`
pub fn flatten_prefixed<T: Serialize + ?Sized>(prefix: &str, value: &T) -> Result<Vec<Field>, serde_json::Error> {
    let mut fields = Vec::new();
    value.serialize(LeafSerializer {
        path: prefix.to_string(),
        out: &mut fields,
    })?;
    Ok(fields)
}

/// Leaf value of a float; non-finite values become the strings `inf`, `-inf` and `NaN`
///
/// JSON has no non-finite numbers, and mapping them all to `null` would make
/// `+inf` and `-inf` compare equal and `NaN` compare unequal to itself.
pub fn float_value(value: f64) -> Value {
    if value.is_nan() {
        Value::String("NaN".to_string())
    } else if value.is_infinite() {
        Value::String(if value > 0.0 { "inf" } else { "-inf" }.to_string())
    } else {
        Value::from(value)
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() { key.to_string() } else { format!("{path}.{key}") }
}

/// Serializer writing every scalar it meets as one [`Field`] under `path`
struct LeafSerializer<'a> {
    path: String,
    out: &'a mut Vec<Field>,
}

impl<'a> LeafSerializer<'a> {
    fn leaf(self, value: Value) -> Result<(), serde_json::Error> {
        self.out.push(Field { path: self.path, value });
        Ok(())
    }

    fn indexed(self, path: String) -> Compound<'a> {
        Compound {
            path,
            out: self.out,
            len: 0,
            empty: Value::Array(Vec::new()),
            key: None,
        }
    }

    fn keyed(self, path: String) -> Compound<'a> {
        Compound {
            path,
            out: self.out,
            len: 0,
            empty: Value::Object(serde_json::Map::new()),
            key: None,
        }
    }
}

impl<'a> ser::Serializer for LeafSerializer<'a> {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;

    fn serialize_bool(self, v: bool) -> Result<(), Self::Error> {
        self.leaf(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<(), Self::Error> {
        self.leaf(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<(), Self::Error> {
        self.leaf(float_value(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<(), Self::Error> {
        self.leaf(float_value(v))
    }

    fn serialize_char(self, v: char) -> Result<(), Self::Error> {
        self.leaf(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<(), Self::Error> {
        self.leaf(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), Self::Error> {
        let mut seq = ser::Serializer::serialize_seq(self, Some(v.len()))?;
        for byte in v {
            ser::SerializeSeq::serialize_element(&mut seq, byte)?;
        }
        ser::SerializeSeq::end(seq)
    }

    fn serialize_none(self) -> Result<(), Self::Error> {
        self.leaf(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Self::Error> {
        self.leaf(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), Self::Error> {
        self.leaf(Value::Null)
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<(), Self::Error> {
        self.leaf(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(self, _name: &'static str, _index: u32, variant: &'static str, value: &T) -> Result<(), Self::Error> {
        let path = child_path(&self.path, variant);
        value.serialize(LeafSerializer { path, out: self.out })
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'a>, Self::Error> {
        let path = self.path.clone();
        Ok(self.indexed(path))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Compound<'a>, Self::Error> {
        let path = self.path.clone();
        Ok(self.indexed(path))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Compound<'a>, Self::Error> {
        let path = self.path.clone();
        Ok(self.indexed(path))
    }

    fn serialize_tuple_variant(self, _name: &'static str, _index: u32, variant: &'static str, _len: usize) -> Result<Compound<'a>, Self::Error> {
        let path = child_path(&self.path, variant);
        Ok(self.indexed(path))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'a>, Self::Error> {
        let path = self.path.clone();
        Ok(self.keyed(path))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Compound<'a>, Self::Error> {
        let path = self.path.clone();
        Ok(self.keyed(path))
    }

    fn serialize_struct_variant(self, _name: &'static str, _index: u32, variant: &'static str, _len: usize) -> Result<Compound<'a>, Self::Error> {
        let path = child_path(&self.path, variant);
        Ok(self.keyed(path))
    }
}

/// Sequence, map or struct being flattened; an empty one becomes a single leaf
struct Compound<'a> {
    path: String,
    out: &'a mut Vec<Field>,
    len: usize,
    empty: Value,
    key: Option<String>,
}

impl Compound<'_> {
    fn element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        let path = format!("{}[{}]", self.path, self.len);
        self.len += 1;
        value.serialize(LeafSerializer { path, out: &mut *self.out })
    }

    fn entry<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let path = child_path(&self.path, key);
        self.len += 1;
        value.serialize(LeafSerializer { path, out: &mut *self.out })
    }

    fn finish(self) -> Result<(), serde_json::Error> {
        if self.len == 0 {
            self.out.push(Field {
                path: self.path,
                value: self.empty,
            });
        }
        Ok(())
    }
}

impl ser::SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.element(value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

impl ser::SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Self::Error> {
        let key = match serde_json::to_value(key)? {
            Value::String(key) => key,
            other => other.to_string(),
        };
        self.key = Some(key);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self.key.take().ok_or_else(|| <serde_json::Error as ser::Error>::custom("map value serialized before its key"))?;
        self.entry(&key, value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error> {
        self.entry(key, value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for Compound<'_> {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error> {
        self.entry(key, value)
    }

    fn end(self) -> Result<(), Self::Error> {
        self.finish()
    }
}

/// Formats a JSON leaf for display
///
/// Floats are printed with at most six decimals and trailing zeros removed, so
/// an `f32` like `0.1` shows as `0.1` rather than its widened `f64` expansion.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                let text = format!("{f:.6}");
                text.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                n.to_string()
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Equation {
        source: &'static str,
        destination: &'static str,
    }

    #[derive(Serialize)]
    struct Target {
        enabled: bool,
        color: Equation,
    }

    #[derive(Serialize)]
    struct Blend {
        factor: [f32; 2],
        targets: Vec<Target>,
        logic_op: Option<&'static str>,
    }

    #[test]
    fn test_flatten_paths_in_declaration_order() {
        let blend = Blend {
            factor: [1.0, 0.5],
            targets: vec![Target {
                enabled: true,
                color: Equation {
                    source: "SrcAlpha",
                    destination: "InvSrcAlpha",
                },
            }],
            logic_op: None,
        };

        let paths: Vec<_> = flatten(&blend).unwrap().into_iter().map(|f| f.path).collect();
        assert_eq!(
            paths,
            vec![
                "factor[0]",
                "factor[1]",
                "targets[0].enabled",
                "targets[0].color.source",
                "targets[0].color.destination",
                "logic_op",
            ]
        );
    }

    #[test]
    fn test_empty_containers_are_leaves() {
        let blend = Blend {
            factor: [0.0, 0.0],
            targets: Vec::new(),
            logic_op: Some("Xor"),
        };
        let fields = flatten_prefixed("blend", &blend).unwrap();
        assert_eq!(fields[2].path, "blend.targets");
        assert_eq!(fields[2].value, json!([]));
        assert_eq!(fields[3].display_value(), "Xor");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(0.1f32)), "0.1");
        assert_eq!(display_value(&json!(1.0)), "1");
        assert_eq!(display_value(&json!(-2.5)), "-2.5");
        assert_eq!(display_value(&json!(255)), "255");
        assert_eq!(display_value(&json!(null)), "-");
        assert_eq!(display_value(&json!(false)), "false");
    }

    #[derive(Serialize)]
    struct Bias {
        clamp: f32,
        slope: f64,
        lod: Option<f32>,
    }

    #[test]
    fn test_non_finite_floats_stay_distinct() {
        let positive = flatten(&Bias { clamp: f32::INFINITY, slope: f64::NAN, lod: Some(f32::NEG_INFINITY) }).unwrap();
        let negative = flatten(&Bias { clamp: f32::NEG_INFINITY, slope: f64::NAN, lod: None }).unwrap();

        assert_eq!(positive[0].value, json!("inf"));
        assert_eq!(negative[0].value, json!("-inf"));
        assert_ne!(positive[0], negative[0]);
        assert_eq!(positive[1], negative[1]);
        assert_eq!(positive[1].display_value(), "NaN");
        assert_eq!(positive[2].display_value(), "-inf");
        assert_eq!(negative[2].display_value(), "-");
    }

    #[derive(Serialize)]
    enum Shape {
        Point,
        Scaled(f32),
        Sized { width: u32, height: u32 },
    }

    #[test]
    fn test_variants_maps_and_floats_match_json_form() {
        let fields = flatten_prefixed("shapes", &vec![Shape::Point, Shape::Scaled(0.5), Shape::Sized { width: 2, height: 3 }]).unwrap();
        let pairs: Vec<_> = fields.iter().map(|f| (f.path.as_str(), f.display_value())).collect();
        assert_eq!(
            pairs,
            vec![
                ("shapes[0]", "Point".to_string()),
                ("shapes[1].Scaled", "0.5".to_string()),
                ("shapes[2].Sized.width", "2".to_string()),
                ("shapes[2].Sized.height", "3".to_string()),
            ]
        );

        let mut units = std::collections::BTreeMap::new();
        units.insert(3u32, "albedo");
        let fields = flatten_prefixed("units", &units).unwrap();
        assert_eq!(fields[0].path, "units.3");
        assert_eq!(fields[0].value, json!("albedo"));

        assert_eq!(flatten(&0.1f32).unwrap()[0].value, serde_json::to_value(0.1f32).unwrap());
    }
}
