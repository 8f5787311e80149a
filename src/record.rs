//! Bridges between serde types and CSV rows.
//!
//! Reading needs the field names of the target struct to match headers
//! loosely (case, white space). Writing needs each record as an ordered list
//! of named values so that a class map can rename, select and reorder
//! columns before the row reaches the csv writer.

use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer, Visitor},
    forward_to_deserialize_any,
};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde_json::Value;

use crate::error::{CsvHelperError, Result};

/// Returns the serde field names of `T`, or an empty slice when `T` is not
/// deserialized as a struct (maps, tuples, flattened structs).
///
/// Names are reported after `#[serde(rename)]` has been applied.
pub(crate) fn field_names<'de, T: Deserialize<'de>>() -> &'static [&'static str] {
    let mut fields = None;
    let _ = T::deserialize(FieldNames {
        fields: &mut fields,
    });
    fields.unwrap_or(&[])
}

/// A deserializer that records the field list handed to `deserialize_struct`
/// and then bails out.
struct FieldNames<'a> {
    fields: &'a mut Option<&'static [&'static str]>,
}

impl<'de> Deserializer<'de> for FieldNames<'_> {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> std::result::Result<V::Value, Self::Error> {
        Err(de::Error::custom("not a struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> std::result::Result<V::Value, Self::Error> {
        *self.fields = Some(fields);
        Err(de::Error::custom("field names captured"))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

/// A record flattened into `(field, value)` pairs in declaration order.
pub(crate) type FlatRecord = Vec<(String, String)>;

/// Flattens a record into named string values.
///
/// Strings are kept as is, numbers and booleans use their display form and
/// `None` becomes an empty field. Non-finite floats are written as `NaN`,
/// `inf` and `-inf`, which parse back into the same values. Nested sequences
/// or structs cannot be represented in a single CSV cell and are rejected.
pub(crate) fn flatten<T: Serialize>(record: &T) -> Result<FlatRecord> {
    let value =
        serde_json::to_value(record).map_err(|error| CsvHelperError::Serialization(error.to_string()))?;

    match value {
        Value::Object(map) => {
            // JSON turns non-finite floats into null, the csv serializer does not.
            let rendered = if map.values().any(Value::is_null) {
                csv_cells(record).filter(|cells| cells.len() == map.len())
            } else {
                None
            };

            map.into_iter()
                .enumerate()
                .map(|(position, (field, value))| {
                    let cell = match rendered.as_ref().filter(|_| value.is_null()) {
                        Some(cells) => cells.get(position).unwrap_or("").to_string(),
                        None => cell(&field, value)?,
                    };
                    Ok((field, cell))
                })
                .collect()
        }
        other => Err(CsvHelperError::Serialization(format!(
            "records must serialize as structs or maps, got {}",
            kind(&other)
        ))),
    }
}

/// The record as a single row written by the csv serializer, `None` when it
/// refuses the record (maps, flattened structs).
fn csv_cells<T: Serialize>(record: &T) -> Option<StringRecord> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.serialize(record).ok()?;
    let bytes = writer.into_inner().ok()?;

    ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes.as_slice())
        .records()
        .next()?
        .ok()
}

fn cell(field: &str, value: Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text),
        other => Err(CsvHelperError::Serialization(format!(
            "field `{field}` is {} and cannot be written to a single column",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a nested structure",
    }
}
