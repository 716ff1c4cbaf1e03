// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::Error;
use serde_json::Value;
use std::ops::RangeInclusive;
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;
use time::OffsetDateTime;
use time::Time;
use uuid::Uuid;

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[FormatItem<'_>] = format_description!("[hour]:[minute]:[second]");
const TIME_FORMAT_FRACTIONAL: &[FormatItem<'_>] =
    format_description!("[hour]:[minute]:[second].[subsecond]");

const BYTE_RANGE: RangeInclusive<i64> = 0..=255;
const SBYTE_RANGE: RangeInclusive<i64> = -128..=127;
const INT16_RANGE: RangeInclusive<i64> = (i16::MIN as i64)..=(i16::MAX as i64);
const INT32_RANGE: RangeInclusive<i64> = (i32::MIN as i64)..=(i32::MAX as i64);

/// The built-in `Edm.*` primitive kinds.
///
/// Every kind carries a validity predicate over raw JSON values and a
/// coercion into the wire representation. Coercion is more permissive
/// than validation: it accepts string renderings of numbers, while
/// validation requires the native JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
}

/// All primitive kinds, registered up front under their `Edm.`
/// qualified names.
pub const CATALOG: [PrimitiveType; 17] = [
    PrimitiveType::Binary,
    PrimitiveType::Boolean,
    PrimitiveType::Byte,
    PrimitiveType::Date,
    PrimitiveType::DateTimeOffset,
    PrimitiveType::Decimal,
    PrimitiveType::Double,
    PrimitiveType::Duration,
    PrimitiveType::Guid,
    PrimitiveType::Int16,
    PrimitiveType::Int32,
    PrimitiveType::Int64,
    PrimitiveType::SByte,
    PrimitiveType::Single,
    PrimitiveType::Stream,
    PrimitiveType::String,
    PrimitiveType::TimeOfDay,
];

impl PrimitiveType {
    /// Fully-qualified `Edm.*` name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Edm.Binary",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::Date => "Edm.Date",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Decimal => "Edm.Decimal",
            Self::Double => "Edm.Double",
            Self::Duration => "Edm.Duration",
            Self::Guid => "Edm.Guid",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::SByte => "Edm.SByte",
            Self::Single => "Edm.Single",
            Self::Stream => "Edm.Stream",
            Self::String => "Edm.String",
            Self::TimeOfDay => "Edm.TimeOfDay",
        }
    }

    /// Whether `value` already has this kind's wire shape.
    #[must_use]
    pub fn valid_value(self, value: &Value) -> bool {
        match self {
            Self::Boolean => value.is_boolean(),
            Self::Binary | Self::Duration | Self::Single | Self::Stream | Self::String => {
                value.is_string()
            }
            Self::Decimal | Self::Double => value.is_number(),
            Self::Byte | Self::Int16 | Self::Int32 | Self::Int64 | Self::SByte => value
                .as_i64()
                .map_or(false, |n| self.integer_range().contains(&n)),
            Self::Guid => as_parsed(value, |s| Uuid::parse_str(s).is_ok()),
            Self::Date => as_parsed(value, |s| Date::parse(s, DATE_FORMAT).is_ok()),
            Self::TimeOfDay => as_parsed(value, |s| parse_time_of_day(s).is_some()),
            Self::DateTimeOffset => {
                as_parsed(value, |s| OffsetDateTime::parse(s, &Rfc3339).is_ok())
            }
        }
    }

    /// Coerce `value` into this kind's wire representation.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the value cannot represent this
    /// kind even after conversion.
    pub fn coerce(self, value: &Value) -> Result<Value, Error> {
        match self {
            Self::Boolean => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| self.mismatch(value)),
            Self::Binary | Self::Duration | Self::Stream | Self::String => self.coerce_text(value),
            // Single is carried as its string rendering on the wire;
            // coercion is identity on whatever the caller supplies.
            Self::Single => Ok(value.clone()),
            Self::Decimal | Self::Double => self.coerce_float(value),
            Self::Byte | Self::Int16 | Self::Int32 | Self::Int64 | Self::SByte => {
                self.coerce_integer(value)
            }
            Self::Guid | Self::Date | Self::TimeOfDay | Self::DateTimeOffset => {
                if self.valid_value(value) {
                    Ok(value.clone())
                } else {
                    Err(self.mismatch(value))
                }
            }
        }
    }

    fn coerce_text(self, value: &Value) -> Result<Value, Error> {
        match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(self.mismatch(value)),
        }
    }

    fn coerce_float(self, value: &Value) -> Result<Value, Error> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.mismatch(value))
    }

    fn coerce_integer(self, value: &Value) -> Result<Value, Error> {
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .filter(|n| self.integer_range().contains(n))
            .map(Value::from)
            .ok_or_else(|| self.mismatch(value))
    }

    fn integer_range(self) -> RangeInclusive<i64> {
        match self {
            Self::Byte => BYTE_RANGE,
            Self::SByte => SBYTE_RANGE,
            Self::Int16 => INT16_RANGE,
            Self::Int32 => INT32_RANGE,
            _ => i64::MIN..=i64::MAX,
        }
    }

    fn mismatch(self, value: &Value) -> Error {
        Error::TypeMismatch {
            type_name: self.name().to_string(),
            value: value.to_string(),
        }
    }
}

fn as_parsed(value: &Value, check: impl Fn(&str) -> bool) -> bool {
    value.as_str().map_or(false, check)
}

fn parse_time_of_day(text: &str) -> Option<Time> {
    Time::parse(text, TIME_FORMAT_FRACTIONAL)
        .or_else(|_| Time::parse(text, TIME_FORMAT))
        .ok()
}

#[cfg(test)]
mod test {
    use super::PrimitiveType;
    use super::CATALOG;
    use serde_json::json;

    #[test]
    fn catalog_names_are_qualified_and_unique() {
        let mut names: Vec<&str> = CATALOG.iter().map(|k| k.name()).collect();
        assert!(names.iter().all(|n| n.starts_with("Edm.")));
        names.dedup();
        assert_eq!(names.len(), 17);
    }

    #[test]
    fn boolean_accepts_only_booleans() {
        assert!(PrimitiveType::Boolean.valid_value(&json!(true)));
        assert!(!PrimitiveType::Boolean.valid_value(&json!("true")));
        assert!(PrimitiveType::Boolean.coerce(&json!("true")).is_err());
    }

    #[test]
    fn integer_kinds_enforce_their_ranges() {
        assert!(PrimitiveType::Byte.valid_value(&json!(255)));
        assert!(!PrimitiveType::Byte.valid_value(&json!(256)));
        assert!(!PrimitiveType::Byte.valid_value(&json!(-1)));
        assert!(PrimitiveType::Int16.valid_value(&json!(-32768)));
        assert!(!PrimitiveType::Int16.valid_value(&json!(32768)));
        assert!(PrimitiveType::Int32.valid_value(&json!(2_147_483_647)));
        assert!(!PrimitiveType::Int32.valid_value(&json!(2_147_483_648_i64)));
        assert!(PrimitiveType::Int64.valid_value(&json!(i64::MAX)));
    }

    #[test]
    fn sbyte_range_is_symmetric_twos_complement() {
        assert!(PrimitiveType::SByte.valid_value(&json!(-128)));
        assert!(PrimitiveType::SByte.valid_value(&json!(127)));
        assert!(!PrimitiveType::SByte.valid_value(&json!(128)));
        assert!(!PrimitiveType::SByte.valid_value(&json!(-129)));
    }

    #[test]
    fn integer_coercion_accepts_string_renderings() {
        assert_eq!(
            PrimitiveType::Int32.coerce(&json!(" 42 ")).unwrap(),
            json!(42)
        );
        assert!(PrimitiveType::Int32.coerce(&json!("forty-two")).is_err());
    }

    #[test]
    fn float_coercion_accepts_strings_and_integers() {
        assert_eq!(
            PrimitiveType::Double.coerce(&json!("2.5")).unwrap(),
            json!(2.5)
        );
        assert_eq!(PrimitiveType::Decimal.coerce(&json!(3)).unwrap(), json!(3.0));
        assert!(PrimitiveType::Double.coerce(&json!(null)).is_err());
    }

    #[test]
    fn text_coercion_renders_scalars() {
        assert_eq!(
            PrimitiveType::String.coerce(&json!(17)).unwrap(),
            json!("17")
        );
        assert_eq!(
            PrimitiveType::String.coerce(&json!(false)).unwrap(),
            json!("false")
        );
        assert!(PrimitiveType::String.coerce(&json!(["a"])).is_err());
    }

    #[test]
    fn guid_requires_a_parsable_uuid() {
        assert!(PrimitiveType::Guid.valid_value(&json!("f325f1a7-c7d0-4337-90e6-ec9d0977a301")));
        assert!(!PrimitiveType::Guid.valid_value(&json!("not-a-guid")));
    }

    #[test]
    fn temporal_kinds_parse_their_wire_formats() {
        assert!(PrimitiveType::Date.valid_value(&json!("2016-03-01")));
        assert!(!PrimitiveType::Date.valid_value(&json!("March 1st")));
        assert!(PrimitiveType::TimeOfDay.valid_value(&json!("08:30:00")));
        assert!(PrimitiveType::TimeOfDay.valid_value(&json!("08:30:00.5")));
        assert!(PrimitiveType::DateTimeOffset.valid_value(&json!("2016-03-01T08:30:00Z")));
        assert!(!PrimitiveType::DateTimeOffset.valid_value(&json!("2016-03-01")));
    }
}
