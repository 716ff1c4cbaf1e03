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

//! Key-casing conversion between the wire format (camelCase) and the
//! internal naming convention (snake_case).

use serde_json::Map;
use serde_json::Value;

/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// A word boundary is an uppercase letter following a lowercase
/// letter, or an uppercase letter inside an uppercase run that is
/// followed by 2+ lowercase letters (`PCIEFunctions` ->
/// `pcie_functions`). A single trailing lowercase letter stays with
/// the run (`NVMe` -> `nvme`).
#[must_use]
pub fn camel_to_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let starts_word = prev.is_uppercase()
                && chars[(i + 1)..]
                    .iter()
                    .take_while(|c| c.is_lowercase())
                    .count()
                    >= 2;
            if prev.is_lowercase() || starts_word {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Convert a snake_case identifier to lower camelCase.
#[must_use]
pub fn snake_to_camel(s: &str) -> String {
    s.split('_')
        .filter(|seg| !seg.is_empty())
        .enumerate()
        .map(|(i, seg)| {
            if i == 0 {
                seg.to_string()
            } else {
                let mut chars = seg.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect()
}

/// Rewrite every object key in a decoded JSON value from wire casing
/// to snake_case, recursing through nested objects and arrays.
/// Annotation keys such as `@odata.context` contain no uppercase
/// letters and pass through unchanged.
#[must_use]
pub fn keys_to_snake_case(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), keys_to_snake_case(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(keys_to_snake_case).collect()),
        other => other,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_to_snake_basic() {
        assert_eq!(camel_to_snake("displayName"), "display_name");
        assert_eq!(camel_to_snake("DisplayName"), "display_name");
        assert_eq!(camel_to_snake("name"), "name");
        assert_eq!(camel_to_snake(""), "");
    }

    #[test]
    fn camel_to_snake_acronyms() {
        assert_eq!(camel_to_snake("NVMe"), "nvme");
        assert_eq!(camel_to_snake("NVME"), "nvme");
        assert_eq!(camel_to_snake("nVME"), "n_vme");
        assert_eq!(camel_to_snake("userID"), "user_id");
    }

    #[test]
    fn camel_to_snake_acronyms_with_words() {
        assert_eq!(camel_to_snake("nVMEfoobar"), "n_vm_efoobar");
        assert_eq!(camel_to_snake("nVMEFoobar"), "n_vme_foobar");
        assert_eq!(camel_to_snake("PCIEFunctions"), "pcie_functions");
        assert_eq!(camel_to_snake("PFFunctionNumber"), "pf_function_number");
    }

    #[test]
    fn camel_to_snake_annotation_keys_unchanged() {
        assert_eq!(camel_to_snake("@odata.context"), "@odata.context");
        assert_eq!(camel_to_snake("@odata.type"), "@odata.type");
    }

    #[test]
    fn snake_to_camel_basic() {
        assert_eq!(snake_to_camel("display_name"), "displayName");
        assert_eq!(snake_to_camel("name"), "name");
        assert_eq!(snake_to_camel("given_name_initial"), "givenNameInitial");
    }

    #[test]
    fn snake_to_camel_is_inverse_on_simple_keys() {
        for key in &["display_name", "mail", "user_principal_name"] {
            assert_eq!(camel_to_snake(&snake_to_camel(key)), *key);
        }
    }

    #[test]
    fn keys_converted_recursively() {
        let converted = keys_to_snake_case(json!({
            "displayName": "Ada",
            "manager": {"jobTitle": "Director"},
            "memberOf": [{"groupName": "Admins"}],
        }));
        assert_eq!(
            converted,
            json!({
                "display_name": "Ada",
                "manager": {"job_title": "Director"},
                "member_of": [{"group_name": "Admins"}],
            })
        );
    }
}
