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

use crate::edm::Annotation;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edm:EnumType
#[derive(Debug, Deserialize)]
pub struct DeEnumType {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: Option<String>,
    #[serde(rename = "@IsFlags")]
    pub is_flags: Option<bool>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEnumTypeItem>,
}

/// Child item of edm:EnumType
#[derive(Debug, Deserialize)]
pub enum DeEnumTypeItem {
    Member(EnumMember),
    Annotation(Annotation),
}

/// Element edm:Member
#[derive(Debug, Deserialize)]
pub struct EnumMember {
    #[serde(rename = "@Name")]
    pub name: String,
    /// Explicit integer value; members without one default to their
    /// position in the member list.
    #[serde(rename = "@Value")]
    pub value: Option<i64>,
}

/// Validated edm:EnumType
#[derive(Debug)]
pub struct EnumType {
    pub name: String,
    /// Members in document order; ordering is significant for
    /// positional value defaulting.
    pub members: Vec<EnumMember>,
}

impl DeEnumType {
    /// # Errors
    ///
    /// Actually, doesn't return any errors. Kept for call-site
    /// consistency with the other schema children.
    pub fn validate(self) -> Result<EnumType, ValidateError> {
        let members = self
            .items
            .into_iter()
            .filter_map(|v| match v {
                DeEnumTypeItem::Member(m) => Some(m),
                DeEnumTypeItem::Annotation(_) => None,
            })
            .collect();
        Ok(EnumType {
            name: self.name,
            members,
        })
    }
}
