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

use crate::edm::entity_type::partition_items;
use crate::edm::entity_type::DeEntityTypeItem;
use crate::edm::property::NavigationProperty;
use crate::edm::property::Property;
use crate::edm::TypeName;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edm:ComplexType
#[derive(Debug, Deserialize)]
pub struct DeComplexType {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@BaseType")]
    pub base_type: Option<TypeName>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEntityTypeItem>,
}

/// Validated edm:ComplexType
#[derive(Debug)]
pub struct ComplexType {
    pub name: String,
    pub base_type: Option<TypeName>,
    pub properties: Vec<Property>,
    pub navigation_properties: Vec<NavigationProperty>,
}

impl DeComplexType {
    /// # Errors
    ///
    /// Actually, doesn't return any errors. Kept for call-site
    /// consistency with the other schema children.
    pub fn validate(self) -> Result<ComplexType, ValidateError> {
        let (_, properties, navigation_properties) = partition_items(self.items);
        Ok(ComplexType {
            name: self.name,
            base_type: self.base_type,
            properties,
            navigation_properties,
        })
    }
}
