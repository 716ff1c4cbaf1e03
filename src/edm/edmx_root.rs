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

use crate::edm::data_services::DataServices;
use crate::edm::data_services::DeDataServices;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edmx:Edmx
#[derive(Debug, Deserialize)]
struct DeEdmx {
    #[allow(dead_code)]
    #[serde(rename = "@Version")]
    pub version: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEdmxItem>,
}

/// Child item of edmx:Edmx
#[derive(Debug, Deserialize)]
enum DeEdmxItem {
    DataServices(DeDataServices),
    /// References to other documents; not followed.
    Reference(Reference),
}

/// Element edmx:Reference
#[derive(Debug, Deserialize)]
pub struct Reference {
    #[serde(rename = "@Uri")]
    pub uri: String,
}

/// Validated Edmx document.
#[derive(Debug)]
pub struct Edmx {
    /// Validated `DataServices`.
    pub data_services: DataServices,
}

impl Edmx {
    /// Parse and validate a `$metadata` document.
    ///
    /// # Errors
    ///
    /// Returns a validation error or an XML parsing error.
    pub fn parse(data: &str) -> Result<Self, ValidateError> {
        use quick_xml::de as quick_xml_de;
        quick_xml_de::from_str::<DeEdmx>(data)
            .map_err(ValidateError::XmlDeserialize)?
            .validate()
    }
}

impl DeEdmx {
    fn validate(self) -> Result<Edmx, ValidateError> {
        let mut dss = self
            .items
            .into_iter()
            .filter_map(|v| match v {
                DeEdmxItem::DataServices(v) => Some(v),
                DeEdmxItem::Reference(_) => None,
            })
            .collect::<Vec<_>>();

        // The root MUST contain a single direct DataServices child.
        if dss.len() != 1 {
            return Err(ValidateError::WrongDataServicesNumber);
        }
        dss.pop()
            .ok_or(ValidateError::WrongDataServicesNumber)?
            .validate()
            .map(|data_services| Edmx { data_services })
    }
}
