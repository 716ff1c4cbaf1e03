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

use crate::edm::PropertyName;
use crate::edm::TypeName;
use serde::Deserialize;

/// Element edm:Property
#[derive(Debug, Deserialize)]
pub struct Property {
    #[serde(rename = "@Name")]
    pub name: PropertyName,
    #[serde(rename = "@Type")]
    pub ptype: TypeName,
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    #[serde(rename = "@DefaultValue")]
    pub default_value: Option<String>,
}

/// Element edm:NavigationProperty
#[derive(Debug, Deserialize)]
pub struct NavigationProperty {
    #[serde(rename = "@Name")]
    pub name: PropertyName,
    #[serde(rename = "@Type")]
    pub ptype: TypeName,
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    /// Name of the inverse navigation property, if declared. Never
    /// resolved eagerly.
    #[serde(rename = "@Partner")]
    pub partner: Option<String>,
    #[serde(rename = "@ContainsTarget")]
    pub contains_target: Option<bool>,
}
