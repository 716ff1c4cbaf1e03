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

use crate::edm::complex_type::ComplexType;
use crate::edm::complex_type::DeComplexType;
use crate::edm::container::EntityContainer;
use crate::edm::entity_type::DeEntityType;
use crate::edm::entity_type::EntityType;
use crate::edm::enum_type::DeEnumType;
use crate::edm::enum_type::EnumType;
use crate::edm::operation::DeOperation;
use crate::edm::operation::Operation;
use crate::edm::Annotation;
use crate::edm::SchemaNamespace;
use crate::edm::Term;
use crate::edm::TypeDefinition;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edm:Schema
#[derive(Debug, Deserialize)]
pub struct DeSchema {
    #[serde(rename = "@Namespace")]
    pub namespace: SchemaNamespace,
    #[serde(rename = "@Alias")]
    pub alias: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeSchemaItem>,
}

/// Child item of edm:Schema
#[derive(Debug, Deserialize)]
pub enum DeSchemaItem {
    EnumType(DeEnumType),
    ComplexType(DeComplexType),
    EntityType(DeEntityType),
    EntityContainer(EntityContainer),
    Action(DeOperation),
    Function(DeOperation),
    TypeDefinition(TypeDefinition),
    Term(Term),
    Annotation(Annotation),
}

/// Validated schema with its children partitioned by kind, each kind
/// in document order.
#[derive(Debug)]
pub struct Schema {
    pub namespace: SchemaNamespace,
    pub alias: Option<String>,
    pub enum_types: Vec<EnumType>,
    pub complex_types: Vec<ComplexType>,
    pub entity_types: Vec<EntityType>,
    pub containers: Vec<EntityContainer>,
    pub actions: Vec<Operation>,
    pub functions: Vec<Operation>,
}

impl DeSchema {
    /// # Errors
    ///
    /// Returns an error if any child fails to validate.
    pub fn validate(self) -> Result<Schema, ValidateError> {
        let mut schema = Schema {
            namespace: self.namespace,
            alias: self.alias,
            enum_types: Vec::new(),
            complex_types: Vec::new(),
            entity_types: Vec::new(),
            containers: Vec::new(),
            actions: Vec::new(),
            functions: Vec::new(),
        };
        for item in self.items {
            match item {
                DeSchemaItem::EnumType(v) => schema.enum_types.push(v.validate()?),
                DeSchemaItem::ComplexType(v) => schema.complex_types.push(v.validate()?),
                DeSchemaItem::EntityType(v) => schema.entity_types.push(v.validate()?),
                DeSchemaItem::EntityContainer(v) => schema.containers.push(v),
                DeSchemaItem::Action(v) => schema.actions.push(v.validate()?),
                DeSchemaItem::Function(v) => schema.functions.push(v.validate()?),
                DeSchemaItem::TypeDefinition(_)
                | DeSchemaItem::Term(_)
                | DeSchemaItem::Annotation(_) => {}
            }
        }
        Ok(schema)
    }
}
