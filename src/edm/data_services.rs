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

use crate::edm::complex_type::DeComplexType;
use crate::edm::entity_type::DeEntityType;
use crate::edm::enum_type::DeEnumType;
use crate::edm::operation::DeOperation;
use crate::edm::schema::DeSchema;
use crate::edm::schema::Schema;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edmx:DataServices
#[derive(Debug, Deserialize)]
pub struct DeDataServices {
    #[serde(rename = "$value", default)]
    pub items: Vec<DeDataServicesItem>,
}

/// Child item of edmx:DataServices.
///
/// Only `Schema` is legal here; the type and operation variants exist
/// so that a malformed document where such a node floats outside any
/// schema is rejected with a precise error instead of an opaque
/// deserialization failure. Without a schema ancestor there is no
/// namespace to qualify the node with.
#[derive(Debug, Deserialize)]
pub enum DeDataServicesItem {
    Schema(DeSchema),
    EntityType(DeEntityType),
    ComplexType(DeComplexType),
    EnumType(DeEnumType),
    Action(DeOperation),
    Function(DeOperation),
}

/// Validated DataServices element.
#[derive(Debug)]
pub struct DataServices {
    /// Schemas in document order.
    pub schemas: Vec<Schema>,
}

impl DeDataServices {
    /// # Errors
    ///
    /// `ValidateError::MissingSchemaAncestor` if a type or operation
    /// node appears directly under `DataServices`.
    pub fn validate(self) -> Result<DataServices, ValidateError> {
        let schemas = self
            .items
            .into_iter()
            .map(|v| match v {
                DeDataServicesItem::Schema(s) => s.validate(),
                DeDataServicesItem::EntityType(t) => {
                    Err(ValidateError::MissingSchemaAncestor(t.name))
                }
                DeDataServicesItem::ComplexType(t) => {
                    Err(ValidateError::MissingSchemaAncestor(t.name))
                }
                DeDataServicesItem::EnumType(t) => {
                    Err(ValidateError::MissingSchemaAncestor(t.name))
                }
                DeDataServicesItem::Action(o) | DeDataServicesItem::Function(o) => {
                    Err(ValidateError::MissingSchemaAncestor(o.name))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DataServices { schemas })
    }
}

#[cfg(test)]
mod test {
    use crate::edm::Edmx;
    use crate::edm::ValidateError;

    #[test]
    fn stray_entity_type_is_rejected() {
        let data = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <EntityType Name="Orphan"/>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        match Edmx::parse(data) {
            Err(ValidateError::MissingSchemaAncestor(name)) => assert_eq!(name, "Orphan"),
            other => panic!("expected MissingSchemaAncestor, got {other:?}"),
        }
    }

    #[test]
    fn stray_action_is_rejected() {
        let data = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="ns"/>
               <Action Name="orphanAction"/>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        assert!(matches!(
            Edmx::parse(data),
            Err(ValidateError::MissingSchemaAncestor(_))
        ));
    }

    #[test]
    fn two_data_services_are_rejected() {
        let data = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices/>
             <edmx:DataServices/>
           </edmx:Edmx>"#;
        assert!(matches!(
            Edmx::parse(data),
            Err(ValidateError::WrongDataServicesNumber)
        ));
    }
}
