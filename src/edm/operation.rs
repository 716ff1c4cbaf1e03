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
use crate::edm::PropertyName;
use crate::edm::TypeName;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edm:Action or edm:Function; the two share a shape as far
/// as the type system is concerned.
#[derive(Debug, Deserialize)]
pub struct DeOperation {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@IsBound")]
    pub is_bound: Option<bool>,
    #[serde(rename = "@EntitySetType")]
    pub entity_set_type: Option<String>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeOperationItem>,
}

/// Child item of edm:Action / edm:Function
#[derive(Debug, Deserialize)]
pub enum DeOperationItem {
    Parameter(Parameter),
    ReturnType(ReturnType),
    Annotation(Annotation),
}

/// Element edm:Parameter
#[derive(Debug, Deserialize)]
pub struct Parameter {
    #[serde(rename = "@Name")]
    pub name: PropertyName,
    #[serde(rename = "@Type")]
    pub ptype: TypeName,
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
}

/// Element edm:ReturnType
#[derive(Debug, Deserialize)]
pub struct ReturnType {
    #[serde(rename = "@Type")]
    pub rtype: TypeName,
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
}

/// Validated operation element.
#[derive(Debug)]
pub struct Operation {
    pub name: String,
    pub is_bound: bool,
    pub entity_set_type: Option<String>,
    /// Parameters in document order, binding parameter included.
    pub parameters: Vec<Parameter>,
    pub return_type: Option<ReturnType>,
}

impl DeOperation {
    /// # Errors
    ///
    /// Actually, doesn't return any errors. Kept for call-site
    /// consistency with the other schema children.
    pub fn validate(self) -> Result<Operation, ValidateError> {
        let (parameters, mut return_types) =
            self.items
                .into_iter()
                .fold((Vec::new(), Vec::new()), |(mut ps, mut rts), v| {
                    match v {
                        DeOperationItem::Parameter(p) => ps.push(p),
                        DeOperationItem::ReturnType(rt) => rts.push(rt),
                        DeOperationItem::Annotation(_) => {}
                    }
                    (ps, rts)
                });
        Ok(Operation {
            name: self.name,
            is_bound: self.is_bound.unwrap_or(false),
            entity_set_type: self.entity_set_type,
            parameters,
            return_type: return_types.pop(),
        })
    }
}

#[cfg(test)]
mod test {
    use crate::edm::Edmx;

    #[test]
    fn bound_action_with_parameters_and_return_type() {
        let data = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="microsoft.graph">
                 <Action Name="assignLicense" IsBound="true">
                   <Parameter Name="bindingParameter" Type="microsoft.graph.user"/>
                   <Parameter Name="addLicenses" Type="Collection(microsoft.graph.assignedLicense)"/>
                   <Parameter Name="removeLicenses" Type="Collection(Edm.Guid)" Nullable="false"/>
                   <ReturnType Type="microsoft.graph.user"/>
                 </Action>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let edmx = Edmx::parse(data).unwrap();
        let action = &edmx.data_services.schemas[0].actions[0];
        assert!(action.is_bound);
        assert_eq!(action.parameters.len(), 3);
        assert_eq!(action.parameters[0].name, "bindingParameter");
        assert_eq!(
            action.parameters[1].ptype.inner(),
            "Collection(microsoft.graph.assignedLicense)"
        );
        assert_eq!(
            action.return_type.as_ref().unwrap().rtype.inner(),
            "microsoft.graph.user"
        );
    }
}
