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

use crate::edm::property::NavigationProperty;
use crate::edm::property::Property;
use crate::edm::Annotation;
use crate::edm::PropertyName;
use crate::edm::TypeName;
use crate::edm::ValidateError;
use serde::Deserialize;

/// Element edm:EntityType
#[derive(Debug, Deserialize)]
pub struct DeEntityType {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@BaseType")]
    pub base_type: Option<TypeName>,
    #[serde(rename = "@Abstract")]
    pub r#abstract: Option<bool>,
    #[serde(rename = "@OpenType")]
    pub open_type: Option<bool>,
    #[serde(rename = "@HasStream")]
    pub has_stream: Option<bool>,
    #[serde(rename = "$value", default)]
    pub items: Vec<DeEntityTypeItem>,
}

/// Child item of edm:EntityType
#[derive(Debug, Deserialize)]
pub enum DeEntityTypeItem {
    Key(Key),
    Property(Property),
    NavigationProperty(NavigationProperty),
    Annotation(Annotation),
}

/// Element edm:Key
#[derive(Debug, Deserialize)]
pub struct Key {
    #[serde(rename = "PropertyRef", default)]
    pub property_refs: Vec<PropertyRef>,
}

/// Element edm:PropertyRef
#[derive(Debug, Deserialize)]
pub struct PropertyRef {
    #[serde(rename = "@Name")]
    pub name: PropertyName,
}

/// Validated edm:EntityType
#[derive(Debug)]
pub struct EntityType {
    pub name: String,
    pub base_type: Option<TypeName>,
    pub is_abstract: bool,
    pub open_type: bool,
    pub has_stream: bool,
    pub key: Option<Key>,
    pub properties: Vec<Property>,
    pub navigation_properties: Vec<NavigationProperty>,
}

impl DeEntityType {
    /// # Errors
    ///
    /// Actually, doesn't return any errors. Kept for call-site
    /// consistency with the other schema children.
    pub fn validate(self) -> Result<EntityType, ValidateError> {
        let (keys, properties, navigation_properties) = partition_items(self.items);
        Ok(EntityType {
            name: self.name,
            base_type: self.base_type,
            is_abstract: self.r#abstract.unwrap_or(false),
            open_type: self.open_type.unwrap_or(false),
            has_stream: self.has_stream.unwrap_or(false),
            key: keys.into_iter().next(),
            properties,
            navigation_properties,
        })
    }
}

pub(crate) fn partition_items(
    items: Vec<DeEntityTypeItem>,
) -> (Vec<Key>, Vec<Property>, Vec<NavigationProperty>) {
    items.into_iter().fold(
        (Vec::new(), Vec::new(), Vec::new()),
        |(mut keys, mut ps, mut nps), v| {
            match v {
                DeEntityTypeItem::Key(k) => keys.push(k),
                DeEntityTypeItem::Property(p) => ps.push(p),
                DeEntityTypeItem::NavigationProperty(np) => nps.push(np),
                DeEntityTypeItem::Annotation(_) => {}
            }
            (keys, ps, nps)
        },
    )
}

#[cfg(test)]
mod test {
    use crate::edm::Edmx;

    #[test]
    fn entity_type_flags_and_children() {
        let data = r#"<edmx:Edmx Version="4.0">
             <edmx:DataServices>
               <Schema Namespace="microsoft.graph">
                 <EntityType Name="user" BaseType="microsoft.graph.directoryObject" OpenType="true">
                   <Key><PropertyRef Name="id"/></Key>
                   <Property Name="displayName" Type="Edm.String"/>
                   <Property Name="accountEnabled" Type="Edm.Boolean" Nullable="false"/>
                   <NavigationProperty Name="manager" Type="microsoft.graph.directoryObject" Partner="directReports"/>
                 </EntityType>
               </Schema>
             </edmx:DataServices>
           </edmx:Edmx>"#;
        let edmx = Edmx::parse(data).unwrap();
        let entity = &edmx.data_services.schemas[0].entity_types[0];
        assert_eq!(entity.name, "user");
        assert!(entity.open_type);
        assert!(!entity.is_abstract);
        assert!(!entity.has_stream);
        assert_eq!(entity.properties.len(), 2);
        assert_eq!(entity.properties[1].nullable, Some(false));
        assert_eq!(entity.navigation_properties.len(), 1);
        assert_eq!(
            entity.navigation_properties[0].partner.as_deref(),
            Some("directReports")
        );
        assert_eq!(
            entity.key.as_ref().unwrap().property_refs[0].name,
            "id"
        );
    }
}
