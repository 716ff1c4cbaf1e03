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

use crate::edm::operation::Operation as EdmOperation;
use crate::edm::property::NavigationProperty as EdmNavigationProperty;
use crate::edm::property::Property as EdmProperty;
use crate::edm::schema::Schema;
use crate::edm::Edmx;
use crate::edm::ValidateError;
use crate::error::Error;
use crate::registry::TypeRegistry;
use crate::resolver::NamespaceResolver;
use crate::resolver::SchemaNames;
use crate::types::primitive::CATALOG;
use crate::types::ComplexType;
use crate::types::EntitySet;
use crate::types::EntityType;
use crate::types::EnumMember;
use crate::types::EnumType;
use crate::types::NavigationProperty;
use crate::types::Operation;
use crate::types::Parameter;
use crate::types::Property;
use crate::types::Singleton;
use crate::types::TypeDescriptor;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::RwLock;

type OperationCache = RwLock<Option<Arc<Vec<Operation>>>>;

/// A parsed metadata document with lazily derived views.
///
/// Container views (`singletons`, `entity_sets`) and operation views
/// (`actions`, `functions`) are computed on first access and memoized.
/// Operation construction can fail, so those caches memoize the first
/// successful build only.
#[derive(Debug)]
pub struct Metadata {
    edmx: Edmx,
    resolver: NamespaceResolver,
    singletons: OnceLock<Vec<Singleton>>,
    entity_sets: OnceLock<Vec<EntitySet>>,
    actions: OperationCache,
    functions: OperationCache,
}

impl Metadata {
    /// Parse and validate a `$metadata` document.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSchemaAncestor`] for type or operation nodes
    /// outside any `Schema`, [`Error::Metadata`] for every other
    /// parse or validation failure.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let edmx = Edmx::parse(text).map_err(|e| match e {
            ValidateError::MissingSchemaAncestor(node) => Error::MissingSchemaAncestor(node),
            other => Error::Metadata(other),
        })?;
        let resolver = NamespaceResolver::from_document(&edmx);
        Ok(Self {
            edmx,
            resolver,
            singletons: OnceLock::new(),
            entity_sets: OnceLock::new(),
            actions: OperationCache::default(),
            functions: OperationCache::default(),
        })
    }

    /// Register a descriptor for every type the document declares.
    ///
    /// Fixed order: enums, primitives, complex types, entity types.
    /// Cross-type references are stored by name, so declaration order
    /// inside the document never matters.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn build_registry(&self, registry: &TypeRegistry) -> Result<(), Error> {
        for schema in self.schemas() {
            for enum_type in &schema.enum_types {
                let members = enum_type
                    .members
                    .iter()
                    .enumerate()
                    .map(|(position, member)| EnumMember {
                        name: member.name.clone(),
                        value: member.value.unwrap_or(position as i64),
                    })
                    .collect();
                registry.register(TypeDescriptor::Enum(EnumType {
                    name: qualify(schema, &enum_type.name),
                    members,
                }))?;
            }
        }
        for kind in CATALOG {
            registry.register(TypeDescriptor::Primitive(kind))?;
        }
        for schema in self.schemas() {
            for complex in &schema.complex_types {
                let base_type = complex
                    .base_type
                    .as_ref()
                    .map(|t| self.resolver.resolve(Some(schema), t.inner()));
                registry.register(TypeDescriptor::Complex(ComplexType {
                    name: qualify(schema, &complex.name),
                    base_type,
                }))?;
            }
        }
        for schema in self.schemas() {
            for entity in &schema.entity_types {
                let base_type = entity
                    .base_type
                    .as_ref()
                    .map(|t| self.resolver.resolve(Some(schema), t.inner()));
                registry.register(TypeDescriptor::Entity(EntityType {
                    name: qualify(schema, &entity.name),
                    base_type,
                    is_abstract: entity.is_abstract,
                    open_type: entity.open_type,
                    has_stream: entity.has_stream,
                }))?;
            }
        }
        Ok(())
    }

    /// Declared namespaces with their aliases, in document order.
    #[must_use]
    pub fn namespaces(&self) -> &[SchemaNames] {
        self.resolver.namespaces()
    }

    /// Singletons declared by the entity containers, in document
    /// order.
    #[must_use]
    pub fn singletons(&self) -> &[Singleton] {
        self.singletons.get_or_init(|| {
            let mut out = Vec::new();
            for schema in self.schemas() {
                for container in &schema.containers {
                    for singleton in &container.singletons {
                        out.push(Singleton {
                            name: singleton.name.clone(),
                            type_name: self
                                .resolver
                                .resolve(Some(schema), singleton.stype.inner()),
                        });
                    }
                }
            }
            out
        })
    }

    /// Entity sets declared by the entity containers, in document
    /// order.
    #[must_use]
    pub fn entity_sets(&self) -> &[EntitySet] {
        self.entity_sets.get_or_init(|| {
            let mut out = Vec::new();
            for schema in self.schemas() {
                for container in &schema.containers {
                    for entity_set in &container.entity_sets {
                        out.push(EntitySet {
                            name: entity_set.name.clone(),
                            member_type_name: self
                                .resolver
                                .resolve(Some(schema), entity_set.entity_type.inner()),
                        });
                    }
                }
            }
            out
        })
    }

    #[must_use]
    pub fn entity_set_by_name(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets().iter().find(|s| s.name == name)
    }

    /// Every declared action, with type references resolved in
    /// `registry`.
    ///
    /// # Errors
    ///
    /// Lookup errors for unresolvable parameter, binding or return
    /// types.
    pub fn actions(&self, registry: &TypeRegistry) -> Result<Arc<Vec<Operation>>, Error> {
        self.operations(registry, &self.actions, |schema| schema.actions.as_slice())
    }

    /// Every declared function, with type references resolved in
    /// `registry`.
    ///
    /// # Errors
    ///
    /// Lookup errors for unresolvable parameter, binding or return
    /// types.
    pub fn functions(&self, registry: &TypeRegistry) -> Result<Arc<Vec<Operation>>, Error> {
        self.operations(registry, &self.functions, |schema| schema.functions.as_slice())
    }

    /// Structural properties of the type with `type_name`, resolved in
    /// `registry`.
    ///
    /// The document is searched by bare type name, namespace prefix
    /// stripped, across every schema; matches aggregate in document
    /// order.
    ///
    /// # Errors
    ///
    /// Lookup errors for unresolvable property types.
    pub fn properties_for_type(
        &self,
        registry: &TypeRegistry,
        type_name: &str,
    ) -> Result<Vec<Property>, Error> {
        let bare = bare_name(type_name);
        let mut out = Vec::new();
        for schema in self.schemas() {
            for entity in &schema.entity_types {
                if entity.name == bare {
                    for property in &entity.properties {
                        out.push(self.runtime_property(registry, schema, property)?);
                    }
                }
            }
            for complex in &schema.complex_types {
                if complex.name == bare {
                    for property in &complex.properties {
                        out.push(self.runtime_property(registry, schema, property)?);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Navigation properties of the type with `type_name`, resolved in
    /// `registry`. Search rules match [`Self::properties_for_type`].
    ///
    /// # Errors
    ///
    /// Lookup errors for unresolvable target types.
    pub fn navigation_properties_for_type(
        &self,
        registry: &TypeRegistry,
        type_name: &str,
    ) -> Result<Vec<NavigationProperty>, Error> {
        let bare = bare_name(type_name);
        let mut out = Vec::new();
        for schema in self.schemas() {
            for entity in &schema.entity_types {
                if entity.name == bare {
                    for property in &entity.navigation_properties {
                        out.push(self.runtime_navigation_property(registry, schema, property)?);
                    }
                }
            }
            for complex in &schema.complex_types {
                if complex.name == bare {
                    for property in &complex.navigation_properties {
                        out.push(self.runtime_navigation_property(registry, schema, property)?);
                    }
                }
            }
        }
        Ok(out)
    }

    /// A single navigation property of `type_name`, by name.
    ///
    /// # Errors
    ///
    /// Lookup errors for unresolvable target types.
    pub fn navigation_property_by_name(
        &self,
        registry: &TypeRegistry,
        type_name: &str,
        property: &str,
    ) -> Result<Option<NavigationProperty>, Error> {
        Ok(self
            .navigation_properties_for_type(registry, type_name)?
            .into_iter()
            .find(|p| p.name == property))
    }

    fn operations(
        &self,
        registry: &TypeRegistry,
        cache: &OperationCache,
        pick: impl Fn(&Schema) -> &[EdmOperation],
    ) -> Result<Arc<Vec<Operation>>, Error> {
        {
            let cached = cache.read().map_err(|e| Error::Lock(e.to_string()))?;
            if let Some(operations) = cached.as_ref() {
                return Ok(operations.clone());
            }
        }
        let mut built = Vec::new();
        for schema in self.schemas() {
            for operation in pick(schema) {
                built.push(self.build_operation(registry, schema, operation)?);
            }
        }
        let built = Arc::new(built);
        *cache.write().map_err(|e| Error::Lock(e.to_string()))? = Some(built.clone());
        Ok(built)
    }

    fn build_operation(
        &self,
        registry: &TypeRegistry,
        schema: &Schema,
        operation: &EdmOperation,
    ) -> Result<Operation, Error> {
        // The binding parameter's name is matched case-insensitively;
        // documents in the wild carry both spellings.
        let binding_parameter = operation
            .parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case("bindingparameter"));
        let binding_type = match binding_parameter {
            Some(parameter) if operation.is_bound => Some(registry.lookup(
                &self.resolver.resolve(Some(schema), parameter.ptype.inner()),
            )?),
            _ => None,
        };
        let entity_set = operation
            .entity_set_type
            .as_ref()
            .and_then(|name| self.entity_set_by_name(name).cloned());
        let parameters = operation
            .parameters
            .iter()
            .filter(|p| !p.name.eq_ignore_ascii_case("bindingparameter"))
            .map(|p| {
                Ok(Parameter {
                    name: p.name.clone(),
                    ptype: registry
                        .lookup(&self.resolver.resolve(Some(schema), p.ptype.inner()))?,
                    nullable: p.nullable.unwrap_or(true),
                })
            })
            .collect::<Result<Vec<Parameter>, Error>>()?;
        let return_type = match &operation.return_type {
            Some(rt) => Some(
                registry.lookup(&self.resolver.resolve(Some(schema), rt.rtype.inner()))?,
            ),
            None => None,
        };
        Ok(Operation {
            name: operation.name.clone(),
            binding_type,
            entity_set,
            parameters,
            return_type,
        })
    }

    fn runtime_property(
        &self,
        registry: &TypeRegistry,
        schema: &Schema,
        property: &EdmProperty,
    ) -> Result<Property, Error> {
        Ok(Property {
            name: property.name.clone(),
            nullable: property.nullable.unwrap_or(true),
            ptype: registry
                .lookup(&self.resolver.resolve(Some(schema), property.ptype.inner()))?,
        })
    }

    fn runtime_navigation_property(
        &self,
        registry: &TypeRegistry,
        schema: &Schema,
        property: &EdmNavigationProperty,
    ) -> Result<NavigationProperty, Error> {
        Ok(NavigationProperty {
            name: property.name.clone(),
            nullable: property.nullable.unwrap_or(true),
            ptype: registry
                .lookup(&self.resolver.resolve(Some(schema), property.ptype.inner()))?,
            contains_target: property.contains_target.unwrap_or(false),
            partner: property.partner.clone(),
        })
    }

    fn schemas(&self) -> &[Schema] {
        &self.edmx.data_services.schemas
    }
}

fn qualify(schema: &Schema, name: &str) -> String {
    format!("{}.{}", schema.namespace, name)
}

/// Bare type name with any namespace prefix stripped.
fn bare_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod test {
    use super::Metadata;
    use crate::registry::TypeRegistry;
    use crate::types::TypeDescriptor;

    const GRAPH_SAMPLE: &str = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="microsoft.graph" Alias="graph">
             <EnumType Name="bodyType">
               <Member Name="text"/>
               <Member Name="html"/>
               <Member Name="unknownFutureValue" Value="99"/>
             </EnumType>
             <ComplexType Name="itemBody" BaseType="graph.entityBody">
               <Property Name="contentType" Type="graph.bodyType"/>
               <Property Name="content" Type="Edm.String" Nullable="false"/>
             </ComplexType>
             <ComplexType Name="entityBody"/>
             <EntityType Name="directoryObject" Abstract="true">
               <Key><PropertyRef Name="id"/></Key>
               <Property Name="id" Type="Edm.String" Nullable="false"/>
             </EntityType>
             <EntityType Name="user" BaseType="graph.directoryObject" OpenType="true">
               <Property Name="displayName" Type="Edm.String"/>
               <Property Name="skills" Type="Collection(Edm.String)"/>
               <NavigationProperty Name="messages" Type="Collection(graph.message)"/>
               <NavigationProperty Name="manager" Type="graph.directoryObject"/>
             </EntityType>
             <EntityType Name="message" BaseType="graph.directoryObject">
               <Property Name="body" Type="graph.itemBody"/>
             </EntityType>
             <Action Name="assignLicense" IsBound="true">
               <Parameter Name="BindingParameter" Type="graph.user"/>
               <Parameter Name="addLicenses" Type="Collection(Edm.Guid)" Nullable="false"/>
               <ReturnType Type="graph.user"/>
             </Action>
             <Function Name="delta">
               <ReturnType Type="Collection(graph.user)"/>
             </Function>
             <EntityContainer Name="GraphService">
               <EntitySet Name="users" EntityType="graph.user"/>
               <EntitySet Name="messages" EntityType="graph.message"/>
               <Singleton Name="me" Type="graph.user"/>
             </EntityContainer>
           </Schema>
         </edmx:DataServices>
       </edmx:Edmx>"#;

    fn built() -> (Metadata, TypeRegistry) {
        let metadata = Metadata::parse(GRAPH_SAMPLE).unwrap();
        let registry = TypeRegistry::new();
        metadata.build_registry(&registry).unwrap();
        (metadata, registry)
    }

    #[test]
    fn registry_holds_declared_and_primitive_types() {
        let (_, registry) = built();
        assert!(registry.get("microsoft.graph.user").unwrap().is_some());
        assert!(registry.get("microsoft.graph.itemBody").unwrap().is_some());
        assert!(registry.get("microsoft.graph.bodyType").unwrap().is_some());
        assert!(registry.get("Edm.String").unwrap().is_some());
        // Collections materialize on lookup, not during the build.
        assert!(registry.get("Collection(Edm.String)").unwrap().is_none());
    }

    #[test]
    fn enum_members_default_to_their_position() {
        let (_, registry) = built();
        let descriptor = registry.lookup("microsoft.graph.bodyType").unwrap();
        match &*descriptor {
            TypeDescriptor::Enum(enum_type) => {
                assert_eq!(enum_type.member_by_name("text").unwrap().value, 0);
                assert_eq!(enum_type.member_by_name("html").unwrap().value, 1);
                assert_eq!(
                    enum_type.member_by_name("unknownFutureValue").unwrap().value,
                    99
                );
            }
            other => panic!("not an enum: {other:?}"),
        }
    }

    #[test]
    fn base_type_references_are_namespace_qualified() {
        let (_, registry) = built();
        let descriptor = registry.lookup("microsoft.graph.user").unwrap();
        match &*descriptor {
            TypeDescriptor::Entity(entity) => {
                assert_eq!(
                    entity.base_type.as_deref(),
                    Some("microsoft.graph.directoryObject")
                );
                assert!(entity.open_type);
                let base = entity.base_type_in(&registry).unwrap().unwrap();
                assert_eq!(base.name(), "microsoft.graph.directoryObject");
            }
            other => panic!("not an entity: {other:?}"),
        }
    }

    #[test]
    fn forward_base_type_references_resolve() {
        // itemBody is declared before its base type entityBody.
        let (_, registry) = built();
        let descriptor = registry.lookup("microsoft.graph.itemBody").unwrap();
        match &*descriptor {
            TypeDescriptor::Complex(complex) => {
                let base = complex.base_type_in(&registry).unwrap().unwrap();
                assert_eq!(base.name(), "microsoft.graph.entityBody");
            }
            other => panic!("not a complex type: {other:?}"),
        }
    }

    #[test]
    fn container_views_resolve_aliases() {
        let (metadata, _) = built();
        let sets = metadata.entity_sets();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "users");
        assert_eq!(sets[0].member_type_name, "microsoft.graph.user");
        let singletons = metadata.singletons();
        assert_eq!(singletons.len(), 1);
        assert_eq!(singletons[0].name, "me");
        assert_eq!(singletons[0].type_name, "microsoft.graph.user");
        assert!(metadata.entity_set_by_name("users").is_some());
        assert!(metadata.entity_set_by_name("groups").is_none());
    }

    #[test]
    fn properties_resolve_with_nullable_defaulting_true() {
        let (metadata, registry) = built();
        let properties = metadata
            .properties_for_type(&registry, "microsoft.graph.itemBody")
            .unwrap();
        assert_eq!(properties.len(), 2);
        assert!(properties[0].nullable);
        assert!(!properties[1].nullable);
        assert_eq!(properties[0].ptype.name(), "microsoft.graph.bodyType");
        assert_eq!(properties[1].ptype.name(), "Edm.String");
    }

    #[test]
    fn navigation_properties_resolve_collection_targets() {
        let (metadata, registry) = built();
        let properties = metadata
            .navigation_properties_for_type(&registry, "microsoft.graph.user")
            .unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(
            properties[0].ptype.name(),
            "Collection(microsoft.graph.message)"
        );
        let manager = metadata
            .navigation_property_by_name(&registry, "microsoft.graph.user", "manager")
            .unwrap()
            .unwrap();
        assert_eq!(manager.ptype.name(), "microsoft.graph.directoryObject");
    }

    #[test]
    fn bound_action_splits_off_its_binding_parameter() {
        let (metadata, registry) = built();
        let actions = metadata.actions(&registry).unwrap();
        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.name, "assignLicense");
        assert_eq!(
            action.binding_type.as_ref().unwrap().name(),
            "microsoft.graph.user"
        );
        assert_eq!(action.parameters.len(), 1);
        assert_eq!(action.parameters[0].name, "addLicenses");
        assert!(!action.parameters[0].nullable);
        assert_eq!(
            action.return_type.as_ref().unwrap().name(),
            "microsoft.graph.user"
        );
    }

    #[test]
    fn operation_views_are_memoized() {
        let (metadata, registry) = built();
        let first = metadata.functions(&registry).unwrap();
        let second = metadata.functions(&registry).unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(first[0].name, "delta");
        assert_eq!(
            first[0].return_type.as_ref().unwrap().name(),
            "Collection(microsoft.graph.user)"
        );
    }
}
