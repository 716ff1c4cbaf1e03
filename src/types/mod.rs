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

//! Runtime type descriptors built from a parsed metadata document.
//!
//! Descriptors are immutable once registered and shared as
//! [`Arc<TypeDescriptor>`]. Cross-type references (base types, entity
//! set members) are carried as fully-qualified names and looked up in
//! the registry on demand, so declaration order in the document never
//! matters.

pub mod primitive;

use crate::error::Error;
use crate::registry::TypeRegistry;
use serde_json::Value;
use std::sync::Arc;

pub use primitive::PrimitiveType;

/// A runtime type, tagged by kind.
#[derive(Debug)]
pub enum TypeDescriptor {
    Primitive(PrimitiveType),
    Enum(EnumType),
    Complex(ComplexType),
    Entity(EntityType),
    Collection(CollectionType),
}

impl TypeDescriptor {
    /// Fully-qualified name, the registry key for this descriptor.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Enum(enum_type) => &enum_type.name,
            Self::Complex(complex) => &complex.name,
            Self::Entity(entity) => &entity.name,
            Self::Collection(collection) => &collection.name,
        }
    }

    /// Whether `value` already has this type's wire shape.
    #[must_use]
    pub fn valid_value(&self, value: &Value) -> bool {
        match self {
            Self::Primitive(kind) => kind.valid_value(value),
            Self::Enum(enum_type) => enum_type.valid_value(value),
            Self::Complex(_) | Self::Entity(_) => value.is_object(),
            Self::Collection(collection) => value
                .as_array()
                .map_or(false, |items| {
                    items.iter().all(|i| collection.member_type.valid_value(i))
                }),
        }
    }

    /// Coerce `value` into this type's wire representation.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the value cannot represent this
    /// type.
    pub fn coerce(&self, value: &Value) -> Result<Value, Error> {
        match self {
            Self::Primitive(kind) => kind.coerce(value),
            Self::Enum(_) | Self::Complex(_) | Self::Entity(_) => {
                if self.valid_value(value) {
                    Ok(value.clone())
                } else {
                    Err(self.mismatch(value))
                }
            }
            Self::Collection(collection) => {
                let items = value.as_array().ok_or_else(|| self.mismatch(value))?;
                items
                    .iter()
                    .map(|i| collection.member_type.coerce(i))
                    .collect::<Result<Vec<Value>, Error>>()
                    .map(Value::Array)
            }
        }
    }

    /// The element type, when this descriptor is a collection.
    #[must_use]
    pub fn member_type(&self) -> Option<&Arc<TypeDescriptor>> {
        match self {
            Self::Collection(collection) => Some(&collection.member_type),
            _ => None,
        }
    }

    fn mismatch(&self, value: &Value) -> Error {
        Error::TypeMismatch {
            type_name: self.name().to_string(),
            value: value.to_string(),
        }
    }
}

/// A declared enumeration with its resolved member values.
#[derive(Debug)]
pub struct EnumType {
    pub name: String,
    /// Members in document order, every value resolved.
    pub members: Vec<EnumMember>,
}

impl EnumType {
    #[must_use]
    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    fn valid_value(&self, value: &Value) -> bool {
        value
            .as_str()
            .map_or(false, |name| self.member_by_name(name).is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// A structured type without identity.
#[derive(Debug)]
pub struct ComplexType {
    pub name: String,
    /// Fully-qualified base type name; the link stays name-based so
    /// forward references in the document resolve.
    pub base_type: Option<String>,
}

impl ComplexType {
    /// Resolve the base type descriptor, if one is declared.
    ///
    /// # Errors
    ///
    /// Lookup errors from the registry.
    pub fn base_type_in(
        &self,
        registry: &TypeRegistry,
    ) -> Result<Option<Arc<TypeDescriptor>>, Error> {
        match &self.base_type {
            Some(name) => registry.lookup(name).map(Some),
            None => Ok(None),
        }
    }
}

/// A structured type with identity; a complex type plus entity flags.
#[derive(Debug)]
pub struct EntityType {
    pub name: String,
    pub base_type: Option<String>,
    pub is_abstract: bool,
    pub open_type: bool,
    pub has_stream: bool,
}

impl EntityType {
    /// Resolve the base type descriptor, if one is declared.
    ///
    /// # Errors
    ///
    /// Lookup errors from the registry.
    pub fn base_type_in(
        &self,
        registry: &TypeRegistry,
    ) -> Result<Option<Arc<TypeDescriptor>>, Error> {
        match &self.base_type {
            Some(name) => registry.lookup(name).map(Some),
            None => Ok(None),
        }
    }
}

/// A homogeneous collection over a member type.
#[derive(Debug)]
pub struct CollectionType {
    /// `Collection(<member>)`, exactly as looked up.
    pub name: String,
    pub member_type: Arc<TypeDescriptor>,
}

/// A declared structural property, with its type resolved.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub nullable: bool,
    pub ptype: Arc<TypeDescriptor>,
}

/// A declared navigation property, with its target type resolved.
#[derive(Debug, Clone)]
pub struct NavigationProperty {
    pub name: String,
    pub nullable: bool,
    pub ptype: Arc<TypeDescriptor>,
    pub contains_target: bool,
    pub partner: Option<String>,
}

/// A top-level collection exposed by the service's entity container.
#[derive(Debug, Clone)]
pub struct EntitySet {
    pub name: String,
    /// Fully-qualified member entity type name.
    pub member_type_name: String,
}

impl EntitySet {
    /// Resolve the member entity type in `registry`.
    ///
    /// # Errors
    ///
    /// Lookup errors from the registry.
    pub fn member_type(&self, registry: &TypeRegistry) -> Result<Arc<TypeDescriptor>, Error> {
        registry.lookup(&self.member_type_name)
    }
}

/// A top-level single resource exposed by the service's entity
/// container.
#[derive(Debug, Clone)]
pub struct Singleton {
    pub name: String,
    /// Fully-qualified resource type name.
    pub type_name: String,
}

impl Singleton {
    /// Resolve the resource type in `registry`.
    ///
    /// # Errors
    ///
    /// Lookup errors from the registry.
    pub fn resource_type(&self, registry: &TypeRegistry) -> Result<Arc<TypeDescriptor>, Error> {
        registry.lookup(&self.type_name)
    }
}

/// A declared action or function with every type reference resolved.
#[derive(Debug)]
pub struct Operation {
    pub name: String,
    /// Type the operation is bound to, from its binding parameter.
    pub binding_type: Option<Arc<TypeDescriptor>>,
    pub entity_set: Option<EntitySet>,
    /// Parameters in document order, binding parameter excluded.
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Arc<TypeDescriptor>>,
}

#[derive(Debug)]
pub struct Parameter {
    pub name: String,
    pub ptype: Arc<TypeDescriptor>,
    pub nullable: bool,
}
