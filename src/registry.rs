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

use crate::error::Error;
use crate::types::CollectionType;
use crate::types::TypeDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

type TypeMap = HashMap<String, Arc<TypeDescriptor>>;

/// Shared map from fully-qualified type name to descriptor.
///
/// Collection types are never declared in a document; they are built
/// lazily on first `Collection(...)` lookup and memoized, so repeated
/// lookups return the same [`Arc`].
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<TypeMap>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` under its own name, replacing any
    /// previous entry with that name.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<Arc<TypeDescriptor>, Error> {
        let descriptor = Arc::new(descriptor);
        self.write()?
            .insert(descriptor.name().to_string(), descriptor.clone());
        Ok(descriptor)
    }

    /// Look up a registered descriptor without constructing anything.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn get(&self, name: &str) -> Result<Option<Arc<TypeDescriptor>>, Error> {
        Ok(self.read()?.get(name).cloned())
    }

    /// Look up a descriptor, constructing `Collection(...)` entries on
    /// demand. Nested collection forms resolve recursively.
    ///
    /// # Errors
    ///
    /// [`Error::NotACollectionType`] when `name` is neither registered
    /// nor a collection form over a resolvable member type, and
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>, Error> {
        if let Some(found) = self.get(name)? {
            return Ok(found);
        }
        let member_name =
            collection_member(name).ok_or_else(|| Error::NotACollectionType(name.to_string()))?;
        let member_type = self.lookup(member_name)?;
        let mut types = self.write()?;
        let entry = types.entry(name.to_string()).or_insert_with(|| {
            Arc::new(TypeDescriptor::Collection(CollectionType {
                name: name.to_string(),
                member_type,
            }))
        });
        Ok(entry.clone())
    }

    /// Snapshot of every registered descriptor, in no particular
    /// order.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn descriptors(&self) -> Result<Vec<Arc<TypeDescriptor>>, Error> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TypeMap>, Error> {
        self.types.read().map_err(|e| Error::Lock(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TypeMap>, Error> {
        self.types.write().map_err(|e| Error::Lock(e.to_string()))
    }
}

/// Member type name of a `Collection(...)` form, or `None` when
/// `name` is not collection-shaped.
fn collection_member(name: &str) -> Option<&str> {
    name.strip_prefix("Collection(")?.strip_suffix(')')
}

#[cfg(test)]
mod test {
    use super::TypeRegistry;
    use crate::error::Error;
    use crate::types::PrimitiveType;
    use crate::types::TypeDescriptor;
    use std::sync::Arc;

    #[test]
    fn lookup_finds_registered_types() {
        let registry = TypeRegistry::new();
        let registered = registry
            .register(TypeDescriptor::Primitive(PrimitiveType::Int32))
            .unwrap();
        let found = registry.lookup("Edm.Int32").unwrap();
        assert!(Arc::ptr_eq(&registered, &found));
    }

    #[test]
    fn collection_lookup_is_memoized() {
        let registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::Primitive(PrimitiveType::String))
            .unwrap();
        let first = registry.lookup("Collection(Edm.String)").unwrap();
        let second = registry.lookup("Collection(Edm.String)").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "Collection(Edm.String)");
        assert_eq!(first.member_type().unwrap().name(), "Edm.String");
    }

    #[test]
    fn nested_collections_resolve_recursively() {
        let registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::Primitive(PrimitiveType::Guid))
            .unwrap();
        let nested = registry.lookup("Collection(Collection(Edm.Guid))").unwrap();
        let inner = nested.member_type().unwrap();
        assert_eq!(inner.name(), "Collection(Edm.Guid)");
        assert_eq!(inner.member_type().unwrap().name(), "Edm.Guid");
    }

    #[test]
    fn unknown_plain_name_is_not_a_collection_type() {
        let registry = TypeRegistry::new();
        match registry.lookup("microsoft.graph.nope") {
            Err(Error::NotACollectionType(name)) => assert_eq!(name, "microsoft.graph.nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn collection_over_unknown_member_fails() {
        let registry = TypeRegistry::new();
        match registry.lookup("Collection(microsoft.graph.nope)") {
            Err(Error::NotACollectionType(name)) => assert_eq!(name, "microsoft.graph.nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
