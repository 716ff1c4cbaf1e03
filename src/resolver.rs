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

use crate::edm::schema::Schema;
use crate::edm::Edmx;

/// Namespace and alias of one declared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNames {
    pub namespace: String,
    pub alias: Option<String>,
}

/// Rewrites alias-qualified type references to namespace-qualified
/// ones.
///
/// A reference like `graph.user` or `Collection(graph.user)` is
/// rewritten against the declaring schema's alias first, then against
/// every schema in document order. References that match no alias are
/// returned unchanged; they are either already namespace-qualified or
/// will fail later at registry lookup.
#[derive(Debug)]
pub struct NamespaceResolver {
    schemas: Vec<SchemaNames>,
}

impl NamespaceResolver {
    #[must_use]
    pub fn from_document(edmx: &Edmx) -> Self {
        let schemas = edmx
            .data_services
            .schemas
            .iter()
            .map(|s| SchemaNames {
                namespace: s.namespace.clone(),
                alias: s.alias.clone(),
            })
            .collect();
        Self { schemas }
    }

    /// Declared namespaces in document order.
    #[must_use]
    pub fn namespaces(&self) -> &[SchemaNames] {
        &self.schemas
    }

    /// Resolve a raw type reference from `declaring` to its
    /// namespace-qualified form.
    #[must_use]
    pub fn resolve(&self, declaring: Option<&Schema>, raw: &str) -> String {
        let declaring = match declaring {
            Some(schema) => schema,
            None => return raw.to_string(),
        };
        if let Some(resolved) =
            substitute_alias(&declaring.namespace, declaring.alias.as_deref(), raw)
        {
            return resolved;
        }
        self.schemas
            .iter()
            .find_map(|s| substitute_alias(&s.namespace, s.alias.as_deref(), raw))
            .unwrap_or_else(|| raw.to_string())
    }
}

fn substitute_alias(namespace: &str, alias: Option<&str>, raw: &str) -> Option<String> {
    let alias = alias?;
    let alias_prefix = format!("{alias}.");
    let collection_prefix = format!("Collection({alias_prefix}");
    if raw.starts_with(&alias_prefix) || raw.starts_with(&collection_prefix) {
        Some(raw.replace(&alias_prefix, &format!("{namespace}.")))
    } else {
        None
    }
}
