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
use crate::metadata::Metadata;
use crate::registry::TypeRegistry;
use crate::types::TypeDescriptor;
use serde_json::Map;
use serde_json::Value;
use std::sync::Arc;

/// A decoded service response with its classified type.
#[derive(Debug)]
pub struct Response {
    /// Descriptor of the type the payload represents, when the
    /// payload carries enough information to classify it.
    pub odata_type: Option<Arc<TypeDescriptor>>,
    /// Decoded body, keys converted to snake case.
    pub attributes: Map<String, Value>,
}

/// Classify a response payload by its annotations.
///
/// `@odata.type` wins when present: its value, leading `#` stripped,
/// is looked up directly in the registry. Otherwise the
/// `@odata.context` trail is walked through the document. A payload
/// with neither annotation is unclassified.
///
/// # Errors
///
/// Registry lookup errors; [`Error::MetadataReleased`] when a context
/// trail must be walked but the document is gone;
/// [`Error::UnknownEntitySet`] and
/// [`Error::UnknownNavigationProperty`] for trails the document
/// cannot satisfy.
pub fn resolve_response_type(
    metadata: Option<&Metadata>,
    registry: &TypeRegistry,
    attributes: &Map<String, Value>,
) -> Result<Option<Arc<TypeDescriptor>>, Error> {
    if let Some(Value::String(annotation)) = attributes.get("@odata.type") {
        let name = annotation.strip_prefix('#').unwrap_or(annotation);
        return registry.lookup(name).map(Some);
    }
    if let Some(Value::String(context)) = attributes.get("@odata.context") {
        let metadata = metadata.ok_or(Error::MetadataReleased)?;
        return walk_context_trail(metadata, registry, context).map(Some);
    }
    Ok(None)
}

/// Walk a context reference like
/// `https://host/v1.0/$metadata#users('id')/messages/$entity` through
/// the entity container and navigation properties.
fn walk_context_trail(
    metadata: &Metadata,
    registry: &TypeRegistry,
    context: &str,
) -> Result<Arc<TypeDescriptor>, Error> {
    let trail = context.rsplit("$metadata#").next().unwrap_or(context);
    let mut segments: Vec<&str> = trail.split('/').map(strip_key).collect();
    let singular = segments.last() == Some(&"$entity");
    if singular {
        segments.pop();
    }
    let mut segments = segments.into_iter();
    let set_name = segments
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::UnknownEntitySet(trail.to_string()))?;
    let entity_set = metadata
        .entity_set_by_name(set_name)
        .ok_or_else(|| Error::UnknownEntitySet(set_name.to_string()))?;
    let mut current = registry.lookup(&collection_name(&entity_set.member_type_name))?;
    for segment in segments {
        current = match &*current {
            TypeDescriptor::Collection(collection) => {
                let member_name = collection.member_type.name().to_string();
                match metadata.navigation_property_by_name(registry, &member_name, segment)? {
                    Some(navigation) => navigation.ptype,
                    None => {
                        return Err(Error::UnknownNavigationProperty {
                            type_name: member_name,
                            property: segment.to_string(),
                        })
                    }
                }
            }
            // A trail can only descend through collections; a
            // non-collection step is already the answer.
            _ => current.clone(),
        };
    }
    if singular {
        if let Some(member_type) = current.member_type() {
            return Ok(member_type.clone());
        }
    }
    Ok(current)
}

/// Strip a key predicate: `users('id')` is the `users` segment.
fn strip_key(segment: &str) -> &str {
    segment.split('(').next().unwrap_or(segment)
}

fn collection_name(member: &str) -> String {
    format!("Collection({member})")
}

#[cfg(test)]
mod test {
    use super::resolve_response_type;
    use crate::error::Error;
    use crate::metadata::Metadata;
    use crate::registry::TypeRegistry;
    use serde_json::json;
    use serde_json::Map;
    use serde_json::Value;

    const GRAPH_SAMPLE: &str = r#"<edmx:Edmx Version="4.0">
         <edmx:DataServices>
           <Schema Namespace="microsoft.graph" Alias="graph">
             <EntityType Name="directoryObject">
               <Key><PropertyRef Name="id"/></Key>
             </EntityType>
             <EntityType Name="user" BaseType="graph.directoryObject">
               <NavigationProperty Name="messages" Type="Collection(graph.message)"/>
               <NavigationProperty Name="manager" Type="graph.directoryObject"/>
             </EntityType>
             <EntityType Name="message" BaseType="graph.directoryObject"/>
             <EntityContainer Name="GraphService">
               <EntitySet Name="users" EntityType="graph.user"/>
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

    fn attributes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn type_annotation_wins_and_drops_the_hash() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.type": "#microsoft.graph.user",
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users/$entity",
        }));
        let resolved = resolve_response_type(Some(&metadata), &registry, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name(), "microsoft.graph.user");
    }

    #[test]
    fn context_on_an_entity_set_is_a_collection() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users",
        }));
        let resolved = resolve_response_type(Some(&metadata), &registry, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name(), "Collection(microsoft.graph.user)");
    }

    #[test]
    fn entity_suffix_unwraps_to_the_member_type() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users/$entity",
        }));
        let resolved = resolve_response_type(Some(&metadata), &registry, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name(), "microsoft.graph.user");
    }

    #[test]
    fn keyed_navigation_descent_resolves_the_target() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.context":
                "https://graph.microsoft.com/v1.0/$metadata#users('user%40contoso.com')/messages",
        }));
        let resolved = resolve_response_type(Some(&metadata), &registry, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name(), "Collection(microsoft.graph.message)");
    }

    #[test]
    fn singular_navigation_stops_the_descent() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.context":
                "https://graph.microsoft.com/v1.0/$metadata#users('id')/manager/$entity",
        }));
        let resolved = resolve_response_type(Some(&metadata), &registry, &payload)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name(), "microsoft.graph.directoryObject");
    }

    #[test]
    fn unannotated_payloads_are_unclassified() {
        let (metadata, registry) = built();
        let payload = attributes(json!({"display_name": "Anne"}));
        assert!(resolve_response_type(Some(&metadata), &registry, &payload)
            .unwrap()
            .is_none());
    }

    #[test]
    fn unknown_entity_set_is_reported() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#groups",
        }));
        match resolve_response_type(Some(&metadata), &registry, &payload) {
            Err(Error::UnknownEntitySet(name)) => assert_eq!(name, "groups"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unknown_navigation_property_is_reported() {
        let (metadata, registry) = built();
        let payload = attributes(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users('id')/pets",
        }));
        match resolve_response_type(Some(&metadata), &registry, &payload) {
            Err(Error::UnknownNavigationProperty {
                type_name,
                property,
            }) => {
                assert_eq!(type_name, "microsoft.graph.user");
                assert_eq!(property, "pets");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn context_trails_need_the_document() {
        let (_, registry) = built();
        let payload = attributes(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users",
        }));
        match resolve_response_type(None, &registry, &payload) {
            Err(Error::MetadataReleased) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        // Type annotations only need the registry.
        let annotated = attributes(json!({"@odata.type": "#microsoft.graph.user"}));
        let resolved = resolve_response_type(None, &registry, &annotated)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.name(), "microsoft.graph.user");
    }
}
