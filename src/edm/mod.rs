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

//! EDM document model.
//!
//! The `$metadata` document is deserialized with quick-xml into `De*`
//! structs and then validated into the structs the metadata builder
//! traverses. quick-xml matches element local names, so namespace
//! prefixes (`edmx:DataServices` vs `DataServices`) never reach the
//! traversal code.

/// Element edmx:Edmx
pub mod edmx_root;

/// Element edmx:DataServices
pub mod data_services;

/// Element edm:Schema
pub mod schema;

/// Elements edm:Property / edm:NavigationProperty
pub mod property;

/// Element edm:EntityType
pub mod entity_type;

/// Element edm:ComplexType
pub mod complex_type;

/// Element edm:EnumType
pub mod enum_type;

/// Elements edm:Action / edm:Function
pub mod operation;

/// Elements edm:EntityContainer / edm:EntitySet / edm:Singleton
pub mod container;

use quick_xml::DeError;
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use tagged_types::TaggedType;

/// Raw type reference as it appears in a `Type` or `BaseType`
/// attribute: possibly alias-qualified, possibly of
/// `Collection(...)` form. Alias resolution happens later, in the
/// namespace resolver.
pub type TypeName = TaggedType<String, TypeNameTag>;
#[derive(tagged_types::Tag)]
#[implement(Clone, Hash, PartialEq, Eq)]
#[transparent(Debug, Display, Deserialize, FromStr)]
#[capability(inner_access)]
pub enum TypeNameTag {}

pub type PropertyName = String;
pub type SchemaNamespace = String;

/// Document validation errors.
#[derive(Debug)]
pub enum ValidateError {
    /// XML deserialization error.
    XmlDeserialize(DeError),
    /// Not exactly one `DataServices` under the root.
    WrongDataServicesNumber,
    /// A type or operation node appears outside a `Schema` element,
    /// so no namespace can be resolved for it.
    MissingSchemaAncestor(String),
}

impl Display for ValidateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::XmlDeserialize(error) => write!(f, "XML deserialization error: {error}"),
            Self::WrongDataServicesNumber => {
                "document must contain exactly one DataServices element".fmt(f)
            }
            Self::MissingSchemaAncestor(node) => {
                write!(f, "node {node} has no Schema ancestor")
            }
        }
    }
}

impl StdError for ValidateError {}

/// Reexport of the validated root type.
pub type Edmx = edmx_root::Edmx;

/// Annotation element; retained only so that annotated documents
/// deserialize, the type system ignores its content.
#[derive(Debug, Deserialize)]
pub struct Annotation {
    #[serde(rename = "@Term")]
    pub term: Option<String>,
    #[serde(rename = "@String")]
    pub string: Option<String>,
}

/// Term declaration; tolerated in schemas, ignored by the builder.
#[derive(Debug, Deserialize)]
pub struct Term {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@Type")]
    pub ttype: Option<String>,
}

/// TypeDefinition declaration; tolerated in schemas, ignored by the
/// builder.
#[derive(Debug, Deserialize)]
pub struct TypeDefinition {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@UnderlyingType")]
    pub underlying_type: TypeName,
}
