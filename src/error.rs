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

use crate::edm::ValidateError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::Error as IoError;

/// Client errors.
///
/// Metadata-structure errors (`MissingSchemaAncestor`,
/// `NotACollectionType`) are fatal and surface during type
/// construction or lookup. Status errors surface to the caller of the
/// request operation. A JSON decode failure on a successful response
/// is not an error; it degrades to an empty attribute map.
#[derive(Debug)]
pub enum Error {
    /// The server answered 401. Carries the response body.
    Authentication(String),
    /// The server answered 403. Carries the response body.
    Authorization(String),
    /// The server answered with any other 4xx status.
    Client(u16, String),
    /// The server answered with a 5xx status.
    Server(u16, String),
    /// A raw value cannot be coerced to a primitive's wire
    /// representation.
    TypeMismatch {
        /// Fully-qualified name of the target type.
        type_name: String,
        /// Rendering of the offending value.
        value: String,
    },
    /// A type or operation node has no enclosing `Schema` element, so
    /// its namespace cannot be resolved.
    MissingSchemaAncestor(String),
    /// The requested name is neither registered nor of
    /// `Collection(...)` form, or the collection's member type is not
    /// registered.
    NotACollectionType(String),
    /// A document-backed query was made after `release_metadata`.
    MetadataReleased,
    /// A context reference names an entity set the document does not
    /// declare.
    UnknownEntitySet(String),
    /// A context trail descends through a navigation property the
    /// type does not declare.
    UnknownNavigationProperty {
        /// Fully-qualified name of the type that was searched.
        type_name: String,
        /// Name of the missing navigation property.
        property: String,
    },
    /// A registry or cache lock was poisoned by a panicking holder.
    Lock(String),
    /// The metadata document failed to parse or validate.
    Metadata(ValidateError),
    /// Transport-level failure from the HTTP client.
    Transport(reqwest::Error),
    /// A request URL could not be assembled.
    Url(url::ParseError),
    /// A local metadata file could not be read.
    Io(IoError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Authentication(body) => write!(f, "authentication required (401): {body}"),
            Self::Authorization(body) => write!(f, "authorization denied (403): {body}"),
            Self::Client(status, body) => write!(f, "client error ({status}): {body}"),
            Self::Server(status, body) => write!(f, "server error ({status}): {body}"),
            Self::TypeMismatch { type_name, value } => {
                write!(f, "cannot convert {value} into {type_name}")
            }
            Self::MissingSchemaAncestor(node) => {
                write!(f, "no Schema ancestor for node {node}")
            }
            Self::NotACollectionType(name) => {
                write!(f, "{name} is not a collection type")
            }
            Self::MetadataReleased => "metadata document has been released".fmt(f),
            Self::UnknownEntitySet(name) => write!(f, "unknown entity set {name}"),
            Self::UnknownNavigationProperty {
                type_name,
                property,
            } => write!(f, "type {type_name} has no navigation property {property}"),
            Self::Lock(reason) => write!(f, "internal lock poisoned: {reason}"),
            Self::Metadata(error) => write!(f, "metadata document error: {error}"),
            Self::Transport(error) => write!(f, "transport error: {error}"),
            Self::Url(error) => write!(f, "bad request url: {error}"),
            Self::Io(error) => write!(f, "metadata file error: {error}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Metadata(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Url(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
