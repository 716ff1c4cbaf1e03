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

//! Metadata-driven OData client.
//!
//! The client downloads (or loads) an EDM `$metadata` document once,
//! builds a registry of type descriptors from it, and uses that
//! registry to classify arbitrary JSON responses at runtime: each
//! `get` returns the decoded attributes together with the descriptor
//! of the OData type the payload represents, resolved from the
//! payload's `@odata.type` annotation or its `@odata.context` trail.

/// EDM (EDMX/CSDL) document model.
pub mod edm;

/// Runtime type descriptors built from the document.
pub mod types;

/// Registry of descriptors keyed by fully-qualified name.
pub mod registry;

/// Alias-to-namespace resolution for raw type references.
pub mod resolver;

/// Registry population and lazy metadata queries.
pub mod metadata;

/// Classification of decoded JSON responses.
pub mod response;

/// Blocking request executor.
pub mod request;

/// Wire-casing (camelCase) to internal-casing (snake_case) conversion.
pub mod casing;

/// Service front end.
pub mod service;

/// Error taxonomy.
pub mod error;

pub use crate::error::Error;
pub use crate::metadata::Metadata;
pub use crate::registry::TypeRegistry;
pub use crate::request::Request;
pub use crate::response::Response;
pub use crate::service::Service;
pub use crate::service::ServiceParams;
pub use crate::types::TypeDescriptor;
