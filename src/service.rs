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

use crate::casing::snake_to_camel;
use crate::error::Error;
use crate::metadata::Metadata;
use crate::registry::TypeRegistry;
use crate::request::check_status;
use crate::request::AuthCallback;
use crate::request::Request;
use crate::resolver::SchemaNames;
use crate::response::resolve_response_type;
use crate::response::Response;
use crate::types::EntitySet;
use crate::types::NavigationProperty;
use crate::types::Operation;
use crate::types::Property;
use crate::types::Singleton;
use crate::types::TypeDescriptor;
use http::Method;
use reqwest::blocking::Client;
use serde_json::Map;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::form_urlencoded;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Construction parameters for [`Service`].
pub struct ServiceParams {
    base_url: String,
    metadata_file: Option<PathBuf>,
    api_version: Option<String>,
    auth_callback: Option<AuthCallback>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl ServiceParams {
    /// Parameters for a service rooted at `base_url`, which must end
    /// with `/`.
    #[must_use]
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            metadata_file: None,
            api_version: None,
            auth_callback: None,
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            accept_invalid_certs: false,
        }
    }

    /// Read the metadata document from a local file instead of
    /// fetching it from the service.
    #[must_use]
    pub fn metadata_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.metadata_file = Some(path.into());
        self
    }

    /// `api-version` value merged into every request's query string.
    #[must_use]
    pub fn api_version<S: Into<String>>(mut self, version: S) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Hook run on every outgoing request before it is performed,
    /// typically to attach credentials.
    #[must_use]
    pub fn auth_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Request) + Send + Sync + 'static,
    {
        self.auth_callback = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self.connect_timeout = None;
        self
    }

    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// A metadata-aware client for one service root.
///
/// Construction acquires the metadata document exactly once, builds
/// the type registry from it, and keeps the document for
/// document-backed queries until [`Service::release_metadata`].
pub struct Service {
    base_url: String,
    api_version: Option<String>,
    auth_callback: Option<AuthCallback>,
    client: Client,
    registry: TypeRegistry,
    metadata: Option<Metadata>,
}

impl Service {
    /// Build a service client: construct the HTTP client, acquire and
    /// parse the metadata document, and populate the type registry.
    ///
    /// The metadata fetch is unauthenticated; the auth callback only
    /// applies to data requests.
    ///
    /// # Errors
    ///
    /// Transport and status errors from the metadata fetch,
    /// [`Error::Io`] for an unreadable metadata file, and parse or
    /// validation errors from the document.
    pub fn new(params: ServiceParams) -> Result<Self, Error> {
        let ServiceParams {
            base_url,
            metadata_file,
            api_version,
            auth_callback,
            timeout,
            connect_timeout,
            accept_invalid_certs,
        } = params;
        let mut builder = Client::builder().use_rustls_tls().timeout(timeout);
        if let Some(connect_timeout) = connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().map_err(Error::Transport)?;
        let text = match metadata_file {
            Some(path) => fs::read_to_string(path).map_err(Error::Io)?,
            None => fetch_metadata(&client, &base_url)?,
        };
        let metadata = Metadata::parse(&text)?;
        let registry = TypeRegistry::new();
        metadata.build_registry(&registry)?;
        Ok(Self {
            base_url,
            api_version,
            auth_callback,
            client,
            registry,
            metadata: Some(metadata),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Drop the metadata document and its derived views.
    ///
    /// The registry stays intact: `@odata.type` classification and
    /// direct type lookups keep working, while document-backed
    /// queries answer [`Error::MetadataReleased`] from then on.
    pub fn release_metadata(&mut self) {
        self.metadata = None;
    }

    /// GET `path`, optionally restricted to `select_properties`.
    ///
    /// Property names are given in snake case and converted to the
    /// wire's camel case in the `$select` query option. The response
    /// is classified by its annotations.
    ///
    /// # Errors
    ///
    /// Request errors, plus classification errors from the response
    /// annotations.
    pub fn get(&self, path: &str, select_properties: &[&str]) -> Result<Response, Error> {
        let path = if select_properties.is_empty() {
            path.to_string()
        } else {
            let selected = select_properties
                .iter()
                .map(|p| snake_to_camel(p))
                .collect::<Vec<String>>()
                .join(",");
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("$select", &selected)
                .finish();
            let separator = if path.contains('?') { '&' } else { '?' };
            format!("{path}{separator}{query}")
        };
        let attributes = self.request(Method::GET, &path, None)?;
        let odata_type =
            resolve_response_type(self.metadata.as_ref(), &self.registry, &attributes)?;
        Ok(Response {
            odata_type,
            attributes,
        })
    }

    /// POST `data` to `path`.
    ///
    /// # Errors
    ///
    /// Request errors.
    pub fn post(&self, path: &str, data: Value) -> Result<Map<String, Value>, Error> {
        self.request(Method::POST, path, Some(data))
    }

    /// PATCH `path` with `data`.
    ///
    /// # Errors
    ///
    /// Request errors.
    pub fn patch(&self, path: &str, data: Value) -> Result<Map<String, Value>, Error> {
        self.request(Method::PATCH, path, Some(data))
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// Request errors.
    pub fn delete(&self, path: &str) -> Result<Map<String, Value>, Error> {
        self.request(Method::DELETE, path, None)
    }

    /// Perform one request against `path`, relative to the base URL.
    ///
    /// The configured `api-version` is merged into the query string
    /// and the auth callback runs before the request goes out.
    ///
    /// # Errors
    ///
    /// [`Error::Url`] for unassemblable URLs, transport and status
    /// errors from the exchange.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Map<String, Value>, Error> {
        let mut url =
            Url::parse(&format!("{}{}", self.base_url, path)).map_err(Error::Url)?;
        if let Some(version) = &self.api_version {
            url.query_pairs_mut().append_pair("api-version", version);
        }
        let mut request = Request::new(method, url, body);
        if let Some(callback) = &self.auth_callback {
            callback(&mut request);
        }
        request.perform(&self.client)
    }

    /// Classify an already-decoded payload by its annotations.
    ///
    /// # Errors
    ///
    /// Classification errors; context trails fail with
    /// [`Error::MetadataReleased`] once the document is gone.
    pub fn resolve_response_type(
        &self,
        attributes: &Map<String, Value>,
    ) -> Result<Option<Arc<TypeDescriptor>>, Error> {
        resolve_response_type(self.metadata.as_ref(), &self.registry, attributes)
    }

    /// Look up a type descriptor by fully-qualified name,
    /// constructing collection forms on demand.
    ///
    /// # Errors
    ///
    /// Registry lookup errors.
    pub fn get_type_by_name(&self, name: &str) -> Result<Arc<TypeDescriptor>, Error> {
        self.registry.lookup(name)
    }

    /// Declared namespaces with their aliases.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone.
    pub fn namespaces(&self) -> Result<&[SchemaNames], Error> {
        Ok(self.metadata()?.namespaces())
    }

    /// Singletons of the entity containers.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone.
    pub fn singletons(&self) -> Result<&[Singleton], Error> {
        Ok(self.metadata()?.singletons())
    }

    /// Entity sets of the entity containers.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone.
    pub fn entity_sets(&self) -> Result<&[EntitySet], Error> {
        Ok(self.metadata()?.entity_sets())
    }

    /// One entity set, by name.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone.
    pub fn entity_set_by_name(&self, name: &str) -> Result<Option<&EntitySet>, Error> {
        Ok(self.metadata()?.entity_set_by_name(name))
    }

    /// Every declared action.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone, lookup
    /// errors for unresolvable operation types.
    pub fn actions(&self) -> Result<Arc<Vec<Operation>>, Error> {
        self.metadata()?.actions(&self.registry)
    }

    /// Every declared function.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone, lookup
    /// errors for unresolvable operation types.
    pub fn functions(&self) -> Result<Arc<Vec<Operation>>, Error> {
        self.metadata()?.functions(&self.registry)
    }

    /// Structural properties of a type, by fully-qualified or bare
    /// name.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone, lookup
    /// errors for unresolvable property types.
    pub fn properties_for_type(&self, type_name: &str) -> Result<Vec<Property>, Error> {
        self.metadata()?
            .properties_for_type(&self.registry, type_name)
    }

    /// Navigation properties of a type, by fully-qualified or bare
    /// name.
    ///
    /// # Errors
    ///
    /// [`Error::MetadataReleased`] once the document is gone, lookup
    /// errors for unresolvable target types.
    pub fn navigation_properties_for_type(
        &self,
        type_name: &str,
    ) -> Result<Vec<NavigationProperty>, Error> {
        self.metadata()?
            .navigation_properties_for_type(&self.registry, type_name)
    }

    /// Registered enum type descriptors.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn enum_types(&self) -> Result<Vec<Arc<TypeDescriptor>>, Error> {
        self.descriptors_of(|d| matches!(d, TypeDescriptor::Enum(_)))
    }

    /// Registered complex type descriptors.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn complex_types(&self) -> Result<Vec<Arc<TypeDescriptor>>, Error> {
        self.descriptors_of(|d| matches!(d, TypeDescriptor::Complex(_)))
    }

    /// Registered entity type descriptors.
    ///
    /// # Errors
    ///
    /// [`Error::Lock`] when the registry lock is poisoned.
    pub fn entity_types(&self) -> Result<Vec<Arc<TypeDescriptor>>, Error> {
        self.descriptors_of(|d| matches!(d, TypeDescriptor::Entity(_)))
    }

    fn descriptors_of(
        &self,
        keep: impl Fn(&TypeDescriptor) -> bool,
    ) -> Result<Vec<Arc<TypeDescriptor>>, Error> {
        Ok(self
            .registry
            .descriptors()?
            .into_iter()
            .filter(|d| keep(d))
            .collect())
    }

    fn metadata(&self) -> Result<&Metadata, Error> {
        self.metadata.as_ref().ok_or(Error::MetadataReleased)
    }
}

/// Fetch the metadata document from `{base_url}$metadata`.
fn fetch_metadata(client: &Client, base_url: &str) -> Result<String, Error> {
    let url = Url::parse(&format!("{base_url}$metadata?detailed=true")).map_err(Error::Url)?;
    let response = client.get(url).send().map_err(Error::Transport)?;
    let status = response.status().as_u16();
    let text = response.text().map_err(Error::Transport)?;
    check_status(status, text)
}
