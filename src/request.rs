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

use crate::casing::keys_to_snake_case;
use crate::error::Error;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use reqwest::blocking::Client;
use serde_json::Map;
use serde_json::Value;
use url::Url;

/// Client identification sent with every request.
pub const SDK_VERSION: &str = concat!("rust-odata-client-", env!("CARGO_PKG_VERSION"));

/// Hook that mutates an outgoing request, typically to attach
/// credentials.
pub type AuthCallback = Box<dyn Fn(&mut Request) + Send + Sync>;

/// One outgoing service request.
///
/// Constructed with the standard headers already set; an auth
/// callback may add or replace headers before the request is
/// performed.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl Request {
    #[must_use]
    pub fn new(method: Method, url: Url, body: Option<Value>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("SdkVersion", HeaderValue::from_static(SDK_VERSION));
        Self {
            method,
            url,
            body,
            headers,
        }
    }

    /// Send the request and decode the response body.
    ///
    /// Successful responses decode to an attribute map with snake
    /// case keys. A body that is empty, unparsable, or not a JSON
    /// object decodes to an empty map; only transport failures and
    /// error statuses are errors.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] for connection-level failures, the status
    /// errors from [`check_status`] otherwise.
    pub fn perform(self, client: &Client) -> Result<Map<String, Value>, Error> {
        let mut builder = client.request(self.method, self.url).headers(self.headers);
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }
        let response = builder.send().map_err(Error::Transport)?;
        let status = response.status().as_u16();
        let text = response.text().map_err(Error::Transport)?;
        let text = check_status(status, text)?;
        match serde_json::from_str::<Value>(&text).map(keys_to_snake_case) {
            Ok(Value::Object(attributes)) => Ok(attributes),
            _ => Ok(Map::new()),
        }
    }
}

/// Map an error status to its error variant, passing the body of
/// successful responses through.
///
/// Server errors are checked before the authentication statuses, so a
/// 5xx always surfaces as [`Error::Server`].
///
/// # Errors
///
/// [`Error::Server`] for 5xx, [`Error::Authentication`] for 401,
/// [`Error::Authorization`] for 403, [`Error::Client`] for any other
/// 4xx. Each carries the response body.
pub(crate) fn check_status(status: u16, body: String) -> Result<String, Error> {
    if status >= 500 {
        return Err(Error::Server(status, body));
    }
    match status {
        401 => Err(Error::Authentication(body)),
        403 => Err(Error::Authorization(body)),
        _ if status >= 400 => Err(Error::Client(status, body)),
        _ => Ok(body),
    }
}
