// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::config::ResolvedConfig;
use crate::constants::*;
use http::{HeaderName, HeaderValue, Method};
use sigheaders_core::hash::EMPTY_STRING_SHA256;
use sigheaders_core::{Error, Result};
use std::collections::BTreeMap;

/// Parameters of the request to sign.
///
/// Every field is optional; unset fields take these defaults:
///
/// - `method`: `GET`
/// - `host`: `{service}.{region}.amazonaws.com`
/// - `canonical_uri`: `/`
/// - `query_string`: empty
/// - `extra_headers`: empty
/// - `payload_hash`: hex encoded SHA256 of the empty string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// HTTP method, case-insensitive.
    pub method: Option<String>,
    /// Host the request is sent to.
    pub host: Option<String>,
    /// URI path, already in canonical (encoded) form.
    pub canonical_uri: Option<String>,
    /// Query string, already in canonical form.
    pub query_string: Option<String>,
    /// Headers that will be signed and returned alongside the signature,
    /// for example `x-amz-security-token`.
    pub extra_headers: BTreeMap<String, String>,
    /// Hex encoded SHA256 of the request payload.
    pub payload_hash: Option<String>,
}

impl RequestParams {
    /// Create params with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    /// Set the host.
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    /// Set the canonical URI.
    pub fn with_canonical_uri(mut self, uri: &str) -> Self {
        self.canonical_uri = Some(uri.to_string());
        self
    }

    /// Set the query string.
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query_string = Some(query.to_string());
        self
    }

    /// Add a header to sign. A later header with the same name replaces the earlier one.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the payload hash.
    pub fn with_payload_hash(mut self, hash: &str) -> Self {
        self.payload_hash = Some(hash.to_string());
        self
    }

    /// Apply defaults and validate everything that ends up in a header.
    pub(crate) fn resolve(&self, cfg: ResolvedConfig<'_>) -> Result<ResolvedParams<'_>> {
        let method = self
            .method
            .as_deref()
            .unwrap_or(DEFAULT_METHOD)
            .to_ascii_uppercase();
        Method::from_bytes(method.as_bytes())?;

        let host = match &self.host {
            Some(host) => host.clone(),
            None => format!("{}.{}.amazonaws.com", cfg.service, cfg.region),
        };
        HeaderValue::from_str(&host).map_err(|e| {
            Error::invalid_header_value(format!("host {host:?} is not a valid header value"))
                .with_source(e)
        })?;

        for (name, value) in &self.extra_headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                Error::request_invalid(format!("header name {name:?} is invalid")).with_source(e)
            })?;
            HeaderValue::from_str(value).map_err(|e| {
                Error::invalid_header_value(format!("value of header {name:?} is invalid"))
                    .with_source(e)
            })?;
        }

        Ok(ResolvedParams {
            method,
            host,
            canonical_uri: self
                .canonical_uri
                .as_deref()
                .unwrap_or(DEFAULT_CANONICAL_URI),
            query_string: self.query_string.as_deref().unwrap_or_default(),
            extra_headers: &self.extra_headers,
            payload_hash: self
                .payload_hash
                .as_deref()
                .unwrap_or(EMPTY_STRING_SHA256),
        })
    }
}

/// Params with defaults applied.
#[derive(Debug)]
pub(crate) struct ResolvedParams<'a> {
    pub method: String,
    pub host: String,
    pub canonical_uri: &'a str,
    pub query_string: &'a str,
    pub extra_headers: &'a BTreeMap<String, String>,
    pub payload_hash: &'a str,
}
