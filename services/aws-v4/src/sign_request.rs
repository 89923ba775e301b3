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

use crate::canonical::{
    canonical_headers, canonical_request, credential_scope, signed_headers_list, string_to_sign,
};
use crate::constants::*;
use crate::{RequestParams, SigningConfig};
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use log::debug;
use sigheaders_core::hash::{hex_hmac_sha256, hmac_sha256};
use sigheaders_core::time::{format_date, format_iso8601, now, DateTime};
use sigheaders_core::utils::Redact;
use sigheaders_core::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Formatter};

/// Compute SigV4 headers for a request, signing at the current time.
///
/// `params` may be omitted entirely, in which case a `GET /` without query,
/// extra headers or payload is signed.
///
/// # Errors
///
/// Fails before producing any output if region or credentials are missing,
/// or if a header name or value can't be carried by an HTTP request.
pub fn sign_request(
    config: &SigningConfig,
    params: Option<&RequestParams>,
) -> Result<SignedHeaders> {
    RequestSigner::new(config.clone()).sign(params)
}

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: SigningConfig,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given config.
    pub fn new(config: SigningConfig) -> Self {
        Self { config, time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign a request described by `params`.
    pub fn sign(&self, params: Option<&RequestParams>) -> Result<SignedHeaders> {
        let default_params = RequestParams::default();
        let params = params.unwrap_or(&default_params);

        let cfg = self.config.resolve()?;
        let req = params.resolve(cfg)?;

        // Take the instant once: the date header and the key scope must agree.
        let now = self.time.unwrap_or_else(now);
        let date_iso = format_iso8601(now);
        let date = format_date(now);

        // build canonical request and string to sign.
        let signed_headers = signed_headers_list(req.extra_headers);
        let creq = canonical_request(
            &req.method,
            req.canonical_uri,
            req.query_string,
            &canonical_headers(&req.host, &date_iso, req.extra_headers),
            &signed_headers,
            req.payload_hash,
        );
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = credential_scope(&date, cfg.region, cfg.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(&date_iso, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(cfg.secret_access_key, &date, cfg.region, cfg.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            cfg.access_key_id,
        );

        let mut headers = BTreeMap::new();
        headers.insert(HOST.to_string(), req.host);
        headers.insert(X_AMZ_DATE.to_string(), date_iso);
        headers.insert(ACCEPT.to_string(), ACCEPT_JSON.to_string());
        headers.insert(AUTHORIZATION.to_string(), authorization);
        // Extra headers win, with names kept as supplied.
        for (name, value) in req.extra_headers {
            headers.insert(name.clone(), value.clone());
        }
        let extra_names = req.extra_headers.keys().cloned().collect();

        Ok(SignedHeaders {
            headers,
            extra_names,
        })
    }
}

/// Derive the signing key: `kDate -> kRegion -> kService -> kSigning`.
pub fn generate_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}

/// Headers produced by signing, ready to attach to an HTTP request.
///
/// Iteration order is the byte order of header names.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    headers: BTreeMap<String, String>,
    /// Names supplied by the caller.
    extra_names: BTreeSet<String>,
}

impl SignedHeaders {
    /// Get header value by name, matching the name exactly.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The `Authorization` header value.
    pub fn authorization(&self) -> Option<&str> {
        self.get(AUTHORIZATION)
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Take the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.headers
    }

    /// Convert into a [`HeaderMap`].
    ///
    /// Names that differ only by case collapse into one entry. Computed headers
    /// are inserted first and caller supplied headers last, so a supplied `Host`
    /// replaces the computed `host` just like it does in the signature.
    /// Credentials are marked sensitive.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let (extra, computed): (Vec<_>, Vec<_>) = self
            .headers
            .iter()
            .partition(|(name, _)| self.extra_names.contains(*name));

        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in computed.into_iter().chain(extra) {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let mut value = HeaderValue::from_str(value)?;
            if is_sensitive(name.as_str()) {
                value.set_sensitive(true);
            }
            map.insert(name, value);
        }
        Ok(map)
    }

    /// Apply the headers to `http::request::Parts`, replacing existing values.
    pub fn apply(&self, parts: &mut http::request::Parts) -> Result<()> {
        for (name, value) in self.to_header_map()? {
            if let Some(name) = name {
                parts.headers.insert(name, value);
            }
        }
        Ok(())
    }
}

fn is_sensitive(name: &str) -> bool {
    name.eq_ignore_ascii_case(AUTHORIZATION) || name.eq_ignore_ascii_case(X_AMZ_SECURITY_TOKEN)
}

impl Debug for SignedHeaders {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut m = f.debug_map();
        for (name, value) in &self.headers {
            if is_sensitive(name) {
                m.entry(name, &Redact::from(value));
            } else {
                m.entry(name, value);
            }
        }
        m.finish()
    }
}

impl<'a> IntoIterator for &'a SignedHeaders {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}
