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

//! Canonical forms used by [Signature Version 4](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html).
//!
//! Everything here is pure string building. Inputs are expected to be
//! validated already; see [`crate::sign_request()`].

use crate::constants::*;
use sigheaders_core::hash::hex_sha256;
use std::collections::BTreeMap;

/// Merge `host`, `x-amz-date` and the extra headers into the canonical header set.
///
/// Names are lower-cased before merging so that an extra header overrides a
/// default regardless of case. Values are trimmed.
fn canonical_header_map<'a>(
    host: &'a str,
    date_iso: &'a str,
    extra_headers: &'a BTreeMap<String, String>,
) -> BTreeMap<String, &'a str> {
    let mut headers = BTreeMap::new();
    headers.insert(HOST.to_string(), host.trim());
    headers.insert(X_AMZ_DATE.to_string(), date_iso.trim());
    for (name, value) in extra_headers {
        headers.insert(name.to_ascii_lowercase(), value.trim());
    }
    headers
}

/// Build the canonical headers block.
///
/// ```shell
/// host:iam.amazonaws.com
/// x-amz-date:20150830T123600Z
/// ```
///
/// Every line, including the last one, ends with `\n`.
pub fn canonical_headers(
    host: &str,
    date_iso: &str,
    extra_headers: &BTreeMap<String, String>,
) -> String {
    // 128 is specially chosen to avoid reallocation for most requests.
    let mut s = String::with_capacity(128);
    for (name, value) in canonical_header_map(host, date_iso, extra_headers) {
        s.push_str(&name);
        s.push(':');
        s.push_str(value);
        s.push('\n');
    }
    s
}

/// Build the signed headers list: `host;x-amz-date` plus the extra header names,
/// lower-cased, sorted and joined with `;`.
///
/// Names exactly the headers rendered by [`canonical_headers`], in the same order.
pub fn signed_headers_list(extra_headers: &BTreeMap<String, String>) -> String {
    let mut names = vec![HOST.to_string(), X_AMZ_DATE.to_string()];
    names.extend(extra_headers.keys().map(|k| k.to_ascii_lowercase()));
    names.sort_unstable();
    names.dedup();
    names.join(";")
}

/// Build the canonical request.
///
/// ```shell
/// GET
/// /
/// Action=ListUsers&Version=2010-05-08
/// host:iam.amazonaws.com
/// x-amz-date:20150830T123600Z
///
/// host;x-amz-date
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
pub fn canonical_request(
    method: &str,
    canonical_uri: &str,
    query_string: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    [
        method,
        canonical_uri,
        query_string,
        canonical_headers,
        signed_headers,
        payload_hash,
    ]
    .join("\n")
}

/// Build the credential scope: `20150830/us-east-1/iam/aws4_request`
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the string to sign.
///
/// ```shell
/// AWS4-HMAC-SHA256
/// 20150830T123600Z
/// 20150830/us-east-1/iam/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(date_iso: &str, scope: &str, canonical_request: &str) -> String {
    [
        ALGORITHM,
        date_iso,
        scope,
        hex_sha256(canonical_request.as_bytes()).as_str(),
    ]
    .join("\n")
}
