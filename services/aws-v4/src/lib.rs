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

//! AWS Signature Version 4 header signing.
//!
//! Computes the headers that authenticate a request to an AWS-compatible API:
//! `host`, `x-amz-date`, `Accept`, `Authorization` and any extra signed headers.
//! Sending the request is left to the caller.
//!
//! ## Example
//!
//! ```
//! use sigheaders_aws_v4::{sign_request, RequestParams, SigningConfig};
//!
//! # fn main() -> sigheaders_core::Result<()> {
//! let config = SigningConfig::new("us-east-1", "AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY")
//!     .with_service("execute-api");
//! let params = RequestParams::new()
//!     .with_method("post")
//!     .with_canonical_uri("/prod/items")
//!     .with_header("content-type", "application/json");
//!
//! let headers = sign_request(&config, Some(&params))?;
//! assert!(headers.authorization().is_some());
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::SigningConfig;

mod params;
pub use params::RequestParams;

pub mod canonical;

mod sign_request;
pub use sign_request::generate_signing_key;
pub use sign_request::sign_request;
pub use sign_request::RequestSigner;
pub use sign_request::SignedHeaders;
