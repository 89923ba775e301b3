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

use crate::constants::*;
use log::debug;
use sigheaders_core::utils::Redact;
use sigheaders_core::{Env, Error, Result};
use std::fmt::{Debug, Formatter};

/// Config for signing requests to aws services.
///
/// Fields are optional so that a config can be layered from several sources.
/// Required fields are checked when a request is signed.
#[derive(Clone, Default)]
pub struct SigningConfig {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_REGION`
    /// - env value: `AWS_DEFAULT_REGION`
    pub region: Option<String>,
    /// `service` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SIGV4_SERVICE`
    /// - default to `apigateway`
    pub service: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Option<String>,
}

impl Debug for SigningConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

impl SigningConfig {
    /// Create a config with region and static credentials.
    pub fn new(region: &str, access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            region: Some(region.to_string()),
            service: None,
            access_key_id: Some(access_key_id.to_string()),
            secret_access_key: Some(secret_access_key.to_string()),
        }
    }

    /// Set the service name used in host defaulting and credential scope.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    /// Load config from env.
    ///
    /// Only fields that are still unset are filled, and empty values are ignored.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        let var = |key: &str| env.var(key).filter(|v| !v.is_empty());

        if self.region.is_none() {
            self.region = var(AWS_REGION).or_else(|| var(AWS_DEFAULT_REGION));
        }
        if self.service.is_none() {
            self.service = var(AWS_SIGV4_SERVICE);
        }
        if self.access_key_id.is_none() {
            self.access_key_id = var(AWS_ACCESS_KEY_ID);
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = var(AWS_SECRET_ACCESS_KEY);
        }

        debug!("config loaded from env: {self:?}");
        self
    }

    /// Service name, falling back to `apigateway`.
    pub fn service(&self) -> &str {
        self.service
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SERVICE)
    }

    /// Check required fields and borrow them for one signing computation.
    pub(crate) fn resolve(&self) -> Result<ResolvedConfig<'_>> {
        let region = self
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::missing_region("region is required to sign request"))?;

        let (Some(access_key_id), Some(secret_access_key)) = (
            self.access_key_id.as_deref().filter(|v| !v.is_empty()),
            self.secret_access_key.as_deref().filter(|v| !v.is_empty()),
        ) else {
            return Err(Error::missing_credentials(
                "access_key_id and secret_access_key are required to sign request",
            ));
        };

        Ok(ResolvedConfig {
            region,
            service: self.service(),
            access_key_id,
            secret_access_key,
        })
    }
}

/// Config with every required field present.
#[derive(Clone, Copy)]
pub(crate) struct ResolvedConfig<'a> {
    pub region: &'a str,
    pub service: &'a str,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
}
