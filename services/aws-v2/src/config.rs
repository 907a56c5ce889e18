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

use std::fmt::{Debug, Formatter};

use log::warn;
use s3sign_core::utils::Redact;
use s3sign_core::{Context, Error, Result};

use crate::constants::*;
use crate::endpoint::{AddressingStyle, Endpoint};

/// Config carries all the configuration for the s3 signer.
#[derive(Clone, Default)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`S3SIGN_ENDPOINT`]
    ///
    /// Either a bare host (`s3.amazonaws.com`, `localhost:9000`) or a
    /// host with scheme (`http://localhost:9000`).
    pub endpoint: Option<String>,
    /// `use_ssl` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`S3SIGN_USE_SSL`]
    pub use_ssl: Option<bool>,
    /// `use_subdomains` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`S3SIGN_USE_SUBDOMAINS`]
    pub use_subdomains: Option<bool>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set use_ssl
    pub fn with_use_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = Some(use_ssl);
        self
    }

    /// Set use_subdomains
    pub fn with_use_subdomains(mut self, use_subdomains: bool) -> Self {
        self.use_subdomains = Some(use_subdomains);
        self
    }

    /// Load config from env.
    ///
    /// Boolean values that can't be parsed are skipped with a warning.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(AWS_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AWS_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(S3SIGN_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(S3SIGN_USE_SSL).and_then(|v| parse_bool(S3SIGN_USE_SSL, &v)) {
            self.use_ssl.get_or_insert(v);
        }
        if let Some(v) = ctx
            .env_var(S3SIGN_USE_SUBDOMAINS)
            .and_then(|v| parse_bool(S3SIGN_USE_SUBDOMAINS, &v))
        {
            self.use_subdomains.get_or_insert(v);
        }

        self
    }

    /// Build the endpoint described by this config.
    ///
    /// A scheme in `endpoint` wins over `use_ssl`.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let raw = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT).trim();

        let (host, use_ssl) = if let Some(host) = raw.strip_prefix("https://") {
            (host, true)
        } else if let Some(host) = raw.strip_prefix("http://") {
            (host, false)
        } else {
            (raw, self.use_ssl.unwrap_or(true))
        };
        let host = host.trim_end_matches('/');

        if host.is_empty() {
            return Err(Error::config_invalid("endpoint host is empty"));
        }
        if host.contains(['/', '?', '#']) || host.contains(char::is_whitespace) {
            return Err(Error::config_invalid(format!(
                "endpoint {raw} must be a host without path or query"
            )));
        }

        let style = if self.use_subdomains.unwrap_or(false) {
            AddressingStyle::VirtualHosted
        } else {
            AddressingStyle::Path
        };

        Ok(Endpoint::new(host)
            .with_ssl(use_ssl)
            .with_addressing_style(style))
    }
}

fn parse_bool(name: &str, v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("ignoring {name}={v}: not a boolean");
            None
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id.as_ref().map(Redact::from))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(Redact::from),
            )
            .field("endpoint", &self.endpoint)
            .field("use_ssl", &self.use_ssl)
            .field("use_subdomains", &self.use_subdomains)
            .finish()
    }
}
