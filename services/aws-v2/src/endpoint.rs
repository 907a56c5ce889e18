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

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ENDPOINT;

/// How the bucket is placed in the request url.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingStyle {
    /// `https://host/bucket/key`
    #[default]
    Path,
    /// `https://bucket.host/key`
    VirtualHosted,
}

/// Endpoint of the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    use_ssl: bool,
    style: AddressingStyle,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl Endpoint {
    /// Create an https, path-style endpoint for `host`.
    ///
    /// `host` may carry a port, like `localhost:9000`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            use_ssl: true,
            style: AddressingStyle::Path,
        }
    }

    /// Use https (the default) or plain http.
    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Set the addressing style.
    pub fn with_addressing_style(mut self, style: AddressingStyle) -> Self {
        self.style = style;
        self
    }

    /// Host (and port) of this endpoint.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether requests go over https.
    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// The addressing style.
    pub fn addressing_style(&self) -> AddressingStyle {
        self.style
    }

    /// `https` or `http`.
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }

    /// Authority of a request addressing `bucket`.
    pub(crate) fn authority(&self, bucket: &str) -> String {
        match self.style {
            AddressingStyle::VirtualHosted if !bucket.is_empty() => {
                format!("{bucket}.{}", self.host)
            }
            _ => self.host.clone(),
        }
    }

    /// Url path of a request addressing `bucket` and an already encoded key.
    pub(crate) fn path(&self, bucket: &str, encoded_key: Option<&str>) -> String {
        let key = encoded_key.unwrap_or_default();
        match self.style {
            _ if bucket.is_empty() => "/".to_string(),
            AddressingStyle::Path => format!("/{bucket}/{key}"),
            AddressingStyle::VirtualHosted => format!("/{key}"),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme(), self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AddressingStyle::Path, "bucket", Some("a/b.txt"), "s3.amazonaws.com", "/bucket/a/b.txt")]
    #[test_case(AddressingStyle::Path, "bucket", None, "s3.amazonaws.com", "/bucket/")]
    #[test_case(AddressingStyle::Path, "", None, "s3.amazonaws.com", "/")]
    #[test_case(AddressingStyle::VirtualHosted, "bucket", Some("a/b.txt"), "bucket.s3.amazonaws.com", "/a/b.txt")]
    #[test_case(AddressingStyle::VirtualHosted, "bucket", None, "bucket.s3.amazonaws.com", "/")]
    #[test_case(AddressingStyle::VirtualHosted, "", None, "s3.amazonaws.com", "/")]
    fn test_endpoint_addressing(
        style: AddressingStyle,
        bucket: &str,
        key: Option<&str>,
        authority: &str,
        path: &str,
    ) {
        let ep = Endpoint::default().with_addressing_style(style);

        assert_eq!(ep.authority(bucket), authority);
        assert_eq!(ep.path(bucket, key), path);
    }

    #[test]
    fn test_endpoint_display() {
        let ep = Endpoint::new("localhost:9000").with_ssl(false);
        assert_eq!(ep.to_string(), "http://localhost:9000");
        assert_eq!(Endpoint::default().to_string(), "https://s3.amazonaws.com");
    }
}
