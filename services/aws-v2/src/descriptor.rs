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

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::HeaderValue;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use s3sign_core::hash::base64_md5;
use s3sign_core::time::{format_http_date, DateTime};
use s3sign_core::{Error, Headers, Method, Result};

use crate::constants::*;
use crate::endpoint::{AddressingStyle, Endpoint};
use crate::sub_resource::SubResource;

/// Percent-encode an object key for both the request url and the
/// canonical resource.
///
/// Everything except unreserved characters and `/` is encoded.
pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, &KEY_ENCODE_SET).to_string()
}

fn encode_query(v: &str) -> String {
    utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string()
}

/// Canned access policies accepted in `x-amz-acl`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CannedAcl {
    /// Owner gets full control, nobody else has access.
    #[default]
    Private,
    /// Everyone may read.
    PublicRead,
    /// Everyone may read and write.
    PublicReadWrite,
    /// Any authenticated user may read.
    AuthenticatedRead,
    /// The bucket owner may read the object.
    BucketOwnerRead,
    /// The bucket owner gets full control of the object.
    BucketOwnerFullControl,
}

impl CannedAcl {
    /// Header value of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
            CannedAcl::BucketOwnerRead => "bucket-owner-read",
            CannedAcl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl Display for CannedAcl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request while it is being assembled and signed.
///
/// The descriptor owns its headers. Signing writes exactly one
/// `Authorization` header back into them; everything else is up to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Where the request is sent.
    pub endpoint: Endpoint,
    /// Target bucket, empty for service level requests.
    pub bucket: String,
    /// Decoded object key.
    pub key: Option<String>,
    /// Query parameters in order, sub-resource tokens included.
    pub query: Vec<(String, String)>,
    /// Request headers, including `Content-MD5`, `Date` and `x-amz-*`.
    pub headers: Headers,
    /// Value of `Content-Type`.
    pub content_type: Option<String>,
    /// Value of `Content-Length`.
    pub content_length: Option<u64>,
}

impl RequestDescriptor {
    /// Create a descriptor addressing `bucket` on `endpoint`.
    pub fn new(method: Method, endpoint: Endpoint, bucket: impl Into<String>) -> Self {
        Self {
            method,
            endpoint,
            bucket: bucket.into(),
            key: None,
            query: Vec::new(),
            headers: Headers::new(),
            content_type: None,
            content_length: None,
        }
    }

    /// Address an object inside the bucket. An empty key addresses the bucket.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.key = (!key.is_empty()).then_some(key);
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append a sub-resource token, like `?acl`.
    pub fn with_sub_resource(self, sub_resource: SubResource) -> Self {
        self.with_query(sub_resource.as_str(), "")
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set an `x-amz-meta-<name>` user metadata header.
    pub fn with_metadata(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .insert(format!("{X_AMZ_META_PREFIX}{}", name.to_ascii_lowercase()), value);
        self
    }

    /// Set the `x-amz-acl` header.
    pub fn with_canned_acl(mut self, acl: CannedAcl) -> Self {
        self.headers.insert(X_AMZ_ACL, acl.as_str());
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the content length.
    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = Some(content_length);
        self
    }

    /// Set `Content-MD5` to an already computed base64 digest.
    pub fn with_content_md5(mut self, content_md5: impl Into<String>) -> Self {
        self.headers.insert(CONTENT_MD5, content_md5);
        self
    }

    /// Set `Content-MD5` and the content length from the body.
    pub fn with_body_md5(self, body: &[u8]) -> Self {
        self.with_content_md5(base64_md5(body))
            .with_content_length(body.len() as u64)
    }

    /// Set the `x-amz-date` header.
    pub fn with_timestamp(mut self, t: DateTime) -> Self {
        self.headers.insert(X_AMZ_DATE, format_http_date(t));
        self
    }

    /// Set `x-amz-date` to `now` unless the request already carries a
    /// timestamp. Returns whether the header was added.
    pub fn stamp(&mut self, now: DateTime) -> bool {
        if self.timestamp().is_some() {
            return false;
        }
        self.headers.insert(X_AMZ_DATE, format_http_date(now));
        true
    }

    /// Value of `Content-MD5`.
    pub fn content_md5(&self) -> Option<&str> {
        self.headers.get(CONTENT_MD5)
    }

    /// The timestamp the request will be signed with: `x-amz-date` if
    /// present, otherwise `Date`.
    pub fn timestamp(&self) -> Option<&str> {
        self.headers
            .get(X_AMZ_DATE)
            .or_else(|| self.headers.get(DATE))
    }

    /// The sub-resource that will be signed.
    pub fn sub_resource(&self) -> Option<SubResource> {
        SubResource::select(self.query.iter().map(|(k, _)| k.as_str()))
    }

    /// Encoded path of the addressed resource without endpoint or query:
    /// `/bucket/key`, `/bucket/` or `/`.
    pub fn resource_path(&self) -> String {
        if self.bucket.is_empty() {
            return "/".to_string();
        }
        match &self.key {
            Some(key) => format!("/{}/{}", self.bucket, encode_key(key)),
            None => format!("/{}/", self.bucket),
        }
    }

    /// Absolute url of the request.
    pub fn uri(&self) -> Result<http::Uri> {
        self.check_addressing()?;

        let encoded_key = self.key.as_deref().map(encode_key);
        let mut path_and_query = self.endpoint.path(&self.bucket, encoded_key.as_deref());

        for (idx, (k, v)) in self.query.iter().enumerate() {
            path_and_query.push(if idx == 0 { '?' } else { '&' });
            path_and_query.push_str(&encode_query(k));
            if !v.is_empty() {
                path_and_query.push('=');
                path_and_query.push_str(&encode_query(v));
            }
        }

        let uri = http::Uri::builder()
            .scheme(self.endpoint.scheme())
            .authority(self.endpoint.authority(&self.bucket))
            .path_and_query(path_and_query)
            .build()?;
        Ok(uri)
    }

    /// Write method, url and headers into `parts`.
    ///
    /// Existing headers of `parts` that the descriptor also sets are replaced.
    pub fn apply_to_parts(&self, parts: &mut http::request::Parts) -> Result<()> {
        parts.method = self.method.into();
        parts.uri = self.uri()?;

        let mut map = self.headers.to_header_map()?;
        if let Some(v) = &self.content_type {
            map.insert(CONTENT_TYPE, HeaderValue::from_str(v)?);
        }
        if let Some(v) = self.content_length {
            map.insert(CONTENT_LENGTH, HeaderValue::from(v));
        }

        let mut last = None;
        for (name, value) in map {
            // A None name continues the previous one.
            let name = match name {
                Some(name) => {
                    parts.headers.remove(&name);
                    last = Some(name.clone());
                    name
                }
                None => match &last {
                    Some(name) => name.clone(),
                    None => continue,
                },
            };
            parts.headers.append(name, value);
        }

        Ok(())
    }

    /// Build an `http::Request` carrying `body`.
    pub fn into_request<B>(self, body: B) -> Result<http::Request<B>> {
        let (mut parts, body) = http::Request::new(body).into_parts();
        self.apply_to_parts(&mut parts)?;
        Ok(http::Request::from_parts(parts, body))
    }

    /// Rebuild a descriptor from an absolute target url sent to `endpoint`.
    ///
    /// The target is virtual-hosted when its host is `<bucket>.<endpoint host>`
    /// and path-style when its host is the endpoint host, in which case the
    /// path must start with `/<bucket>`. Any other host is refused.
    pub fn from_target(
        endpoint: &Endpoint,
        method: Method,
        bucket: &str,
        target: &str,
        content_type: Option<String>,
        headers: Headers,
    ) -> Result<Self> {
        let uri: http::Uri = target.parse()?;

        let use_ssl = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => {
                return Err(Error::request_invalid(format!(
                    "target {target} must be an absolute http or https url"
                )))
            }
        };
        let authority = uri
            .authority()
            .map(|v| v.as_str())
            .ok_or_else(|| Error::request_invalid(format!("target {target} has no host")))?;

        let path = percent_decode_str(uri.path())
            .decode_utf8()
            .map_err(|e| {
                Error::canonicalization_failed(format!("target {target} path is not utf-8"))
                    .with_source(e)
            })?;

        let host = endpoint.host();
        let is_virtual_hosted = !bucket.is_empty()
            && authority.eq_ignore_ascii_case(&format!("{bucket}.{host}"));

        let (style, key) = if is_virtual_hosted {
            (AddressingStyle::VirtualHosted, path.strip_prefix('/'))
        } else if !authority.eq_ignore_ascii_case(host) {
            return Err(Error::canonicalization_failed(format!(
                "target {target} is not served by endpoint {host}"
            )));
        } else if bucket.is_empty() {
            if path != "/" {
                return Err(Error::canonicalization_failed(format!(
                    "target {target} addresses a resource but no bucket is given"
                )));
            }
            (AddressingStyle::Path, None)
        } else {
            let rest = path
                .strip_prefix('/')
                .and_then(|p| p.strip_prefix(bucket))
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .ok_or_else(|| {
                    Error::canonicalization_failed(format!(
                        "target {target} does not address bucket {bucket}"
                    ))
                })?;
            (AddressingStyle::Path, rest.strip_prefix('/'))
        };

        let query = uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self {
            method,
            endpoint: Endpoint::new(host)
                .with_ssl(use_ssl)
                .with_addressing_style(style),
            bucket: bucket.to_string(),
            key: key.filter(|k| !k.is_empty()).map(str::to_string),
            query,
            headers,
            content_type,
            content_length: None,
        })
    }

    /// Fail when a key is given without a bucket to hold it.
    pub(crate) fn check_addressing(&self) -> Result<()> {
        if self.bucket.is_empty() && self.key.is_some() {
            return Err(Error::request_invalid(format!(
                "key {:?} is given without a bucket",
                self.key.as_deref().unwrap_or_default()
            )));
        }
        Ok(())
    }
}
