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

use std::time::Duration;

use log::debug;
use s3sign_core::time::{now, DateTime};
use s3sign_core::{Error, Method, Result};

use crate::canonical::string_to_sign_with_expires;
use crate::constants::*;
use crate::credential::Credential;
use crate::descriptor::RequestDescriptor;
use crate::endpoint::Endpoint;
use crate::sign_request::RequestSigner;

/// Presigner builds urls that carry their own authorization until they expire.
#[derive(Debug, Clone)]
pub struct Presigner {
    endpoint: Endpoint,
    method: Method,
    signer: RequestSigner,
}

impl Presigner {
    /// Create a presigner for GET urls on `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            method: Method::Get,
            signer: RequestSigner::new(),
        }
    }

    /// Sign urls for another method, like PUT for uploads.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Build a url for `key` in `bucket` valid until `expires_at`.
    ///
    /// An empty key addresses the bucket itself.
    pub fn build_url(
        &self,
        cred: &Credential,
        bucket: &str,
        key: &str,
        expires_at: DateTime,
    ) -> Result<http::Uri> {
        let mut req = RequestDescriptor::new(self.method, self.endpoint.clone(), bucket).with_key(key);
        let expires = expires_at.timestamp();

        let string_to_sign = string_to_sign_with_expires(&req, expires)?;
        debug!("string to sign: {}", &string_to_sign);
        let signature = self.signer.sign(&string_to_sign, cred)?;

        req.query.extend([
            (QUERY_ACCESS_KEY_ID.to_string(), cred.access_key_id.clone()),
            (QUERY_EXPIRES.to_string(), expires.to_string()),
            (QUERY_SIGNATURE.to_string(), signature),
        ]);
        req.uri()
    }

    /// Build a url valid for `expires_in` from now.
    pub fn build_url_expires_in(
        &self,
        cred: &Credential,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<http::Uri> {
        let expires_in = chrono::Duration::from_std(expires_in).map_err(|e| {
            Error::request_invalid(format!("expiration {expires_in:?} is out of range"))
                .with_source(e)
        })?;
        let expires_at = now()
            .checked_add_signed(expires_in)
            .ok_or_else(|| Error::request_invalid("expiration is out of range"))?;

        self.build_url(cred, bucket, key, expires_at)
    }
}
