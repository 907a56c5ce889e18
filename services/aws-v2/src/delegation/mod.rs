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

//! Delegated signing.
//!
//! A requester without the secret key exports its request as a
//! [`SigningRequest`], a trusted party holding the [`Credential`] answers
//! with a [`SigningResponse`], and the requester applies that response
//! back onto its [`RequestDescriptor`]:
//!
//! ```text
//! Built -> Exported(SigningRequest) -> [trusted party: Signed | Rejected]
//! Signed -> Applied -> Dispatched
//! Rejected -> request must not be sent
//! ```
//!
//! Both messages are plain serde records and can travel over any channel.
//! Nothing binds a response to the request it answers; a request changed
//! after `apply` is rejected by the storage service, not here.

use log::debug;
use serde::{Deserialize, Serialize};

use s3sign_core::time::now;
use s3sign_core::{Error, Headers, Method, Result};

use crate::constants::AUTHORIZATION;
use crate::credential::Credential;
use crate::descriptor::RequestDescriptor;

mod policy;
pub use policy::{AllowAll, AuthorizePolicy, BucketAllowList};

mod trusted;
pub use trusted::{Authorize, DelegatedSigner, TrustedSigner};

/// What a requester sends to the trusted party. Holds no secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningRequest {
    /// Target bucket, empty for service level requests.
    pub bucket: String,
    /// Absolute url of the request, query included.
    pub resource_path: String,
    /// HTTP method.
    pub method: Method,
    /// Value of `Content-Type`.
    pub content_type: Option<String>,
    /// Every header of the request except `Authorization`.
    pub headers: Headers,
}

/// What the trusted party sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningResponse {
    /// Whether the request was signed. When false `headers` is empty and
    /// must not be applied.
    pub is_authorized: bool,
    /// The full header set to send, `Authorization` included.
    pub headers: Headers,
}

impl SigningResponse {
    /// A signed response.
    pub fn authorized(headers: Headers) -> Self {
        Self {
            is_authorized: true,
            headers,
        }
    }

    /// A rejection.
    pub fn denied() -> Self {
        Self {
            is_authorized: false,
            headers: Headers::new(),
        }
    }
}

/// Describe `req` for the trusted party.
///
/// The headers are copied, later changes to `req` don't reach the
/// exported request.
pub fn export(req: &RequestDescriptor) -> Result<SigningRequest> {
    let mut headers = req.headers.clone();
    headers.remove(AUTHORIZATION);

    Ok(SigningRequest {
        bucket: req.bucket.clone(),
        resource_path: req.uri()?.to_string(),
        method: req.method,
        content_type: req.content_type.clone(),
        headers,
    })
}

/// Sign `request` with `cred`, allowing every request.
///
/// Stamps `x-amz-date` with the current time when the request carries no
/// timestamp. `request` must target the default endpoint, use
/// [`TrustedSigner`] to plug in another endpoint or a policy.
pub fn authorize(request: &SigningRequest, cred: &Credential) -> Result<SigningResponse> {
    TrustedSigner::new(cred.clone()).authorize_at(request, now())
}

/// Replace the headers of `req` with the signed ones.
///
/// Fails with [`ErrorKind::AuthorizationDenied`](s3sign_core::ErrorKind::AuthorizationDenied)
/// and leaves `req` untouched if the response was not authorized or
/// carries no `Authorization` header.
pub fn apply(req: &mut RequestDescriptor, response: SigningResponse) -> Result<()> {
    if !response.is_authorized {
        return Err(Error::authorization_denied(format!(
            "signing of {} {} was refused",
            req.method,
            req.resource_path()
        )));
    }
    if !response.headers.contains(AUTHORIZATION) {
        return Err(Error::authorization_denied(
            "authorized response carries no Authorization header",
        ));
    }

    debug!("applying {} signed headers", response.headers.len());
    req.headers = response.headers;
    Ok(())
}
