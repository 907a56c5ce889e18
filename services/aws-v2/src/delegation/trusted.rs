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
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use s3sign_core::time::{now, DateTime};
use s3sign_core::Result;

use super::{apply, export, AllowAll, AuthorizePolicy, SigningRequest, SigningResponse};
use crate::constants::AUTHORIZATION;
use crate::credential::Credential;
use crate::descriptor::RequestDescriptor;
use crate::endpoint::Endpoint;
use crate::sign_request::RequestSigner;

/// Authorize carries a [`SigningRequest`] to the trusted party and brings
/// back its answer.
///
/// [`TrustedSigner`] implements it in process. Deployments implement it
/// over their own channel (http, message queue, ...).
#[async_trait]
pub trait Authorize: Debug + Send + Sync + 'static {
    /// Ask the trusted party to sign `request`.
    ///
    /// A refusal is `Ok` with `is_authorized = false`; `Err` means the
    /// answer never arrived.
    async fn authorize(&self, request: SigningRequest) -> Result<SigningResponse>;
}

#[async_trait]
impl<T: Authorize> Authorize for Arc<T> {
    async fn authorize(&self, request: SigningRequest) -> Result<SigningResponse> {
        self.as_ref().authorize(request).await
    }
}

/// TrustedSigner is the party holding the secret key.
///
/// It checks every request against its policy before signing.
#[derive(Clone)]
pub struct TrustedSigner {
    credential: Credential,
    policy: Arc<dyn AuthorizePolicy>,
    endpoint: Endpoint,
    signer: RequestSigner,
    time: Option<DateTime>,
}

impl Debug for TrustedSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustedSigner")
            .field("credential", &self.credential)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl TrustedSigner {
    /// Create a trusted signer that signs every request sent to the
    /// default endpoint.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            policy: Arc::new(AllowAll),
            endpoint: Endpoint::default(),
            signer: RequestSigner::new(),
            time: None,
        }
    }

    /// Set the policy deciding which requests get signed.
    pub fn with_policy(mut self, policy: impl AuthorizePolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Set the endpoint requests are expected to target.
    ///
    /// Targets on any other host are refused.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
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

    /// Check the policy and sign `request`.
    ///
    /// A policy refusal returns a denied response. Errors are reserved for
    /// requests that can't be signed at all.
    pub fn authorize(&self, request: &SigningRequest) -> Result<SigningResponse> {
        self.authorize_at(request, self.time.unwrap_or_else(now))
    }

    pub(crate) fn authorize_at(
        &self,
        request: &SigningRequest,
        now: DateTime,
    ) -> Result<SigningResponse> {
        if !self.policy.is_authorized(request) {
            warn!(
                "refused to sign {} {} for bucket {:?}",
                request.method, request.resource_path, request.bucket
            );
            return Ok(SigningResponse::denied());
        }

        let mut req = RequestDescriptor::from_target(
            &self.endpoint,
            request.method,
            &request.bucket,
            &request.resource_path,
            request.content_type.clone(),
            request.headers.clone(),
        )?;
        req.headers.remove(AUTHORIZATION);
        if req.stamp(now) {
            debug!("stamped request to {} with current time", request.resource_path);
        }

        self.signer.sign_descriptor(&mut req, &self.credential)?;
        Ok(SigningResponse::authorized(req.headers))
    }
}

#[async_trait]
impl Authorize for TrustedSigner {
    async fn authorize(&self, request: SigningRequest) -> Result<SigningResponse> {
        TrustedSigner::authorize(self, &request)
    }
}

/// DelegatedSigner signs requests for a party that holds no secret.
#[derive(Debug, Clone)]
pub struct DelegatedSigner<A: Authorize> {
    authorizer: A,
}

impl<A: Authorize> DelegatedSigner<A> {
    /// Create a delegated signer talking to `authorizer`.
    pub fn new(authorizer: A) -> Self {
        Self { authorizer }
    }

    /// Export `req`, have it authorized and apply the answer.
    ///
    /// `req` is only changed when the trusted party signed it.
    pub async fn sign(&self, req: &mut RequestDescriptor) -> Result<()> {
        let request = export(req)?;
        let response = self.authorizer.authorize(request).await?;
        apply(req, response)
    }
}
