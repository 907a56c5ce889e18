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

use log::debug;
use s3sign_core::hash::base64_hmac_sha1;
use s3sign_core::{Error, Result, SigningCredential};

use crate::canonical::string_to_sign;
use crate::constants::*;
use crate::credential::Credential;
use crate::descriptor::RequestDescriptor;

/// RequestSigner computes signatures for the `AWS` header scheme.
///
/// Signing is a pure function of the request and the credential: the
/// signer never reads the clock, so the request must already carry its
/// timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self
    }

    /// Sign `string_to_sign` with the secret key: base64 of HMAC-SHA1.
    pub fn sign(&self, string_to_sign: &str, cred: &Credential) -> Result<String> {
        if !cred.is_valid() {
            return Err(Error::signing_failed(
                "credential must carry both access key id and secret access key",
            ));
        }

        Ok(base64_hmac_sha1(
            cred.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        ))
    }

    /// Format the `Authorization` header value: `AWS <access_key_id>:<signature>`.
    pub fn build_header(&self, cred: &Credential, signature: &str) -> String {
        format!("{AUTHORIZATION_SCHEME} {}:{signature}", cred.access_key_id)
    }

    /// Sign the request and set its `Authorization` header.
    ///
    /// Any existing `Authorization` header is replaced.
    pub fn sign_descriptor(&self, req: &mut RequestDescriptor, cred: &Credential) -> Result<()> {
        let string_to_sign = string_to_sign(req)?;
        debug!("string to sign: {}", &string_to_sign);

        let signature = self.sign(&string_to_sign, cred)?;
        req.headers
            .insert(AUTHORIZATION, self.build_header(cred, &signature));

        Ok(())
    }
}
