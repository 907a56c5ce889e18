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

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use s3sign_core::{Context, ProvideCredential, Result, SigningCredential};

use crate::config::Config;
use crate::credential::Credential;

/// ConfigCredentialProvider takes the key pair set on a [`Config`].
///
/// The config is used as is. Call [`Config::from_env`] first to pick up
/// values from env.
#[derive(Debug, Clone)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a provider reading `config`.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let cred = Credential::new(
            self.config.access_key_id.clone().unwrap_or_default(),
            self.config.secret_access_key.clone().unwrap_or_default(),
        );
        if !cred.is_valid() {
            debug!("config carries no complete key pair, skipping");
            return Ok(None);
        }
        Ok(Some(cred))
    }
}
