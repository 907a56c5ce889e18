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
use std::str::FromStr;

use s3sign_core::{Error, Result};

/// Query tokens that select a variant of a bucket or object and so take
/// part in the canonical resource.
///
/// Variants are declared in signing priority: when a request carries
/// several, only the first one in this order is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubResource {
    /// `?acl`
    Acl,
    /// `?torrent`
    Torrent,
    /// `?logging`
    Logging,
    /// `?location`
    Location,
    /// `?versioning`
    Versioning,
    /// `?policy`
    Policy,
    /// `?lifecycle`
    Lifecycle,
    /// `?website`
    Website,
    /// `?cors`
    Cors,
    /// `?tagging`
    Tagging,
    /// `?notification`
    Notification,
    /// `?requestPayment`
    RequestPayment,
    /// `?uploads`
    Uploads,
    /// `?delete`
    Delete,
}

impl SubResource {
    /// The query token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubResource::Acl => "acl",
            SubResource::Torrent => "torrent",
            SubResource::Logging => "logging",
            SubResource::Location => "location",
            SubResource::Versioning => "versioning",
            SubResource::Policy => "policy",
            SubResource::Lifecycle => "lifecycle",
            SubResource::Website => "website",
            SubResource::Cors => "cors",
            SubResource::Tagging => "tagging",
            SubResource::Notification => "notification",
            SubResource::RequestPayment => "requestPayment",
            SubResource::Uploads => "uploads",
            SubResource::Delete => "delete",
        }
    }

    /// Pick the sub-resource to sign out of a query.
    ///
    /// Unknown names are ignored here, they are ordinary query parameters.
    pub fn select<'a>(query: impl IntoIterator<Item = &'a str>) -> Option<SubResource> {
        query.into_iter().filter_map(|k| k.parse().ok()).min()
    }
}

impl Display for SubResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubResource {
    type Err = Error;

    /// Tokens are matched exactly, `ACL` is not a sub-resource.
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "acl" => SubResource::Acl,
            "torrent" => SubResource::Torrent,
            "logging" => SubResource::Logging,
            "location" => SubResource::Location,
            "versioning" => SubResource::Versioning,
            "policy" => SubResource::Policy,
            "lifecycle" => SubResource::Lifecycle,
            "website" => SubResource::Website,
            "cors" => SubResource::Cors,
            "tagging" => SubResource::Tagging,
            "notification" => SubResource::Notification,
            "requestPayment" => SubResource::RequestPayment,
            "uploads" => SubResource::Uploads,
            "delete" => SubResource::Delete,
            _ => {
                return Err(Error::canonicalization_failed(format!(
                    "{s} is not a recognized sub-resource"
                )))
            }
        })
    }
}
