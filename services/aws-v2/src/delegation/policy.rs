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

use std::collections::HashSet;

use super::SigningRequest;

/// Decides whether the trusted party signs a request.
///
/// Any `Fn(&SigningRequest) -> bool` closure is a policy.
pub trait AuthorizePolicy: Send + Sync + 'static {
    /// Return `true` to sign `request`.
    fn is_authorized(&self, request: &SigningRequest) -> bool;
}

impl<F> AuthorizePolicy for F
where
    F: Fn(&SigningRequest) -> bool + Send + Sync + 'static,
{
    fn is_authorized(&self, request: &SigningRequest) -> bool {
        self(request)
    }
}

/// Sign everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AuthorizePolicy for AllowAll {
    fn is_authorized(&self, _: &SigningRequest) -> bool {
        true
    }
}

/// Sign only requests for the listed buckets.
///
/// Service level requests (empty bucket) are refused.
#[derive(Debug, Default, Clone)]
pub struct BucketAllowList {
    buckets: HashSet<String>,
}

impl BucketAllowList {
    /// Create an allow list.
    pub fn new<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: buckets.into_iter().map(Into::into).collect(),
        }
    }

    /// Allow one more bucket.
    pub fn allow(mut self, bucket: impl Into<String>) -> Self {
        self.buckets.insert(bucket.into());
        self
    }
}

impl AuthorizePolicy for BucketAllowList {
    fn is_authorized(&self, request: &SigningRequest) -> bool {
        !request.bucket.is_empty() && self.buckets.contains(&request.bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3sign_core::{Headers, Method};
    use test_case::test_case;

    fn request(bucket: &str, method: Method) -> SigningRequest {
        SigningRequest {
            bucket: bucket.to_string(),
            resource_path: format!("https://s3.amazonaws.com/{bucket}/key"),
            method,
            content_type: None,
            headers: Headers::new(),
        }
    }

    #[test_case("public", true)]
    #[test_case("logs", true)]
    #[test_case("private", false)]
    #[test_case("", false)]
    fn test_bucket_allow_list(bucket: &str, expected: bool) {
        let policy = BucketAllowList::new(["public"]).allow("logs");
        assert_eq!(policy.is_authorized(&request(bucket, Method::Get)), expected);
    }

    #[test]
    fn test_closure_policy() {
        let read_only = |r: &SigningRequest| matches!(r.method, Method::Get | Method::Head);

        assert!(read_only.is_authorized(&request("docs", Method::Get)));
        assert!(!read_only.is_authorized(&request("docs", Method::Delete)));
        assert!(AllowAll.is_authorized(&request("", Method::Delete)));
    }
}
