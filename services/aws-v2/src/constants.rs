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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in s3 requests.
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_MD5: &str = "Content-MD5";
pub const DATE: &str = "Date";
pub const X_AMZ_ACL: &str = "x-amz-acl";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_META_PREFIX: &str = "x-amz-meta-";

/// Headers starting with this prefix take part in the string to sign.
pub const SIGNABLE_HEADER_PREFIX: &str = "x-amz-";

/// Scheme of the `Authorization` header value.
pub const AUTHORIZATION_SCHEME: &str = "AWS";

// Query parameters of pre-signed urls.
pub const QUERY_ACCESS_KEY_ID: &str = "AWSAccessKeyId";
pub const QUERY_EXPIRES: &str = "Expires";
pub const QUERY_SIGNATURE: &str = "Signature";

/// Env name of the access key id.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Env name of the secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Env name of the endpoint host.
pub const S3SIGN_ENDPOINT: &str = "S3SIGN_ENDPOINT";
/// Env name of the https switch, `true` by default.
pub const S3SIGN_USE_SSL: &str = "S3SIGN_USE_SSL";
/// Env name of the virtual-hosted addressing switch, `false` by default.
pub const S3SIGN_USE_SUBDOMAINS: &str = "S3SIGN_USE_SUBDOMAINS";

pub const DEFAULT_ENDPOINT: &str = "s3.amazonaws.com";

/// AsciiSet for object keys in both the request line and the canonical resource.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~' and '/'.
pub static KEY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same as [`KEY_ENCODE_SET`] but `/` is encoded too, used in query.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
