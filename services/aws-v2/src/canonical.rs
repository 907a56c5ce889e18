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

//! Canonical string construction for the `AWS` header scheme.
//!
//! ```text
//! VERB\n
//! Content-MD5\n
//! Content-Type\n
//! Date\n
//! CanonicalizedAmzHeaders
//! CanonicalizedResource
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;

use s3sign_core::{Error, Headers, Result};

use crate::constants::*;
use crate::descriptor::RequestDescriptor;

/// Build the string to sign for a header-signed request.
///
/// `x-amz-date` wins over `Date`: when it is present the date line is
/// left empty and the value is bound through the `x-amz-` headers.
pub fn string_to_sign(req: &RequestDescriptor) -> Result<String> {
    req.check_addressing()?;

    let date = if req.headers.contains(X_AMZ_DATE) {
        ""
    } else {
        req.headers.get(DATE).ok_or_else(|| {
            Error::canonicalization_failed(format!(
                "request to {} carries neither {X_AMZ_DATE} nor {DATE}",
                req.resource_path()
            ))
        })?
    };

    let mut s = String::new();
    write_head(&mut s, req, date.trim())?;
    s.write_str(&canonicalize_headers(&req.headers))?;
    s.write_str(&canonicalize_resource(req))?;

    Ok(s)
}

/// Build the string to sign for a pre-signed url.
///
/// The date line holds `expires` in epoch seconds and no `x-amz-`
/// header is signed.
pub fn string_to_sign_with_expires(req: &RequestDescriptor, expires: i64) -> Result<String> {
    req.check_addressing()?;

    let mut s = String::new();
    write_head(&mut s, req, &expires.to_string())?;
    s.write_str(&canonicalize_resource(req))?;

    Ok(s)
}

fn write_head(s: &mut String, req: &RequestDescriptor, date: &str) -> Result<()> {
    writeln!(s, "{}", req.method)?;
    writeln!(s, "{}", req.content_md5().map(str::trim).unwrap_or_default())?;
    writeln!(s, "{}", req.content_type.as_deref().map(str::trim).unwrap_or_default())?;
    writeln!(s, "{date}")?;
    Ok(())
}

/// Canonicalize `x-amz-*` headers into `name:value\n` lines.
///
/// Names are lower cased and sorted by bytes, repeated names are joined
/// with `,` in their original order. Values are trimmed and folded lines
/// are joined with a single space.
pub fn canonicalize_headers(headers: &Headers) -> String {
    let mut signed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let name = name.to_ascii_lowercase();
        if !name.starts_with(SIGNABLE_HEADER_PREFIX) {
            continue;
        }
        signed.entry(name).or_default().push(unfold(value));
    }

    let mut s = String::new();
    for (name, values) in signed {
        s.push_str(&name);
        s.push(':');
        s.push_str(&values.join(","));
        s.push('\n');
    }
    s
}

fn unfold(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonicalize the resource: the encoded `/bucket/key` path followed by
/// at most one sub-resource, without its value.
pub fn canonicalize_resource(req: &RequestDescriptor) -> String {
    let mut s = req.resource_path();
    if let Some(sub_resource) = req.sub_resource() {
        s.push('?');
        s.push_str(sub_resource.as_str());
    }
    s
}
