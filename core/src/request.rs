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

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// HTTP methods that can be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

impl Method {
    /// The upper case method name used on the wire and in canonical strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Method names are matched ASCII case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            _ => Err(Error::canonicalization_failed(format!(
                "method {s} is not supported for signing"
            ))),
        }
    }
}

impl From<Method> for http::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => http::Method::GET,
            Method::Put => http::Method::PUT,
            Method::Post => http::Method::POST,
            Method::Delete => http::Method::DELETE,
            Method::Head => http::Method::HEAD,
        }
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = Error;

    fn try_from(m: &http::Method) -> Result<Self> {
        m.as_str().parse()
    }
}

/// Ordered multimap of header name to value.
///
/// Unlike `http::HeaderMap`, names keep the case they were inserted with
/// and entries keep their insertion order, so the set survives any
/// serialization round trip exactly. Lookups compare names ASCII
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values of the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Set a header, replacing every existing value of the same name.
    ///
    /// The new entry takes the position of the first replaced entry, or the
    /// end if the name was absent.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.position(&name) {
            Some(idx) => {
                self.0[idx] = (name.clone(), value);
                let mut seen = 0;
                self.0.retain(|(k, _)| {
                    if !k.eq_ignore_ascii_case(&name) {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.0.push((name, value)),
        }
    }

    /// Get the first value of the named header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get all values of the named header in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove every value of the named header, returning whether any existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.0.len()
    }

    /// Remove all headers.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of entries, counting repeated names separately.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convert into an `http::HeaderMap`.
    ///
    /// Header names are lower cased by `http`; repeated names are kept.
    pub fn to_header_map(&self) -> Result<http::HeaderMap> {
        let mut map = http::HeaderMap::with_capacity(self.0.len());
        for (k, v) in &self.0 {
            let name = http::header::HeaderName::from_bytes(k.as_bytes())?;
            let mut value = http::HeaderValue::from_str(v)?;
            if name == http::header::AUTHORIZATION {
                value.set_sensitive(true);
            }
            map.append(name, value);
        }
        Ok(map)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Headers(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::ErrorKind;

    #[test_case("GET", Method::Get)]
    #[test_case("put", Method::Put)]
    #[test_case("Delete", Method::Delete)]
    #[test_case("HEAD", Method::Head)]
    #[test_case("post", Method::Post)]
    fn test_method_from_str(input: &str, expected: Method) {
        assert_eq!(input.parse::<Method>().unwrap(), expected);
    }

    #[test_case("PATCH")]
    #[test_case("OPTIONS")]
    #[test_case("")]
    fn test_method_from_str_rejects(input: &str) {
        let err = input.parse::<Method>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CanonicalizationFailed);
    }

    #[test]
    fn test_headers_keep_case_and_order() {
        let mut h = Headers::new();
        h.append("X-Amz-Meta-Color", "blue");
        h.append("Content-MD5", "abc");
        h.append("x-amz-meta-color", "red");

        assert_eq!(h.get("X-AMZ-META-COLOR"), Some("blue"));
        assert_eq!(
            h.get_all("x-amz-meta-color").collect::<Vec<_>>(),
            vec!["blue", "red"]
        );
        assert_eq!(
            h.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["X-Amz-Meta-Color", "Content-MD5", "x-amz-meta-color"]
        );
    }

    #[test]
    fn test_headers_insert_replaces_all() {
        let mut h: Headers = [("a", "1"), ("B", "2"), ("b", "3"), ("c", "4")]
            .into_iter()
            .collect();
        h.insert("b", "new");

        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![("a", "1"), ("b", "new"), ("c", "4")]
        );

        h.insert("d", "5");
        assert_eq!(h.len(), 4);
        assert!(h.remove("A"));
        assert!(!h.remove("a"));
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_headers_serde_is_lossless() {
        let h: Headers = [("X-Amz-Date", "now"), ("x-amz-meta-a", "1"), ("x-amz-meta-a", "2")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(
            json,
            r#"[["X-Amz-Date","now"],["x-amz-meta-a","1"],["x-amz-meta-a","2"]]"#
        );
        assert_eq!(serde_json::from_str::<Headers>(&json).unwrap(), h);
    }

    #[test]
    fn test_headers_to_header_map() {
        let h: Headers = [("Authorization", "AWS id:sig"), ("x-amz-meta-a", "1"), ("X-Amz-Meta-A", "2")]
            .into_iter()
            .collect();
        let map = h.to_header_map().unwrap();

        assert!(map.get("authorization").unwrap().is_sensitive());
        assert_eq!(map.get_all("x-amz-meta-a").iter().count(), 2);
    }
}
