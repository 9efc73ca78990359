use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed request and the response it produced, together with the
/// outcome of any tests that ran against it. Exchanges are produced by the
/// execution engine and never modified once they are handed over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exchange {
    /// Name of the request region, if the author gave it one. Used to
    /// derive names for temporary files.
    pub name: Option<String>,
    pub request: Option<Request>,
    pub response: Option<Response>,
    pub test_results: Option<Vec<TestResult>>,
    /// Region metadata, carrying directives such as `save` and `openWith`.
    pub metadata: BTreeMap<String, Value>,
}

impl Exchange {
    /// Only an exchange with both halves present can be displayed.
    pub fn is_complete(&self) -> bool {
        self.request
            .is_some()
            && self
                .response
                .is_some()
    }

    /// Look up a metadata directive carrying a string value. Empty strings
    /// are treated as absent.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        match self
            .metadata
            .get(key)
        {
            Some(Value::String(value)) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    pub fn has_metadata(&self, key: &str) -> bool {
        match self
            .metadata
            .get(key)
        {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(_) => true,
        }
    }

    pub fn test_counts(&self) -> Option<TestCounts> {
        let results = self
            .test_results
            .as_ref()?;

        let passed = results
            .iter()
            .filter(|test| test.result)
            .count();

        Some(TestCounts {
            passed,
            failed: results.len() - passed,
            total: results.len(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub status_code: u16,
    pub status_message: String,
    pub http_version: Option<String>,
    pub headers: Headers,
    /// The body interpreted as text, if the content was textual.
    pub body: Option<String>,
    /// The bytes exactly as received.
    pub raw_body: Option<Vec<u8>>,
    /// A pretty-printed rendition of a textual body, computed upstream.
    pub pretty_print_body: Option<String>,
    pub timings: Option<Timings>,
    pub meta: BTreeMap<String, Value>,
}

impl Response {
    pub fn version(&self) -> &str {
        self.http_version
            .as_deref()
            .unwrap_or("1.1")
    }

    /// The MIME type from the Content-Type header, without parameters and
    /// lowercased.
    pub fn mime_type(&self) -> Option<String> {
        let value = self
            .headers
            .get("content-type")?;

        let mime = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }
}

/// Header values arrive either singly or, for repeated headers, as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    One(String),
    Many(Vec<String>),
}

impl HeaderValue {
    pub fn joined(&self) -> String {
        match self {
            HeaderValue::One(value) => value.clone(),
            HeaderValue::Many(values) => values.join(", "),
        }
    }
}

/// Headers keyed by the name as received. Lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, HeaderValue>);

impl Headers {
    pub fn new() -> Self {
        Headers(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0
            .insert(name.into(), HeaderValue::One(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.joined())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.joined()))
    }

    pub fn is_empty(&self) -> bool {
        self.0
            .is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Durations, in milliseconds, of the phases of an executed request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    pub wait: Option<f64>,
    pub dns: Option<f64>,
    pub tcp: Option<f64>,
    pub tls: Option<f64>,
    pub request: Option<f64>,
    pub first_byte: Option<f64>,
    pub download: Option<f64>,
    pub total: Option<f64>,
}

impl Timings {
    /// Look a measurement up by the name it has on the wire, so
    /// `firstByte` rather than `first_byte`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// The measurements present, in the order the phases happen.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("wait", self.wait),
            ("dns", self.dns),
            ("tcp", self.tcp),
            ("tls", self.tls),
            ("request", self.request),
            ("firstByte", self.first_byte),
            ("download", self.download),
            ("total", self.total),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestResult {
    pub message: String,
    pub result: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCounts {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}
