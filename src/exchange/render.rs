//! Textual renderings of an exchange: the protocol's own text form, for
//! showing headers alongside a body, and markdown, for hovers.

use serde::Serialize;
use serde_json::Value;
use tinytemplate::TinyTemplate;
use tracing::warn;

use super::{Exchange, Headers, Response};

/// Which parts of an exchange to include in its protocol text form. The
/// response status line and headers are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub request: bool,
    pub body: bool,
}

/// Render the exchange the way it would appear on the wire, so that a
/// document holding it can be highlighted as HTTP rather than by the
/// content type of the body.
pub fn to_http_string(exchange: &Exchange, sections: Sections) -> String {
    let mut output = String::new();

    if sections.request {
        if let Some(request) = &exchange.request {
            output.push_str(&format!("{} {}\n", request.method, request.url));
            push_headers(&mut output, &request.headers);
            if let Some(body) = request
                .body
                .as_deref()
                .filter(|body| !body.is_empty())
            {
                output.push('\n');
                output.push_str(body);
                if !body.ends_with('\n') {
                    output.push('\n');
                }
            }
            output.push('\n');
        }
    }

    if let Some(response) = &exchange.response {
        output.push_str(&status_line(response));
        output.push('\n');
        push_headers(&mut output, &response.headers);

        if sections.body {
            if let Some(body) = body_text(response).filter(|body| !body.is_empty()) {
                output.push('\n');
                output.push_str(&body);
                if !body.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}

fn status_line(response: &Response) -> String {
    let line = format!(
        "HTTP/{} {} {}",
        response.version(),
        response.status_code,
        response.status_message
    );
    line.trim_end()
        .to_string()
}

fn push_headers(output: &mut String, headers: &Headers) {
    for (name, value) in headers.iter() {
        output.push_str(&format!("{}: {}\n", name, value));
    }
}

fn body_text(response: &Response) -> Option<String> {
    if let Some(body) = &response.body {
        return Some(body.clone());
    }
    response
        .raw_body
        .as_ref()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

static HOVER: &'static str = r#"**HTTP/{version} {status_code} - {status_message}**
{{ if has_request }}
`{method} {url}`
{{ endif }}{{ if has_headers }}
| Header | Value |
|---|---|
{{ for header in headers }}| {header.name} | {header.value} |
{{ endfor }}{{ endif }}{{ if has_timings }}
**Timings**

{{ for timing in timings }}- {timing.name}: {timing.value}ms
{{ endfor }}{{ endif }}{{ if has_meta }}
**Meta**

{{ for entry in meta }}- {entry.name}: {entry.value}
{{ endfor }}{{ endif }}{{ if has_tests }}
**Tests**

{{ for test in tests }}- {test.mark} {test.message}
{{ endfor }}{{ endif }}"#;

#[derive(Serialize)]
struct Entry {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct Outcome {
    mark: &'static str,
    message: String,
}

#[derive(Serialize)]
struct Context {
    version: String,
    status_code: u16,
    status_message: String,
    has_request: bool,
    method: String,
    url: String,
    has_headers: bool,
    headers: Vec<Entry>,
    has_timings: bool,
    timings: Vec<Entry>,
    has_meta: bool,
    meta: Vec<Entry>,
    has_tests: bool,
    tests: Vec<Outcome>,
}

/// Render a summary of the exchange as markdown: the status line, the
/// request line, response headers, timings, metadata and test outcomes.
/// Bodies are never included. Returns None if there is no response.
pub fn to_markdown(exchange: &Exchange) -> Option<String> {
    let response = exchange
        .response
        .as_ref()?;

    let (method, url) = match &exchange.request {
        Some(request) => (request.method.clone(), request.url.clone()),
        None => (String::new(), String::new()),
    };

    let headers: Vec<Entry> = response
        .headers
        .iter()
        .map(|(name, value)| Entry {
            name: table_cell(name),
            value: table_cell(&value),
        })
        .collect();

    let timings: Vec<Entry> = response
        .timings
        .as_ref()
        .map(|timings| {
            timings
                .entries()
                .into_iter()
                .map(|(name, value)| Entry {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let meta: Vec<Entry> = response
        .meta
        .iter()
        .filter_map(|(name, value)| {
            display_value(value).map(|value| Entry {
                name: name.clone(),
                value,
            })
        })
        .collect();

    let tests: Vec<Outcome> = exchange
        .test_results
        .iter()
        .flatten()
        .map(|test| Outcome {
            mark: if test.result { "✓" } else { "✗" },
            message: test
                .message
                .clone(),
        })
        .collect();

    let context = Context {
        version: response
            .version()
            .to_string(),
        status_code: response.status_code,
        status_message: response
            .status_message
            .clone(),
        has_request: exchange
            .request
            .is_some(),
        method,
        url,
        has_headers: !headers.is_empty(),
        headers,
        has_timings: !timings.is_empty(),
        timings,
        has_meta: !meta.is_empty(),
        meta,
        has_tests: !tests.is_empty(),
        tests,
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);

    if let Err(error) = tt.add_template("hover", HOVER) {
        warn!(?error, "Hover template rejected");
        return None;
    }

    match tt.render("hover", &context) {
        Ok(rendered) => Some(rendered),
        Err(error) => {
            warn!(?error, "Unable to render hover");
            None
        }
    }
}

/// Pipes would end a markdown table cell early.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Metadata values worth showing. Null, false and empty strings count as
/// absent; strings are shown without quotes.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
