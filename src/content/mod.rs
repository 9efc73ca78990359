//! Choosing what goes into a result document.

use crate::config::{ResponseViewContent, Settings};
use crate::exchange::{to_http_string, Exchange, Sections};

/// File extension of the protocol's own text format. Documents carrying
/// it get HTTP highlighting regardless of the response content type.
pub const PROTOCOL_EXTENSION: &str = "http";

/// The bytes to display, and the file extension to give them if the
/// choice shouldn't be left to the content type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub content: Vec<u8>,
    pub extension: Option<&'static str>,
}

impl Selection {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Pick the payload for a rendering of the exchange. Deterministic in its
/// inputs. Anything other than the body view yields the protocol text
/// form; otherwise a precomputed pretty-printed body is preferred when
/// pretty-printing is on, then the raw bytes. If that leaves nothing to
/// show, the protocol text form is used after all.
pub fn select(exchange: &Exchange, settings: &Settings) -> Selection {
    let response = match &exchange.response {
        Some(response) => response,
        None => return Selection::default(),
    };

    let view = settings.response_view_content;

    let selection = if view != ResponseViewContent::Body {
        protocol_text(exchange, view)
    } else {
        match (&response.body, &response.pretty_print_body) {
            (Some(_), Some(pretty)) if settings.response_view_pretty_print => Selection {
                content: pretty
                    .as_bytes()
                    .to_vec(),
                extension: None,
            },
            _ => Selection {
                content: response
                    .raw_body
                    .clone()
                    .unwrap_or_default(),
                extension: None,
            },
        }
    };

    if selection
        .content
        .is_empty()
    {
        let view = view_context(view, response.body.is_some());
        return protocol_text(exchange, view);
    }

    selection
}

/// The view to fall back to when the body view has nothing in it. With a
/// parsed body that is the full response; without, just the headers.
pub fn view_context(view: ResponseViewContent, has_body: bool) -> ResponseViewContent {
    match view {
        ResponseViewContent::Body if has_body => ResponseViewContent::Full,
        ResponseViewContent::Body => ResponseViewContent::Headers,
        other => other,
    }
}

fn protocol_text(exchange: &Exchange, view: ResponseViewContent) -> Selection {
    let sections = match view {
        ResponseViewContent::Headers => Sections {
            request: false,
            body: false,
        },
        ResponseViewContent::Body | ResponseViewContent::Full => Sections {
            request: false,
            body: true,
        },
        ResponseViewContent::Exchange => Sections {
            request: true,
            body: true,
        },
    };

    Selection {
        content: to_http_string(exchange, sections).into_bytes(),
        extension: Some(PROTOCOL_EXTENSION),
    }
}

/// File extension implied by a MIME type, for naming temporary files so
/// the host highlights them appropriately.
pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    let mime = mime_type.to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        return Some("json");
    }
    if mime == "application/xml" || mime == "text/xml" || mime.ends_with("+xml") {
        return Some("xml");
    }

    match mime.as_str() {
        "text/html" => Some("html"),
        "text/css" => Some("css"),
        "text/csv" => Some("csv"),
        "text/markdown" => Some("md"),
        "text/plain" => Some("txt"),
        "application/javascript" | "text/javascript" => Some("js"),
        "application/yaml" | "application/x-yaml" | "text/yaml" => Some("yaml"),
        "application/pdf" => Some("pdf"),
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Language identifier the host should use for a document, given the
/// extension its content would have on disk.
pub fn language_for(extension: &str) -> Option<&'static str> {
    match extension {
        "http" => Some("http"),
        "json" => Some("json"),
        "xml" => Some("xml"),
        "html" => Some("html"),
        "css" => Some("css"),
        "js" => Some("javascript"),
        "yaml" => Some("yaml"),
        "md" => Some("markdown"),
        "csv" | "txt" => Some("plaintext"),
        _ => None,
    }
}
