//! Hints shown on result documents: summary lines above the content, and
//! a hover over its first word.

use std::sync::OnceLock;

use lsp_types::{
    CodeLens, Command, Hover, HoverContents, MarkupContent, MarkupKind, Position, Range,
};
use regex::Regex;

use super::OutputCache;
use crate::config::Settings;
use crate::exchange::{display_value, to_markdown, Exchange, Response};
use crate::host::DocumentId;

/// Command run when a summary line is clicked. Its argument is the
/// exchange.
pub const VIEW_HEADER_COMMAND: &str = "responseView.viewHeader";

const TIMINGS_PREFIX: &str = "timings.";
const META_PREFIX: &str = "meta.";
const TESTS_PREFIX: &str = "tests.";

/// Summary lines for a result document, each carrying the view header
/// command. Empty if the document isn't one of ours.
pub fn summaries(cache: &OutputCache, settings: &Settings, document: DocumentId) -> Vec<CodeLens> {
    let entry = match cache.get(document) {
        Some(entry) => entry,
        None => return Vec::new(),
    };

    let argument = serde_json::to_value(&entry.exchange).ok();
    let origin = Range {
        start: Position {
            line: 0,
            character: 0,
        },
        end: Position {
            line: 0,
            character: 0,
        },
    };

    summary_titles(&entry.exchange, &settings.response_view_header)
        .into_iter()
        .map(|title| CodeLens {
            range: origin,
            command: Some(Command {
                title,
                command: VIEW_HEADER_COMMAND.to_string(),
                arguments: argument
                    .clone()
                    .map(|value| vec![value]),
            }),
            data: None,
        })
        .collect()
}

/// The text of the summary lines: the status line, the test tally if
/// tests ran, then one line for each specifier that resolves to something.
pub fn summary_titles(exchange: &Exchange, specifiers: &[String]) -> Vec<String> {
    let response = match &exchange.response {
        Some(response) => response,
        None => return Vec::new(),
    };

    let mut titles = vec![format!(
        "HTTP{} {} - {}",
        response.version(),
        response.status_code,
        response.status_message
    )];

    if let Some(counts) = exchange.test_counts() {
        titles.push(format!("TestResults {}/{}", counts.passed, counts.total));
    }

    titles.extend(
        specifiers
            .iter()
            .filter_map(|specifier| resolve(exchange, response, specifier)),
    );

    titles
}

/// Resolve one specifier. Each prefix only applies when its source data
/// exists; otherwise the specifier is tried as a header name.
fn resolve(exchange: &Exchange, response: &Response, specifier: &str) -> Option<String> {
    if let (Some(name), Some(timings)) = (
        specifier.strip_prefix(TIMINGS_PREFIX),
        response
            .timings
            .as_ref(),
    ) {
        let value = timings
            .get(name)
            .unwrap_or(0.0);
        return Some(format!("{}: {}ms", name, value));
    }

    if let Some(name) = specifier.strip_prefix(META_PREFIX) {
        if let Some(value) = response
            .meta
            .get(name)
            .and_then(display_value)
        {
            return Some(format!("{}: {}", name, value));
        }
    }

    if let (Some(name), Some(counts)) = (specifier.strip_prefix(TESTS_PREFIX), exchange.test_counts())
    {
        let count = match name {
            "failed" => Some(counts.failed),
            "success" => Some(counts.passed),
            "total" => Some(counts.total),
            _ => None,
        };
        if let Some(count) = count {
            return Some(format!("{}: {}", name, count));
        }
    }

    response
        .headers
        .get(specifier)
        .map(|value| format!("{}: {}", specifier, value))
}

/// Hover for the first line of a result document, summarising the
/// exchange without its bodies. `first_line` is the text of line 0, used
/// to size the hover range.
pub fn hover(
    cache: &OutputCache,
    document: DocumentId,
    position: Position,
    first_line: Option<&str>,
) -> Option<Hover> {
    if position.line != 0 {
        return None;
    }

    let entry = cache.get(document)?;
    let markdown = to_markdown(&entry.exchange)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown,
        }),
        range: Some(first_word(first_line.unwrap_or_default())),
    })
}

/// Range of the run of characters at the start of the line that are
/// neither dashes nor whitespace, or the first hundred characters if the
/// line doesn't start with one.
fn first_word(line: &str) -> Range {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"^[^-\s]+").unwrap_or_else(|e| panic!("{}", e)));

    let end = match word.find(line) {
        Some(found) => found
            .as_str()
            .encode_utf16()
            .count() as u32,
        None => 100,
    };

    Range {
        start: Position {
            line: 0,
            character: 0,
        },
        end: Position {
            line: 0,
            character: end,
        },
    }
}
