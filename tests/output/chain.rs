use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use response_view::config::{Config, ResponseViewMode};
use response_view::exchange::Exchange;
use response_view::handlers::{Chain, Outcome, ResponseHandler};
use response_view::host::{DocumentId, Host, HostError};
use response_view::output::ResponseOutput;

use crate::host::{sample, FakeHost};

fn with_mode(mode: ResponseViewMode) -> Config {
    let mut config = Config::default();
    config
        .settings
        .response_view_mode = mode;
    config
}

#[test]
fn save_directive_writes_without_showing() {
    let mut host = FakeHost::new();
    let target = host
        .root()
        .join("widget.json");

    let mut exchange = sample();
    exchange
        .metadata
        .insert("save".to_string(), json!(target.to_string_lossy()));

    let mut output = ResponseOutput::start(&mut host, Config::default());
    output
        .show(&mut host, exchange)
        .expect("show");

    let written = std::fs::read_to_string(&target).expect("saved file");
    assert_eq!(written, r#"{"id":1,"name":"widget"}"#);
    assert!(host
        .viewers
        .is_empty());
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn open_with_hands_off_to_external_viewer() {
    let mut host = FakeHost::new();

    let mut exchange = sample();
    exchange
        .metadata
        .insert("openWith".to_string(), json!("imagePreview"));

    let mut output = ResponseOutput::start(&mut host, Config::default());
    output
        .show(&mut host, exchange)
        .expect("show");

    assert_eq!(
        host.externals
            .len(),
        1
    );
    let (path, viewer_type) = &host.externals[0];
    assert!(path.exists());
    assert_eq!(viewer_type.as_deref(), Some("imagePreview"));
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn save_takes_precedence_over_open_with() {
    let mut host = FakeHost::new();
    let target = host
        .root()
        .join("out.bin");

    let mut exchange = sample();
    exchange
        .metadata
        .insert("save".to_string(), json!(target.to_string_lossy()));
    exchange
        .metadata
        .insert("openWith".to_string(), json!("hexEditor"));

    let mut output = ResponseOutput::start(&mut host, Config::default());
    output
        .show(&mut host, exchange)
        .expect("show");

    assert!(target.exists());
    assert!(host
        .externals
        .is_empty());
}

#[test]
fn preview_writes_a_temporary_file() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("show");

    let document = output
        .cache()
        .documents()[0];
    let path = host
        .document(document)
        .and_then(|info| info.path())
        .expect("preview is backed by a file");

    assert!(path
        .to_string_lossy()
        .contains("response_view_tmp"));
    assert_eq!(
        path.extension()
            .and_then(|extension| extension.to_str()),
        Some("json")
    );
    assert_eq!(host.previews, 1);
    assert!(output
        .cache()
        .get(document)
        .expect("entry")
        .delete_file());
}

#[test]
fn preview_disabled_by_workbench_opens_untitled() {
    let mut host = FakeHost::new();
    let mut config = Config::default();
    config
        .workbench
        .enable_preview = false;

    let mut output = ResponseOutput::start(&mut host, config);
    output
        .show(&mut host, sample())
        .expect("show");

    let document = output
        .cache()
        .documents()[0];
    let info = host
        .document(document)
        .expect("document");

    assert!(info.is_untitled());
    assert_eq!(info.language.as_deref(), Some("json"));
    assert_eq!(host.previews, 0);
    assert!(!output
        .cache()
        .get(document)
        .expect("entry")
        .delete_file());
}

#[test]
fn preview_needs_raw_bytes() {
    let mut host = FakeHost::new();
    let mut exchange = sample();
    if let Some(response) = exchange
        .response
        .as_mut()
    {
        response.raw_body = None;
    }

    let mut output = ResponseOutput::start(&mut host, Config::default());
    output
        .show(&mut host, exchange)
        .expect("show");

    let document = output
        .cache()
        .documents()[0];
    assert!(host
        .document(document)
        .expect("document")
        .is_untitled());
}

#[test]
fn mode_none_shows_nothing() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, with_mode(ResponseViewMode::None));

    output
        .show(&mut host, sample())
        .expect("show");

    assert!(host
        .documents
        .is_empty());
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn reuse_replaces_the_open_result_document() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, with_mode(ResponseViewMode::Reuse));

    output
        .show(&mut host, sample())
        .expect("first show");

    let mut second = sample();
    if let Some(response) = second
        .response
        .as_mut()
    {
        response.pretty_print_body = Some("{}".to_string());
    }
    output
        .show(&mut host, second)
        .expect("second show");

    assert_eq!(
        host.documents
            .len(),
        1
    );
    let document = output
        .cache()
        .documents()[0];
    assert_eq!(host.content_of(document), Some("{}"));
}

#[test]
fn reuse_ignores_scratch_documents_outside_the_cache() {
    let mut host = FakeHost::new();
    let scratch = host.open_scratch();
    let mut output = ResponseOutput::start(&mut host, with_mode(ResponseViewMode::Reuse));

    output
        .show(&mut host, sample())
        .expect("show");

    let document = output
        .cache()
        .documents()[0];
    assert_ne!(document, scratch);
    assert_eq!(host.content_of(scratch), None);
}

#[test]
fn reuse_skips_preview_files() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("preview");

    output.set_config(with_mode(ResponseViewMode::Reuse));
    output
        .show(&mut host, sample())
        .expect("reuse");

    let documents = output
        .cache()
        .documents();
    assert_eq!(documents.len(), 2);
    assert!(host
        .document(documents[1])
        .expect("document")
        .is_untitled());
}

struct Recording {
    name: &'static str,
    outcome: Outcome,
    calls: Rc<RefCell<Vec<&'static str>>>,
}

impl ResponseHandler for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(
        &self,
        _exchange: &Exchange,
        _visible: &[DocumentId],
        _host: &mut dyn Host,
        _config: &Config,
    ) -> Result<Outcome, HostError> {
        self.calls
            .borrow_mut()
            .push(self.name);
        Ok(self.outcome)
    }
}

#[test]
fn first_answer_wins() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let recording = |name: &'static str, outcome: Outcome| -> Box<dyn ResponseHandler> {
        Box::new(Recording {
            name,
            outcome,
            calls: Rc::clone(&calls),
        })
    };

    let chain = Chain::new(vec![
        recording("first", Outcome::Declined),
        recording("second", Outcome::Handled),
        recording("third", Outcome::Declined),
    ]);

    let mut host = FakeHost::new();
    let outcome = chain
        .dispatch(&sample(), &[], &mut host, &Config::default())
        .expect("dispatch");

    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(*calls.borrow(), vec!["first", "second"]);
}

#[test]
fn all_declining_is_a_decline() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let chain = Chain::new(vec![Box::new(Recording {
        name: "only",
        outcome: Outcome::Declined,
        calls: Rc::clone(&calls),
    })]);

    let mut host = FakeHost::new();
    let mut output = ResponseOutput::with_chain(&mut host, Config::default(), chain);
    output
        .show(&mut host, sample())
        .expect("show");

    assert_eq!(*calls.borrow(), vec!["only"]);
    assert!(output
        .cache()
        .is_empty());
    assert!(host
        .reveals
        .is_empty());
}
