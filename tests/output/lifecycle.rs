use response_view::config::{Config, ResponseViewMode};
use response_view::exchange::Exchange;
use response_view::host::{Host, HostEvent, Interest};
use response_view::output::ResponseOutput;

use crate::host::{sample, FakeHost};

fn reuse() -> Config {
    let mut config = Config::default();
    config
        .settings
        .response_view_mode = ResponseViewMode::Reuse;
    config
}

fn focus(output: &mut ResponseOutput, host: &mut FakeHost) {
    let document = output
        .cache()
        .documents()[0];
    let viewer = host
        .viewer_of(document)
        .expect("document is shown");
    host.active = Some(viewer);
    output.notify(host, HostEvent::ActiveViewerChanged { viewer, document });
}

fn close(output: &mut ResponseOutput, host: &mut FakeHost) {
    let document = output
        .cache()
        .documents()[0];
    output.notify(host, HostEvent::DocumentClosed(document));
}

#[test]
fn subscriptions_follow_start_and_shutdown() {
    let mut host = FakeHost::new();
    let output = ResponseOutput::start(&mut host, Config::default());

    assert_eq!(
        host.subscriptions
            .len(),
        4
    );
    assert!(host
        .subscriptions
        .iter()
        .any(|(_, interest)| *interest == Interest::DocumentClosed));
    assert!(host
        .subscriptions
        .iter()
        .any(|(_, interest)| *interest == Interest::ActiveViewerChanged));

    output.shutdown(&mut host);
    assert!(host
        .subscriptions
        .is_empty());
}

#[test]
fn incomplete_exchanges_are_ignored() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    let mut exchange = sample();
    exchange.request = None;
    output
        .show(&mut host, exchange)
        .expect("ignored, not an error");

    output
        .show(&mut host, Exchange::default())
        .expect("ignored, not an error");

    assert!(host
        .documents
        .is_empty());
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn one_entry_per_document() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, reuse());

    for code in [200, 404, 500] {
        let mut exchange = sample();
        if let Some(response) = exchange
            .response
            .as_mut()
        {
            response.status_code = code;
        }
        output
            .show(&mut host, exchange)
            .expect("show");
    }

    assert_eq!(
        output
            .cache()
            .len(),
        1
    );
    let document = output
        .cache()
        .documents()[0];
    let entry = output
        .cache()
        .get(document)
        .expect("entry");
    assert_eq!(
        entry
            .exchange
            .response
            .as_ref()
            .map(|response| response.status_code),
        Some(500)
    );
}

#[test]
fn separate_exchanges_get_separate_entries() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("first");
    output
        .show(&mut host, sample())
        .expect("second");

    assert_eq!(
        output
            .cache()
            .len(),
        2
    );
}

#[test]
fn background_document_formats_once_on_focus() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("show");

    let document = output
        .cache()
        .documents()[0];
    assert!(
        output
            .cache()
            .get(document)
            .expect("entry")
            .pretty_print_needed
    );
    assert!(host
        .formats
        .is_empty());
    assert_eq!(
        host.reveals
            .len(),
        1
    );

    focus(&mut output, &mut host);
    assert_eq!(
        host.formats
            .len(),
        1
    );
    assert!(
        !output
            .cache()
            .get(document)
            .expect("entry")
            .pretty_print_needed
    );

    focus(&mut output, &mut host);
    focus(&mut output, &mut host);
    assert_eq!(
        host.formats
            .len(),
        1
    );
    assert_eq!(
        host.reveals
            .len(),
        2
    );
}

#[test]
fn focused_document_formats_immediately() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, reuse());

    output
        .show(&mut host, sample())
        .expect("first show");
    focus(&mut output, &mut host);
    assert_eq!(
        host.formats
            .len(),
        1
    );

    output
        .show(&mut host, sample())
        .expect("second show");
    assert_eq!(
        host.formats
            .len(),
        2
    );

    let document = output
        .cache()
        .documents()[0];
    assert!(
        !output
            .cache()
            .get(document)
            .expect("entry")
            .pretty_print_needed
    );
}

#[test]
fn pretty_printing_disabled() {
    let mut host = FakeHost::new();
    let mut config = Config::default();
    config
        .settings
        .response_view_pretty_print = false;
    let mut output = ResponseOutput::start(&mut host, config);

    output
        .show(&mut host, sample())
        .expect("show");
    focus(&mut output, &mut host);

    assert!(host
        .formats
        .is_empty());
    assert_eq!(
        host.reveals
            .len(),
        1
    );
}

#[test]
fn indeterminate_format_counts_as_done() {
    let mut host = FakeHost::new();
    host.indeterminate_formats = true;
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("show");
    focus(&mut output, &mut host);
    focus(&mut output, &mut host);

    assert_eq!(
        host.formats
            .len(),
        1
    );
}

#[test]
fn failed_deferred_format_is_not_retried() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("show");

    host.fail_formats = true;
    focus(&mut output, &mut host);
    focus(&mut output, &mut host);

    assert_eq!(
        host.formats
            .len(),
        1
    );
    assert_eq!(
        host.reveals
            .len(),
        2
    );
    assert_eq!(
        output
            .cache()
            .len(),
        1
    );
}

#[test]
fn failed_display_leaves_cache_as_it_was() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, reuse());

    let first = sample();
    output
        .show(&mut host, first.clone())
        .expect("first show");

    let document = output
        .cache()
        .documents()[0];
    host.active = host.viewer_of(document);
    host.fail_formats = true;

    let mut second = sample();
    second.name = Some("second".to_string());
    assert!(output
        .show(&mut host, second)
        .is_err());

    let entry = output
        .cache()
        .get(document)
        .expect("entry survives");
    assert_eq!(entry.exchange, first);
    assert!(entry.pretty_print_needed);
}

#[test]
fn failed_first_display_creates_no_entry() {
    let mut host = FakeHost::new();
    host.focus_on_show = true;
    host.fail_formats = true;
    let mut config = Config::default();
    config
        .settings
        .response_view_mode = ResponseViewMode::Open;
    let mut output = ResponseOutput::start(&mut host, config);

    assert!(output
        .show(&mut host, sample())
        .is_err());
    assert_eq!(
        host.formats
            .len(),
        1
    );
    assert_eq!(
        host.reveals
            .len(),
        1
    );
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn closing_deletes_backing_file_once() {
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
        .map(|path| path.to_path_buf())
        .expect("preview file");
    assert!(path.exists());

    close(&mut output, &mut host);
    assert!(!path.exists());
    assert!(output
        .cache()
        .is_empty());

    output.notify(&mut host, HostEvent::DocumentClosed(document));
    assert_eq!(host.deletes, vec![path]);
}

#[test]
fn eviction_survives_failed_deletion() {
    let mut host = FakeHost::new();
    host.fail_deletes = true;
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output
        .show(&mut host, sample())
        .expect("show");
    close(&mut output, &mut host);

    assert_eq!(
        host.deletes
            .len(),
        1
    );
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn untitled_documents_are_never_deleted() {
    let mut host = FakeHost::new();
    let mut output = ResponseOutput::start(&mut host, reuse());

    output
        .show(&mut host, sample())
        .expect("show");
    close(&mut output, &mut host);

    assert!(host
        .deletes
        .is_empty());
    assert!(output
        .cache()
        .is_empty());
}

#[test]
fn events_for_unknown_documents_are_ignored() {
    let mut host = FakeHost::new();
    let scratch = host.open_scratch();
    let mut output = ResponseOutput::start(&mut host, Config::default());

    output.notify(&mut host, HostEvent::DocumentClosed(scratch));
    output.notify(
        &mut host,
        HostEvent::ActiveViewerChanged {
            viewer: response_view::host::ViewerId::new(99),
            document: scratch,
        },
    );

    assert!(host
        .deletes
        .is_empty());
    assert!(host
        .formats
        .is_empty());
}
