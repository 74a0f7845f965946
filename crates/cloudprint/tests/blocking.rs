mod common;

use cloudprint::{blocking, ErrorKind};
use common::StubServer;

/// The stub needs a runtime of its own; the blocking service brings another.
fn start_stub() -> (tokio::runtime::Runtime, StubServer) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let server = runtime.block_on(StubServer::start());
    (runtime, server)
}

#[test]
fn test_blocking_service_round_trip() {
    let (_runtime, server) = start_stub();
    server.respond_verb(
        "search",
        200,
        r#"{"success":true,"printers":[{"id":"p1","name":"Printer One"}]}"#,
    );
    server.respond_verb("submit", 200, r#"{"success":true,"job":{"id":"job-7"}}"#);
    let dir = tempfile::tempdir().unwrap();

    let service = blocking::CloudPrintService::from_config(&server.json_key_config(dir.path())).unwrap();

    let printers = service.search();
    assert_eq!(printers.payload().unwrap().printers[0].id, "p1");

    let job = service.print_url("p1", "Report", "https://example.com/doc.pdf");
    assert_eq!(job.payload().and_then(|r| r.job.as_ref()).map(|j| j.id.as_str()), Some("job-7"));

    assert_eq!(server.token_requests(), 1);
}

#[test]
fn test_blocking_service_surfaces_remote_error() {
    let (_runtime, server) = start_stub();
    server.respond_verb("unshare", 403, "Forbidden: not the printer owner");
    let dir = tempfile::tempdir().unwrap();

    let service = blocking::CloudPrintService::from_config(&server.json_key_config(dir.path())).unwrap();
    let result = service.unshare("p1", "friend@example.com");

    assert_eq!(result.kind(), Some(ErrorKind::Remote));
    assert_eq!(result.message().as_deref(), Some("Forbidden: not the printer owner"));
}
