use batch_ocr::{App, Config, FailedPage};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new(pages: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let images = root.path().join("images");
        std::fs::create_dir_all(&images).unwrap();
        for name in pages {
            std::fs::write(images.join(name), format!("bytes of {name}")).unwrap();
        }
        Self { root }
    }

    fn config(&self, server: &MockServer) -> Config {
        Config {
            base_url: format!("{}/", server.uri()),
            image_dir: self.root.path().join("images"),
            output_dir: self.root.path().join("results"),
            failed_dir: self.root.path().join("failed"),
            retry_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
            bootstrap_timeout: Duration::from_secs(1),
            ..Config::default()
        }
    }

    fn failed_dir(&self) -> std::path::PathBuf {
        self.root.path().join("failed")
    }
}

async fn mount_text(server: &MockServer, filename: &str, body: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/recognise"))
        .and(body_string_contains(format!("filename=\"{filename}\"")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_all_pages_succeed_in_order() {
    let server = MockServer::start().await;
    mount_text(&server, "page_1.png", r#"{"text": "alpha"}"#, 1).await;
    mount_text(&server, "page_2.png", r#"{"text": "beta"}"#, 1).await;
    mount_text(&server, "page_3.png", r#"{"text": "gamma"}"#, 1).await;

    // 文件名顺序与页码顺序不同
    let ws = Workspace::new(&["page_3.png", "page_1.png", "page_2.png"]);
    let config = ws.config(&server);

    let summary = App::initialize(config.clone()).await.unwrap().run().await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.output_path.as_deref(), Some(config.output_path().as_path()));

    let combined = std::fs::read_to_string(config.output_path()).unwrap();
    assert_eq!(
        combined,
        "=== Page 1 ===\nalpha\n\n=== Page 2 ===\nbeta\n\n=== Page 3 ===\ngamma\n\n"
    );
    assert!(dir_entries(&ws.failed_dir()).is_empty());
}

#[tokio::test]
async fn test_page_recovers_after_server_errors() {
    let server = MockServer::start().await;
    mount_text(&server, "page_1.png", r#"{"text": "one"}"#, 1).await;
    Mock::given(method("POST"))
        .and(body_string_contains("filename=\"page_2.png\""))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_text(&server, "page_2.png", r#"{"text": "ok"}"#, 1).await;

    let ws = Workspace::new(&["page_1.png", "page_2.png"]);
    let config = ws.config(&server);

    let summary = App::initialize(config.clone()).await.unwrap().run().await.unwrap();

    assert_eq!(summary.succeeded, 2);
    assert!(summary.failed.is_empty());
    let combined = std::fs::read_to_string(config.output_path()).unwrap();
    assert_eq!(combined, "=== Page 1 ===\none\n\n=== Page 2 ===\nok\n\n");
    assert!(dir_entries(&ws.failed_dir()).is_empty());
}

#[tokio::test]
async fn test_sentinel_page_is_quarantined() {
    let server = MockServer::start().await;
    mount_text(&server, "page_4.png", "<div id=\"result\">four</div>", 1).await;
    mount_text(&server, "page_5.png", r#"{"text": "Recognition failed"}"#, 3).await;

    let ws = Workspace::new(&["page_4.png", "page_5.png"]);
    let config = ws.config(&server);

    let summary = App::initialize(config.clone()).await.unwrap().run().await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(
        summary.failed,
        vec![FailedPage {
            page_number: 5,
            filename: "page_5.png".to_string()
        }]
    );

    let combined = std::fs::read_to_string(config.output_path()).unwrap();
    assert_eq!(combined, "=== Page 4 ===\nfour\n\n");
    assert!(!combined.contains("Page 5"));

    assert_eq!(dir_entries(&ws.failed_dir()), vec!["page_5.png"]);
    assert_eq!(
        std::fs::read(ws.failed_dir().join("page_5.png")).unwrap(),
        b"bytes of page_5.png"
    );
}

#[tokio::test]
async fn test_every_page_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(6)
        .mount(&server)
        .await;

    let ws = Workspace::new(&["page_1.png", "page_2.png"]);
    let config = ws.config(&server);

    let summary = App::initialize(config.clone()).await.unwrap().run().await.unwrap();

    assert!(summary.nothing_recognized());
    assert!(summary.output_path.is_none());
    assert!(!config.output_path().exists());
    assert_eq!(summary.failed.len(), 2);
    assert_eq!(dir_entries(&ws.failed_dir()), vec!["page_1.png", "page_2.png"]);
}

#[tokio::test]
async fn test_empty_input_directory() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ws = Workspace::new(&[]);
    let config = ws.config(&server);

    let summary = App::initialize(config.clone()).await.unwrap().run().await.unwrap();

    assert_eq!(summary.total, 0);
    assert!(summary.nothing_recognized());
    assert!(summary.output_path.is_none());
    assert!(!config.output_path().exists());
    assert!(dir_entries(&ws.failed_dir()).is_empty());
}

#[tokio::test]
async fn test_unreachable_service_does_not_abort() {
    let ws = Workspace::new(&["page_1.png"]);
    let config = Config {
        base_url: "http://127.0.0.1:9/".to_string(),
        image_dir: ws.root.path().join("images"),
        output_dir: ws.root.path().join("results"),
        failed_dir: ws.failed_dir(),
        retry_delay: Duration::ZERO,
        page_delay: Duration::ZERO,
        request_timeout: Duration::from_millis(500),
        bootstrap_timeout: Duration::from_millis(500),
        max_retries: 2,
        ..Config::default()
    };

    let summary = App::initialize(config).await.unwrap().run().await.unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert!(summary.output_path.is_none());
    assert_eq!(dir_entries(&ws.failed_dir()), vec!["page_1.png"]);
}

#[tokio::test]
async fn test_page_delay_follows_failed_pages() {
    let server = MockServer::start().await;
    for name in ["page_1.png", "page_2.png"] {
        Mock::given(method("POST"))
            .and(body_string_contains(format!("filename=\"{name}\"")))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;
    }

    let ws = Workspace::new(&["page_1.png", "page_2.png"]);
    let config = Config {
        page_delay: Duration::from_millis(100),
        max_retries: 3,
        ..ws.config(&server)
    };

    let app = App::initialize(config).await.unwrap();
    let started = std::time::Instant::now();
    let summary = app.run().await.unwrap();

    // 每页之后都等待，失败页也不例外
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(summary.failed.len(), 2);
    assert_eq!(dir_entries(&ws.failed_dir()), vec!["page_1.png", "page_2.png"]);
}
