use crate::app::create_app;
use crate::config::AppConfig;
use crate::state::AppState;
use linktabs_protocol::Document;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TEST_ADMIN_PASSWORD: &str = "abc";

/// A server on an ephemeral port, backed by its own temporary directory for
/// the document and asset files.
pub struct TestApp {
    addr: SocketAddr,
    dir: TempDir,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_secret(Some(TEST_ADMIN_PASSWORD)).await
    }

    pub async fn with_secret(secret: Option<&str>) -> Self {
        Self::with_setup(secret, |_| {}).await
    }

    /// `setup` runs against the data directory before the server starts.
    pub async fn with_setup(secret: Option<&str>, setup: impl FnOnce(&Path)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        setup(dir.path());

        let mut config = AppConfig::default();
        config.storage.data_file = dir.path().join("links.json");
        config.storage.asset_root = dir.path().to_path_buf();

        let state = Arc::new(
            AppState::new(config, secret.map(str::to_string)).expect("Failed to create app state"),
        );
        let app = create_app(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to run test server");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            dir,
            client,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// A fresh client with its own cookie jar, i.e. a separate browser session.
    pub fn new_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client")
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("links.json")
    }

    pub fn write_document(&self, document: &Document) {
        let json = serde_json::to_string_pretty(document).expect("Failed to serialize document");
        std::fs::write(self.data_file(), json).expect("Failed to write document");
    }

    pub fn read_document(&self) -> Document {
        let json = std::fs::read_to_string(self.data_file()).expect("Failed to read document");
        serde_json::from_str(&json).expect("Failed to parse document")
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(path, contents).expect("Failed to write file");
    }

    pub async fn get_page(&self) -> String {
        self.get_page_with(&self.client, "/").await
    }

    pub async fn get_page_with(&self, client: &reqwest::Client, path: &str) -> String {
        client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to fetch page")
            .text()
            .await
            .expect("Failed to read page")
    }

    /// POST a form and return the response status.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::StatusCode {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to post form")
            .status()
    }

    /// POST an already encoded form body, as a browser submits the admin panel.
    pub async fn post_body(&self, path: &str, body: String) -> reqwest::StatusCode {
        self.client
            .post(self.url(path))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .expect("Failed to post form")
            .status()
    }

    pub async fn login(&self, password: &str) -> reqwest::StatusCode {
        self.post_form("/auth/login", &[("password", password)]).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
