//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use quiz_mvc::app::{AppRequest, AppResponse};
use quiz_mvc::http::{rewrite_request, RewriteOutcome};
use quiz_mvc::lifecycle::Shutdown;
use quiz_mvc::quiz::TestsController;
use quiz_mvc::{AppConfig, Application, ControllerRegistry, HttpServer};

pub const TESTS_CONTROLLER: &str = r#"<?php declare(strict_types = 1);

class TestsController extends Controller
{
    protected $default_back_url = 'tests/';

    public function __construct()
    {
        parent::__construct();
    }

    public function index(): array { return []; }

    public function questions(string $test_id, string $question_idx): array { return []; }

    public function results(): array { return []; }

    public function errors(): array { return []; }

    private function getUserData(): array { return []; }
}
"#;

/// A temporary application tree: `app/controllers` and `app/views/Tests`.
pub struct AppFixture {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl AppFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let controllers = dir.path().join("app/controllers");
        let views = dir.path().join("app/views/Tests");
        fs::create_dir_all(&controllers).unwrap();
        fs::create_dir_all(&views).unwrap();

        fs::write(controllers.join("TestsController.php"), TESTS_CONTROLLER).unwrap();
        write_view(&views, "index", "<h1>{{ page_title }}</h1><p>{{ error }}</p><select>{{- tests }}</select>");
        write_view(&views, "questions", "<h1>{{ page_title }}</h1><h2>{{ question }}</h2><p>{{ progress }}</p>{{- answers }}");
        write_view(&views, "results", "<p>{{ user }}: {{ score }} / {{ total }}</p>");
        write_view(&views, "errors", "<p>{{ message }}</p>");

        let mut config = AppConfig::default();
        config.paths.controller_dir = controllers;
        config.paths.view_dir = dir.path().join("app/views");
        config.server.bind_address = "127.0.0.1:0".into();

        Self { dir, config }
    }

    pub fn with_mount(mut self, mount: &str) -> Self {
        self.config.routing.mount_path = mount.into();
        self
    }

    pub fn controller_dir(&self) -> &Path {
        &self.config.paths.controller_dir
    }

    pub fn add_controller(&self, file: &str, source: &str) {
        fs::write(self.controller_dir().join(file), source).unwrap();
    }

    pub fn add_view(&self, controller: &str, action: &str, body: &str) {
        let dir = self.config.paths.view_dir.join(controller);
        fs::create_dir_all(&dir).unwrap();
        write_view(&dir, action, body);
    }

    pub fn application(&self) -> Application {
        Application::from_config(&self.config, registry())
    }
}

fn write_view(dir: &Path, action: &str, body: &str) {
    fs::write(dir.join(format!("{action}.php")), body).unwrap();
}

pub fn registry() -> ControllerRegistry {
    ControllerRegistry::new().with(TestsController::sample())
}

/// The rewritten query a browser following `location` would produce.
pub fn rewritten_for(mount: &str, location: &str) -> Option<String> {
    match rewrite_request(mount, &location.parse().unwrap()) {
        RewriteOutcome::Rewritten(query) => Some(query),
        RewriteOutcome::EntryPoint => None,
        RewriteOutcome::Outside => panic!("{location} is outside {mount}"),
    }
}

/// Inputs carried by the query string of `location`.
pub fn query_inputs(location: &str) -> Vec<(String, String)> {
    location
        .split_once('?')
        .map(|(_, q)| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

pub fn expect_html(response: Result<AppResponse, quiz_mvc::app::AppError>) -> String {
    match response {
        Ok(AppResponse::Html(body)) => body,
        other => panic!("expected HTML, got {other:?}"),
    }
}

pub fn expect_redirect(response: Result<AppResponse, quiz_mvc::app::AppError>) -> String {
    match response {
        Ok(AppResponse::Redirect(location)) => location,
        other => panic!("expected redirect, got {other:?}"),
    }
}

pub fn post(rewritten: Option<String>, inputs: &[(&str, &str)]) -> AppRequest {
    let mut request = AppRequest::get(None);
    request.method = axum::http::Method::POST;
    request.rewritten = rewritten;
    request
        .inputs
        .extend(inputs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    request
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

pub async fn start_server(fixture: &AppFixture) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Arc::new(fixture.application());
    let shutdown = Shutdown::new();
    let server = HttpServer::new(fixture.config.clone(), app);
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, rx).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
