//! End-to-end dispatch tests against a temporary application tree.

use std::fs;
use std::sync::Arc;

use quiz_mvc::app::{AppError, AppRequest};
use quiz_mvc::routing::{RouteTable, Router, RouterSettings, RoutingError};

mod common;
use common::{expect_html, expect_redirect, post, query_inputs, rewritten_for, AppFixture};

fn get(location: &str) -> AppRequest {
    let mut request = AppRequest::get(rewritten_for("/", location).as_deref());
    request.inputs.extend(query_inputs(location));
    request
}

#[test]
fn test_bare_entry_point_renders_default_action() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    let body = expect_html(app.handle(&AppRequest::get(None)));
    assert!(body.contains("<h1>Choose a test</h1>"));
    assert!(body.contains("<option value=\"1\">Rust basics</option>"));
}

#[test]
fn test_too_few_arguments_is_an_arity_mismatch() {
    let fixture = AppFixture::new();

    // Resolution itself succeeds; the route only fails once arguments bind.
    let table = Arc::new(
        RouteTable::build(&fixture.config.paths.controller_dir, "php").unwrap(),
    );
    let settings = RouterSettings::from_config(&fixture.config);
    let router = Router::resolve(table, &settings, Some("url=tests/questions/2")).unwrap();
    assert_eq!(router.controller_name(), "Tests");
    assert_eq!(router.action(), "questions");
    assert_eq!(router.args(), ["2"]);

    let err = fixture
        .application()
        .handle(&AppRequest::get(Some("url=tests/questions/2")))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Routing(RoutingError::ArityMismatch { required: 2, given: 1, .. })
    ));
    assert_eq!(err.status_code().as_u16(), 404);
}

#[test]
fn test_full_quiz_walkthrough() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    let location = expect_redirect(app.handle(&post(None, &[("username", "Ann Lee"), ("test_id", "1")])));
    assert_eq!(location, "/tests/questions/1/1?user=Ann+Lee&score=0");

    let body = expect_html(app.handle(&get(&location)));
    assert!(body.contains("Which keyword declares an immutable binding?"));
    assert!(body.contains("1 / 3"));

    let mut location = location;
    for (answer, expected) in [
        ("1", "/tests/questions/1/2?user=Ann+Lee&score=1"),
        ("0", "/tests/questions/1/3?user=Ann+Lee&score=1"),
        ("1", "/tests/results/?test_id=1&user=Ann+Lee&score=2"),
    ] {
        let mut request = get(&location);
        request.method = axum::http::Method::POST;
        request.inputs.insert("answer".into(), answer.into());
        location = expect_redirect(app.handle(&request));
        assert_eq!(location, expected);
    }

    let body = expect_html(app.handle(&get(&location)));
    assert_eq!(body, "<p>Ann Lee: 2 / 3</p>");
}

#[test]
fn test_index_validation_errors_render_in_place() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    let body = expect_html(app.handle(&post(None, &[("username", "  "), ("test_id", "1")])));
    assert!(body.contains("User name cannot be empty"));

    let body = expect_html(app.handle(&post(None, &[("username", "Ann"), ("test_id", "42")])));
    assert!(body.contains("Test does not exist"));
}

#[test]
fn test_unknown_test_redirects_home() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    let location = expect_redirect(app.handle(&AppRequest::get(Some("url=tests/questions/9/1"))));
    assert_eq!(location, "/tests/index/");

    let location = expect_redirect(app.handle(&AppRequest::get(Some("url=tests/questions/1/0"))));
    assert_eq!(location, "/tests/index/");
}

#[test]
fn test_invalid_answer_stays_on_question() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    let request = post(Some("url=tests/questions/2/1".into()), &[("answer", "7")]);
    let body = expect_html(app.handle(&request));
    assert!(body.contains("Which status means See Other?"));
}

#[test]
fn test_links_carry_the_mount_path() {
    let fixture = AppFixture::new().with_mount("/quiz/");
    let app = fixture.application();

    let location = expect_redirect(app.handle(&post(None, &[("username", "Bo"), ("test_id", "2")])));
    assert_eq!(location, "/quiz/tests/questions/2/1?user=Bo&score=0");
}

#[test]
fn test_routing_misses() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    let err = app.handle(&AppRequest::get(Some("url=users/list"))).unwrap_err();
    assert!(matches!(&err, AppError::Routing(RoutingError::UnknownController(name)) if name == "UsersController"));
    assert_eq!(err.status_code().as_u16(), 404);

    let err = app.handle(&AppRequest::get(Some("url=tests/getuserdata"))).unwrap_err();
    assert!(matches!(err, AppError::Routing(RoutingError::UnknownAction { .. })));

    let err = app.handle(&AppRequest::get(Some("tests/index"))).unwrap_err();
    assert_eq!(err.status_code().as_u16(), 400);
}

#[test]
fn test_missing_view_is_a_server_error() {
    let fixture = AppFixture::new();
    fs::remove_file(fixture.config.paths.view_dir.join("Tests/errors.php")).unwrap();

    let err = fixture
        .application()
        .handle(&AppRequest::get(Some("url=tests/errors")))
        .unwrap_err();
    assert!(matches!(err, AppError::Routing(RoutingError::ViewNotFound { .. })));
    assert_eq!(err.status_code().as_u16(), 500);
}

#[test]
fn test_missing_view_root_is_a_configuration_error() {
    let mut fixture = AppFixture::new();
    fixture.config.paths.view_dir = fixture.dir.path().join("app/templates");
    let app = fixture.application();

    assert!(matches!(app.warm_up(), Err(RoutingError::Configuration { .. })));

    let err = app.handle(&AppRequest::get(None)).unwrap_err();
    assert!(matches!(err, AppError::Routing(RoutingError::Configuration { .. })));
    assert_eq!(err.kind(), "configuration");
    assert_eq!(err.status_code().as_u16(), 500);
}

#[test]
fn test_controller_without_implementation() {
    let fixture = AppFixture::new();
    fixture.add_controller(
        "UsersController.php",
        "<?php class UsersController { public function show($id) {} }",
    );
    fixture.add_view("Users", "show", "<p>user</p>");
    let app = fixture.application();

    assert_eq!(app.warm_up().unwrap(), vec!["UsersController"]);

    let err = app.handle(&AppRequest::get(Some("url=users/show/1"))).unwrap_err();
    assert!(matches!(&err, AppError::ControllerNotRegistered(name) if name == "UsersController"));
    assert_eq!(err.status_code().as_u16(), 500);
}

#[test]
fn test_schema_mismatch_fails_every_request() {
    let fixture = AppFixture::new();
    fixture.add_controller("AdminController.php", "<?php class Admin {}");
    let app = fixture.application();

    assert!(matches!(app.warm_up(), Err(RoutingError::SchemaMismatch { .. })));
    let err = app.handle(&AppRequest::get(None)).unwrap_err();
    assert_eq!(err.kind(), "schema_mismatch");
    assert_eq!(err.status_code().as_u16(), 500);
}

#[test]
fn test_uncached_table_sees_new_controllers() {
    let mut fixture = AppFixture::new();
    fixture.config.routing.cache_route_table = false;
    let app = fixture.application();

    assert!(app.handle(&AppRequest::get(Some("url=users/show/1"))).is_err());
    fixture.add_controller(
        "UsersController.php",
        "<?php class UsersController { public function show($id) {} }",
    );
    fixture.add_view("Users", "show", "<p>user</p>");

    let err = app.handle(&AppRequest::get(Some("url=users/show/1"))).unwrap_err();
    assert!(matches!(err, AppError::ControllerNotRegistered(_)));
    assert!(!app.cache().is_warm());
}

#[test]
fn test_cached_table_is_built_once() {
    let fixture = AppFixture::new();
    let app = fixture.application();

    expect_html(app.handle(&AppRequest::get(None)));
    assert!(app.cache().is_warm());

    fixture.add_controller("Broken.php", "<?php class NotBroken {}");
    expect_html(app.handle(&AppRequest::get(None)));
}
