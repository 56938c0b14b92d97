//! Application wiring: browser session lifecycle, method dispatch and collections

mod support;

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::json;

use mtnav_app::{
    Application, ApplicationInfo, EntityCollection, ImplementationKind, MethodOutput, Registry,
    RegistryBuilder, LOGGED_IN,
};
use mtnav_common::ErrorKind;
use mtnav_navigate::NavArgs;

use support::{FakeFactory, FakeState};

fn application(state: &Rc<FakeState>, registry: Registry) -> Application {
    support::init_tracing();
    Application::with_browser_factory(&support::config(), Arc::new(registry), FakeFactory::new(state))
        .unwrap()
}

#[test]
fn address_and_attributes_come_from_config() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    assert_eq!(app.address(), "https://mt.example.com/");
    assert_eq!(app.hostname(), "mt.example.com");
    assert_eq!(app.path(), "");
    assert_eq!(app.info().username(), Some("admin"));
}

#[test]
fn browser_opens_lazily_and_once() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());
    assert_eq!(state.opened.get(), 0);
    assert!(!app.web_ui().session().is_open());

    app.web_ui().browser().unwrap();
    app.web_ui().browser().unwrap();

    assert_eq!(state.opened.get(), 1);
    assert_eq!(state.events(), vec!["get https://mt.example.com/"]);
}

#[test]
fn reset_cache_reopens_on_next_use() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    app.navigate_to(ImplementationKind::WebUi, LOGGED_IN, &NavArgs::new())
        .unwrap();
    app.web_ui().reset_cache();
    assert!(!app.web_ui().session().is_open());
    assert_eq!(state.quit.get(), 0);

    app.web_ui().browser().unwrap();
    assert_eq!(state.opened.get(), 2);

    drop(app);
    assert_eq!(state.quit.get(), 2);
}

#[test]
fn release_quits_invalidated_sessions_too() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    app.web_ui().browser().unwrap();
    app.web_ui().reset_cache();
    app.web_ui().browser().unwrap();
    app.web_ui().reset_cache();

    app.web_ui().session().release().unwrap();
    assert_eq!(state.opened.get(), 2);
    assert_eq!(state.quit.get(), 2);

    drop(app);
    assert_eq!(state.quit.get(), 2);
}

#[test]
fn dropping_application_quits_browser() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());
    app.web_ui().browser().unwrap();

    drop(app);
    assert_eq!(state.quit.get(), 1);
}

#[test]
fn dropping_unused_application_quits_nothing() {
    let state = FakeState::new();
    drop(application(&state, Registry::standard().unwrap()));
    assert_eq!(state.quit.get(), 0);
}

#[test]
fn release_quits_and_forgets_browser() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());
    app.web_ui().browser().unwrap();

    app.web_ui().session().release().unwrap();
    assert_eq!(state.quit.get(), 1);
    assert!(!app.web_ui().session().is_open());

    drop(app);
    assert_eq!(state.quit.get(), 1);
}

#[test]
fn destinations_per_implementation() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    let destinations = app.destinations();
    assert_eq!(
        destinations.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["ViaRESTAPI", "ViaWebUI"]
    );
    assert_eq!(destinations["ViaWebUI"], vec!["LoggedIn", "LoginScreen"]);
    assert!(destinations["ViaRESTAPI"].is_empty());
}

#[test]
fn context_resolves_implementations_by_name() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    assert_eq!(app.via("ViaWebUI").unwrap().kind(), ImplementationKind::WebUi);
    assert_eq!(app.via("ViaRESTAPI").unwrap().kind(), ImplementationKind::RestApi);
    let err = app.via("Unknown").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn call_dispatches_to_web_ui() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    let output = app.call("do_login", &NavArgs::new()).unwrap();
    assert!(matches!(output, MethodOutput::None));
    assert_eq!(state.page(), "home");
    assert_eq!(state.clicks(), 1);
}

#[test]
fn call_unknown_method_is_lookup_error() {
    let state = FakeState::new();
    let app = application(&state, Registry::standard().unwrap());

    let err = app.call("reboot", &NavArgs::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn call_passes_arguments_to_custom_method() {
    let state = FakeState::new();
    let mut builder = RegistryBuilder::new();
    builder
        .with_standard()
        .unwrap()
        .web_method("whoami", |web_ui, args| {
            let owner = mtnav_app::Implementation::owner(web_ui);
            Ok(MethodOutput::Json(json!({
                "user": owner.username(),
                "greeting": args.get_str("greeting"),
            })))
        });
    let app = application(&state, builder.build());

    let args = NavArgs::new().with("greeting", "hello");
    match app.call("whoami", &args).unwrap() {
        MethodOutput::Json(value) => {
            assert_eq!(value, json!({ "user": "admin", "greeting": "hello" }));
        }
        other => panic!("unexpected output: {other:?}"),
    }
    assert_eq!(state.opened.get(), 0);
}

#[test]
fn later_method_registration_wins() {
    let state = FakeState::new();
    let mut builder = RegistryBuilder::new();
    builder
        .web_method("login", |_, _| Ok(MethodOutput::Json(json!("web"))))
        .rest_method("login", |_, _| Ok(MethodOutput::Json(json!("rest"))));
    let app = application(&state, builder.build());

    match app.call("login", &NavArgs::new()).unwrap() {
        MethodOutput::Json(value) => assert_eq!(value, json!("rest")),
        other => panic!("unexpected output: {other:?}"),
    }
}

struct Users {
    address: String,
}

impl EntityCollection for Users {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn collections_are_discovered_from_registry() {
    let state = FakeState::new();
    let mut builder = RegistryBuilder::new();
    builder.collection("users", |info: &Arc<ApplicationInfo>| Users {
        address: info.address(),
    });
    let app = application(&state, builder.build());

    assert_eq!(app.collections().names(), vec!["users"]);
    let users = app.collections().get_as::<Users>("users").unwrap();
    assert_eq!(users.address, "https://mt.example.com/");
    assert!(app.collections().get("vms").is_err());
}

#[test]
fn missing_hostname_is_configuration_error() {
    let state = FakeState::new();
    let mut config = support::config();
    config.hostname = None;

    let err = Application::with_browser_factory(
        &config,
        Arc::new(Registry::standard().unwrap()),
        FakeFactory::new(&state),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
