//! In-memory browser standing in for a WebDriver session
//!
//! The fake models a tiny application: the start page shows the login form,
//! submitting it with the expected credentials lands on the home page, and
//! `a#dashboard` leads from there to a dashboard.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use mtnav_app::{BaseLoggedInView, Browser, BrowserFactory, Locator, LoginPage};
use mtnav_common::{ApplicationConfig, BrowserConfig, Error, NavigationConfig, Result};
use tracing_subscriber::EnvFilter;

pub const HOSTNAME: &str = "mt.example.com";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

pub const DASHBOARD_LINK: &str = "a#dashboard";
pub const DASHBOARD_TITLE: &str = "h1#dashboard";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration pointing at the fake, with short waits
pub fn config() -> ApplicationConfig {
    ApplicationConfig {
        hostname: Some(HOSTNAME.to_string()),
        username: Some(USERNAME.to_string()),
        password: Some(PASSWORD.to_string()),
        navigation: NavigationConfig {
            tries: 3,
            wait_timeout_ms: 50,
            wait_delay_ms: 5,
        },
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeState {
    pub page: RefCell<String>,
    pub fields: RefCell<HashMap<String, String>>,
    pub events: RefCell<Vec<String>>,
    pub opened: Cell<usize>,
    pub quit: Cell<usize>,
    /// Clicks that fail before one goes through
    pub failing_clicks: Cell<usize>,
}

impl FakeState {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn page(&self) -> String {
        self.page.borrow().clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn clicks(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.starts_with("click "))
            .count()
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields
            .borrow()
            .get(LoginPage::field(name).value())
            .cloned()
    }
}

pub struct FakeBrowser {
    state: Rc<FakeState>,
}

impl Browser for FakeBrowser {
    fn get(&self, url: &str) -> Result<()> {
        self.state.record(format!("get {url}"));
        *self.state.page.borrow_mut() = "login".to_string();
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(format!("https://{}/{}", HOSTNAME, self.state.page()))
    }

    fn is_displayed(&self, locator: &Locator) -> Result<bool> {
        let page = self.state.page();
        match locator.value() {
            LoginPage::FORM => Ok(page == "login"),
            BaseLoggedInView::USER_MENU => Ok(page == "home" || page == "dashboard"),
            DASHBOARD_TITLE => Ok(page == "dashboard"),
            _ => Err(Error::NoSuchElement(locator.to_string())),
        }
    }

    fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        if self.state.page() != "login" {
            return Err(Error::NoSuchElement(locator.to_string()));
        }
        self.state.record(format!("fill {} {}", locator.value(), text));
        self.state
            .fields
            .borrow_mut()
            .insert(locator.value().to_string(), text.to_string());
        Ok(())
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        self.state.record(format!("click {}", locator.value()));

        let failing = self.state.failing_clicks.get();
        if failing > 0 {
            self.state.failing_clicks.set(failing - 1);
            return Err(Error::WebDriver {
                error: "element click intercepted".to_string(),
                message: locator.to_string(),
            });
        }

        let page = self.state.page();
        match locator.value() {
            LoginPage::SUBMIT if page == "login" => {
                if self.state.field("username").as_deref() == Some(USERNAME)
                    && self.state.field("password").as_deref() == Some(PASSWORD)
                {
                    *self.state.page.borrow_mut() = "home".to_string();
                }
                Ok(())
            }
            DASHBOARD_LINK if page == "home" || page == "dashboard" => {
                *self.state.page.borrow_mut() = "dashboard".to_string();
                Ok(())
            }
            _ => Err(Error::NoSuchElement(locator.to_string())),
        }
    }

    fn quit(&self) -> Result<()> {
        self.state.quit.set(self.state.quit.get() + 1);
        Ok(())
    }
}

pub struct FakeFactory {
    state: Rc<FakeState>,
}

impl FakeFactory {
    pub fn new(state: &Rc<FakeState>) -> Box<Self> {
        Box::new(Self {
            state: Rc::clone(state),
        })
    }
}

impl BrowserFactory for FakeFactory {
    fn open(&self, _config: &BrowserConfig) -> Result<Rc<dyn Browser>> {
        self.state.opened.set(self.state.opened.get() + 1);
        self.state.fields.borrow_mut().clear();
        Ok(Rc::new(FakeBrowser {
            state: Rc::clone(&self.state),
        }))
    }
}
