//! Views the built-in destinations land on

use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

use mtnav_common::Result;
use mtnav_navigate::{NavArgs, Navigable, View};

use crate::browser::{Browser, Locator};

/// Extra information handed to a view when it is created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewContext {
    /// Name of the object the view is about
    pub object: Option<String>,
    pub extra: NavArgs,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_object<T: Navigable + ?Sized>(target: &T) -> Self {
        Self {
            object: Some(target.nav_name()),
            extra: NavArgs::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

/// A view bound to a live browser
pub trait WebView: View + Sized {
    fn new(browser: Rc<dyn Browser>, context: ViewContext) -> Self;
}

/// A clickable control
pub struct Button {
    browser: Rc<dyn Browser>,
    locator: Locator,
}

impl Button {
    pub fn new(browser: Rc<dyn Browser>, locator: Locator) -> Self {
        Self { browser, locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn click(&self) -> Result<()> {
        self.browser.click(&self.locator)
    }

    pub fn is_displayed(&self) -> Result<bool> {
        self.browser.is_displayed(&self.locator)
    }
}

/// The application's login form
pub struct LoginPage {
    browser: Rc<dyn Browser>,
    context: ViewContext,
}

impl LoginPage {
    pub const FORM: &'static str = "form#login-form";
    pub const SUBMIT: &'static str = "form#login-form button[type='submit']";

    /// Locator of a named input of the form
    pub fn field(name: &str) -> Locator {
        Locator::css(format!("{} input[name='{}']", Self::FORM, name))
    }

    /// Fill named inputs, in order
    pub fn fill<'v, I>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'v str, &'v str)>,
    {
        for (name, value) in values {
            self.browser.fill(&Self::field(name), value)?;
        }
        Ok(())
    }

    pub fn login_button(&self) -> Button {
        Button::new(Rc::clone(&self.browser), Locator::css(Self::SUBMIT))
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }
}

impl WebView for LoginPage {
    fn new(browser: Rc<dyn Browser>, context: ViewContext) -> Self {
        Self { browser, context }
    }
}

impl View for LoginPage {
    fn is_displayed(&self) -> Result<bool> {
        self.browser.is_displayed(&Locator::css(Self::FORM))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Any page shown once a user is logged in
pub struct BaseLoggedInView {
    browser: Rc<dyn Browser>,
    context: ViewContext,
}

impl BaseLoggedInView {
    pub const USER_MENU: &'static str = "#user-menu";

    pub fn user_menu(&self) -> Button {
        Button::new(Rc::clone(&self.browser), Locator::css(Self::USER_MENU))
    }

    pub fn current_url(&self) -> Result<String> {
        self.browser.current_url()
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }
}

impl WebView for BaseLoggedInView {
    fn new(browser: Rc<dyn Browser>, context: ViewContext) -> Self {
        Self { browser, context }
    }
}

impl View for BaseLoggedInView {
    fn is_displayed(&self) -> Result<bool> {
        self.browser.is_displayed(&Locator::css(Self::USER_MENU))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
