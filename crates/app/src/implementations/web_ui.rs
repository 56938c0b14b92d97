//! Driving the application through its web UI

use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

use mtnav_common::{wait_for, BrowserConfig, Error, NavigationConfig, Result, WaitOptions};
use mtnav_navigate::{
    NavArgs, Navigable, Navigate, NavigateBuilder, NavigateStep, Prerequisite, StepContext, View,
};

use super::{Implementation, ImplementationKind};
use crate::application::ApplicationInfo;
use crate::browser::{Browser, BrowserFactory, BrowserSession};
use crate::views::{BaseLoggedInView, LoginPage, ViewContext, WebView};

pub const LOGIN_SCREEN: &str = "LoginScreen";
pub const LOGGED_IN: &str = "LoggedIn";

/// Anything navigated through the web UI
pub trait WebTarget: Navigable {
    fn web_ui(&self) -> &ViaWebUi;
}

pub type DynWebTarget = dyn WebTarget;

/// The web UI implementation: one lazily opened browser per instance
pub struct ViaWebUi {
    owner: Arc<ApplicationInfo>,
    navigator: Arc<Navigate<DynWebTarget>>,
    session: BrowserSession,
    navigation: NavigationConfig,
}

impl ViaWebUi {
    pub fn new(
        owner: Arc<ApplicationInfo>,
        navigator: Arc<Navigate<DynWebTarget>>,
        factory: Box<dyn BrowserFactory>,
        browser: BrowserConfig,
        navigation: NavigationConfig,
    ) -> Self {
        let session = BrowserSession::new(factory, browser, owner.address());
        Self {
            owner,
            navigator,
            session,
            navigation,
        }
    }

    /// The live browser, opened and pointed at the application on first use
    pub fn browser(&self) -> Result<Rc<dyn Browser>> {
        self.session.acquire()
    }

    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    /// Instantiate a view bound to the live browser
    pub fn create_view<V: WebView>(&self, context: ViewContext) -> Result<V> {
        Ok(V::new(self.browser()?, context))
    }

    /// Retire the cached browser; the next use opens a fresh session
    pub fn reset_cache(&self) {
        self.session.invalidate();
    }

    pub fn open_login_page(&self) -> Result<()> {
        let address = self.owner.address();
        debug!("Opening login page at {}", address);
        self.browser()?.get(&address)
    }

    pub fn wait_options(&self) -> WaitOptions {
        self.navigation.wait_options()
    }
}

impl Implementation for ViaWebUi {
    type Target = DynWebTarget;

    const KIND: ImplementationKind = ImplementationKind::WebUi;

    fn owner(&self) -> &ApplicationInfo {
        &self.owner
    }

    fn navigator(&self) -> &Navigate<DynWebTarget> {
        &self.navigator
    }

    fn tries(&self) -> usize {
        self.navigation.tries
    }

    /// Fill the login form with the owner's credentials and submit it.
    ///
    /// Waiting for the result is up to the caller.
    fn do_login(&self) -> Result<()> {
        let credentials = self.owner.credentials().ok_or_else(|| {
            Error::Configuration(format!(
                "no credentials configured for {}",
                self.owner.hostname()
            ))
        })?;

        let view = self
            .navigate_to(self, LOGIN_SCREEN, &NavArgs::new())?
            .ok_or_else(|| Error::Configuration(format!("{} has no view", LOGIN_SCREEN)))?;
        let page = view.downcast_ref::<LoginPage>().ok_or_else(|| {
            Error::Configuration(format!("{} did not land on the login page", LOGIN_SCREEN))
        })?;

        info!("Logging in to {} as {}", self.owner.hostname(), credentials.username);
        page.fill([
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])?;
        page.login_button().click()
    }
}

impl Navigable for ViaWebUi {
    fn nav_name(&self) -> String {
        ImplementationKind::WebUi.name().to_string()
    }
}

impl WebTarget for ViaWebUi {
    fn web_ui(&self) -> &ViaWebUi {
        self
    }
}

fn web_view<V: WebView>(target: &DynWebTarget) -> Option<Result<Box<dyn View>>> {
    let view = target
        .web_ui()
        .create_view::<V>(ViewContext::for_object(target))
        .map(|view| Box::new(view) as Box<dyn View>);
    Some(view)
}

/// The login form
pub struct LoginScreen;

impl NavigateStep<DynWebTarget> for LoginScreen {
    fn create_view(&self, target: &DynWebTarget) -> Option<Result<Box<dyn View>>> {
        web_view::<LoginPage>(target)
    }

    fn step(&self, cx: &mut StepContext<'_, DynWebTarget>) -> Result<()> {
        cx.target().web_ui().open_login_page()
    }
}

/// Any logged in page
pub struct LoggedIn;

impl NavigateStep<DynWebTarget> for LoggedIn {
    fn prerequisite(&self) -> Option<Prerequisite<DynWebTarget>> {
        Some(Prerequisite::sibling(LOGIN_SCREEN))
    }

    fn create_view(&self, target: &DynWebTarget) -> Option<Result<Box<dyn View>>> {
        web_view::<BaseLoggedInView>(target)
    }

    fn step(&self, cx: &mut StepContext<'_, DynWebTarget>) -> Result<()> {
        let web_ui = cx.target().web_ui();
        web_ui.do_login()?;
        wait_for("logged in view", web_ui.wait_options(), || {
            cx.view()?.is_displayed()
        })
    }
}

/// Register the destinations every web UI provides
pub fn register_destinations(builder: &mut NavigateBuilder<DynWebTarget>) -> Result<()> {
    builder
        .register(LOGIN_SCREEN, || LoginScreen)?
        .register(LOGGED_IN, || LoggedIn)?;
    Ok(())
}
