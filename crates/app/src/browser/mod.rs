//! Browser abstraction and the lazily acquired browser session

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

use mtnav_common::{BrowserConfig, Result};

pub mod webdriver;

pub use webdriver::{WebDriverBrowser, WebDriverFactory};

/// How an element is located on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    /// WebDriver location strategy name
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css selector",
            Locator::XPath(_) => "xpath",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Css(value) | Locator::XPath(value) => value,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css:{}", selector),
            Locator::XPath(expression) => write!(f, "xpath:{}", expression),
        }
    }
}

/// A live browser the views drive.
///
/// Element lookups that find nothing fail with `Error::NoSuchElement`.
pub trait Browser {
    fn get(&self, url: &str) -> Result<()>;

    fn current_url(&self) -> Result<String>;

    fn is_displayed(&self, locator: &Locator) -> Result<bool>;

    /// Clear the element and type `text` into it
    fn fill(&self, locator: &Locator, text: &str) -> Result<()>;

    fn click(&self, locator: &Locator) -> Result<()>;

    /// End the session
    fn quit(&self) -> Result<()>;
}

/// Opens new browser sessions
pub trait BrowserFactory {
    fn open(&self, config: &BrowserConfig) -> Result<Rc<dyn Browser>>;
}

/// One browser per owner: opened on first use, cached, quit on release or drop
pub struct BrowserSession {
    factory: Box<dyn BrowserFactory>,
    config: BrowserConfig,
    start_url: String,
    current: RefCell<Option<Rc<dyn Browser>>>,
    // invalidated but still running; quit on release
    retired: RefCell<Vec<Rc<dyn Browser>>>,
}

impl BrowserSession {
    /// `start_url` is loaded right after a session opens
    pub fn new(
        factory: Box<dyn BrowserFactory>,
        config: BrowserConfig,
        start_url: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            config,
            start_url: start_url.into(),
            current: RefCell::new(None),
            retired: RefCell::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// The cached browser, opening one if there is none
    pub fn acquire(&self) -> Result<Rc<dyn Browser>> {
        if let Some(browser) = self.current.borrow().clone() {
            return Ok(browser);
        }

        info!(
            "Opening {} browser session at {}",
            self.config.capabilities.browser_name, self.config.url
        );
        let browser = self.factory.open(&self.config)?;
        browser.get(&self.start_url)?;
        *self.current.borrow_mut() = Some(Rc::clone(&browser));
        Ok(browser)
    }

    /// Stop handing out the cached browser; the next `acquire` opens a new one.
    ///
    /// The old session stays alive until `release`.
    pub fn invalidate(&self) -> bool {
        let browser = self.current.borrow_mut().take();
        match browser {
            Some(browser) => {
                debug!("Browser session invalidated");
                self.retired.borrow_mut().push(browser);
                true
            }
            None => false,
        }
    }

    /// Quit the cached browser and every invalidated one.
    ///
    /// All sessions are quit even if one fails; the first error is returned.
    pub fn release(&self) -> Result<()> {
        let mut browsers: Vec<Rc<dyn Browser>> = self.retired.borrow_mut().drain(..).collect();
        browsers.extend(self.current.borrow_mut().take());

        let mut first_error = None;
        for browser in browsers {
            info!("Closing browser session");
            if let Err(e) = browser.quit() {
                warn!("Failed to quit browser session: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close browser session: {}", e);
        }
    }
}
