//! W3C WebDriver client over blocking HTTP

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

use mtnav_common::{BrowserConfig, Error, Result};

use super::{Browser, BrowserFactory, Locator};

/// Key under which WebDriver returns element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Opens sessions against the remote WebDriver endpoint named in the config
pub struct WebDriverFactory {
    client: Client,
}

impl WebDriverFactory {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client })
    }
}

impl BrowserFactory for WebDriverFactory {
    fn open(&self, config: &BrowserConfig) -> Result<Rc<dyn Browser>> {
        let browser = WebDriverBrowser::start(self.client.clone(), config)?;
        Ok(Rc::new(browser))
    }
}

/// A remote WebDriver session
pub struct WebDriverBrowser {
    client: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverBrowser {
    /// Create a new session
    pub fn start(client: Client, config: &BrowserConfig) -> Result<Self> {
        let base_url = config.url.trim_end_matches('/').to_string();
        let value = send(
            client
                .post(format!("{}/session", base_url))
                .json(&new_session_payload(config)),
        )?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::WebDriver {
                error: "session not created".to_string(),
                message: format!("no sessionId in response: {}", value),
            })?
            .to_string();

        info!("WebDriver session {} started at {}", session_id, base_url);
        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn endpoint(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/session/{}", self.base_url, self.session_id)
        } else {
            format!("{}/session/{}/{}", self.base_url, self.session_id, path)
        }
    }

    fn find(&self, locator: &Locator) -> Result<String> {
        let response = send(self.client.post(self.endpoint("element")).json(&json!({
            "using": locator.strategy(),
            "value": locator.value(),
        })));

        match response {
            Ok(value) => element_id(&value),
            Err(Error::NoSuchElement(_)) => Err(Error::NoSuchElement(locator.to_string())),
            Err(e) => Err(e),
        }
    }

    fn element_endpoint(&self, element: &str, action: &str) -> String {
        self.endpoint(&format!("element/{}/{}", element, action))
    }
}

impl Browser for WebDriverBrowser {
    fn get(&self, url: &str) -> Result<()> {
        debug!("Navigating browser to {}", url);
        send(self.client.post(self.endpoint("url")).json(&json!({ "url": url })))?;
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        let value = send(self.client.get(self.endpoint("url")))?;
        value.as_str().map(str::to_string).ok_or_else(|| Error::WebDriver {
            error: "unexpected response".to_string(),
            message: format!("current url is not a string: {}", value),
        })
    }

    fn is_displayed(&self, locator: &Locator) -> Result<bool> {
        let element = self.find(locator)?;
        let value = send(self.client.get(self.element_endpoint(&element, "displayed")))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find(locator)?;
        send(
            self.client
                .post(self.element_endpoint(&element, "clear"))
                .json(&json!({})),
        )?;
        send(
            self.client
                .post(self.element_endpoint(&element, "value"))
                .json(&json!({ "text": text })),
        )?;
        Ok(())
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.find(locator)?;
        debug!("Clicking {}", locator);
        send(
            self.client
                .post(self.element_endpoint(&element, "click"))
                .json(&json!({})),
        )?;
        Ok(())
    }

    fn quit(&self) -> Result<()> {
        info!("Deleting WebDriver session {}", self.session_id);
        send(self.client.delete(self.endpoint("")))?;
        Ok(())
    }
}

/// Body of a new-session request: W3C capabilities plus the legacy
/// `desiredCapabilities` block that carries `marionette`
fn new_session_payload(config: &BrowserConfig) -> Value {
    let caps = &config.capabilities;
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": caps.browser_name,
                "acceptInsecureCerts": caps.accept_insecure_certs,
            }
        },
        "desiredCapabilities": {
            "browserName": caps.browser_name,
            "acceptInsecureCerts": caps.accept_insecure_certs,
            "marionette": caps.marionette,
        }
    })
}

fn send(request: RequestBuilder) -> Result<Value> {
    let response = request.send()?;
    let status = response.status().as_u16();
    let body: Value = response.json()?;
    parse_response(status, body)
}

/// Unwrap the `value` member of a WebDriver response, mapping protocol errors
fn parse_response(status: u16, body: Value) -> Result<Value> {
    let value = match body {
        Value::Object(mut map) => map.remove("value").unwrap_or(Value::Null),
        other => other,
    };

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(match error {
            "no such element" => Error::NoSuchElement(message),
            _ => Error::WebDriver {
                error: error.to_string(),
                message,
            },
        });
    }

    if !(200..300).contains(&status) {
        return Err(Error::WebDriver {
            error: format!("HTTP {}", status),
            message: value.to_string(),
        });
    }

    Ok(value)
}

fn element_id(value: &Value) -> Result<String> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::WebDriver {
            error: "unexpected response".to_string(),
            message: format!("no element reference in {}", value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtnav_common::{Capabilities, ErrorKind};

    #[test]
    fn test_new_session_payload_defaults() {
        let payload = new_session_payload(&BrowserConfig::default());

        assert_eq!(payload["capabilities"]["alwaysMatch"]["browserName"], "firefox");
        assert_eq!(payload["capabilities"]["alwaysMatch"]["acceptInsecureCerts"], true);
        assert_eq!(payload["desiredCapabilities"]["marionette"], true);
    }

    #[test]
    fn test_new_session_payload_custom_browser() {
        let config = BrowserConfig {
            capabilities: Capabilities {
                browser_name: "chrome".to_string(),
                accept_insecure_certs: false,
                marionette: false,
            },
            ..Default::default()
        };
        let payload = new_session_payload(&config);

        assert_eq!(payload["capabilities"]["alwaysMatch"]["browserName"], "chrome");
        assert_eq!(payload["desiredCapabilities"]["acceptInsecureCerts"], false);
    }

    #[test]
    fn test_parse_response_unwraps_value() {
        let value = parse_response(200, json!({ "value": { "sessionId": "abc" } })).unwrap();
        assert_eq!(value["sessionId"], "abc");
    }

    #[test]
    fn test_parse_response_null_value() {
        assert_eq!(parse_response(200, json!({ "value": null })).unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_response_no_such_element() {
        let err = parse_response(
            404,
            json!({ "value": { "error": "no such element", "message": "Unable to locate #menu" } }),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Presence);
        assert!(err.to_string().contains("#menu"));
    }

    #[test]
    fn test_parse_response_other_protocol_error() {
        let err = parse_response(
            500,
            json!({ "value": { "error": "invalid session id", "message": "gone" } }),
        )
        .unwrap_err();

        match err {
            Error::WebDriver { error, message } => {
                assert_eq!(error, "invalid session id");
                assert_eq!(message, "gone");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_response_bad_status_without_error_body() {
        let err = parse_response(502, json!({ "value": "bad gateway" })).unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_element_id() {
        let value = json!({ ELEMENT_KEY: "el-1" });
        assert_eq!(element_id(&value).unwrap(), "el-1");
        assert!(element_id(&json!({})).is_err());
    }
}
