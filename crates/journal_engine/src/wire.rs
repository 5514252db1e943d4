//! W3C WebDriver wire adapter: binds the [`Browser`] capability to a
//! chromedriver-compatible HTTP endpoint via `reqwest`.

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::{json, Value};
use url::Url;

use journal_core::{LocatorCandidate, Strategy};

use crate::browser::{Browser, DriverError, ElementHandle};

/// W3C element identifier key in wire payloads.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// WebDriver key code for Enter.
const ENTER_KEY: char = '\u{E007}';

#[derive(Debug, Clone)]
pub struct WebDriverSettings {
    /// Address of the running WebDriver server.
    pub server_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub headless: bool,
    pub window_size: (u32, u32),
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9515".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            headless: false,
            window_size: (1280, 720),
        }
    }
}

/// One WebDriver session. Created against a running driver server;
/// unreachable or refused sessions surface as environment faults before
/// any date is processed.
#[derive(Debug)]
pub struct WebDriverBrowser {
    client: Client,
    session_url: String,
}

impl WebDriverBrowser {
    pub async fn create(settings: &WebDriverSettings) -> Result<Self, DriverError> {
        let mut base = Url::parse(&settings.server_url)
            .map_err(|err| DriverError::SessionNotCreated(format!("bad server url: {err}")))?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| DriverError::Protocol(err.to_string()))?;

        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            format!(
                "--window-size={},{}",
                settings.window_size.0, settings.window_size.1
            ),
        ];
        if settings.headless {
            args.push("--headless=new".to_string());
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let endpoint = base
            .join("session")
            .map_err(|err| DriverError::SessionNotCreated(err.to_string()))?;
        let response = client
            .post(endpoint.clone())
            .json(&capabilities)
            .send()
            .await
            .map_err(map_transport)?;
        let payload: Value = response
            .json()
            .await
            .map_err(|err| DriverError::Protocol(err.to_string()))?;

        let session_id = payload["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| DriverError::SessionNotCreated(payload.to_string()))?;

        Ok(Self {
            client,
            session_url: format!("{endpoint}/{session_id}"),
        })
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        let url = format!("{}{}", self.session_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        let mut payload: Value = response
            .json()
            .await
            .map_err(|err| DriverError::Protocol(err.to_string()))?;

        if !status.is_success() {
            let code = payload["value"]["error"].as_str().unwrap_or_default();
            if code == "no such element" {
                return Err(DriverError::NoSuchElement);
            }
            let message = payload["value"]["message"]
                .as_str()
                .unwrap_or(code)
                .to_string();
            return Err(DriverError::Protocol(format!("{status}: {message}")));
        }
        Ok(payload
            .get_mut("value")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let value = self
            .command(
                Method::GET,
                &format!("/element/{element}/attribute/{name}"),
                None,
            )
            .await?;
        Ok(value.as_str().map(ToString::to_string))
    }
}

#[async_trait::async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let value = self.command(Method::GET, "/url", None).await?;
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| DriverError::Protocol("url payload was not a string".into()))
    }

    async fn page_text(&self) -> Result<String, DriverError> {
        let value = self.command(Method::GET, "/source", None).await?;
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| DriverError::Protocol("source payload was not a string".into()))
    }

    async fn find(
        &self,
        candidate: &LocatorCandidate,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let (using, value) = wire_locator(candidate);
        match self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": using, "value": value })),
            )
            .await
        {
            Ok(payload) => Ok(extract_element(&payload)),
            Err(DriverError::NoSuchElement) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn find_all(
        &self,
        candidate: &LocatorCandidate,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        let (using, value) = wire_locator(candidate);
        let payload = self
            .command(
                Method::POST,
                "/elements",
                Some(json!({ "using": using, "value": value })),
            )
            .await?;
        let elements = payload
            .as_array()
            .map(|entries| entries.iter().filter_map(extract_element).collect())
            .unwrap_or_default();
        Ok(elements)
    }

    async fn is_interactable(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        let displayed = self
            .command(Method::GET, &format!("/element/{element}/displayed"), None)
            .await?;
        if !displayed.as_bool().unwrap_or(false) {
            return Ok(false);
        }
        let enabled = self
            .command(Method::GET, &format!("/element/{element}/enabled"), None)
            .await?;
        Ok(enabled.as_bool().unwrap_or(false))
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.command(
            Method::POST,
            &format!("/element/{element}/clear"),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.command(
            Method::POST,
            &format!("/element/{element}/value"),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    async fn press_enter(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.type_text(element, &ENTER_KEY.to_string()).await
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.command(
            Method::POST,
            &format!("/element/{element}/click"),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    async fn select_by_value(
        &self,
        element: &ElementHandle,
        value: &str,
    ) -> Result<bool, DriverError> {
        let selector = format!("option[value='{}']", escape_css_value(value));
        match self
            .command(
                Method::POST,
                &format!("/element/{element}/element"),
                Some(json!({ "using": "css selector", "value": selector })),
            )
            .await
        {
            Ok(payload) => match extract_element(&payload) {
                Some(option) => {
                    self.click(&option).await?;
                    Ok(true)
                }
                None => Ok(false),
            },
            Err(DriverError::NoSuchElement) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn option_values(&self, element: &ElementHandle) -> Result<Vec<String>, DriverError> {
        let payload = self
            .command(
                Method::POST,
                &format!("/element/{element}/elements"),
                Some(json!({ "using": "tag name", "value": "option" })),
            )
            .await?;
        let options: Vec<ElementHandle> = payload
            .as_array()
            .map(|entries| entries.iter().filter_map(extract_element).collect())
            .unwrap_or_default();
        let mut values = Vec::with_capacity(options.len());
        for option in options {
            if let Some(value) = self.attribute(&option, "value").await? {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn enter_frame(&self, index: usize) -> Result<(), DriverError> {
        self.command(Method::POST, "/frame", Some(json!({ "id": index })))
            .await?;
        Ok(())
    }

    async fn leave_frame(&self) -> Result<(), DriverError> {
        self.command(Method::POST, "/frame", Some(json!({ "id": null })))
            .await?;
        Ok(())
    }

    async fn describe_inputs(&self) -> Result<Vec<String>, DriverError> {
        let mut described = Vec::new();
        for tag in ["input", "button"] {
            let elements = self
                .find_all(&LocatorCandidate::new(Strategy::Tag, tag))
                .await?;
            for element in elements {
                let id = self.attribute(&element, "id").await?.unwrap_or_default();
                let name = self.attribute(&element, "name").await?.unwrap_or_default();
                let kind = self.attribute(&element, "type").await?.unwrap_or_default();
                described.push(format!("{tag} id:{id} name:{name} type:{kind}"));
            }
        }
        Ok(described)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.command(Method::DELETE, "", None).await?;
        Ok(())
    }
}

fn map_transport(err: reqwest::Error) -> DriverError {
    if err.is_connect() || err.is_timeout() {
        DriverError::Unreachable(err.to_string())
    } else {
        DriverError::Protocol(err.to_string())
    }
}

fn extract_element(payload: &Value) -> Option<ElementHandle> {
    payload[ELEMENT_KEY].as_str().map(ToString::to_string)
}

fn escape_css_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Maps a locator candidate to its W3C `using`/`value` pair. Id and
/// name strategies ride on attribute CSS selectors, matching how
/// conventional clients encode them on the wire.
fn wire_locator(candidate: &LocatorCandidate) -> (&'static str, String) {
    match candidate.strategy {
        Strategy::Id => (
            "css selector",
            format!("[id='{}']", escape_css_value(&candidate.selector)),
        ),
        Strategy::Name => (
            "css selector",
            format!("[name='{}']", escape_css_value(&candidate.selector)),
        ),
        Strategy::Css => ("css selector", candidate.selector.clone()),
        Strategy::Tag => ("tag name", candidate.selector.clone()),
        Strategy::XPath => ("xpath", candidate.selector.clone()),
    }
}
