//! Scripted in-memory browser double and fixtures shared by the
//! integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use journal_core::{CancelToken, LocatorCandidate, Strategy};
use journal_engine::{
    BatchEvent, Browser, BatchSettings, DriverError, ElementHandle, ProgressSink,
};

pub const ENDPOINT: &str = "https://host.example/punch/Menu.jsp";
pub const FORM_URL: &str = "https://host.example/punch/PunchList_A.jsp";

pub const EL_ACCOUNT: &str = "el-account";
pub const EL_SECRET: &str = "el-secret";
pub const EL_LOGIN: &str = "el-login";
pub const EL_JOURNAL_LINK: &str = "el-journal-link";
pub const EL_DATE: &str = "el-date";
pub const EL_WORK: &str = "el-work";
pub const EL_CATEGORY: &str = "el-schno";
pub const EL_SEND: &str = "el-send";

/// One scripted page: its URL, rendered text, locatable elements, and
/// optionally nested sub-documents (one level deep).
#[derive(Debug, Clone, Default)]
pub struct PageSpec {
    pub url: String,
    pub text: String,
    elements: HashMap<(Strategy, String), String>,
    frames: Vec<PageSpec>,
    options: HashMap<String, Vec<String>>,
}

impl PageSpec {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn element(
        mut self,
        strategy: Strategy,
        selector: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        self.elements
            .insert((strategy, selector.into()), id.into());
        self
    }

    pub fn frame(mut self, page: PageSpec) -> Self {
        self.frames.push(page);
        self
    }

    pub fn options(mut self, element: impl Into<String>, values: &[&str]) -> Self {
        self.options.insert(
            element.into(),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    current: PageSpec,
    frame: Option<usize>,
    typed: Vec<(String, String)>,
    cleared: Vec<String>,
    clicked: Vec<String>,
    entered: Vec<String>,
    selected: Vec<(String, String)>,
    closed: bool,
}

/// Scripted [`Browser`] double. Clicks (and keyboard submits) can be
/// wired to replace the current page, so a test scripts the whole site
/// as a state machine.
#[derive(Default)]
pub struct MockBrowser {
    state: Mutex<MockState>,
    pages: HashMap<String, PageSpec>,
    on_click: Mutex<HashMap<String, VecDeque<PageSpec>>>,
    on_enter: HashMap<String, PageSpec>,
    inert: HashSet<String>,
}

impl MockBrowser {
    pub fn new(initial: PageSpec) -> Self {
        let browser = Self::default();
        browser.state.lock().unwrap().current = initial;
        browser
    }

    /// Registers a page reachable by direct navigation to its URL.
    pub fn register_page(&mut self, page: PageSpec) {
        self.pages.insert(page.url.clone(), page);
    }

    /// Queues a page transition for clicks on `element`. The last queued
    /// page is sticky: further clicks keep landing on it.
    pub fn on_click(&self, element: &str, page: PageSpec) {
        self.on_click
            .lock()
            .unwrap()
            .entry(element.to_string())
            .or_default()
            .push_back(page);
    }

    /// Wires a keyboard submit on `element` to a page transition.
    pub fn on_enter(&mut self, element: &str, page: PageSpec) {
        self.on_enter.insert(element.to_string(), page);
    }

    /// Marks an element as present but not interactable.
    pub fn mark_inert(&mut self, element: &str) {
        self.inert.insert(element.to_string());
    }

    pub fn typed(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn typed_into(&self, element: &str) -> Vec<String> {
        self.typed()
            .into_iter()
            .filter(|(el, _)| el == element)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.state.lock().unwrap().clicked.clone()
    }

    pub fn entered(&self) -> Vec<String> {
        self.state.lock().unwrap().entered.clone()
    }

    pub fn selections(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().selected.clone()
    }

    pub fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub fn in_frame(&self) -> bool {
        self.state.lock().unwrap().frame.is_some()
    }

    pub fn current_page_url(&self) -> String {
        self.state.lock().unwrap().current.url.clone()
    }

    fn transition(&self, state: &mut MockState, page: PageSpec) {
        state.current = page;
        state.frame = None;
    }
}

#[async_trait::async_trait]
impl Browser for MockBrowser {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        let page = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| PageSpec::new(url, "404 not found"));
        let mut state = self.state.lock().unwrap();
        self.transition(&mut state, page);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().current.url.clone())
    }

    async fn page_text(&self) -> Result<String, DriverError> {
        let state = self.state.lock().unwrap();
        let text = match state.frame {
            Some(index) => state.current.frames[index].text.clone(),
            None => state.current.text.clone(),
        };
        Ok(text)
    }

    async fn find(
        &self,
        candidate: &LocatorCandidate,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let state = self.state.lock().unwrap();
        let context = match state.frame {
            Some(index) => &state.current.frames[index],
            None => &state.current,
        };
        Ok(context
            .elements
            .get(&(candidate.strategy, candidate.selector.clone()))
            .cloned())
    }

    async fn find_all(
        &self,
        candidate: &LocatorCandidate,
    ) -> Result<Vec<ElementHandle>, DriverError> {
        Ok(self.find(candidate).await?.into_iter().collect())
    }

    async fn is_interactable(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        Ok(!self.inert.contains(element))
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.state.lock().unwrap().cleared.push(element.clone());
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.state
            .lock()
            .unwrap()
            .typed
            .push((element.clone(), text.to_string()));
        Ok(())
    }

    async fn press_enter(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.entered.push(element.clone());
        if let Some(page) = self.on_enter.get(element.as_str()).cloned() {
            self.transition(&mut state, page);
        }
        Ok(())
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.clicked.push(element.clone());
        let next = {
            let mut routes = self.on_click.lock().unwrap();
            routes.get_mut(element.as_str()).map(|queue| {
                if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().cloned().unwrap()
                }
            })
        };
        if let Some(page) = next {
            self.transition(&mut state, page);
        }
        Ok(())
    }

    async fn select_by_value(
        &self,
        element: &ElementHandle,
        value: &str,
    ) -> Result<bool, DriverError> {
        let mut state = self.state.lock().unwrap();
        let context = match state.frame {
            Some(index) => &state.current.frames[index],
            None => &state.current,
        };
        let offered = context
            .options
            .get(element.as_str())
            .is_some_and(|values| values.iter().any(|v| v == value));
        if offered {
            state.selected.push((element.clone(), value.to_string()));
        }
        Ok(offered)
    }

    async fn option_values(&self, element: &ElementHandle) -> Result<Vec<String>, DriverError> {
        let state = self.state.lock().unwrap();
        let context = match state.frame {
            Some(index) => &state.current.frames[index],
            None => &state.current,
        };
        Ok(context
            .options
            .get(element.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn frame_count(&self) -> Result<usize, DriverError> {
        Ok(self.state.lock().unwrap().current.frames.len())
    }

    async fn enter_frame(&self, index: usize) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if index >= state.current.frames.len() {
            return Err(DriverError::Protocol(format!("no frame at index {index}")));
        }
        state.frame = Some(index);
        Ok(())
    }

    async fn leave_frame(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().frame = None;
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// Event sink backed by a shared vector, optionally cancelling the run
/// after a fixed number of progress events.
#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<BatchEvent>>>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(progress_events: usize, token: CancelToken) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            cancel_after: Some((progress_events, token)),
        }
    }

    pub fn events(&self) -> Vec<BatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<journal_engine::BatchProgress> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BatchEvent::Progress(progress) => Some(progress),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: BatchEvent) {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        if let Some((after, token)) = &self.cancel_after {
            let seen = events
                .iter()
                .filter(|event| matches!(event, BatchEvent::Progress(_)))
                .count();
            if seen >= *after {
                token.cancel();
            }
        }
    }
}

/// Tight waits so the polling loops stay fast under test.
pub fn test_settings() -> BatchSettings {
    BatchSettings {
        resolve_timeout: Duration::from_millis(40),
        control_timeout: Duration::from_millis(15),
        poll_interval: Duration::from_millis(5),
        typing_pause: Duration::from_millis(1),
        page_settle: Duration::from_millis(1),
        nav_settle: Duration::from_millis(1),
        manual_window: Duration::from_millis(10),
    }
}

/// The site's login page with both credential fields and the login
/// button present.
pub fn login_page() -> PageSpec {
    PageSpec::new(ENDPOINT, "請輸入帳號密碼")
        .element(Strategy::Id, "txtLoginID", EL_ACCOUNT)
        .element(Strategy::Name, "txtLoginID", EL_ACCOUNT)
        .element(Strategy::Id, "txtLoginPWD", EL_SECRET)
        .element(Strategy::Name, "txtLoginPWD", EL_SECRET)
        .element(Strategy::Id, "button", EL_LOGIN)
}

/// The authenticated menu with a discoverable journal link.
pub fn menu_page() -> PageSpec {
    PageSpec::new(ENDPOINT, "歡迎 logout")
        .element(
            Strategy::XPath,
            "//a[contains(text(), '學習日誌')]",
            EL_JOURNAL_LINK,
        )
}

/// A fresh entry form with every field at the top level.
pub fn form_page() -> PageSpec {
    PageSpec::new(FORM_URL, "學習日誌 工作內容")
        .element(Strategy::Id, "date", EL_DATE)
        .element(Strategy::Id, "work", EL_WORK)
        .element(Strategy::Id, "schno", EL_CATEGORY)
        .element(Strategy::Id, "btnSent", EL_SEND)
        .options(EL_CATEGORY, &["A01", "B02"])
}

/// Post-submission page confirming the entry, with the journal link
/// available for re-navigation.
pub fn success_page() -> PageSpec {
    PageSpec::new(FORM_URL, "新增完成")
        .element(
            Strategy::XPath,
            "//a[contains(text(), '學習日誌')]",
            EL_JOURNAL_LINK,
        )
}

/// Post-submission page reporting a duplicate entry.
pub fn duplicate_page() -> PageSpec {
    PageSpec::new(FORM_URL, "該日期已存在")
        .element(
            Strategy::XPath,
            "//a[contains(text(), '學習日誌')]",
            EL_JOURNAL_LINK,
        )
}
