//! Locator candidate tables for the target site.
//!
//! The site's field identifiers are not guaranteed stable across
//! deployments, so every target field is declared as an ordered fallback
//! list: most specific first (an explicit element id), most generic last
//! (tag name, attribute heuristics). The engine's resolver consumes the
//! lists in order; tests can enumerate them directly.

/// How a single candidate locates an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Element id attribute.
    Id,
    /// Element name attribute.
    Name,
    /// CSS selector (attribute heuristics).
    Css,
    /// Bare tag name.
    Tag,
    /// XPath expression.
    XPath,
}

/// One named strategy plus selector used to find a page element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatorCandidate {
    pub strategy: Strategy,
    pub selector: String,
}

impl LocatorCandidate {
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }
}

fn candidates(list: &[(Strategy, &str)]) -> Vec<LocatorCandidate> {
    list.iter()
        .map(|(strategy, selector)| LocatorCandidate::new(*strategy, *selector))
        .collect()
}

/// Login page: account identifier field.
pub fn login_account_candidates() -> Vec<LocatorCandidate> {
    candidates(&[(Strategy::Id, "txtLoginID"), (Strategy::Name, "txtLoginID")])
}

/// Login page: secret field.
pub fn login_secret_candidates() -> Vec<LocatorCandidate> {
    candidates(&[(Strategy::Id, "txtLoginPWD"), (Strategy::Name, "txtLoginPWD")])
}

/// Login page: submit control. When none of these resolve, the session
/// controller falls back to a keyboard submit on the secret field.
pub fn login_submit_candidates() -> Vec<LocatorCandidate> {
    candidates(&[
        (Strategy::Id, "button"),
        (Strategy::Css, "input[value='登入']"),
    ])
}

/// In-page links whose text or href points at the journal feature.
pub fn journal_link_candidates() -> Vec<LocatorCandidate> {
    candidates(&[
        (Strategy::XPath, "//a[contains(text(), '學習日誌')]"),
        (Strategy::XPath, "//a[contains(text(), '日誌')]"),
        (Strategy::XPath, "//a[contains(@href, 'PunchList_A')]"),
        (Strategy::XPath, "//li//a[contains(text(), '學習日誌')]"),
        (Strategy::XPath, "//ul//a[contains(text(), '學習日誌')]"),
        (Strategy::XPath, "//div//a[contains(text(), '學習日誌')]"),
    ])
}

/// Entry form: date field. The placeholder heuristic matches the site's
/// domestic-era input hint.
pub fn date_field_candidates() -> Vec<LocatorCandidate> {
    candidates(&[
        (Strategy::Id, "date"),
        (Strategy::Name, "date"),
        (Strategy::Css, "input[placeholder*='民國yyymmdd']"),
    ])
}

/// Entry form: free-text content field. The last candidate matches the
/// site's own markup typo (`required='ture'`) verbatim.
pub fn content_field_candidates() -> Vec<LocatorCandidate> {
    candidates(&[
        (Strategy::Id, "work"),
        (Strategy::Name, "work"),
        (Strategy::Css, "input[required='ture']"),
    ])
}

/// Entry form: category selector (a list-valued control).
pub fn category_candidates() -> Vec<LocatorCandidate> {
    candidates(&[
        (Strategy::Id, "schno"),
        (Strategy::Name, "schno"),
        (Strategy::Tag, "select"),
    ])
}

/// Entry form: submit control.
pub fn entry_submit_candidates() -> Vec<LocatorCandidate> {
    candidates(&[
        (Strategy::Id, "btnSent"),
        (Strategy::Name, "btnSent"),
        (Strategy::Css, "input[value*='新增']"),
        (Strategy::Css, "input[onclick*='add']"),
    ])
}

/// Substring of the journal page URL used to verify navigation.
pub const JOURNAL_URL_MARKER: &str = "PunchList_A";

/// Page-text markers identifying the journal entry form.
pub fn journal_page_markers() -> Vec<String> {
    ["學習日誌", "工作內容", "date", "work"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Path suffixes substituted onto the session root when no link is
/// discoverable, tried in order.
pub fn journal_path_suffixes() -> Vec<String> {
    [
        "punch/PunchList_A.jsp",
        "PunchList_A.jsp",
        "punch/journal.jsp",
        "journal.jsp",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
