/// Verdict produced by scanning rendered page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    /// A positive marker was found.
    Positive,
    /// A negative marker was found (and no positive one).
    Negative,
    /// Neither marker set matched.
    Unrecognized,
}

/// Maps page text to a tagged verdict.
///
/// The target system exposes no machine-readable result for login or
/// submission; the only oracle is the rendered text. Keeping the
/// heuristic behind this trait makes it testable on synthetic pages and
/// replaceable if the site ever grows a structured response.
pub trait OutcomeClassifier: Send + Sync {
    fn classify(&self, page_text: &str) -> PageVerdict;
}

/// Classifier over ordered sets of positive and negative marker strings.
/// Positive markers win over negative ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerClassifier {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl MarkerClassifier {
    pub fn new(
        positive: impl IntoIterator<Item = impl Into<String>>,
        negative: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            positive: positive.into_iter().map(Into::into).collect(),
            negative: negative.into_iter().map(Into::into).collect(),
        }
    }

    /// Markers indicating an authenticated page: a logout affordance,
    /// the account echoed back, or the post-login menu.
    pub fn login(account: &str) -> Self {
        Self::new(["登出", "logout", account, "Menu"], Vec::<String>::new())
    }

    /// Markers classifying the page after an entry submission.
    pub fn submission() -> Self {
        Self::new(
            ["成功", "完成", "新增完成", "儲存成功", "success"],
            ["錯誤", "失敗", "重複", "已存在", "error"],
        )
    }

    pub fn positive_markers(&self) -> &[String] {
        &self.positive
    }

    pub fn negative_markers(&self) -> &[String] {
        &self.negative
    }
}

impl OutcomeClassifier for MarkerClassifier {
    fn classify(&self, page_text: &str) -> PageVerdict {
        if self.positive.iter().any(|m| page_text.contains(m.as_str())) {
            PageVerdict::Positive
        } else if self.negative.iter().any(|m| page_text.contains(m.as_str())) {
            PageVerdict::Negative
        } else {
            PageVerdict::Unrecognized
        }
    }
}
