use journal_core::{MarkerClassifier, OutcomeClassifier, PageVerdict};

#[test]
fn submission_page_with_success_text_is_positive() {
    let classifier = MarkerClassifier::submission();
    assert_eq!(
        classifier.classify("<html><body>新增完成</body></html>"),
        PageVerdict::Positive
    );
    assert_eq!(classifier.classify("operation success"), PageVerdict::Positive);
}

#[test]
fn submission_page_with_rejection_text_is_negative() {
    let classifier = MarkerClassifier::submission();
    assert_eq!(classifier.classify("該日期已存在"), PageVerdict::Negative);
    assert_eq!(classifier.classify("server error 500"), PageVerdict::Negative);
}

#[test]
fn positive_marker_wins_over_negative() {
    // Some page variants echo both; the site's confirmation marker takes
    // precedence.
    let classifier = MarkerClassifier::submission();
    assert_eq!(
        classifier.classify("儲存成功 (0 錯誤)"),
        PageVerdict::Positive
    );
}

#[test]
fn page_without_markers_is_unrecognized() {
    let classifier = MarkerClassifier::submission();
    assert_eq!(
        classifier.classify("<html><body>學習日誌</body></html>"),
        PageVerdict::Unrecognized
    );
}

#[test]
fn login_classifier_accepts_account_echo() {
    let classifier = MarkerClassifier::login("s1234567");
    assert_eq!(
        classifier.classify("welcome back s1234567"),
        PageVerdict::Positive
    );
    assert_eq!(classifier.classify("Main Menu"), PageVerdict::Positive);
    assert_eq!(
        classifier.classify("請輸入帳號密碼"),
        PageVerdict::Unrecognized
    );
}
