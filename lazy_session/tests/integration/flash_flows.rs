use std::sync::Arc;

use lazy_session::InMemorySaveHandler;
use serde_json::json;

use crate::common::MockBrowser;

/// Flash in request N, read once in request N+1
#[test]
fn test_flash_round_trip() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| session.flash("m", "hi"));

    browser.request(|session| {
        assert!(session.flash_has("m"));
        assert_eq!(session.flash_get("m", true), Some(json!("hi")));
        assert_eq!(
            session.flash_get_or("m", json!("gone"), true),
            json!("gone")
        );
    });

    browser.request(|session| {
        assert!(!session.flash_has("m"));
    });
}

/// Unconsumed flash data disappears after its one request anyway
#[test]
fn test_unread_flash_expires() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| session.flash("m", "hi"));
    browser.request(|session| session.set("visited", true));
    browser.request(|session| {
        assert_eq!(session.flash_get("m", true), None);
        assert_eq!(session.get("visited"), Some(json!(true)));
    });
}

/// Preserved in N+1 without reading, still available in N+2
#[test]
fn test_flash_preserve_across_redirect() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| session.flash("notice", "saved"));
    browser.request(|session| session.flash_preserve());
    browser.request(|session| {
        assert_eq!(session.flash_get("notice", true), Some(json!("saved")));
    });
    browser.request(|session| {
        assert_eq!(session.flash_get("notice", true), None);
    });
}

/// Non-consuming reads leave the value for later reads in the same request only
#[test]
fn test_flash_peek_within_request() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| {
        session.flash("a", 1);
        session.flash("b", 2);
    });

    browser.request(|session| {
        assert_eq!(session.flash_get("a", false), Some(json!(1)));
        assert_eq!(session.flash_get("a", false), Some(json!(1)));
        let all = session.flash_get_all(false);
        assert_eq!(all.len(), 2);
    });

    browser.request(|session| {
        assert!(session.flash_get_all(true).is_empty());
    });
}

/// Flashing the same key twice keeps only the last value, and explicit starts do not rotate
#[test]
fn test_rotation_idempotence() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| {
        session.flash("m", "one");
        assert!(session.start());
        session.flash("m", "two");
        assert!(session.start());
        assert_eq!(session.flash_get_all_next().len(), 1);
        assert_eq!(session.flash_get_next("m"), Some(json!("two")));
    });

    browser.request(|session| {
        assert_eq!(session.flash_get_all(true), {
            let mut expected = lazy_session::SessionBag::new();
            expected.insert("m".to_string(), json!("two"));
            expected
        });
    });
}

/// Each client sees only its own flash data
#[test]
fn test_flash_isolated_between_clients() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut alice = MockBrowser::new(&handler);
    let mut bob = MockBrowser::new(&handler);

    alice.request(|session| session.flash("m", "for alice"));
    bob.request(|session| session.flash("m", "for bob"));

    alice.request(|session| {
        assert_eq!(session.flash_get("m", true), Some(json!("for alice")));
    });
    bob.request(|session| {
        assert_eq!(session.flash_get("m", true), Some(json!("for bob")));
    });
    assert_ne!(alice.cookie(), bob.cookie());
    assert_eq!(handler.len(), 2);
}
