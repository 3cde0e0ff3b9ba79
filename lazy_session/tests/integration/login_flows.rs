use std::sync::Arc;

use lazy_session::InMemorySaveHandler;
use serde_json::json;

use crate::common::{MockBrowser, mock_browser::Session};

/// Mirrors the demo login handler: validate the form token, then log the user in
fn login(session: &mut Session, csrf_token: &str, username: &str, password: &str) -> bool {
    if !session.validate_csrf_token(csrf_token) {
        session.flash("message", "The access token is not valid.");
        return false;
    }
    let level = match (username, password) {
        ("demo", "demo") => 1,
        ("admin", "admin") => 2,
        _ => {
            session.flash("message", "No user and password found");
            return false;
        }
    };
    assert!(session.regenerate_id(true));
    session.set("logged-in", true);
    session.set("username", username);
    session.set("user_level", level);
    session.flash("message", "You have logged in");
    true
}

#[test]
fn test_login_and_logout_flow() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    // Home page renders the form with a token
    let token = browser.request(|session| session.csrf_token().unwrap());
    let anonymous_cookie = browser.cookie().map(str::to_string);
    assert!(anonymous_cookie.is_some());

    // Posting the form logs in and moves the session to a new id
    assert!(browser.request(|session| login(session, &token, "admin", "admin")));
    assert_ne!(browser.cookie().map(str::to_string), anonymous_cookie);

    // Home page shows the message once and the logged-in state
    browser.request(|session| {
        assert_eq!(
            session.flash_get("message", true),
            Some(json!("You have logged in"))
        );
        assert_eq!(session.get("logged-in"), Some(json!(true)));
        assert_eq!(session.get("user_level"), Some(json!(2)));
    });

    // Logout clears everything immediately and leaves a message for the next page
    browser.request(|session| {
        session.clear();
        assert!(session.get_all().is_empty());
        session.flash("message", "You have logged out");
    });

    browser.request(|session| {
        assert_eq!(session.get("logged-in"), None);
        assert_eq!(
            session.flash_get("message", true),
            Some(json!("You have logged out"))
        );
        // The old token went away with the rest of the session
        assert!(!session.validate_csrf_token(&token));
    });
}

#[test]
fn test_old_session_id_is_dead_after_login() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    let token = browser.request(|session| session.csrf_token().unwrap());
    let anonymous_cookie = browser.cookie().map(str::to_string);
    assert!(browser.request(|session| login(session, &token, "demo", "demo")));

    // An attacker replaying the pre-login cookie gets nothing
    let mut attacker = MockBrowser::new(&handler);
    attacker.set_cookie(anonymous_cookie);
    attacker.request(|session| {
        assert_eq!(session.get("logged-in"), None);
    });
}

#[test]
fn test_forged_csrf_token_is_rejected() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| session.csrf_token().unwrap());
    assert!(!browser.request(|session| login(session, "forged", "admin", "admin")));

    browser.request(|session| {
        assert_eq!(session.get("logged-in"), None);
        assert_eq!(
            session.flash_get("message", true),
            Some(json!("The access token is not valid."))
        );
    });
}

#[test]
fn test_token_from_another_session_is_rejected() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut victim = MockBrowser::new(&handler);
    let mut attacker = MockBrowser::new(&handler);

    let attacker_token = attacker.request(|session| session.csrf_token().unwrap());
    victim.request(|session| session.csrf_token().unwrap());

    assert!(!victim.request(|session| login(session, &attacker_token, "demo", "demo")));
}

#[test]
fn test_post_without_prior_page_has_no_token() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    assert!(!browser.request(|session| login(session, "", "demo", "demo")));
}

#[test]
fn test_destroy_drops_cookie_and_data() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::new(&handler);

    browser.request(|session| session.set("username", "demo"));
    browser.request(|session| {
        assert!(session.destroy());
        // Still readable for the rest of this request
        assert_eq!(session.get("username"), Some(json!("demo")));
    });

    assert_eq!(browser.cookie(), None);
    assert!(handler.is_empty());
    browser.request(|session| {
        assert_eq!(session.get("username"), None);
    });
}

#[test]
fn test_strict_mode_ignores_unknown_cookie() {
    let handler = Arc::new(InMemorySaveHandler::new());
    let mut browser = MockBrowser::strict(&handler);
    browser.set_cookie(Some("fixated-session-id".to_string()));

    browser.request(|session| session.set("k", 1));

    assert_ne!(browser.cookie(), Some("fixated-session-id"));
}
