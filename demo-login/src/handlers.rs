use askama::Template;
use axum::{
    Form,
    http::StatusCode,
    response::{Html, Redirect},
};
use lazy_session::{LazySession, MemorySessionStore};
use serde::Deserialize;
use serde_json::Value;

use crate::session::Session;

const MESSAGE_KEY: &str = "message";
const MESSAGE_COLOR_KEY: &str = "message-bgcolor";

#[derive(Clone, Copy)]
enum Tone {
    Error,
    Success,
    Info,
}

impl Tone {
    fn color(self) -> &'static str {
        match self {
            Tone::Error => "#990a22",
            Tone::Success => "#0a6d19",
            Tone::Info => "#216baf",
        }
    }
}

struct Banner {
    message: String,
    color: String,
}

#[derive(Template)]
#[template(path = "index.j2", escape = "html")]
struct IndexTemplate<'a> {
    banner: Option<Banner>,
    username: Option<&'a str>,
    user_level: i64,
    csrf_token: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(rename = "csrfToken", default)]
    csrf_token: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

fn flash_message(session: &mut LazySession<MemorySessionStore>, message: &str, tone: Tone) {
    session.flash(MESSAGE_KEY, message);
    session.flash(MESSAGE_COLOR_KEY, tone.color());
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("{}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub(crate) async fn index(session: Session) -> Result<Html<String>, (StatusCode, String)> {
    let mut session = session.lock().await;

    let banner = if session.flash_has(MESSAGE_KEY) {
        let message = session.flash_get(MESSAGE_KEY, true);
        let color = session.flash_get(MESSAGE_COLOR_KEY, true);
        Some(Banner {
            message: message
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            color: color
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or(Tone::Info.color())
                .to_string(),
        })
    } else {
        None
    };

    let logged_in = session.get("logged-in") == Some(Value::Bool(true));
    let username = if logged_in {
        session.get_as::<String>("username").map_err(internal_error)?
    } else {
        None
    };
    let user_level = session
        .get_as::<i64>("user_level")
        .map_err(internal_error)?
        .unwrap_or_default();
    let csrf_token = if username.is_none() {
        session.csrf_token().map_err(internal_error)?
    } else {
        String::new()
    };

    let template = IndexTemplate {
        banner,
        username: username.as_deref(),
        user_level,
        csrf_token: &csrf_token,
    };
    let html = Html(template.render().map_err(internal_error)?);
    Ok(html)
}

pub(crate) async fn login(
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let mut session = session.lock().await;

    if !session.validate_csrf_token(&form.csrf_token) {
        tracing::warn!("Rejected login with an invalid CSRF token");
        flash_message(
            &mut session,
            "The access token is not valid. Are you attempting something?",
            Tone::Error,
        );
        return Ok(Redirect::to("/"));
    }

    let (level, message) = match (form.username.as_str(), form.password.as_str()) {
        ("demo", "demo") => (1, "You have logged in as a normal user"),
        ("admin", "admin") => (2, "You have logged in as an administrator"),
        _ => {
            tracing::info!("Login failed for {:?}", form.username);
            flash_message(&mut session, "No user and password found", Tone::Error);
            return Ok(Redirect::to("/"));
        }
    };

    // New privilege level, new session id and token
    if !session.regenerate_id(true) {
        return Err(internal_error("Failed to move session to a new id"));
    }
    session.regenerate_csrf_token().map_err(internal_error)?;
    session.set("logged-in", true);
    session.set("username", form.username.as_str());
    session.set("user_level", level);
    flash_message(&mut session, message, Tone::Success);
    tracing::info!("User {} logged in with level {}", form.username, level);

    Ok(Redirect::to("/"))
}

pub(crate) async fn logout(session: Session) -> Redirect {
    let mut session = session.lock().await;
    session.clear();
    flash_message(&mut session, "You have logged out", Tone::Info);
    Redirect::to("/")
}
