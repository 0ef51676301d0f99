use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue, Method},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose, Engine as _};
use std::convert::Infallible;
use tower_http::cors::{Any, CorsLayer};

pub const FLASH_COOKIE: &str = "flash";

/// Clears the flash cookie once its messages have been shown.
pub const CLEAR_FLASH: &str = "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

/// One-shot messages carried over a redirect in the `flash` cookie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flash {
    messages: Vec<String>,
}

impl Flash {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn from_headers(headers: &HeaderMap) -> Self {
        let messages = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == FLASH_COOKIE).then_some(value)
            })
            .find_map(decode_messages)
            .unwrap_or_default();

        Flash { messages }
    }
}

// Flash extractor
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flash::from_headers(&parts.headers))
    }
}

fn encode_messages(messages: &[String]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    general_purpose::URL_SAFE_NO_PAD.encode(json)
}

fn decode_messages(value: &str) -> Option<Vec<String>> {
    if value.is_empty() {
        return None;
    }
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// 303 redirect to `to` that shows `message` on the next rendered page.
pub fn redirect_with_flash(to: &str, message: impl Into<String>) -> Response {
    let cookie = format!(
        "{}={}; Path=/; Max-Age=60; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        encode_messages(&[message.into()])
    );
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(to),
    )
        .into_response()
}

/// Appends the cookie deletion when a page consumed flash messages.
pub fn consume_flash(mut response: Response, flash: &Flash) -> Response {
    if !flash.is_empty() {
        response
            .headers_mut()
            .append(header::SET_COOKIE, HeaderValue::from_static(CLEAR_FLASH));
    }
    response
}

/// CORS for the Trivia API: any origin, the methods and headers the frontend
/// uses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
