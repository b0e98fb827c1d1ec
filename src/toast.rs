//! One-shot notifications.
//!
//! A handler that wants to tell the visitor something after a redirect queues a
//! [`Toast`] into the `toast` cookie. The next document rendered by the shell shows
//! it in the toaster region and removes the cookie in the same response.

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

pub const TOAST_COOKIE: &str = "toast";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

impl ToastVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastVariant::Default => "default",
            ToastVariant::Destructive => "destructive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn encode(&self) -> Option<String> {
        let json = serde_json::to_vec(self).ok()?;
        Some(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(raw: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Queues `toast` for the next rendered document. Replaces any toast still pending.
pub fn queue(jar: CookieJar, toast: &Toast) -> CookieJar {
    let Some(value) = toast.encode() else {
        tracing::warn!(title = %toast.title, "dropping toast that failed to serialize");
        return jar;
    };
    let cookie = Cookie::build((TOAST_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Takes the pending toast out of the jar. Unreadable cookies are discarded.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Toast>) {
    let Some(raw) = jar.get(TOAST_COOKIE).map(|cookie| cookie.value().to_owned()) else {
        return (jar, None);
    };

    let toast = Toast::decode(&raw);
    if toast.is_none() {
        tracing::debug!("discarding malformed toast cookie");
    }

    (jar.remove(Cookie::build(TOAST_COOKIE).path("/")), toast)
}
