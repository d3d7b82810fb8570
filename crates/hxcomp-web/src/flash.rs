use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

pub const SUCCESS: &str = "success";
pub const ERROR: &str = "error";
pub const WARNING: &str = "warning";
pub const INFO: &str = "info";

/// Milliseconds before the client removes a toast.
pub const AUTO_DISMISS_MS: u32 = 3000;

/// Element that receives out-of-band toasts. Place it once in the page
/// layout.
pub const TOAST_CONTAINER: &str = r#"<div id="toasts" class="toast-container"></div>"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

impl Flash {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(SUCCESS, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ERROR, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(WARNING, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(INFO, message)
    }
}

/// Out-of-band fragment appending every flash to `#toasts`. Empty input
/// renders nothing.
pub fn render_oob(flashes: &[Flash]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<div id="toasts" hx-swap-oob="beforeend">"#);
    for flash in flashes {
        out.push_str(r#"<div class="toast toast-"#);
        out.push_str(&encode_double_quoted_attribute(&flash.level));
        out.push_str(&format!(r#"" data-auto-dismiss="{AUTO_DISMISS_MS}">"#));
        out.push_str(&encode_text(&flash.message));
        out.push_str("</div>");
    }
    out.push_str("</div>");
    out
}

/// Recovers flashes from rendered HTML. Used by the test harness.
pub fn parse_rendered(html: &str) -> Vec<Flash> {
    const OPEN: &str = r#"<div class="toast toast-"#;
    let mut out = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find(OPEN) {
        rest = &rest[start + OPEN.len()..];
        let Some(level_end) = rest.find('"') else {
            break;
        };
        let level = decode_html_entities(&rest[..level_end]).into_owned();
        let Some(body_start) = rest.find('>') else {
            break;
        };
        rest = &rest[body_start + 1..];
        let Some(body_end) = rest.find("</div>") else {
            break;
        };
        let message = decode_html_entities(&rest[..body_end]).into_owned();
        out.push(Flash { level, message });
        rest = &rest[body_end..];
    }
    out
}
