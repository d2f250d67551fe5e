//! # CAPTCHA Detection Module
//!
//! ## Purpose
//! Inspects fetched court pages for CAPTCHA challenges before any form
//! submission is attempted. Detection is a pure function over markup with no
//! side effects; it is a best-effort heuristic, not an exhaustive check.
//!
//! ## Input/Output Specification
//! - **Input**: Raw HTML of a fetched page
//! - **Output**: The kind of CAPTCHA found, or `None`
//!
//! Marker coverage reflects what Indian e-courts portals are known to serve:
//! image CAPTCHAs, reCAPTCHA widgets and plain "enter the security code"
//! prompts.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Kind of CAPTCHA challenge found on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptchaKind {
    /// An image challenge (`img[src*="captcha"]` or a captcha container)
    Image,
    /// A reCAPTCHA widget or iframe
    Recaptcha,
    /// A text/code entry prompt
    Text,
    /// A reCAPTCHA loader script without a rendered widget
    Script,
}

impl std::fmt::Display for CaptchaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CaptchaKind::Image => "image",
            CaptchaKind::Recaptcha => "recaptcha",
            CaptchaKind::Text => "text",
            CaptchaKind::Script => "script",
        };
        f.write_str(label)
    }
}

/// Selector markers checked in order; the first match wins.
static MARKERS: LazyLock<Vec<(Selector, CaptchaKind)>> = LazyLock::new(|| {
    [
        (r#"img[src*="captcha"]"#, CaptchaKind::Image),
        (r#"div.captcha"#, CaptchaKind::Image),
        (r#".g-recaptcha"#, CaptchaKind::Recaptcha),
        (r#"iframe[src*="recaptcha"]"#, CaptchaKind::Recaptcha),
        (r#"script[src*="recaptcha"]"#, CaptchaKind::Script),
        (r#"input[name*="captcha"]"#, CaptchaKind::Text),
        (r#"input[placeholder*="captcha"]"#, CaptchaKind::Text),
    ]
    .into_iter()
    .map(|(sel, kind)| {
        (
            Selector::parse(sel).expect("captcha marker selector must parse"),
            kind,
        )
    })
    .collect()
});

/// Phrases in page text that indicate a challenge even without markup markers.
const TEXT_MARKERS: &[&str] = &["captcha", "verification code", "security code"];

/// Inspect a page for known CAPTCHA markers.
///
/// Returns the kind of the first marker found, or `None` when the page shows
/// no sign of a challenge.
pub fn detect(html: &str) -> Option<CaptchaKind> {
    let document = Html::parse_document(html);

    for (selector, kind) in MARKERS.iter() {
        if document.select(selector).next().is_some() {
            return Some(*kind);
        }
    }

    let page_text: String = document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    if TEXT_MARKERS.iter().any(|marker| page_text.contains(marker)) {
        return Some(CaptchaKind::Text);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_image_captcha() {
        let html = r#"<html><body>
            <form>
                <img src="/securimage/captcha.php" alt="code" />
                <input type="text" name="code" />
            </form>
        </body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Image));
    }

    #[test]
    fn detects_recaptcha_widget() {
        let html = r#"<html><body>
            <div class="g-recaptcha" data-sitekey="abc"></div>
        </body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Recaptcha));
    }

    #[test]
    fn detects_recaptcha_iframe() {
        let html = r#"<html><body>
            <iframe src="https://www.google.com/recaptcha/api2/anchor"></iframe>
        </body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Recaptcha));
    }

    #[test]
    fn detects_loader_script() {
        let html = r#"<html><head>
            <script src="https://www.google.com/recaptcha/api.js"></script>
        </head><body><p>Case status search</p></body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Script));
    }

    #[test]
    fn detects_text_prompt_without_markup_markers() {
        let html = r#"<html><body>
            <p>Please enter the security code shown below to continue.</p>
        </body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Text));
    }

    #[test]
    fn detects_captcha_input_field() {
        let html = r#"<html><body>
            <form><input type="text" name="fcaptcha_code" /></form>
        </body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Text));
    }

    #[test]
    fn clean_page_yields_none() {
        let html = r#"<html><body>
            <h1>Case Status</h1>
            <form>
                <input type="text" name="case_no" />
                <input type="submit" value="Search" />
            </form>
        </body></html>"#;
        assert_eq!(detect(html), None);
    }

    #[test]
    fn image_marker_wins_over_text_marker() {
        // Markup markers take precedence over body-text markers.
        let html = r#"<html><body>
            <img src="captcha.jpg" />
            <p>Enter the verification code</p>
        </body></html>"#;
        assert_eq!(detect(html), Some(CaptchaKind::Image));
    }
}
