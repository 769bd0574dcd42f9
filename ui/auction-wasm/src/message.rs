//! Page message surface.
//!
//! One element per page carries the current user-facing message, with a
//! `data-type` attribute the stylesheet maps to a color.

use web_sys::Element;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl MessageKind {
    fn as_str(self) -> &'static str {
        match self {
            MessageKind::Info => "info",
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

pub fn show(el: &Element, text: &str, kind: MessageKind) {
    el.set_text_content(Some(text));
    let _ = el.set_attribute("data-type", kind.as_str());
}

pub fn clear(el: &Element) {
    let _ = el.remove_attribute("data-type");
    el.set_text_content(Some(""));
}

/// Informational updates never clobber a sticky success/error message:
/// `None` clears the surface only when the current message is `info`.
pub fn set_info(el: &Element, text: Option<&str>) {
    match text {
        Some(text) => show(el, text, MessageKind::Info),
        None => {
            if el.get_attribute("data-type").as_deref() == Some("info") {
                clear(el);
            }
        }
    }
}
