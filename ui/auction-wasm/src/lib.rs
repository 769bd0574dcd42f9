//! Lanceiro browser client.
//!
//! Pure Rust + WASM frontend for the auction explorer and detail pages.
//! The host page declares which flow to run via `<body data-page>`.

pub mod detail;
pub mod dom;
pub mod events;
pub mod explorer;
pub mod message;
pub mod provider;
pub mod wallet;
pub mod watch;

use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    let body = dom::document()
        .body()
        .ok_or_else(|| JsValue::from_str("missing <body>"))?;

    match body.get_attribute("data-page").as_deref() {
        Some("explorer") => explorer::init(),
        Some("detail") => detail::init(),
        _ => {
            gloo_console::warn!(
                "Tipo de página desconhecido. Verifique o atributo data-page do <body>."
            );
            Ok(())
        }
    }
}
