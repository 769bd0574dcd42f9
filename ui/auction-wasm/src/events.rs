//! Event binding helpers.
//!
//! Handlers are async page functions spawned via
//! `wasm_bindgen_futures::spawn_local`; closures are leaked with
//! `forget()` because they live for the whole page.

/// Attach an async click handler taking the page `Rc`.
macro_rules! on_click_async {
    ($el:expr, $page:expr, $handler:expr) => {{
        let page = $page.clone();
        let cb = wasm_bindgen::closure::Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let page2 = page.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(page2).await;
            });
        })
            as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Attach a sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = wasm_bindgen::closure::Closure::wrap(
            Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>
        );
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Attach a sync handler to an `input` event.
macro_rules! on_input {
    ($el:expr, $cb:expr) => {{
        let cb =
            wasm_bindgen::closure::Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::Event)>);
        $el.add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Attach an async submit handler; the default form action is suppressed.
macro_rules! on_submit_async {
    ($el:expr, $page:expr, $handler:expr) => {{
        let page = $page.clone();
        let cb = wasm_bindgen::closure::Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            let page2 = page.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(page2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

pub(crate) use {on_click, on_click_async, on_input, on_submit_async};
