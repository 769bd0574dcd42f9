//! DOM element bindings.
//!
//! All element references are resolved once at page init. Each page owns
//! its own `Elements` struct; to add new UI elements, add a field and bind
//! it in the matching `bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

// ── Elements structs ──

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

macro_rules! get_form {
    ($id:expr) => {
        by_id_typed::<HtmlFormElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing form #{}", $id)))?
    };
}

/// DOM references of the auction detail page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct DetailElements {
    pub connect_button: HtmlButtonElement,
    pub connection_status: Element,
    pub detail_title: Element,
    pub selected_auction_address: Element,
    pub auction_type: Element,
    pub beneficiary: Element,
    pub end_time: Element,
    pub countdown: Element,
    pub auction_status: Element,
    pub item_description: Element,
    pub highest_bid: Element,
    pub highest_bidder: Element,
    pub bid_form: HtmlFormElement,
    pub bid_input: HtmlInputElement,
    pub bid_button: HtmlButtonElement,
    pub withdraw_button: HtmlButtonElement,
    pub end_button: HtmlButtonElement,
    pub refresh_button: HtmlButtonElement,
    pub message: Element,
    pub back_to_explorer: HtmlButtonElement,
}

impl DetailElements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<DetailElements, JsValue> {
        Ok(DetailElements {
            connect_button: get_button!("connect"),
            connection_status: get_el!("connectionStatus"),
            detail_title: get_el!("detailTitle"),
            selected_auction_address: get_el!("selectedAuctionAddress"),
            auction_type: get_el!("auctionType"),
            beneficiary: get_el!("beneficiary"),
            end_time: get_el!("endTime"),
            countdown: get_el!("countdown"),
            auction_status: get_el!("auctionStatus"),
            item_description: get_el!("itemDescription"),
            highest_bid: get_el!("highestBid"),
            highest_bidder: get_el!("highestBidder"),
            bid_form: get_form!("bidForm"),
            bid_input: get_input!("bidValue"),
            bid_button: get_button!("bidButton"),
            withdraw_button: get_button!("withdrawButton"),
            end_button: get_button!("endAuction"),
            refresh_button: get_button!("refreshButton"),
            message: get_el!("message"),
            back_to_explorer: get_button!("backToExplorer"),
        })
    }
}

/// DOM references of the explorer page.
#[derive(Clone)]
pub struct ExplorerElements {
    pub connect_button: HtmlButtonElement,
    pub connection_status: Element,
    pub registry_address_label: Element,
    pub refresh_registry_button: HtmlButtonElement,
    pub auction_search: HtmlInputElement,
    pub auction_list: Element,
    pub explorer_message: Element,
}

impl ExplorerElements {
    pub fn bind() -> Result<ExplorerElements, JsValue> {
        Ok(ExplorerElements {
            connect_button: get_button!("connect"),
            connection_status: get_el!("connectionStatus"),
            registry_address_label: get_el!("registryAddressLabel"),
            refresh_registry_button: get_button!("refreshRegistry"),
            auction_search: get_input!("auctionSearch"),
            auction_list: get_el!("auctionList"),
            explorer_message: get_el!("explorerMessage"),
        })
    }
}
