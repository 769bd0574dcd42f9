//! Explorer page: list registered auctions and filter them by name.

use std::cell::RefCell;
use std::rc::Rc;

use lr_chain_client::{AuctionContract, PassSequencer, RegistryContract, load_summaries};
use lr_types::{AuctionSummary, configured_registry_address, filter_summaries};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{self, ExplorerElements};
use crate::events::{on_click, on_click_async, on_input};
use crate::message::{self, MessageKind};
use crate::provider::{BrowserProvider, BrowserTransport};
use crate::wallet;

pub struct ExplorerPage {
    els: ExplorerElements,
    state: RefCell<ExplorerState>,
    sequencer: PassSequencer,
}

#[derive(Default)]
struct ExplorerState {
    provider: Option<BrowserProvider>,
    registry: Option<Rc<RegistryContract<BrowserTransport>>>,
    summaries: Vec<AuctionSummary>,
    query: String,
}

pub fn init() -> Result<(), JsValue> {
    let els = ExplorerElements::bind()?;
    let page = Rc::new(ExplorerPage {
        els,
        state: RefCell::new(ExplorerState::default()),
        sequencer: PassSequencer::default(),
    });

    let registry_label = match configured_registry_address() {
        Some(address) => address.to_checksum(None),
        None => "Configure o endereço do registro.".to_string(),
    };
    page.els
        .registry_address_label
        .set_text_content(Some(&registry_label));

    bind_events(&page);

    if ensure_provider(&page).is_none() {
        message::show(
            &page.els.explorer_message,
            "Instale o MetaMask para carregar os leilões.",
            MessageKind::Error,
        );
        wallet::update_connection_state(&page.els.connection_status, None);
        return Ok(());
    }

    {
        let page = page.clone();
        wasm_bindgen_futures::spawn_local(async move {
            restore_connection(page.clone()).await;
            load_auctions(page).await;
        });
    }

    Ok(())
}

fn bind_events(page: &Rc<ExplorerPage>) {
    on_click_async!(page.els.connect_button, page, connect_wallet);
    on_click_async!(page.els.refresh_registry_button, page, load_auctions);

    {
        let page2 = page.clone();
        on_input!(page.els.auction_search, move |_| {
            let query = page2.els.auction_search.value();
            page2.state.borrow_mut().query = query;
            apply_filter(&page2);
        });
    }
}

// ── Handles ──

fn ensure_provider(page: &Rc<ExplorerPage>) -> Option<BrowserProvider> {
    if let Some(provider) = page.state.borrow().provider.clone() {
        return Some(provider);
    }
    let provider = BrowserProvider::injected()?;
    page.state.borrow_mut().provider = Some(provider.clone());
    Some(provider)
}

fn ensure_registry(page: &Rc<ExplorerPage>) -> Option<Rc<RegistryContract<BrowserTransport>>> {
    if let Some(registry) = page.state.borrow().registry.clone() {
        return Some(registry);
    }

    let address = configured_registry_address()?;
    let provider = ensure_provider(page)?;
    let registry = Rc::new(RegistryContract::new(
        address,
        BrowserTransport::new(provider),
    ));
    page.state.borrow_mut().registry = Some(registry.clone());
    Some(registry)
}

// ── Listing ──

async fn load_auctions(page: Rc<ExplorerPage>) {
    let Some(registry) = ensure_registry(&page) else {
        if configured_registry_address().is_none() {
            message::show(
                &page.els.explorer_message,
                "Configure o endereço do registro.",
                MessageKind::Error,
            );
        } else if BrowserProvider::injected().is_none() {
            message::show(
                &page.els.explorer_message,
                "Instale o MetaMask para carregar os leilões.",
                MessageKind::Error,
            );
        } else {
            message::show(
                &page.els.explorer_message,
                "Não foi possível preparar o provedor de leitura.",
                MessageKind::Error,
            );
        }
        return;
    };

    page.els.refresh_registry_button.set_disabled(true);
    message::show(
        &page.els.explorer_message,
        "Carregando lista de leilões\u{2026}",
        MessageKind::Info,
    );

    let token = page.sequencer.begin();
    let transport = registry.transport().clone();
    let result = load_summaries(registry.as_ref(), |address| {
        AuctionContract::new(address, transport.clone())
    })
    .await;

    match result {
        Ok(summaries) => {
            if page.sequencer.try_apply(token) {
                page.state.borrow_mut().summaries = summaries;
                apply_filter(&page);
            }
        }
        Err(error) => {
            gloo_console::error!(format!("{error}"));
            message::show(
                &page.els.explorer_message,
                "Não foi possível carregar os leilões do registro.",
                MessageKind::Error,
            );
        }
    }

    page.els.refresh_registry_button.set_disabled(false);
}

fn apply_filter(page: &Rc<ExplorerPage>) {
    let filtered: Vec<AuctionSummary> = {
        let st = page.state.borrow();
        filter_summaries(&st.summaries, &st.query)
            .into_iter()
            .cloned()
            .collect()
    };
    render_auction_list(page, &filtered);
}

fn render_auction_list(page: &Rc<ExplorerPage>, list: &[AuctionSummary]) {
    page.els.auction_list.set_inner_html("");

    if list.is_empty() {
        let (total, query) = {
            let st = page.state.borrow();
            (st.summaries.len(), st.query.trim().to_string())
        };
        let text = if total == 0 {
            "Nenhum leilão registrado no momento."
        } else if !query.is_empty() {
            "Nenhum leilão corresponde ao filtro informado."
        } else {
            "Nenhum leilão encontrado."
        };
        message::show(&page.els.explorer_message, text, MessageKind::Info);
        return;
    }

    message::clear(&page.els.explorer_message);

    for auction in list {
        let card = dom::create_element("article");
        card.set_class_name("auction-card");

        let title = dom::create_element("h3");
        title.set_text_content(Some(&auction.name));

        let meta = dom::create_element("div");
        meta.set_class_name("auction-meta");

        let type_pill = dom::create_element("span");
        type_pill.set_class_name("pill");
        type_pill.set_text_content(Some(&auction.kind_label()));

        let status_pill = dom::create_element("span");
        status_pill.set_class_name("pill");
        let _ = status_pill.set_attribute(
            "data-variant",
            if auction.ended { "warning" } else { "success" },
        );
        status_pill.set_text_content(Some(auction.status_label()));

        let _ = meta.append_child(&type_pill);
        let _ = meta.append_child(&status_pill);

        let address_label = dom::create_element("p");
        address_label.set_class_name("selected-auction");
        address_label.set_text_content(Some(&format!(
            "Endereço: {}",
            auction.address.to_checksum(None)
        )));

        let action_button = dom::create_element("button");
        let _ = action_button.set_attribute("type", "button");
        action_button.set_class_name("btn-primary");
        action_button.set_text_content(Some("Ver detalhes"));
        {
            let address = auction.address;
            let name = auction.name.clone();
            on_click!(action_button, move |_| {
                open_detail(address, &name);
            });
        }

        let _ = card.append_child(&title);
        let _ = card.append_child(&meta);
        let _ = card.append_child(&address_label);
        let _ = card.append_child(&action_button);
        let _ = page.els.auction_list.append_child(&card);
    }
}

fn open_detail(address: alloy_primitives::Address, name: &str) {
    let query = format!(
        "address={}&name={}",
        js_sys::encode_uri_component(&address.to_checksum(None)),
        js_sys::encode_uri_component(name),
    );
    let _ = dom::window()
        .location()
        .set_href(&format!("./detail.html?{query}"));
}

// ── Wallet session ──

async fn connect_wallet(page: Rc<ExplorerPage>) {
    let Some(provider) = ensure_provider(&page) else {
        message::show(
            &page.els.explorer_message,
            "Instale o MetaMask para continuar.",
            MessageKind::Error,
        );
        return;
    };

    page.els.connect_button.set_disabled(true);

    match wallet::connect(&provider).await {
        Ok(account) => {
            wallet::update_connection_state(&page.els.connection_status, Some(account));
            message::show(
                &page.els.explorer_message,
                "Carteira conectada. Clique em 'Ver detalhes' para abrir o leilão.",
                MessageKind::Success,
            );
        }
        Err(error) => {
            gloo_console::error!(format!("{error}"));
            message::show(
                &page.els.explorer_message,
                "Não foi possível conectar a carteira.",
                MessageKind::Error,
            );
            wallet::update_connection_state(&page.els.connection_status, None);
        }
    }

    page.els.connect_button.set_disabled(false);
}

async fn restore_connection(page: Rc<ExplorerPage>) {
    let Some(provider) = ensure_provider(&page) else {
        wallet::update_connection_state(&page.els.connection_status, None);
        return;
    };

    match wallet::restore(&provider).await {
        Ok(Some(account)) => {
            wallet::update_connection_state(&page.els.connection_status, Some(account));
        }
        Ok(None) => wallet::update_connection_state(&page.els.connection_status, None),
        Err(error) => {
            gloo_console::warn!(format!("Falha ao restaurar conexão com a carteira: {error}"));
            wallet::update_connection_state(&page.els.connection_status, None);
        }
    }
}
