//! Auction detail page: view one auction, bid on it, watch its events.

use std::cell::RefCell;
use std::rc::Rc;

use alloy_primitives::Address;
use gloo_timers::callback::Interval;
use lr_chain_client::{
    AuctionContract, AuctionEvent, ChainError, CountdownPhase, PassSequencer, reconcile,
};
use lr_types::{
    AuctionViewState, ControlStates, DEFAULT_AUCTION_NAME, format_address, format_ether,
    normalize_address, parse_ether,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::UrlSearchParams;

use crate::dom::{self, DetailElements};
use crate::events::{on_click, on_click_async, on_submit_async};
use crate::message::{self, MessageKind};
use crate::provider::{BrowserProvider, BrowserTransport};
use crate::wallet;
use crate::watch::EventWatcher;

/// Session context of one detail page instance, constructed at init and
/// owned by the page's handlers.
pub struct DetailPage {
    els: DetailElements,
    state: RefCell<DetailState>,
    sequencer: PassSequencer,
}

#[derive(Default)]
struct DetailState {
    provider: Option<BrowserProvider>,
    read: Option<Rc<AuctionContract<BrowserTransport>>>,
    write: Option<Rc<AuctionContract<BrowserTransport>>>,
    address: Option<Address>,
    name: String,
    countdown: Option<Interval>,
    watcher: Option<EventWatcher>,
}

pub fn init() -> Result<(), JsValue> {
    let els = DetailElements::bind()?;
    let page = Rc::new(DetailPage {
        els,
        state: RefCell::new(DetailState {
            name: DEFAULT_AUCTION_NAME.to_string(),
            ..Default::default()
        }),
        sequencer: PassSequencer::default(),
    });

    let search = dom::window().location().search().unwrap_or_default();
    let params = UrlSearchParams::new_with_str(&search).ok();
    let address_from_query = params
        .as_ref()
        .and_then(|p| p.get("address"))
        .unwrap_or_default();
    let provided_name = params
        .as_ref()
        .and_then(|p| p.get("name"))
        .unwrap_or_default();

    let address = normalize_address(&address_from_query);
    {
        let mut st = page.state.borrow_mut();
        st.address = address;
        if !provided_name.trim().is_empty() {
            st.name = provided_name.trim().to_string();
        }
    }

    render_selected_address(&page);
    update_title(&page);

    if address.is_none() {
        message::show(
            &page.els.message,
            "Informe o endereço do leilão pela URL (parâmetro address).",
            MessageKind::Error,
        );
        page.els.connect_button.set_disabled(true);
        return Ok(());
    }

    set_initial_view_state(&page);
    init_contract(&page);

    if page.state.borrow().read.is_none() {
        message::show(
            &page.els.message,
            "Instale o MetaMask para visualizar os dados do leilão.",
            MessageKind::Error,
        );
    } else {
        let restored = page.clone();
        spawn_local(async move {
            restore_connection(restored).await;
        });
    }

    bind_events(&page);
    Ok(())
}

fn bind_events(page: &Rc<DetailPage>) {
    on_click_async!(page.els.connect_button, page, connect_wallet);
    on_submit_async!(page.els.bid_form, page, handle_bid);
    on_click_async!(page.els.withdraw_button, page, handle_withdraw);
    on_click_async!(page.els.end_button, page, handle_end_auction);
    on_click_async!(page.els.refresh_button, page, handle_refresh);

    on_click!(page.els.back_to_explorer, move |_| {
        let _ = dom::window().location().set_href("./index.html");
    });
}

// ── Contract preparation ──

fn ensure_provider(page: &Rc<DetailPage>) -> Option<BrowserProvider> {
    if let Some(provider) = page.state.borrow().provider.clone() {
        return Some(provider);
    }
    let provider = BrowserProvider::injected()?;
    page.state.borrow_mut().provider = Some(provider.clone());
    Some(provider)
}

fn prepare_read_contract(page: &Rc<DetailPage>) {
    let Some(address) = page.state.borrow().address else {
        return;
    };

    let Some(provider) = ensure_provider(page) else {
        message::show(
            &page.els.message,
            "Instale o MetaMask ou configure um provedor de leitura compatível.",
            MessageKind::Error,
        );
        return;
    };

    let transport = BrowserTransport::new(provider);
    page.state.borrow_mut().read = Some(Rc::new(AuctionContract::new(address, transport)));
}

fn init_contract(page: &Rc<DetailPage>) {
    prepare_read_contract(page);
    if page.state.borrow().read.is_none() {
        return;
    }

    set_initial_view_state(page);
    spawn_load(page);
    subscribe_events(page);
}

/// Bind the write-capable handle, derived from the read handle and the
/// active signing account.
fn bind_writer(page: &Rc<DetailPage>, account: Address) {
    let mut st = page.state.borrow_mut();
    if let Some(read) = &st.read {
        let transport = read.transport().with_sender(account);
        st.write = Some(Rc::new(AuctionContract::new(read.address(), transport)));
    }
}

// ── Rendering ──

fn update_title(page: &Rc<DetailPage>) {
    let name = page.state.borrow().name.clone();
    let label = if name.is_empty() {
        DEFAULT_AUCTION_NAME.to_string()
    } else {
        name
    };
    page.els.detail_title.set_text_content(Some(&label));
}

fn render_selected_address(page: &Rc<DetailPage>) {
    let label = match page.state.borrow().address {
        Some(address) => address.to_checksum(None),
        None => "Nenhum endereço selecionado.".to_string(),
    };
    page.els
        .selected_auction_address
        .set_text_content(Some(&label));
}

fn set_initial_view_state(page: &Rc<DetailPage>) {
    update_title(page);
    render_selected_address(page);

    page.els.auction_type.set_text_content(Some("-"));
    page.els.beneficiary.set_text_content(Some("-"));
    page.els.end_time.set_text_content(Some("-"));
    page.els.countdown.set_text_content(Some("-"));
    page.els.auction_status.set_text_content(Some("-"));
    page.els.item_description.set_text_content(Some(
        "Conecte a carteira ou utilize um provedor compatível para carregar os dados do leilão.",
    ));
    page.els.highest_bid.set_text_content(Some("-"));
    page.els.highest_bidder.set_text_content(Some("-"));
    page.els.bid_input.set_value("");

    page.els.bid_input.set_disabled(true);
    page.els.bid_button.set_disabled(true);
    page.els.withdraw_button.set_disabled(true);
    page.els.end_button.set_disabled(true);
    page.els.refresh_button.set_disabled(true);
}

fn locale_datetime(timestamp: u64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp as f64 * 1000.0));
    String::from(date.to_locale_string("default", &JsValue::UNDEFINED))
}

fn render(page: &Rc<DetailPage>, view: &AuctionViewState) {
    update_title(page);

    page.els
        .highest_bid
        .set_text_content(Some(&view.highest_bid_label()));
    page.els
        .highest_bidder
        .set_text_content(Some(&format_address(view.highest_bidder)));
    page.els
        .beneficiary
        .set_text_content(Some(&format_address(view.beneficiary)));
    page.els
        .auction_type
        .set_text_content(Some(&view.kind_label()));

    let end_time_label = match view.end_time {
        Some(ts) if ts > 0 => locale_datetime(ts),
        _ => "-".to_string(),
    };
    page.els.end_time.set_text_content(Some(&end_time_label));
    page.els
        .auction_status
        .set_text_content(Some(view.status_label()));

    let has_wallet = page.state.borrow().write.is_some();
    let ended = view.ended;
    let controls = ControlStates::derive(has_wallet, ended);
    page.els.bid_input.set_disabled(!controls.bid);
    page.els.bid_button.set_disabled(!controls.bid);
    page.els.withdraw_button.set_disabled(!controls.withdraw);
    page.els.end_button.set_disabled(!controls.end_auction);
    page.els.refresh_button.set_disabled(!controls.refresh);

    let description = view.description.as_deref().map(str::trim).unwrap_or("");
    if view.is_off_chain_item() {
        let text = if description.is_empty() {
            "Nenhuma descrição cadastrada para este leilão."
        } else {
            description
        };
        page.els.item_description.set_text_content(Some(text));
    } else {
        page.els
            .item_description
            .set_text_content(Some("Este leilão referencia um NFT (ERC721)."));
    }

    if view.is_off_chain_item() && description.is_empty() {
        message::set_info(
            &page.els.message,
            Some("Nenhuma descrição cadastrada para este leilão."),
        );
    } else {
        message::set_info(&page.els.message, None);
    }

    start_countdown(page, view.end_time.unwrap_or(0), ended);
}

// ── Reconciliation ──

fn spawn_load(page: &Rc<DetailPage>) {
    let page = page.clone();
    spawn_local(async move {
        load_data(page).await;
    });
}

async fn load_data(page: Rc<DetailPage>) {
    let (read, prior_name) = {
        let st = page.state.borrow();
        (st.read.clone(), st.name.clone())
    };
    let Some(read) = read else {
        message::show(
            &page.els.message,
            "Não foi possível preparar o contrato para leitura.",
            MessageKind::Error,
        );
        return;
    };

    let token = page.sequencer.begin();
    let view = reconcile(read.as_ref(), Some(&prior_name)).await;
    if !page.sequencer.try_apply(token) {
        // A newer pass already rendered; this result is stale.
        return;
    }

    page.state.borrow_mut().name = view.name.clone();
    render(&page, &view);
}

// ── Countdown ──

fn start_countdown(page: &Rc<DetailPage>, end_time: u64, ended: bool) {
    // Replacing the slot drops (and cancels) any running interval.
    page.state.borrow_mut().countdown = None;

    let update = {
        let els = page.els.clone();
        move || {
            let now = (js_sys::Date::now() / 1000.0) as u64;
            let label = CountdownPhase::at(end_time, ended, now).label();
            els.countdown.set_text_content(Some(&label));
        }
    };

    update();
    if !ended {
        page.state.borrow_mut().countdown = Some(Interval::new(1_000, update));
    }
}

// ── Events ──

fn subscribe_events(page: &Rc<DetailPage>) {
    let Some(read) = page.state.borrow().read.clone() else {
        return;
    };

    let handler_page = page.clone();
    let watcher = EventWatcher::subscribe(read, move |event| {
        handle_event(&handler_page, &event);
    });

    // The slot replacement drops every previously registered listener.
    page.state.borrow_mut().watcher = Some(watcher);
}

fn handle_event(page: &Rc<DetailPage>, event: &AuctionEvent) {
    match event {
        AuctionEvent::BidPlaced { bidder, amount } => {
            message::show(
                &page.els.message,
                &format!(
                    "Novo lance de {} ({} ETH).",
                    format_address(Some(*bidder)),
                    format_ether(*amount)
                ),
                MessageKind::Info,
            );
            spawn_load(page);
        }
        AuctionEvent::Withdrawn { bidder, amount } => {
            // Pending balances are not part of the view model, so a
            // withdrawal only notifies; it never triggers a reload.
            message::show(
                &page.els.message,
                &format!(
                    "{} retirou {} ETH de saldo pendente.",
                    format_address(Some(*bidder)),
                    format_ether(*amount)
                ),
                MessageKind::Info,
            );
        }
        AuctionEvent::AuctionEnded { winner, amount } => {
            message::show(
                &page.els.message,
                &format!(
                    "Leilão encerrado. Vencedor: {} ({} ETH).",
                    format_address(Some(*winner)),
                    format_ether(*amount)
                ),
                MessageKind::Info,
            );
            spawn_load(page);
        }
    }
}

// ── Wallet session ──

async fn connect_wallet(page: Rc<DetailPage>) {
    if page.state.borrow().address.is_none() {
        message::show(
            &page.els.message,
            "Endereço do leilão inválido.",
            MessageKind::Error,
        );
        return;
    }

    let Some(provider) = ensure_provider(&page) else {
        message::show(
            &page.els.message,
            "Instale o MetaMask para continuar.",
            MessageKind::Error,
        );
        return;
    };

    page.els.connect_button.set_disabled(true);

    match wallet::connect(&provider).await {
        Ok(account) => {
            if page.state.borrow().read.is_none() {
                prepare_read_contract(&page);
            }
            bind_writer(&page, account);
            wallet::update_connection_state(&page.els.connection_status, Some(account));
            message::show(
                &page.els.message,
                "Carteira conectada com sucesso.",
                MessageKind::Success,
            );
            load_data(page.clone()).await;
        }
        Err(error) => {
            handle_error(&page, &error, "Não foi possível conectar a carteira.");
            page.state.borrow_mut().write = None;
            wallet::update_connection_state(&page.els.connection_status, None);
            set_initial_view_state(&page);
            prepare_read_contract(&page);
            subscribe_events(&page);
            spawn_load(&page);
        }
    }

    page.els.connect_button.set_disabled(false);
}

async fn restore_connection(page: Rc<DetailPage>) {
    let provider = ensure_provider(&page);
    let has_address = page.state.borrow().address.is_some();
    let Some(provider) = provider.filter(|_| has_address) else {
        wallet::update_connection_state(&page.els.connection_status, None);
        return;
    };

    match wallet::restore(&provider).await {
        Ok(Some(account)) => {
            if page.state.borrow().read.is_none() {
                prepare_read_contract(&page);
            }
            bind_writer(&page, account);
            wallet::update_connection_state(&page.els.connection_status, Some(account));
            load_data(page).await;
        }
        Ok(None) => {
            page.state.borrow_mut().write = None;
            wallet::update_connection_state(&page.els.connection_status, None);
            load_data(page).await;
        }
        Err(error) => {
            // A failed silent restore is a background event, not an error
            // the user asked for.
            gloo_console::warn!(format!("Falha ao restaurar conexão com a carteira: {error}"));
            page.state.borrow_mut().write = None;
            wallet::update_connection_state(&page.els.connection_status, None);
            load_data(page).await;
        }
    }
}

// ── User actions ──

fn handle_error(page: &Rc<DetailPage>, error: &ChainError, fallback: &str) {
    gloo_console::error!(format!("{error}"));
    message::show(
        &page.els.message,
        &error.user_message(fallback),
        MessageKind::Error,
    );
}

async fn handle_bid(page: Rc<DetailPage>) {
    let Some(contract) = page.state.borrow().write.clone() else {
        message::show(
            &page.els.message,
            "Conecte a carteira para interagir com o leilão.",
            MessageKind::Error,
        );
        return;
    };

    let value_eth = page.els.bid_input.value().trim().to_string();
    if value_eth.is_empty() {
        message::show(&page.els.message, "Digite um valor em ETH.", MessageKind::Error);
        return;
    }
    let Ok(value) = parse_ether(&value_eth) else {
        message::show(&page.els.message, "Erro ao enviar o lance.", MessageKind::Error);
        return;
    };

    page.els.bid_button.set_disabled(true);
    let outcome: Result<(), ChainError> = async {
        let tx = contract.bid(value).await?;
        message::show(
            &page.els.message,
            "Lance enviado. Aguardando confirmação\u{2026}",
            MessageKind::Info,
        );
        tx.wait().await
    }
    .await;

    match outcome {
        Ok(()) => {
            page.els.bid_input.set_value("");
            message::show(&page.els.message, "Lance confirmado!", MessageKind::Success);
            load_data(page.clone()).await;
        }
        Err(error) => handle_error(&page, &error, "Erro ao enviar o lance."),
    }
    page.els.bid_button.set_disabled(false);
}

async fn handle_withdraw(page: Rc<DetailPage>) {
    let Some(contract) = page.state.borrow().write.clone() else {
        message::show(
            &page.els.message,
            "Conecte a carteira para interagir com o leilão.",
            MessageKind::Error,
        );
        return;
    };

    page.els.withdraw_button.set_disabled(true);
    let outcome: Result<(), ChainError> = async {
        let tx = contract.withdraw().await?;
        message::show(
            &page.els.message,
            "Solicitando retirada\u{2026}",
            MessageKind::Info,
        );
        tx.wait().await
    }
    .await;

    match outcome {
        Ok(()) => message::show(
            &page.els.message,
            "Valor retirado com sucesso!",
            MessageKind::Success,
        ),
        Err(error) => handle_error(&page, &error, "Erro ao retirar valores."),
    }
    page.els.withdraw_button.set_disabled(false);
}

async fn handle_end_auction(page: Rc<DetailPage>) {
    let Some(contract) = page.state.borrow().write.clone() else {
        message::show(
            &page.els.message,
            "Conecte a carteira para interagir com o leilão.",
            MessageKind::Error,
        );
        return;
    };

    page.els.end_button.set_disabled(true);
    let outcome: Result<(), ChainError> = async {
        let tx = contract.end_auction().await?;
        message::show(
            &page.els.message,
            "Encerrando leilão\u{2026}",
            MessageKind::Info,
        );
        tx.wait().await
    }
    .await;

    match outcome {
        Ok(()) => {
            message::show(&page.els.message, "Leilão encerrado!", MessageKind::Success);
            // The reload re-derives the button state for the closed auction.
            load_data(page.clone()).await;
        }
        Err(error) => {
            handle_error(&page, &error, "Erro ao encerrar o leilão.");
            page.els.end_button.set_disabled(false);
        }
    }
}

async fn handle_refresh(page: Rc<DetailPage>) {
    if page.state.borrow().read.is_none() {
        message::show(
            &page.els.message,
            "Não foi possível atualizar o leilão selecionado.",
            MessageKind::Error,
        );
        return;
    }
    message::show(&page.els.message, "Atualizando dados\u{2026}", MessageKind::Info);
    load_data(page).await;
}
