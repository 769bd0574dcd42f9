//! Auction event watcher.
//!
//! Injected providers do not uniformly support push subscriptions, so the
//! watcher polls `eth_getLogs` from a block cursor. Dropping the watcher
//! cancels the interval, which is how subscriptions are replaced wholesale
//! when the active contract handle changes.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use lr_chain_client::{AuctionContract, AuctionEvent, EvmLogTransport, poll_events};
use wasm_bindgen_futures::spawn_local;

use crate::provider::BrowserTransport;

const POLL_INTERVAL_MS: u32 = 4_000;

pub struct EventWatcher {
    _interval: Interval,
}

impl EventWatcher {
    /// Watch `contract` for auction events, delivering each decoded event
    /// to `on_event` in log order.
    pub fn subscribe<F>(contract: Rc<AuctionContract<BrowserTransport>>, on_event: F) -> Self
    where
        F: Fn(AuctionEvent) + 'static,
    {
        let on_event = Rc::new(on_event);
        let cursor: Rc<Cell<Option<u64>>> = Rc::new(Cell::new(None));
        // One poll in flight at a time; a slow RPC skips ticks instead of
        // piling up duplicate queries.
        let busy = Rc::new(Cell::new(false));

        let interval = Interval::new(POLL_INTERVAL_MS, move || {
            if busy.get() {
                return;
            }
            busy.set(true);

            let contract = contract.clone();
            let cursor = cursor.clone();
            let busy = busy.clone();
            let on_event = on_event.clone();
            spawn_local(async move {
                poll_once(&contract, &cursor, on_event.as_ref()).await;
                busy.set(false);
            });
        });

        Self {
            _interval: interval,
        }
    }
}

async fn poll_once(
    contract: &AuctionContract<BrowserTransport>,
    cursor_cell: &Cell<Option<u64>>,
    on_event: &dyn Fn(AuctionEvent),
) {
    let transport = contract.transport();

    let Some(mut cursor) = cursor_cell.get() else {
        // First tick: start past the current head so only new events fire.
        match transport.block_number().await {
            Ok(head) => cursor_cell.set(Some(head + 1)),
            Err(error) => {
                gloo_console::warn!(format!("Falha ao iniciar a escuta de eventos: {error}"));
            }
        }
        return;
    };

    match poll_events(transport, contract.address(), &mut cursor).await {
        Ok(events) => {
            cursor_cell.set(Some(cursor));
            for event in events {
                on_event(event);
            }
        }
        Err(error) => {
            gloo_console::warn!(format!("Falha ao consultar eventos do leilão: {error}"));
        }
    }
}
