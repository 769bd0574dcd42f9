//! EIP-1193 provider bridge.
//!
//! Wraps the wallet extension's injected `window.ethereum` object and
//! implements the chain-client transports on top of its `request` method.

use std::rc::Rc;

use alloy_primitives::{Address, B256, Bytes, U256, hex};
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use lr_chain_client::{
    ChainError, EvmCall, EvmLogTransport, EvmSubmitTransport, EvmViewTransport, RawLog, Result,
};
use lr_types::normalize_address;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

const RECEIPT_POLL_MS: u32 = 2_000;

#[wasm_bindgen]
extern "C" {
    /// Injected EIP-1193 provider (MetaMask and compatible wallets).
    type RawProvider;

    #[wasm_bindgen(method, catch)]
    async fn request(this: &RawProvider, args: &JsValue) -> std::result::Result<JsValue, JsValue>;
}

/// Handle on the page's injected provider.
#[derive(Clone)]
pub struct BrowserProvider {
    raw: Rc<RawProvider>,
}

impl BrowserProvider {
    /// Wrap `window.ethereum`, when a wallet extension is present.
    pub fn injected() -> Option<Self> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(Self {
            raw: Rc::new(value.unchecked_into()),
        })
    }

    /// Single JSON-RPC request through the provider.
    pub async fn request(&self, method: &str, params: serde_json::Value) -> Result<JsValue> {
        let payload = serde_json::json!({ "method": method, "params": params });
        // Plain JS objects, not Maps: the provider rejects anything else.
        let args = payload
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ChainError::Transport(err.to_string()))?;

        self.raw
            .request(&args)
            .await
            .map_err(|err| ChainError::Transport(js_error_message(&err)))
    }

    /// Prompt the user for account access (`eth_requestAccounts`).
    pub async fn request_accounts(&self) -> Result<Vec<Address>> {
        let value = self.request("eth_requestAccounts", serde_json::json!([])).await?;
        Ok(parse_accounts(&value))
    }

    /// Already-authorized accounts, without prompting (`eth_accounts`).
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        let value = self.request("eth_accounts", serde_json::json!([])).await?;
        Ok(parse_accounts(&value))
    }
}

fn parse_accounts(value: &JsValue) -> Vec<Address> {
    let Ok(list) = serde_wasm_bindgen::from_value::<Vec<String>>(value.clone()) else {
        return Vec::new();
    };
    list.iter().filter_map(|raw| normalize_address(raw)).collect()
}

/// Best-effort extraction of the provider's error message.
fn js_error_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn expect_hex_string(value: JsValue, context: &str) -> Result<String> {
    value
        .as_string()
        .ok_or_else(|| ChainError::Transport(format!("resposta inesperada de {context}")))
}

fn parse_quantity(value: JsValue, context: &str) -> Result<u64> {
    let text = expect_hex_string(value, context)?;
    u64::from_str_radix(text.trim_start_matches("0x"), 16)
        .map_err(|err| ChainError::Transport(format!("quantidade inválida de {context}: {err}")))
}

/// Transport over the injected provider.
///
/// A read-only transport has no sender; [`BrowserTransport::with_sender`]
/// derives the write-capable copy bound to the signing account.
#[derive(Clone)]
pub struct BrowserTransport {
    provider: BrowserProvider,
    from: Option<Address>,
}

impl BrowserTransport {
    pub fn new(provider: BrowserProvider) -> Self {
        Self {
            provider,
            from: None,
        }
    }

    pub fn with_sender(&self, from: Address) -> Self {
        Self {
            provider: self.provider.clone(),
            from: Some(from),
        }
    }

    pub fn provider(&self) -> &BrowserProvider {
        &self.provider
    }
}

#[async_trait(?Send)]
impl EvmViewTransport for BrowserTransport {
    async fn call_view(&self, call: EvmCall) -> Result<Bytes> {
        let params = serde_json::json!([
            {
                "to": call.to.to_checksum(None),
                "data": hex::encode_prefixed(&call.data),
            },
            "latest",
        ]);
        let value = self.provider.request("eth_call", params).await?;
        let text = expect_hex_string(value, "eth_call")?;
        hex::decode(&text)
            .map(Bytes::from)
            .map_err(|err| ChainError::Transport(format!("retorno inválido de eth_call: {err}")))
    }
}

#[async_trait(?Send)]
impl EvmSubmitTransport for BrowserTransport {
    async fn send(&self, call: EvmCall) -> Result<B256> {
        let Some(from) = self.from else {
            return Err(ChainError::Rejected(
                "Conecte a carteira para interagir com o leilão.".to_string(),
            ));
        };

        let mut tx = serde_json::json!({
            "from": from.to_checksum(None),
            "to": call.to.to_checksum(None),
            "data": hex::encode_prefixed(&call.data),
        });
        if call.value > U256::ZERO {
            tx["value"] = serde_json::Value::String(format!("0x{:x}", call.value));
        }

        let value = self
            .provider
            .request("eth_sendTransaction", serde_json::json!([tx]))
            .await
            .map_err(|err| ChainError::Rejected(err.to_string()))?;
        let text = expect_hex_string(value, "eth_sendTransaction")?;
        text.parse::<B256>()
            .map_err(|err| ChainError::Transport(format!("hash de transação inválido: {err}")))
    }

    async fn confirm(&self, tx: B256) -> Result<()> {
        loop {
            let receipt = self
                .provider
                .request("eth_getTransactionReceipt", serde_json::json!([format!("{tx}")]))
                .await?;

            if !receipt.is_null() && !receipt.is_undefined() {
                let status = js_sys::Reflect::get(&receipt, &JsValue::from_str("status"))
                    .ok()
                    .and_then(|status| status.as_string());
                return match status.as_deref() {
                    Some("0x0") => Err(ChainError::Rejected(
                        "A transação foi revertida pelo contrato.".to_string(),
                    )),
                    _ => Ok(()),
                };
            }

            TimeoutFuture::new(RECEIPT_POLL_MS).await;
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEntry {
    topics: Vec<String>,
    data: String,
    block_number: Option<String>,
}

#[async_trait(?Send)]
impl EvmLogTransport for BrowserTransport {
    async fn block_number(&self) -> Result<u64> {
        let value = self.provider.request("eth_blockNumber", serde_json::json!([])).await?;
        parse_quantity(value, "eth_blockNumber")
    }

    async fn logs(&self, address: Address, from_block: u64, to_block: u64) -> Result<Vec<RawLog>> {
        let params = serde_json::json!([{
            "address": address.to_checksum(None),
            "fromBlock": format!("0x{from_block:x}"),
            "toBlock": format!("0x{to_block:x}"),
        }]);
        let value = self.provider.request("eth_getLogs", params).await?;
        let entries: Vec<LogEntry> = serde_wasm_bindgen::from_value(value)
            .map_err(|err| ChainError::Transport(format!("retorno inválido de eth_getLogs: {err}")))?;

        let mut logs = Vec::with_capacity(entries.len());
        for entry in entries {
            match raw_log(&entry) {
                Some(log) => logs.push(log),
                None => gloo_console::warn!("Log malformado ignorado em eth_getLogs"),
            }
        }
        Ok(logs)
    }
}

fn raw_log(entry: &LogEntry) -> Option<RawLog> {
    let mut topics = Vec::with_capacity(entry.topics.len());
    for topic in &entry.topics {
        topics.push(topic.parse::<B256>().ok()?);
    }
    let data = hex::decode(&entry.data).ok()?;
    let block_number = match &entry.block_number {
        Some(text) => u64::from_str_radix(text.trim_start_matches("0x"), 16).ok()?,
        None => 0,
    };
    Some(RawLog {
        topics,
        data: Bytes::from(data),
        block_number,
    })
}
