//! Transport abstractions for EVM RPC interactions.
//!
//! The browser UI implements these over an injected EIP-1193 provider;
//! tests implement them with recording mocks. Futures are not `Send`
//! because browser futures hold `JsValue`s.

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

use crate::error::Result;

/// Encoded EVM call that can be dispatched via a transport.
#[derive(Clone, Debug)]
pub struct EvmCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl EvmCall {
    pub fn new(to: Address, data: impl Into<Bytes>, value: U256) -> Self {
        Self {
            to,
            data: data.into(),
            value,
        }
    }

    /// Zero-value call used for `eth_call` style reads.
    pub fn view(to: Address, data: impl Into<Bytes>) -> Self {
        Self::new(to, data, U256::ZERO)
    }
}

/// Read-only `eth_call` style interactions.
#[async_trait(?Send)]
pub trait EvmViewTransport {
    async fn call_view(&self, call: EvmCall) -> Result<Bytes>;
}

/// Submission of state-mutating transactions through a signing identity.
#[async_trait(?Send)]
pub trait EvmSubmitTransport {
    /// Submit the call for signing and broadcast, returning its hash.
    async fn send(&self, call: EvmCall) -> Result<B256>;

    /// Await inclusion of a previously submitted transaction, failing when
    /// it reverted.
    async fn confirm(&self, tx: B256) -> Result<()>;
}

/// Raw log entry as delivered by the ledger.
#[derive(Clone, Debug)]
pub struct RawLog {
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
}

/// Log retrieval for the polling event fallback.
#[async_trait(?Send)]
pub trait EvmLogTransport {
    async fn block_number(&self) -> Result<u64>;

    /// Logs emitted by `address` in the inclusive block range.
    async fn logs(&self, address: Address, from_block: u64, to_block: u64)
    -> Result<Vec<RawLog>>;
}
