//! Error taxonomy for the chain client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChainError>;

/// Failures crossing the ledger boundary.
///
/// Individual field reads are additionally contained by
/// [`crate::attempt`], so most `Call`/`Decode` values never reach the UI;
/// `Rejected` carries the provider's reason text for user-facing messages.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Provider or RPC failure, with whatever message the provider gave.
    #[error("{0}")]
    Transport(String),

    /// Returned bytes did not decode as the declared ABI type.
    #[error("resposta inválida de {0}()")]
    Decode(&'static str),

    /// A state-mutating call was rejected or reverted.
    #[error("{0}")]
    Rejected(String),
}

impl ChainError {
    /// Message to surface to the user, or `fallback` when the underlying
    /// cause carries no text of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}
