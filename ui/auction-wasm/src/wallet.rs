//! Wallet session transitions shared by both pages.

use alloy_primitives::Address;
use lr_chain_client::{ChainError, Result};
use lr_types::format_address;
use web_sys::Element;

use crate::provider::BrowserProvider;

/// Request account access (user prompt). The first authorized account
/// becomes the signing identity.
pub async fn connect(provider: &BrowserProvider) -> Result<Address> {
    let accounts = provider.request_accounts().await?;
    accounts
        .into_iter()
        .next()
        .ok_or_else(|| ChainError::Rejected("Nenhuma conta autorizada.".to_string()))
}

/// Silently query already-authorized accounts; `Ok(None)` when there is no
/// session to restore.
pub async fn restore(provider: &BrowserProvider) -> Result<Option<Address>> {
    Ok(provider.accounts().await?.into_iter().next())
}

/// Render the connection status line and its `data-state` marker.
pub fn update_connection_state(status: &Element, address: Option<Address>) {
    match address {
        Some(addr) => {
            status.set_text_content(Some(&format!("Conectado: {}", format_address(Some(addr)))));
            let _ = status.set_attribute("data-state", "connected");
        }
        None => {
            status.set_text_content(Some("Desconectado"));
            let _ = status.set_attribute("data-state", "disconnected");
        }
    }
}
