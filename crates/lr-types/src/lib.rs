//! Shared data model for the Lanceiro auction pages: address/amount codec,
//! auction kind labels, display-name resolution and the view snapshots
//! exchanged between the chain client and the UI.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

pub use alloy_primitives::utils::{UnitsError, format_ether, parse_ether};

/// Registry contract that enumerates deployed auctions.
pub const REGISTRY_ADDRESS: &str = "0x31D92593d3F7800fcdEf03E6D47902dE28236C53";

/// Display name used when no better name is known for an auction.
pub const DEFAULT_AUCTION_NAME: &str = "Leilão selecionado";

/// Normalize a user- or chain-supplied address string.
///
/// Returns `None` for empty, malformed or checksum-invalid input, and for
/// the zero address, which is never a valid auction reference.
pub fn normalize_address(raw: &str) -> Option<Address> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let hex = value.strip_prefix("0x")?;
    let mixed_case = hex.bytes().any(|b| b.is_ascii_uppercase())
        && hex.bytes().any(|b| b.is_ascii_lowercase());

    let parsed = if mixed_case {
        // Mixed-case input carries an EIP-55 checksum; reject it when wrong.
        Address::parse_checksummed(value, None).ok()?
    } else {
        value.parse::<Address>().ok()?
    };

    if parsed == Address::ZERO {
        None
    } else {
        Some(parsed)
    }
}

/// Normalized form of the compiled-in registry address.
pub fn configured_registry_address() -> Option<Address> {
    normalize_address(REGISTRY_ADDRESS)
}

/// Compact display form of an address: `0x31D9…6C53`, or `-` when absent.
pub fn format_address(value: Option<Address>) -> String {
    match value {
        Some(addr) if addr != Address::ZERO => {
            let full = addr.to_checksum(None);
            format!("{}\u{2026}{}", &full[..6], &full[full.len() - 4..])
        }
        _ => "-".to_string(),
    }
}

// ── Auction kinds ──

/// Kind tag stored on-chain as a small enum index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionKind {
    OffChainItem,
    Nft,
    Other(u8),
}

impl AuctionKind {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => AuctionKind::OffChainItem,
            1 => AuctionKind::Nft,
            other => AuctionKind::Other(other),
        }
    }

    pub fn label(&self) -> String {
        match self {
            AuctionKind::OffChainItem => "Item off-chain".to_string(),
            AuctionKind::Nft => "NFT (ERC721)".to_string(),
            AuctionKind::Other(index) => format!("Tipo {index}"),
        }
    }
}

/// Label for a possibly-unreadable kind tag.
pub fn kind_label(kind: Option<AuctionKind>) -> String {
    match kind {
        Some(kind) => kind.label(),
        None => "Tipo desconhecido".to_string(),
    }
}

// ── Display name resolution ──

/// First non-empty candidate (after trimming), in priority order:
/// item name, description, previously known name.
pub fn resolve_display_name(
    item_name: Option<&str>,
    description: Option<&str>,
    prior: Option<&str>,
) -> Option<String> {
    for candidate in [item_name, description, prior] {
        if let Some(text) = candidate {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

// ── View snapshots ──

/// Display snapshot for one auction, recreated wholesale on every
/// reconciliation pass. Unreadable fields stay `None`; `ended` fails open
/// to `false` so the bidding controls stay available.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuctionViewState {
    pub highest_bid: Option<U256>,
    pub highest_bidder: Option<Address>,
    pub end_time: Option<u64>,
    pub beneficiary: Option<Address>,
    pub ended: bool,
    pub kind: Option<AuctionKind>,
    pub name: String,
    pub description: Option<String>,
}

impl AuctionViewState {
    pub fn kind_label(&self) -> String {
        kind_label(self.kind)
    }

    pub fn status_label(&self) -> &'static str {
        if self.ended { "Encerrado" } else { "Aberto" }
    }

    pub fn is_off_chain_item(&self) -> bool {
        self.kind == Some(AuctionKind::OffChainItem)
    }

    /// Highest bid in ether, or `-` when the read failed.
    pub fn highest_bid_label(&self) -> String {
        match self.highest_bid {
            Some(wei) => format_ether(wei),
            None => "-".to_string(),
        }
    }
}

/// Enabled/disabled derivation for the detail-page controls.
///
/// Withdrawal of a previously outbid balance must stay available after the
/// auction closes, so only the bid and end controls depend on `ended`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlStates {
    pub bid: bool,
    pub withdraw: bool,
    pub end_auction: bool,
    pub refresh: bool,
}

impl ControlStates {
    pub fn derive(has_wallet: bool, ended: bool) -> Self {
        Self {
            bid: has_wallet && !ended,
            withdraw: has_wallet,
            end_auction: has_wallet && !ended,
            refresh: true,
        }
    }
}

/// Listing projection of an auction used by the explorer page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub address: Address,
    pub name: String,
    pub kind: Option<AuctionKind>,
    pub ended: bool,
}

impl AuctionSummary {
    pub fn kind_label(&self) -> String {
        kind_label(self.kind)
    }

    pub fn status_label(&self) -> &'static str {
        if self.ended { "Encerrado" } else { "Aberto" }
    }

    /// Case-insensitive substring match against the display name.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.name.to_lowercase().contains(&needle)
    }
}

/// Filter a loaded summary set without re-fetching.
pub fn filter_summaries<'a>(list: &'a [AuctionSummary], query: &str) -> Vec<&'a AuctionSummary> {
    list.iter().filter(|summary| summary.matches(query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x31D92593d3F7800fcdEf03E6D47902dE28236C53";

    #[test]
    fn normalize_accepts_lowercase_and_checksummed() {
        let from_lower = normalize_address(&CHECKSUMMED.to_lowercase()).expect("lowercase");
        let from_checksum = normalize_address(CHECKSUMMED).expect("checksummed");
        assert_eq!(from_lower, from_checksum);
        assert_eq!(from_checksum.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_address("  0x31d92593d3f7800fcdef03e6d47902de28236c53 ").unwrap();
        let twice = normalize_address(&once.to_checksum(None)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_rejects_invalid_input() {
        assert_eq!(normalize_address(""), None);
        assert_eq!(normalize_address("   "), None);
        assert_eq!(normalize_address("not-an-address"), None);
        assert_eq!(normalize_address("31d92593d3f7800fcdef03e6d47902de28236c53"), None);
        assert_eq!(normalize_address("0x1234"), None);
        // Zero address is "no auction", never a valid reference.
        assert_eq!(
            normalize_address("0x0000000000000000000000000000000000000000"),
            None
        );
        // Wrong checksum: trailing C53 lowercased.
        assert_eq!(
            normalize_address("0x31D92593d3F7800fcdEf03E6D47902dE28236c53"),
            None
        );
    }

    #[test]
    fn format_address_is_total() {
        assert_eq!(format_address(None), "-");
        assert_eq!(format_address(Some(Address::ZERO)), "-");
        let addr = normalize_address(CHECKSUMMED).unwrap();
        assert_eq!(format_address(Some(addr)), "0x31D9\u{2026}6C53");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(AuctionKind::from_index(0).label(), "Item off-chain");
        assert_eq!(AuctionKind::from_index(1).label(), "NFT (ERC721)");
        assert_eq!(AuctionKind::from_index(7).label(), "Tipo 7");
        assert_eq!(kind_label(None), "Tipo desconhecido");
    }

    #[test]
    fn display_name_fallback_chain() {
        assert_eq!(
            resolve_display_name(Some(""), Some("d"), Some("p")).as_deref(),
            Some("d")
        );
        assert_eq!(
            resolve_display_name(Some(""), Some(""), Some("p")).as_deref(),
            Some("p")
        );
        assert_eq!(resolve_display_name(Some(" "), None, Some("  ")), None);
        assert_eq!(
            resolve_display_name(Some(" Quadro "), Some("d"), None).as_deref(),
            Some("Quadro")
        );
    }

    #[test]
    fn summary_filter_is_case_insensitive() {
        let summaries = vec![
            AuctionSummary {
                address: Address::repeat_byte(1),
                name: "Quadro a óleo".to_string(),
                kind: Some(AuctionKind::OffChainItem),
                ended: false,
            },
            AuctionSummary {
                address: Address::repeat_byte(2),
                name: "Escultura".to_string(),
                kind: Some(AuctionKind::Nft),
                ended: true,
            },
        ];

        assert_eq!(filter_summaries(&summaries, "quadro").len(), 1);
        assert_eq!(filter_summaries(&summaries, "  ").len(), 2);
        assert_eq!(filter_summaries(&summaries, "zzz").len(), 0);
    }

    #[test]
    fn control_states_follow_wallet_and_ended() {
        // No wallet: everything but refresh stays off.
        let disconnected = ControlStates::derive(false, false);
        assert!(!disconnected.bid && !disconnected.withdraw && !disconnected.end_auction);
        assert!(disconnected.refresh);

        // Connected on an ended auction: withdraw only.
        let ended = ControlStates::derive(true, true);
        assert!(!ended.bid);
        assert!(ended.withdraw);
        assert!(!ended.end_auction);

        let open = ControlStates::derive(true, false);
        assert!(open.bid && open.withdraw && open.end_auction);
    }

    #[test]
    fn ether_formatting_keeps_precision() {
        let wei = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_ether(wei), "1.500000000000000000");
        assert_eq!(parse_ether("1.5").unwrap(), wei);
    }

    #[test]
    fn registry_address_is_configured() {
        assert!(configured_registry_address().is_some());
    }
}
