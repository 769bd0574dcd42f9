//! View state reconciliation: fan-out reads merged into one snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::Address;
use lr_types::{
    AuctionKind, AuctionSummary, AuctionViewState, DEFAULT_AUCTION_NAME, format_address,
    resolve_display_name,
};

use crate::reader::{AuctionReader, OptionalField, probe_optional_string};
use crate::resilient::attempt;

/// One complete fetch-merge pass over an auction's readable fields.
///
/// The six primary reads are issued without waiting on each other, then the
/// optional descriptive accessors as a second wave. Individual failures are
/// contained: the corresponding field stays unavailable and everything else
/// is still populated. The ended flag fails open to `false` so a flaky read
/// does not lock the bidding controls.
pub async fn reconcile<R>(reader: &R, prior_name: Option<&str>) -> AuctionViewState
where
    R: AuctionReader + ?Sized,
{
    let (highest_bid, highest_bidder, end_time, beneficiary, ended, kind_index) = futures::join!(
        attempt("highestBid", reader.highest_bid()),
        attempt("highestBidder", reader.highest_bidder()),
        attempt("auctionEndTime", reader.auction_end_time()),
        attempt("beneficiary", reader.beneficiary()),
        attempt("ended", reader.ended()),
        attempt("auctionType", reader.auction_type()),
    );

    let (description, item_name) = futures::join!(
        probe_optional_string(reader, OptionalField::ItemDescription),
        probe_optional_string(reader, OptionalField::ItemName),
    );

    let name = resolve_display_name(item_name.as_deref(), description.as_deref(), prior_name)
        .unwrap_or_else(|| DEFAULT_AUCTION_NAME.to_string());

    AuctionViewState {
        highest_bid,
        highest_bidder,
        end_time,
        beneficiary,
        ended: ended.unwrap_or(false),
        kind: kind_index.map(AuctionKind::from_index),
        name,
        description,
    }
}

/// Lightweight reconciliation for the explorer listing: kind, ended flag
/// and display name only.
pub async fn summarize<R>(reader: &R, address: Address) -> AuctionSummary
where
    R: AuctionReader + ?Sized,
{
    let (kind_index, ended, item_name, description) = futures::join!(
        attempt("auctionType", reader.auction_type()),
        attempt("ended", reader.ended()),
        probe_optional_string(reader, OptionalField::ItemName),
        probe_optional_string(reader, OptionalField::ItemDescription),
    );

    let name = resolve_display_name(item_name.as_deref(), description.as_deref(), None)
        .unwrap_or_else(|| format!("Leilão {}", format_address(Some(address))));

    AuctionSummary {
        address,
        name,
        kind: kind_index.map(AuctionKind::from_index),
        ended: ended.unwrap_or(false),
    }
}

/// Orders overlapping reconciliation passes.
///
/// Passes take a token at call time; a completed pass may be applied only
/// if no later-issued pass has been applied already, so a slow early pass
/// can never overwrite fresher data.
#[derive(Debug, Default)]
pub struct PassSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl PassSequencer {
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// True when `token`'s result should be applied; marks it applied.
    pub fn try_apply(&self, token: u64) -> bool {
        self.applied.fetch_max(token, Ordering::Relaxed) < token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainError, Result};
    use alloy_primitives::U256;
    use async_trait::async_trait;

    /// Reader with per-field failure injection.
    struct MockReader {
        fail: Option<&'static str>,
        item_name: Option<String>,
        item_description: Option<String>,
    }

    impl MockReader {
        fn healthy() -> Self {
            Self {
                fail: None,
                item_name: Some("Quadro a óleo".to_string()),
                item_description: Some("Tela 60x90".to_string()),
            }
        }

        fn failing(field: &'static str) -> Self {
            Self {
                fail: Some(field),
                ..Self::healthy()
            }
        }

        fn check(&self, field: &'static str) -> Result<()> {
            if self.fail == Some(field) {
                Err(ChainError::Transport(format!("{field} indisponível")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait(?Send)]
    impl AuctionReader for MockReader {
        async fn highest_bid(&self) -> Result<U256> {
            self.check("highestBid")?;
            Ok(U256::from(2_000u64))
        }

        async fn highest_bidder(&self) -> Result<Address> {
            self.check("highestBidder")?;
            Ok(Address::repeat_byte(5))
        }

        async fn auction_end_time(&self) -> Result<u64> {
            self.check("auctionEndTime")?;
            Ok(1_900_000_000)
        }

        async fn beneficiary(&self) -> Result<Address> {
            self.check("beneficiary")?;
            Ok(Address::repeat_byte(6))
        }

        async fn ended(&self) -> Result<bool> {
            self.check("ended")?;
            Ok(true)
        }

        async fn auction_type(&self) -> Result<u8> {
            self.check("auctionType")?;
            Ok(0)
        }

        fn supports(&self, field: OptionalField) -> bool {
            match field {
                OptionalField::ItemName => self.item_name.is_some(),
                OptionalField::ItemDescription => self.item_description.is_some(),
            }
        }

        async fn optional_string(&self, field: OptionalField) -> Result<String> {
            let value = match field {
                OptionalField::ItemName => self.item_name.clone(),
                OptionalField::ItemDescription => self.item_description.clone(),
            };
            value.ok_or_else(|| ChainError::Transport("campo ausente".to_string()))
        }
    }

    #[tokio::test]
    async fn reconcile_merges_all_fields() {
        let view = reconcile(&MockReader::healthy(), None).await;
        assert_eq!(view.highest_bid, Some(U256::from(2_000u64)));
        assert_eq!(view.highest_bidder, Some(Address::repeat_byte(5)));
        assert_eq!(view.end_time, Some(1_900_000_000));
        assert_eq!(view.beneficiary, Some(Address::repeat_byte(6)));
        assert!(view.ended);
        assert_eq!(view.kind, Some(AuctionKind::OffChainItem));
        assert_eq!(view.name, "Quadro a óleo");
        assert_eq!(view.description.as_deref(), Some("Tela 60x90"));
    }

    #[tokio::test]
    async fn single_failed_read_only_degrades_its_own_field() {
        let view = reconcile(&MockReader::failing("highestBid"), None).await;
        assert_eq!(view.highest_bid, None);
        // Every other field is intact.
        assert_eq!(view.highest_bidder, Some(Address::repeat_byte(5)));
        assert_eq!(view.end_time, Some(1_900_000_000));
        assert_eq!(view.beneficiary, Some(Address::repeat_byte(6)));
        assert!(view.ended);
        assert_eq!(view.kind, Some(AuctionKind::OffChainItem));
    }

    #[tokio::test]
    async fn failed_ended_read_fails_open() {
        let view = reconcile(&MockReader::failing("ended"), None).await;
        assert!(!view.ended);
        assert_eq!(view.highest_bid, Some(U256::from(2_000u64)));
    }

    #[tokio::test]
    async fn failed_type_read_yields_unknown_label() {
        let view = reconcile(&MockReader::failing("auctionType"), None).await;
        assert_eq!(view.kind, None);
        assert_eq!(view.kind_label(), "Tipo desconhecido");
    }

    #[tokio::test]
    async fn name_falls_back_through_description_and_prior() {
        let mut reader = MockReader::healthy();
        reader.item_name = None;
        let view = reconcile(&reader, Some("Nome anterior")).await;
        assert_eq!(view.name, "Tela 60x90");

        reader.item_description = None;
        let view = reconcile(&reader, Some("Nome anterior")).await;
        assert_eq!(view.name, "Nome anterior");

        let view = reconcile(&reader, None).await;
        assert_eq!(view.name, DEFAULT_AUCTION_NAME);
    }

    #[tokio::test]
    async fn summary_name_falls_back_to_short_address() {
        let mut reader = MockReader::healthy();
        reader.item_name = None;
        reader.item_description = None;
        let summary = summarize(&reader, Address::repeat_byte(0x11)).await;
        assert_eq!(summary.name, "Leilão 0x1111\u{2026}1111");
        assert_eq!(summary.kind_label(), "Item off-chain");
        assert!(summary.ended);
    }

    #[test]
    fn sequencer_discards_stale_completions() {
        let seq = PassSequencer::default();
        let first = seq.begin();
        let second = seq.begin();

        // The later-started pass completes first and is applied.
        assert!(seq.try_apply(second));
        // The earlier pass finishes afterwards and must be discarded.
        assert!(!seq.try_apply(first));
        // Re-applying the same token is also rejected.
        assert!(!seq.try_apply(second));

        let third = seq.begin();
        assert!(seq.try_apply(third));
    }
}
