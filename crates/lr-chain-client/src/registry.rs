//! Registry aggregation: enumerate auctions and summarize each one.

use alloy_primitives::Address;
use lr_types::AuctionSummary;
use tracing::warn;

use crate::error::Result;
use crate::reader::{AuctionReader, RegistryReader};
use crate::reconcile::summarize;

/// Load a summary for every auction the registry knows about, in registry
/// enumeration order.
///
/// `open` builds a read handle for one auction address. Entries whose
/// address is the zero address are skipped with a warning; summary-level
/// read failures are contained inside [`summarize`], so one bad auction
/// never aborts the enumeration. A failure reading the registry itself
/// (count or entry) does abort: without the index there is nothing to show.
pub async fn load_summaries<Reg, R, F>(registry: &Reg, open: F) -> Result<Vec<AuctionSummary>>
where
    Reg: RegistryReader + ?Sized,
    R: AuctionReader,
    F: Fn(Address) -> R,
{
    let total = registry.auction_count().await?;

    let mut items = Vec::with_capacity(total as usize);
    for index in 0..total {
        let address = registry.auction_address(index).await?;
        if address == Address::ZERO {
            warn!("Endereço de leilão inválido no índice {index}");
            continue;
        }
        items.push(summarize(&open(address), address).await);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainError, Result};
    use crate::reader::OptionalField;
    use alloy_primitives::U256;
    use async_trait::async_trait;

    struct FixedRegistry {
        entries: Vec<Address>,
    }

    #[async_trait(?Send)]
    impl RegistryReader for FixedRegistry {
        async fn auction_count(&self) -> Result<u64> {
            Ok(self.entries.len() as u64)
        }

        async fn auction_address(&self, index: u64) -> Result<Address> {
            self.entries
                .get(index as usize)
                .copied()
                .ok_or_else(|| ChainError::Transport("índice fora da faixa".to_string()))
        }
    }

    struct NamedReader {
        name: String,
    }

    #[async_trait(?Send)]
    impl AuctionReader for NamedReader {
        async fn highest_bid(&self) -> Result<U256> {
            Ok(U256::ZERO)
        }

        async fn highest_bidder(&self) -> Result<Address> {
            Ok(Address::ZERO)
        }

        async fn auction_end_time(&self) -> Result<u64> {
            Ok(0)
        }

        async fn beneficiary(&self) -> Result<Address> {
            Ok(Address::ZERO)
        }

        async fn ended(&self) -> Result<bool> {
            Ok(false)
        }

        async fn auction_type(&self) -> Result<u8> {
            Ok(1)
        }

        fn supports(&self, field: OptionalField) -> bool {
            field == OptionalField::ItemName
        }

        async fn optional_string(&self, _field: OptionalField) -> Result<String> {
            Ok(self.name.clone())
        }
    }

    #[tokio::test]
    async fn zero_entries_are_skipped_in_order() {
        let registry = FixedRegistry {
            entries: vec![Address::repeat_byte(1), Address::ZERO, Address::repeat_byte(3)],
        };

        let summaries = load_summaries(&registry, |address| NamedReader {
            name: format!("Leilão #{}", address.as_slice()[0]),
        })
        .await
        .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].address, Address::repeat_byte(1));
        assert_eq!(summaries[1].address, Address::repeat_byte(3));
        assert_eq!(summaries[0].name, "Leilão #1");
        assert_eq!(summaries[1].name, "Leilão #3");
    }

    #[tokio::test]
    async fn registry_failure_aborts_the_load() {
        struct BrokenRegistry;

        #[async_trait(?Send)]
        impl RegistryReader for BrokenRegistry {
            async fn auction_count(&self) -> Result<u64> {
                Err(ChainError::Transport("rpc offline".to_string()))
            }

            async fn auction_address(&self, _index: u64) -> Result<Address> {
                unreachable!("count already failed")
            }
        }

        let result = load_summaries(&BrokenRegistry, |_| NamedReader {
            name: String::new(),
        })
        .await;
        assert!(result.is_err());
    }
}
