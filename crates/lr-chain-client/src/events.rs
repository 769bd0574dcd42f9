//! Auction event decoding and the polling fallback cursor.
//!
//! Injected providers do not uniformly support push subscriptions, so the
//! UI drives [`poll_events`] from a cancellable periodic timer instead.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolEvent;

use crate::contracts::Auction;
use crate::error::Result;
use crate::transport::{EvmLogTransport, RawLog};

/// Decoded ledger notification from the active auction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuctionEvent {
    BidPlaced { bidder: Address, amount: U256 },
    Withdrawn { bidder: Address, amount: U256 },
    AuctionEnded { winner: Address, amount: U256 },
}

impl AuctionEvent {
    /// Decode a raw log; foreign events on the same contract yield `None`.
    pub fn decode(log: &RawLog) -> Option<AuctionEvent> {
        let topic0 = log.topics.first()?;

        if *topic0 == Auction::BidPlaced::SIGNATURE_HASH {
            let event =
                Auction::BidPlaced::decode_raw_log(log.topics.iter().copied(), &log.data, true)
                    .ok()?;
            Some(AuctionEvent::BidPlaced {
                bidder: event.bidder,
                amount: event.amount,
            })
        } else if *topic0 == Auction::Withdrawn::SIGNATURE_HASH {
            let event =
                Auction::Withdrawn::decode_raw_log(log.topics.iter().copied(), &log.data, true)
                    .ok()?;
            Some(AuctionEvent::Withdrawn {
                bidder: event.bidder,
                amount: event.amount,
            })
        } else if *topic0 == Auction::AuctionEnded::SIGNATURE_HASH {
            let event =
                Auction::AuctionEnded::decode_raw_log(log.topics.iter().copied(), &log.data, true)
                    .ok()?;
            Some(AuctionEvent::AuctionEnded {
                winner: event.winner,
                amount: event.amount,
            })
        } else {
            None
        }
    }
}

/// Fetch and decode every auction event emitted since the cursor, then
/// advance the cursor past the current head.
///
/// On failure the cursor is left untouched so the next poll retries the
/// same range; events are therefore delivered at least once, in log order.
pub async fn poll_events<T>(
    transport: &T,
    contract: Address,
    cursor: &mut u64,
) -> Result<Vec<AuctionEvent>>
where
    T: EvmLogTransport + ?Sized,
{
    let head = transport.block_number().await?;
    if head < *cursor {
        return Ok(Vec::new());
    }

    let logs = transport.logs(contract, *cursor, head).await?;
    *cursor = head + 1;

    Ok(logs.iter().filter_map(AuctionEvent::decode).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use alloy_primitives::{B256, Bytes};
    use async_trait::async_trait;
    use std::cell::RefCell;

    fn raw(event: &impl SolEvent, block_number: u64) -> RawLog {
        let log = event.encode_log_data();
        RawLog {
            topics: log.topics().to_vec(),
            data: Bytes::from(log.data.to_vec()),
            block_number,
        }
    }

    #[test]
    fn decodes_the_three_auction_events() {
        let bid = raw(
            &Auction::BidPlaced {
                bidder: Address::repeat_byte(1),
                amount: U256::from(10u64),
            },
            5,
        );
        assert_eq!(
            AuctionEvent::decode(&bid),
            Some(AuctionEvent::BidPlaced {
                bidder: Address::repeat_byte(1),
                amount: U256::from(10u64),
            })
        );

        let withdrawn = raw(
            &Auction::Withdrawn {
                bidder: Address::repeat_byte(2),
                amount: U256::from(7u64),
            },
            6,
        );
        assert!(matches!(
            AuctionEvent::decode(&withdrawn),
            Some(AuctionEvent::Withdrawn { .. })
        ));

        let ended = raw(
            &Auction::AuctionEnded {
                winner: Address::repeat_byte(3),
                amount: U256::from(99u64),
            },
            7,
        );
        assert!(matches!(
            AuctionEvent::decode(&ended),
            Some(AuctionEvent::AuctionEnded { .. })
        ));
    }

    #[test]
    fn foreign_logs_are_ignored() {
        let log = RawLog {
            topics: vec![B256::repeat_byte(0xaa)],
            data: Bytes::new(),
            block_number: 1,
        };
        assert_eq!(AuctionEvent::decode(&log), None);
        assert_eq!(AuctionEvent::decode(&RawLog {
            topics: Vec::new(),
            data: Bytes::new(),
            block_number: 1,
        }), None);
    }

    struct FakeLogTransport {
        head: u64,
        logs: Vec<RawLog>,
        queries: RefCell<Vec<(u64, u64)>>,
    }

    #[async_trait(?Send)]
    impl EvmLogTransport for FakeLogTransport {
        async fn block_number(&self) -> crate::error::Result<u64> {
            Ok(self.head)
        }

        async fn logs(
            &self,
            _address: Address,
            from_block: u64,
            to_block: u64,
        ) -> crate::error::Result<Vec<RawLog>> {
            self.queries.borrow_mut().push((from_block, to_block));
            Ok(self
                .logs
                .iter()
                .filter(|log| log.block_number >= from_block && log.block_number <= to_block)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn poll_advances_past_the_head() {
        let transport = FakeLogTransport {
            head: 20,
            logs: vec![raw(
                &Auction::BidPlaced {
                    bidder: Address::repeat_byte(1),
                    amount: U256::from(1u64),
                },
                15,
            )],
            queries: RefCell::new(Vec::new()),
        };

        let mut cursor = 10;
        let events = poll_events(&transport, Address::repeat_byte(9), &mut cursor)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(cursor, 21);
        assert_eq!(transport.queries.borrow()[0], (10, 20));

        // Nothing new: the head has not moved.
        let events = poll_events(&transport, Address::repeat_byte(9), &mut cursor)
            .await
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(cursor, 21);
        // No log query was issued for the empty range.
        assert_eq!(transport.queries.borrow().len(), 1);
    }

    #[tokio::test]
    async fn failed_poll_keeps_the_cursor() {
        struct Broken;

        #[async_trait(?Send)]
        impl EvmLogTransport for Broken {
            async fn block_number(&self) -> crate::error::Result<u64> {
                Err(ChainError::Transport("rpc offline".to_string()))
            }

            async fn logs(
                &self,
                _address: Address,
                _from: u64,
                _to: u64,
            ) -> crate::error::Result<Vec<RawLog>> {
                unreachable!()
            }
        }

        let mut cursor = 42;
        assert!(poll_events(&Broken, Address::ZERO, &mut cursor).await.is_err());
        assert_eq!(cursor, 42);
    }
}
