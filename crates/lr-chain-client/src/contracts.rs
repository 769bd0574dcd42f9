//! Typed bindings for the auction and registry contracts.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

use crate::error::{ChainError, Result};
use crate::reader::{AuctionReader, OptionalField, RegistryReader};
use crate::transport::{EvmCall, EvmSubmitTransport, EvmViewTransport};

sol! {
    #[allow(missing_docs)]
    contract Auction {
        function highestBid() external view returns (uint256);
        function highestBidder() external view returns (address);
        function auctionEndTime() external view returns (uint256);
        function beneficiary() external view returns (address);
        function ended() external view returns (bool);
        function auctionType() external view returns (uint8);
        function itemName() external view returns (string);
        function itemDescription() external view returns (string);

        function bid() external payable;
        function withdraw() external;
        function endAuction() external;

        event BidPlaced(address indexed bidder, uint256 amount);
        event Withdrawn(address indexed bidder, uint256 amount);
        event AuctionEnded(address winner, uint256 amount);
    }

    #[allow(missing_docs)]
    contract AuctionRegistry {
        function getAuctionCount() external view returns (uint256);
        function getAuction(uint256 index) external view returns (address);
    }
}

/// Dispatch one read and decode its return value.
async fn view_call<T, C>(transport: &T, to: Address, label: &'static str, call: C) -> Result<C::Return>
where
    T: EvmViewTransport + ?Sized,
    C: SolCall,
{
    let raw = transport.call_view(EvmCall::view(to, call.abi_encode())).await?;
    C::abi_decode_returns(&raw, true).map_err(|_| ChainError::Decode(label))
}

/// Submitted transaction awaiting confirmation.
pub struct PendingTx<'a, T: ?Sized> {
    hash: B256,
    transport: &'a T,
}

impl<'a, T: EvmSubmitTransport + ?Sized> PendingTx<'a, T> {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Await inclusion; fails when the transaction reverted.
    pub async fn wait(self) -> Result<()> {
        self.transport.confirm(self.hash).await
    }
}

/// Handle to one deployed auction contract.
///
/// Reads are available whenever the transport can serve `eth_call`;
/// the write surface additionally needs a signing identity behind the
/// transport.
#[derive(Clone)]
pub struct AuctionContract<T> {
    address: Address,
    transport: T,
}

impl<T> AuctionContract<T> {
    pub fn new(address: Address, transport: T) -> Self {
        Self { address, transport }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: EvmSubmitTransport> AuctionContract<T> {
    /// Place a bid carrying `value` wei.
    pub async fn bid(&self, value: U256) -> Result<PendingTx<'_, T>> {
        self.send(EvmCall::new(self.address, Auction::bidCall {}.abi_encode(), value))
            .await
    }

    /// Withdraw the caller's pending (outbid) balance.
    pub async fn withdraw(&self) -> Result<PendingTx<'_, T>> {
        self.send(EvmCall::new(
            self.address,
            Auction::withdrawCall {}.abi_encode(),
            U256::ZERO,
        ))
        .await
    }

    /// Close the auction and pay out the beneficiary.
    pub async fn end_auction(&self) -> Result<PendingTx<'_, T>> {
        self.send(EvmCall::new(
            self.address,
            Auction::endAuctionCall {}.abi_encode(),
            U256::ZERO,
        ))
        .await
    }

    async fn send(&self, call: EvmCall) -> Result<PendingTx<'_, T>> {
        let hash = self.transport.send(call).await?;
        Ok(PendingTx {
            hash,
            transport: &self.transport,
        })
    }
}

#[async_trait(?Send)]
impl<T: EvmViewTransport> AuctionReader for AuctionContract<T> {
    async fn highest_bid(&self) -> Result<U256> {
        Ok(view_call(&self.transport, self.address, "highestBid", Auction::highestBidCall {})
            .await?
            ._0)
    }

    async fn highest_bidder(&self) -> Result<Address> {
        Ok(view_call(
            &self.transport,
            self.address,
            "highestBidder",
            Auction::highestBidderCall {},
        )
        .await?
        ._0)
    }

    async fn auction_end_time(&self) -> Result<u64> {
        let raw = view_call(
            &self.transport,
            self.address,
            "auctionEndTime",
            Auction::auctionEndTimeCall {},
        )
        .await?
        ._0;
        Ok(raw.saturating_to::<u64>())
    }

    async fn beneficiary(&self) -> Result<Address> {
        Ok(view_call(&self.transport, self.address, "beneficiary", Auction::beneficiaryCall {})
            .await?
            ._0)
    }

    async fn ended(&self) -> Result<bool> {
        Ok(view_call(&self.transport, self.address, "ended", Auction::endedCall {})
            .await?
            ._0)
    }

    async fn auction_type(&self) -> Result<u8> {
        Ok(view_call(&self.transport, self.address, "auctionType", Auction::auctionTypeCall {})
            .await?
            ._0)
    }

    // The shared interface declares both descriptive accessors; variants
    // that lack one revert on call, which the resilient layer contains.
    fn supports(&self, _field: OptionalField) -> bool {
        true
    }

    async fn optional_string(&self, field: OptionalField) -> Result<String> {
        match field {
            OptionalField::ItemName => {
                Ok(view_call(&self.transport, self.address, "itemName", Auction::itemNameCall {})
                    .await?
                    ._0)
            }
            OptionalField::ItemDescription => Ok(view_call(
                &self.transport,
                self.address,
                "itemDescription",
                Auction::itemDescriptionCall {},
            )
            .await?
            ._0),
        }
    }
}

/// Handle to the auction registry contract.
#[derive(Clone)]
pub struct RegistryContract<T> {
    address: Address,
    transport: T,
}

impl<T> RegistryContract<T> {
    pub fn new(address: Address, transport: T) -> Self {
        Self { address, transport }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait(?Send)]
impl<T: EvmViewTransport> RegistryReader for RegistryContract<T> {
    async fn auction_count(&self) -> Result<u64> {
        let raw = view_call(
            &self.transport,
            self.address,
            "getAuctionCount",
            AuctionRegistry::getAuctionCountCall {},
        )
        .await?
        ._0;
        Ok(raw.saturating_to::<u64>())
    }

    async fn auction_address(&self, index: u64) -> Result<Address> {
        Ok(view_call(
            &self.transport,
            self.address,
            "getAuction",
            AuctionRegistry::getAuctionCall {
                index: U256::from(index),
            },
        )
        .await?
        ._0)
    }
}
