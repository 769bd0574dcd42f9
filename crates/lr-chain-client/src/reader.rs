//! Read-side seams of the auction and registry contracts.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::Result;
use crate::resilient::attempt;

/// Optional descriptive accessors an auction variant may or may not carry.
///
/// A reader that reports `false` for a field is never asked for it, so no
/// network call happens for variants known to lack the accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionalField {
    ItemName,
    ItemDescription,
}

impl OptionalField {
    pub fn label(self) -> &'static str {
        match self {
            OptionalField::ItemName => "itemName",
            OptionalField::ItemDescription => "itemDescription",
        }
    }
}

/// Zero-argument accessors of a deployed auction contract.
#[async_trait(?Send)]
pub trait AuctionReader {
    async fn highest_bid(&self) -> Result<U256>;
    async fn highest_bidder(&self) -> Result<Address>;
    async fn auction_end_time(&self) -> Result<u64>;
    async fn beneficiary(&self) -> Result<Address>;
    async fn ended(&self) -> Result<bool>;
    async fn auction_type(&self) -> Result<u8>;

    /// Whether this handle declares support for an optional accessor.
    fn supports(&self, field: OptionalField) -> bool;

    async fn optional_string(&self, field: OptionalField) -> Result<String>;
}

/// Enumeration surface of the auction registry.
#[async_trait(?Send)]
pub trait RegistryReader {
    async fn auction_count(&self) -> Result<u64>;
    async fn auction_address(&self, index: u64) -> Result<Address>;
}

/// Read an optional textual accessor, short-circuiting to `None` without a
/// network call when the handle does not declare the capability.
pub async fn probe_optional_string<R>(reader: &R, field: OptionalField) -> Option<String>
where
    R: AuctionReader + ?Sized,
{
    if !reader.supports(field) {
        return None;
    }
    attempt(field.label(), reader.optional_string(field)).await
}
