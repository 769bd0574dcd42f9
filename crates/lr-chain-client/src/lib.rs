//! Chain client for the Lanceiro auction pages.
//!
//! Everything here is written against abstract EVM transports so the
//! reconciliation core runs identically under the browser provider bridge
//! and under test mocks.

pub mod contracts;
pub mod countdown;
pub mod error;
pub mod events;
pub mod reader;
pub mod reconcile;
pub mod registry;
pub mod resilient;
pub mod transport;

pub use contracts::{Auction, AuctionContract, AuctionRegistry, PendingTx, RegistryContract};
pub use countdown::CountdownPhase;
pub use error::{ChainError, Result};
pub use events::{AuctionEvent, poll_events};
pub use reader::{AuctionReader, OptionalField, RegistryReader, probe_optional_string};
pub use reconcile::{PassSequencer, reconcile, summarize};
pub use registry::load_summaries;
pub use resilient::attempt;
pub use transport::{EvmCall, EvmLogTransport, EvmSubmitTransport, EvmViewTransport, RawLog};
