//! Search state, its URL encoding, and state transitions.

pub mod codec;
mod events;
mod state;

pub use codec::{decode, encode, merge};
pub use events::{normalize_query, reduce, Facet, SearchEvent};
pub use state::{SearchState, SortKey, SortOrder, MATCH_ALL};
