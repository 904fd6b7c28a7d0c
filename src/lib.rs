//! simprov: merge provisioning work orders into a master customer file and
//! assign each changed record a ZIP from a capacity-limited reference list.
//!
//! The pipeline is three delimited tables in, two out: `table` parses raw
//! text, `merge` joins work orders onto master rows by `mdn` and pulls ZIP
//! assignments from `alloc`, and the outputs are serialized with fixed
//! column orders. `fetch` can pull the master and ZIP seed files over HTTP.

pub mod alloc;
pub mod fetch;
pub mod merge;
pub mod table;
