//! Port definitions: interfaces the reader core exposes to adapters.

pub mod analysis;
pub mod history;
