//! Offline catalog ingestion
//!
//! Reads row-oriented product CSVs, renders the embeddable field subset as
//! text, splits it into bounded chunks, and prepares them for the vector
//! index. Runs out-of-band from the chat service.

pub mod catalog;
pub mod splitter;

pub use catalog::{load_catalog, ProductRecord, EMBED_FIELDS};
pub use splitter::LineSplitter;
