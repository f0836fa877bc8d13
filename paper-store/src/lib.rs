//! Read/write access to paper records and QA records kept in Supabase.
//!
//! Papers (with their generated notes) are written by the notes pipeline;
//! this crate only looks them up and appends question/answer rows.

mod client;
mod config;
mod errors;
mod rows;

pub use client::PaperStoreClient;
pub use config::{DEFAULT_PAPERS_TABLE, DEFAULT_QA_TABLE, PaperStoreConfig};
pub use errors::{PaperStoreError, StoreResult};
pub use rows::{NoteRow, PaperRow, QaInsert};
