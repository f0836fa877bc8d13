//! Turns retrieved chunks and stored notes into the two prompt text blocks.

use crate::types::{Note, RetrievedChunk};

/// Separator between chunk texts (a blank line).
pub const CHUNK_SEPARATOR: &str = "\n\n";
/// Separator between notes.
pub const NOTE_SEPARATOR: &str = "\n";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledContext {
    /// Chunk texts in retrieval order. Also the persisted context snapshot.
    pub context: String,
    pub notes: String,
}

impl AssembledContext {
    /// Combined size in characters, used for logging and the soft warning.
    pub fn char_len(&self) -> usize {
        self.context.chars().count() + self.notes.chars().count()
    }
}

/// Concatenates chunks and notes as-is: no reordering, dedup or truncation.
pub fn assemble(chunks: &[RetrievedChunk], notes: &[Note]) -> AssembledContext {
    let context = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR);
    let notes = notes
        .iter()
        .map(|n| n.note.as_str())
        .collect::<Vec<_>>()
        .join(NOTE_SEPARATOR);
    AssembledContext { context, notes }
}
