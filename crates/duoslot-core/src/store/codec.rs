//! Chunk codec: split by Unicode code point, join in index order.

/// Split `value` into chunks of at most `chunk_size` code points.
///
/// Never splits inside a code point. The empty value yields a single empty
/// chunk, so every value has at least one chunk. A `chunk_size` of zero is
/// treated as one.
pub fn split_chunks(value: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(value.len() / chunk_size + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in value.char_indices() {
        if count == chunk_size {
            chunks.push(value[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(value[start..].to_string());

    chunks
}

/// Concatenate chunks in index order.
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks.iter().map(AsRef::as_ref).collect()
}
