use std::collections::HashMap;

/// Maps a fingerprint value to the offset of its first occurrence in the
/// stream it was built from.
///
/// This is the inverted index used by [crate::comparator::compare_pair] to
/// discover candidate alignment shifts between two fingerprint streams in
/// O(n) time, instead of comparing every offset pair.
pub type InvertedIndex = HashMap<u32, usize>;

/// Builds an [InvertedIndex] over `stream`. Later duplicate values are
/// ignored; only the first occurrence of each value is recorded.
pub fn build_inverted_index(stream: &[u32]) -> InvertedIndex {
    let mut index = InvertedIndex::with_capacity(stream.len());
    for (offset, &value) in stream.iter().enumerate() {
        index.entry(value).or_insert(offset);
    }
    index
}
