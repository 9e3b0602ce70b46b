// Cross-document ordering of selected sentences.
//
// Sentences are emitted by increasing relative position in their source
// document (ordinal / sentence count), so material from the start of
// articles leads the summary.

use crate::corpus::{Cluster, Document, Sentence};

/// Relative position of `sentence` within its document, in `[0, 1)`.
pub fn relative_position(sentence: &Sentence, cluster: &Cluster) -> f64 {
    let sentences = cluster
        .document(sentence.doc().document)
        .map(Document::len)
        .unwrap_or(1)
        .max(1);
    sentence.position() as f64 / sentences as f64
}

/// Order `selected` by relative position. Equal positions keep their selection order.
pub fn order_by_position<'a>(mut selected: Vec<&'a Sentence>, cluster: &Cluster) -> Vec<&'a Sentence> {
    let mut ordered = Vec::with_capacity(selected.len());
    while !selected.is_empty() {
        let mut top = 0;
        let mut min_position = f64::INFINITY;
        for (i, sentence) in selected.iter().enumerate() {
            let position = relative_position(sentence, cluster);
            if position < min_position {
                top = i;
                min_position = position;
            }
        }
        ordered.push(selected.remove(top));
    }
    ordered
}
