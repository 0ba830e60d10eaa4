/// Cosine similarity between two vectors.
///
/// Returns `f32::NEG_INFINITY` when either vector has zero magnitude or the
/// dimensions differ, so degenerate embeddings rank after every real score
/// instead of poisoning the ordering with NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return f32::NEG_INFINITY;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return f32::NEG_INFINITY;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
