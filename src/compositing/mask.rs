use super::types::{ClassificationMask, SelectionMask};

/// Threshold a classification mask into a selection mask
///
/// A pixel is selected only when its score is strictly greater than
/// `threshold`; a score equal to the threshold counts as background.
/// Any threshold is accepted: one outside the score range simply selects
/// everything or nothing. NaN scores are never selected.
pub fn normalize(mask: &ClassificationMask, threshold: f32) -> SelectionMask {
    let _span = tracing::debug_span!("normalize", threshold).entered();
    SelectionMask::new(mask.scores().mapv(|score| score > threshold))
}
