//! Turning object-detector output into seed points
//!
//! Listing pages seed from every surviving detection. Detail pages use a single
//! seed inside the largest detection, scaled from screenshot pixels to CSS
//! pixels.

use tracing::debug;

use crate::domain::{DetectionBox, SeedPoint};
use crate::inference::filter_overlapping;
use crate::infrastructure::config::DetectionConfig;
use crate::infrastructure::error::{ExtractionError, ExtractionResult};

/// Score filter, overlap suppression, then one point just inside each surviving
/// box's top-left corner.
pub fn seeds_from_detections(boxes: &[DetectionBox], config: &DetectionConfig) -> ExtractionResult<Vec<SeedPoint>> {
    validate_boxes(boxes)?;

    let confident: Vec<DetectionBox> = boxes
        .iter()
        .filter(|detection| detection.score >= config.min_score)
        .copied()
        .collect();
    let survivors = filter_overlapping(&confident, config.iou_threshold)?;
    debug!(
        "{} detections, {} above score {}, {} after overlap filtering",
        boxes.len(),
        confident.len(),
        config.min_score,
        survivors.len()
    );

    Ok(survivors
        .iter()
        .map(|detection| {
            SeedPoint::point(
                detection.xmin + config.seed_offset,
                detection.ymin + config.seed_offset,
            )
        })
        .collect())
}

/// Seed for a detail page: `detail_seed_offset` inside the top-left corner of
/// the largest confident detection, divided by the device pixel ratio.
///
/// The first box wins a tie on area. `Ok(None)` when no box clears `min_score`.
pub fn detail_seed(
    boxes: &[DetectionBox],
    config: &DetectionConfig,
    device_pixel_ratio: f64,
) -> ExtractionResult<Option<SeedPoint>> {
    validate_boxes(boxes)?;
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return Err(ExtractionError::invalid_input(format!(
            "device pixel ratio must be positive, got {device_pixel_ratio}"
        )));
    }

    let largest = boxes
        .iter()
        .filter(|detection| detection.score >= config.min_score)
        .fold(None::<&DetectionBox>, |best, detection| match best {
            Some(best) if best.area() >= detection.area() => Some(best),
            _ => Some(detection),
        });

    let Some(largest) = largest else {
        debug!("No detection above score {} for a detail seed", config.min_score);
        return Ok(None);
    };
    debug!("Detail seed from {:?} at device pixel ratio {}", largest, device_pixel_ratio);

    Ok(Some(SeedPoint::point(
        (largest.xmin + config.detail_seed_offset) / device_pixel_ratio,
        (largest.ymin + config.detail_seed_offset) / device_pixel_ratio,
    )))
}

fn validate_boxes(boxes: &[DetectionBox]) -> ExtractionResult<()> {
    for (index, detection) in boxes.iter().enumerate() {
        if let Some(reason) = detection.malformed_reason() {
            return Err(ExtractionError::invalid_input(format!("detection {index}: {reason}")));
        }
    }
    Ok(())
}
