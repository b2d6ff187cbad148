//! Suppression of overlapping detections
//!
//! Boxes are visited in input order. A box that has not been suppressed yet
//! is compared with every later box, and each pair whose IoU exceeds the
//! threshold marks its lower-scoring member as suppressed. On equal scores the
//! earlier box is the one dropped. A suppressed box never suppresses others.
//! Quadratic in the number of boxes, which stays in the tens per page.

use crate::domain::DetectionBox;
use crate::infrastructure::error::{ExtractionError, ExtractionResult};

pub fn filter_overlapping(boxes: &[DetectionBox], iou_threshold: f64) -> ExtractionResult<Vec<DetectionBox>> {
    if !(0.0..=1.0).contains(&iou_threshold) {
        return Err(ExtractionError::invalid_input(format!(
            "IoU threshold {iou_threshold} outside [0, 1]"
        )));
    }
    if let Some((index, reason)) = boxes
        .iter()
        .enumerate()
        .find_map(|(i, b)| b.malformed_reason().map(|reason| (i, reason)))
    {
        return Err(ExtractionError::invalid_input(format!("box {index}: {reason}")));
    }

    let mut suppressed = vec![false; boxes.len()];
    for i in 0..boxes.len() {
        if suppressed[i] {
            continue;
        }
        for j in (i + 1)..boxes.len() {
            if boxes[i].iou(&boxes[j]) > iou_threshold {
                if boxes[i].score > boxes[j].score {
                    suppressed[j] = true;
                } else {
                    suppressed[i] = true;
                }
            }
        }
    }

    Ok(boxes
        .iter()
        .zip(suppressed)
        .filter(|(_, dropped)| !dropped)
        .map(|(b, _)| *b)
        .collect())
}
