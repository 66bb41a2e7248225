//! Flat center/size exchange records.
//!
//! The surrounding application hands points to downstream tools as
//! `{x_center, y_center, width, height, confidence}` records rather than
//! top-left boxes.

use crate::Detection;
use serde::{Deserialize, Serialize};

/// Confidence given to a record that carries none.
pub const SGF_DEFAULT_CONFIDENCE: f64 = 0.5;

fn default_confidence() -> f64 {
    SGF_DEFAULT_CONFIDENCE
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SgfRecord {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl From<&Detection> for SgfRecord {
    fn from(det: &Detection) -> Self {
        Self {
            x_center: det.x_center,
            y_center: det.y_center,
            width: det.width(),
            height: det.height(),
            confidence: det.confidence,
        }
    }
}

impl SgfRecord {
    /// Convert back into a top-left box detection of class `category_id`.
    pub fn to_detection(&self, category_id: u32) -> Detection {
        Detection::new(
            [
                self.x_center - self.width / 2.0,
                self.y_center - self.height / 2.0,
                self.width,
                self.height,
            ],
            self.confidence,
            category_id,
        )
    }
}

pub fn detections_to_sgf(detections: &[Detection]) -> Vec<SgfRecord> {
    detections.iter().map(SgfRecord::from).collect()
}

pub fn sgf_to_detections(records: &[SgfRecord], category_id: u32) -> Vec<Detection> {
    records.iter().map(|r| r.to_detection(category_id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_carry_center_and_size() {
        let dets = vec![
            Detection::new([10.0, 20.0, 50.0, 50.0], 0.8, 0),
            Detection::new([100.0, 150.0, 40.0, 60.0], 0.7, 0),
        ];
        let recs = detections_to_sgf(&dets);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].x_center, 35.0);
        assert_eq!(recs[0].y_center, 45.0);
        assert_eq!(recs[1].width, 40.0);
        assert_eq!(recs[1].height, 60.0);
        assert_eq!(recs[1].confidence, 0.7);
    }

    #[test]
    fn records_become_top_left_boxes() {
        let recs = [SgfRecord {
            x_center: 125.0,
            y_center: 175.0,
            width: 50.0,
            height: 50.0,
            confidence: 0.7,
        }];
        let dets = sgf_to_detections(&recs, 4);
        assert_eq!(dets[0].bbox, [100.0, 150.0, 50.0, 50.0]);
        assert_eq!(dets[0].category_id, 4);
        assert_eq!(dets[0].x_center, 125.0);
    }

    #[test]
    fn missing_confidence_defaults_to_half() {
        let json = r#"{"x_center":1.0,"y_center":2.0,"width":4.0,"height":4.0}"#;
        let rec: SgfRecord = serde_json::from_str(json).expect("parse");
        assert_eq!(rec.confidence, 0.5);
    }
}
