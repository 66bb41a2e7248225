use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A point in image-pixel coordinates.
pub type Point = Point2<f64>;

/// Image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageExtent {
    pub height: f64,
    pub width: f64,
}

impl ImageExtent {
    pub fn new(height: f64, width: f64) -> Self {
        Self { height, width }
    }
}

/// One detector output box.
///
/// `bbox` is `[x, y, width, height]` with a top-left origin. The center is
/// computed once at construction (`x + width / 2`, `y + height / 2`) unless
/// it is explicitly overridden with [`Detection::with_center`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DetectionRecord")]
pub struct Detection {
    pub bbox: [f64; 4],
    pub confidence: f64,
    pub category_id: u32,
    pub category_name: Option<String>,
    pub x_center: f64,
    pub y_center: f64,
}

/// Wire form of [`Detection`]: the center fields are optional and derived
/// from `bbox` when both are absent. Giving only one of them is an error.
#[derive(Deserialize)]
struct DetectionRecord {
    bbox: [f64; 4],
    confidence: f64,
    category_id: u32,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    x_center: Option<f64>,
    #[serde(default)]
    y_center: Option<f64>,
}

impl TryFrom<DetectionRecord> for Detection {
    type Error = &'static str;

    fn try_from(rec: DetectionRecord) -> Result<Self, Self::Error> {
        let mut det = Detection::new(rec.bbox, rec.confidence, rec.category_id);
        det.category_name = rec.category_name;
        match (rec.x_center, rec.y_center) {
            (Some(x), Some(y)) => Ok(det.with_center(x, y)),
            (None, None) => Ok(det),
            _ => Err("x_center and y_center must be given together"),
        }
    }
}

impl Detection {
    pub fn new(bbox: [f64; 4], confidence: f64, category_id: u32) -> Self {
        Self {
            bbox,
            confidence,
            category_id,
            category_name: None,
            x_center: bbox[0] + bbox[2] / 2.0,
            y_center: bbox[1] + bbox[3] / 2.0,
        }
    }

    /// Build a detection of the given size centered on `center`.
    pub fn from_center(
        center: Point,
        width: f64,
        height: f64,
        confidence: f64,
        category_id: u32,
    ) -> Self {
        Self::new(
            [
                center.x - width / 2.0,
                center.y - height / 2.0,
                width,
                height,
            ],
            confidence,
            category_id,
        )
    }

    pub fn with_category_name(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    /// Override the derived center.
    pub fn with_center(mut self, x_center: f64, y_center: f64) -> Self {
        self.x_center = x_center;
        self.y_center = y_center;
        self
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.bbox[2]
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bbox[3]
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x_center, self.y_center)
    }

    /// Same box size and attributes, moved so that its center is `center`.
    pub fn recentered(&self, center: Point) -> Self {
        Self {
            bbox: [
                center.x - self.width() / 2.0,
                center.y - self.height() / 2.0,
                self.width(),
                self.height(),
            ],
            confidence: self.confidence,
            category_id: self.category_id,
            category_name: self.category_name.clone(),
            x_center: center.x,
            y_center: center.y,
        }
    }
}

/// Project detections onto their box centers, preserving order.
pub fn extract_points(detections: &[Detection]) -> Vec<Point> {
    detections.iter().map(Detection::center).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_is_derived_from_bbox() {
        let det = Detection::new([10.0, 20.0, 50.0, 50.0], 0.8, 0);
        assert_relative_eq!(det.x_center, 35.0);
        assert_relative_eq!(det.y_center, 45.0);
    }

    #[test]
    fn explicit_center_overrides_derivation() {
        let det = Detection::new([0.0, 0.0, 10.0, 10.0], 0.9, 1).with_center(7.0, 3.0);
        assert_eq!(det.center(), Point::new(7.0, 3.0));
        assert_eq!(det.bbox, [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn recentered_keeps_size_and_attributes() {
        let det = Detection::new([10.0, 20.0, 40.0, 30.0], 0.7, 2).with_category_name("pile");
        let moved = det.recentered(Point::new(100.0, 100.0));
        assert_eq!(moved.bbox, [80.0, 85.0, 40.0, 30.0]);
        assert_eq!(moved.confidence, 0.7);
        assert_eq!(moved.category_id, 2);
        assert_eq!(moved.category_name.as_deref(), Some("pile"));
        assert_eq!(moved.center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn deserializes_without_center_fields() {
        let json = r#"{"bbox":[100.0,150.0,50.0,50.0],"confidence":0.7,"category_id":0}"#;
        let det: Detection = serde_json::from_str(json).expect("parse");
        assert_eq!(det.center(), Point::new(125.0, 175.0));
        assert!(det.category_name.is_none());
    }

    #[test]
    fn deserializes_explicit_center() {
        let json = r#"{"bbox":[0.0,0.0,10.0,10.0],"confidence":0.5,"category_id":3,
            "category_name":"pile","x_center":1.0,"y_center":2.0}"#;
        let det: Detection = serde_json::from_str(json).expect("parse");
        assert_eq!(det.center(), Point::new(1.0, 2.0));
        assert_eq!(det.category_name.as_deref(), Some("pile"));
    }

    #[test]
    fn half_a_center_is_rejected() {
        let only_x = r#"{"bbox":[0.0,0.0,10.0,10.0],"confidence":0.5,"category_id":0,
            "x_center":1.0}"#;
        let only_y = r#"{"bbox":[0.0,0.0,10.0,10.0],"confidence":0.5,"category_id":0,
            "y_center":2.0}"#;

        for json in [only_x, only_y] {
            let err = serde_json::from_str::<Detection>(json).unwrap_err();
            assert!(err.to_string().contains("x_center and y_center"), "{err}");
        }
    }

    #[test]
    fn extract_points_preserves_order() {
        let dets = vec![
            Detection::new([0.0, 0.0, 2.0, 2.0], 0.5, 0),
            Detection::new([10.0, 0.0, 2.0, 4.0], 0.5, 0),
        ];
        let pts = extract_points(&dets);
        assert_eq!(pts, vec![Point::new(1.0, 1.0), Point::new(11.0, 2.0)]);
        assert!(extract_points(&[]).is_empty());
    }
}
