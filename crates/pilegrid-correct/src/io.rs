//! JSON configuration and report helpers for correction runs.

use crate::{
    CorrectionDiagnostics, CorrectionError, CorrectionParams, CorrectionResult, GeometryCorrector,
};
use pilegrid_core::{sgf_to_detections, CorrectionStats, Detection, ImageExtent, SgfRecord};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum CorrectionIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Layout of the detections file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionFormat {
    /// Array of `{bbox: [x, y, w, h], confidence, category_id, ...}` records.
    #[default]
    Coco,
    /// Array of `{x_center, y_center, width, height, confidence}` records.
    Sgf,
}

/// Configuration of a correction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionConfig {
    pub detections_path: String,
    #[serde(default)]
    pub format: DetectionFormat,
    /// Class assigned to SGF records, which carry none.
    #[serde(default)]
    pub category_id: u32,
    pub image: ImageExtent,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub params: CorrectionParams,
}

impl CorrectionConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CorrectionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CorrectionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("pilegrid_report.json"))
    }

    /// Read the detections file in the configured format.
    pub fn load_detections(&self) -> Result<Vec<Detection>, CorrectionIoError> {
        let raw = fs::read_to_string(&self.detections_path)?;
        let detections = match self.format {
            DetectionFormat::Coco => serde_json::from_str(&raw)?,
            DetectionFormat::Sgf => {
                let records: Vec<SgfRecord> = serde_json::from_str(&raw)?;
                sgf_to_detections(&records, self.category_id)
            }
        };
        Ok(detections)
    }

    /// Build a corrector from the configured parameters.
    pub fn build_corrector(&self) -> Result<GeometryCorrector, CorrectionError> {
        GeometryCorrector::new(self.params.clone())
    }
}

/// Summary of a correction run as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionReport {
    pub config_path: String,
    pub detections_path: String,
    pub image: ImageExtent,
    pub params: CorrectionParams,
    pub stats: CorrectionStats,
    pub diagnostics: CorrectionDiagnostics,
    pub detections: Vec<Detection>,
}

impl CorrectionReport {
    pub fn new(cfg: &CorrectionConfig, config_path: &Path, result: CorrectionResult) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            detections_path: cfg.detections_path.clone(),
            image: cfg.image,
            params: cfg.params.clone(),
            stats: result.stats,
            diagnostics: result.diagnostics,
            detections: result.detections,
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CorrectionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CorrectionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_sgf_detections() {
        let dir = tempfile::tempdir().unwrap();
        let det_path = dir.path().join("points.json");
        fs::write(
            &det_path,
            r#"[{"x_center": 100, "y_center": 50, "width": 20, "height": 10},
                {"x_center": 140, "y_center": 52, "width": 20, "height": 10, "confidence": 0.8}]"#,
        )
        .unwrap();

        let cfg: CorrectionConfig = serde_json::from_value(serde_json::json!({
            "detections_path": det_path.to_string_lossy(),
            "format": "sgf",
            "category_id": 3,
            "image": {"height": 480, "width": 640},
        }))
        .unwrap();
        let dets = cfg.load_detections().unwrap();

        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].bbox, [90.0, 45.0, 20.0, 10.0]);
        assert_eq!(dets[0].confidence, 0.5);
        assert_eq!(dets[1].confidence, 0.8);
        assert!(dets.iter().all(|d| d.category_id == 3));
        assert_eq!(cfg.params, CorrectionParams::default());
        assert_eq!(cfg.output_path(), PathBuf::from("pilegrid_report.json"));
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cfg = CorrectionConfig {
            detections_path: "dets.json".into(),
            format: DetectionFormat::Coco,
            category_id: 0,
            image: ImageExtent::new(1080.0, 1920.0),
            output_path: Some("out.json".into()),
            params: CorrectionParams::chains(),
        };

        cfg.write_json(&path).unwrap();
        let back = CorrectionConfig::load_json(&path).unwrap();

        assert_eq!(back.params, cfg.params);
        assert_eq!(back.image, cfg.image);
        assert_eq!(back.output_path(), PathBuf::from("out.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CorrectionConfig::load_json("/nonexistent/pilegrid.json").unwrap_err();
        assert!(matches!(err, CorrectionIoError::Io(_)));
    }
}
