use crate::{
    CorrectionDiagnostics, CorrectionError, CorrectionParams, CorrectionResult, FitSummary,
    PipelineKind,
};
use log::{debug, info, warn};
use pilegrid_chains::{chain_members, complete_chains, find_chains};
use pilegrid_core::{
    characteristic_spacing, estimate_direction, extract_points, CorrectionStats, Detection,
    ImageExtent, Point,
};
use pilegrid_fit::{fit_curve, grid_gap_candidates, CurveFit};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Geometric post-processor for pile detections.
///
/// Holds validated [`CorrectionParams`]; `correct` runs the chain pipeline
/// when `use_chain_search` is set and the RANSAC + grid pipeline otherwise.
#[derive(Clone, Debug)]
pub struct GeometryCorrector {
    params: CorrectionParams,
}

impl GeometryCorrector {
    /// Validate `params` and build a corrector.
    pub fn new(params: CorrectionParams) -> Result<Self, CorrectionError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &CorrectionParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, detections),
            fields(detections = detections.len(), chains = self.params.use_chain_search)
        )
    )]
    pub fn correct(&self, detections: &[Detection], extent: ImageExtent) -> CorrectionResult {
        if self.params.use_chain_search {
            self.correct_chains(detections)
        } else {
            self.correct_ransac(detections, extent)
        }
    }

    /// Snap centers onto a fitted row curve, then fill lattice gaps.
    pub fn correct_ransac(&self, detections: &[Detection], extent: ImageExtent) -> CorrectionResult {
        let params = &self.params;
        let mut diagnostics = CorrectionDiagnostics::new(PipelineKind::Ransac);
        if detections.is_empty() {
            warn!("no detections, skipping geometric correction");
            return empty_result(diagnostics);
        }

        let original_count = detections.len();
        info!("geometric correction of {original_count} detections");
        let mut points = extract_points(detections);

        if params.use_ransac && points.len() >= 3 {
            let spacing = characteristic_spacing(&points);
            let direction = estimate_direction(&points);
            diagnostics.spacing = spacing;
            diagnostics.direction = Some(direction);

            match fit_curve(&points, &params.curve_fit(spacing), Some(direction)) {
                Ok(fit) => {
                    diagnostics.curve_fit = Some(FitSummary::from(&fit));
                    if let CurveFit::Fitted {
                        points: fitted,
                        corrected,
                        ..
                    } = fit
                    {
                        info!("curve fit moved {corrected}/{original_count} centers");
                        points = fitted;
                    }
                }
                Err(err) => {
                    warn!("curve fit failed: {err}, keeping original centers");
                    diagnostics.curve_fit = Some(FitSummary::from(&err));
                }
            }
        }

        if params.use_grid_fill {
            let added = grid_gap_candidates(&points, extent, params.grid_spacing);
            diagnostics.grid_added = added.len();
            if !added.is_empty() {
                info!("grid fill added {} points", added.len());
            }
            points.extend(added);
        }

        let out: Vec<Detection> = points
            .iter()
            .enumerate()
            .map(|(i, p)| match detections.get(i) {
                Some(det) => det.recentered(*p),
                None => self.synthesize(*p),
            })
            .collect();

        let stats = CorrectionStats::from_counts(original_count, out.len());
        log_stats(&stats);
        CorrectionResult {
            detections: out,
            stats,
            diagnostics,
        }
    }

    /// Keep detections that belong to a row chain and interpolate missing
    /// piles inside each chain.
    pub fn correct_chains(&self, detections: &[Detection]) -> CorrectionResult {
        let params = &self.params;
        let mut diagnostics = CorrectionDiagnostics::new(PipelineKind::Chains);
        if detections.is_empty() {
            warn!("no detections, skipping chain correction");
            return empty_result(diagnostics);
        }

        let original_count = detections.len();
        info!("chain correction of {original_count} detections");
        let points = extract_points(detections);

        let Some(spacing) = characteristic_spacing(&points) else {
            debug!("a single detection cannot form a chain");
            return unchanged(detections, diagnostics);
        };
        let search = params.chain_search(spacing);
        diagnostics.spacing = Some(spacing);
        diagnostics.search_radius = Some(search.search_radius);

        let chains = find_chains(&points, &search);
        diagnostics.chains_found = chains.len();
        if chains.is_empty() {
            info!("no chains found, detections unchanged");
            return unchanged(detections, diagnostics);
        }

        let members = chain_members(&chains);
        let removed_count = original_count - members.len();
        let kept: Vec<Detection> = members.iter().map(|&i| detections[i].clone()).collect();
        let kept_points: Vec<Point> = members.iter().map(|&i| points[i]).collect();
        debug!("{removed_count} detections outside any chain dropped as noise");

        let rechained = find_chains(&kept_points, &search);
        diagnostics.chains_completed = rechained.len();

        // All centers coincide when the spacing is zero; nothing to interpolate.
        let added = if spacing > 0.0 {
            complete_chains(&kept_points, &rechained, spacing, params.chain_max_gap_ratio)
        } else {
            Vec::new()
        };

        let added_count = added.len();
        let mut out = kept;
        out.extend(added.into_iter().map(|p| self.synthesize(p)));

        let stats = CorrectionStats {
            original_count,
            corrected_count: out.len(),
            added_count,
            removed_count,
        };
        log_stats(&stats);
        CorrectionResult {
            detections: out,
            stats,
            diagnostics,
        }
    }

    fn synthesize(&self, center: Point) -> Detection {
        let s = &self.params.synthesis;
        Detection::from_center(center, s.width, s.height, s.confidence, s.category_id)
    }
}

fn empty_result(diagnostics: CorrectionDiagnostics) -> CorrectionResult {
    CorrectionResult {
        detections: Vec::new(),
        stats: CorrectionStats::default(),
        diagnostics,
    }
}

fn unchanged(detections: &[Detection], diagnostics: CorrectionDiagnostics) -> CorrectionResult {
    CorrectionResult {
        detections: detections.to_vec(),
        stats: CorrectionStats::from_counts(detections.len(), detections.len()),
        diagnostics,
    }
}

fn log_stats(stats: &CorrectionStats) {
    info!(
        "correction done: {} -> {} (added {}, removed {})",
        stats.original_count, stats.corrected_count, stats.added_count, stats.removed_count
    );
}

/// Run the RANSAC + grid pipeline, whatever `use_chain_search` says.
pub fn apply_geometric_correction(
    detections: &[Detection],
    extent: ImageExtent,
    params: &CorrectionParams,
) -> Result<CorrectionResult, CorrectionError> {
    let corrector = GeometryCorrector::new(params.clone())?;
    Ok(corrector.correct_ransac(detections, extent))
}

/// Run the chain pipeline, whatever `use_chain_search` says.
pub fn apply_chain_based_correction(
    detections: &[Detection],
    params: &CorrectionParams,
) -> Result<CorrectionResult, CorrectionError> {
    let corrector = GeometryCorrector::new(params.clone())?;
    Ok(corrector.correct_chains(detections))
}
