use image::GrayImage;
use log::{debug, info, warn};
use rayon::prelude::*;
use silkscan_core::{BoardSpace, Layer, LayerError};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{EmptyReason, LocalizeError, Localization, LocalizerParams, Progress, RunHooks};
use crate::{
    binarize, rasterize, reconcile, DesignatorHit, DesignatorSet, LayerScan, Pass, RasterFrame,
    RecognizeError, Rejection, TextRecognizer,
};

/// What one silkscreen layer contributed to a run.
enum LayerOutcome {
    Scanned(LayerScan),
    Failed(LayerError),
    Cancelled,
}

/// Silkscreen designator localizer.
///
/// Holds only configuration. Every call to [`DesignatorLocalizer::localize`]
/// owns its worker pool, rasters and partial results, so overlapping runs
/// never see each other's state.
#[derive(Clone, Debug)]
pub struct DesignatorLocalizer {
    params: LocalizerParams,
}

impl DesignatorLocalizer {
    pub fn new(params: LocalizerParams) -> Result<Self, LocalizeError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &LocalizerParams {
        &self.params
    }

    /// Locate BOM designators on the silkscreen layers of a unified board.
    ///
    /// Layers are scanned in parallel; the merge visits top silkscreen
    /// before bottom and the upright pass before the rotated one, whatever
    /// order the workers finish in. A layer whose rasterization or
    /// recognition fails is logged and contributes nothing.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(layers = layers.len(), bom = valid.len()))
    )]
    pub fn localize<R: TextRecognizer + ?Sized>(
        &self,
        layers: &[Layer],
        space: &BoardSpace,
        valid: &DesignatorSet,
        recognizer: &R,
        hooks: RunHooks<'_>,
    ) -> Result<Localization, LocalizeError> {
        let mut silkscreen: Vec<&Layer> = layers
            .iter()
            .filter(|l| l.layer_type.is_silkscreen())
            .collect();
        if silkscreen.is_empty() {
            info!("no silkscreen layer among {} layers", layers.len());
            return Ok(Localization::Empty {
                reason: EmptyReason::NoSilkscreen,
            });
        }
        silkscreen.sort_by_key(|l| l.layer_type.silkscreen_rank());

        if hooks.cancelled() {
            return Ok(cancelled());
        }
        if valid.is_permissive() {
            info!("empty designator list, accepting any token");
        }
        hooks.emit(Progress::Started {
            layers: silkscreen.len(),
        });

        let frame = RasterFrame::new(
            space,
            self.params.target_resolution,
            self.params.max_upscale,
        );
        debug!(
            "raster {}x{} px, scale {:?} px per plotter unit",
            frame.width(),
            frame.height(),
            frame.scale()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.worker_threads.unwrap_or(0))
            .thread_name(|i| format!("silkscan-ocr-{i}"))
            .build()?;

        let outcomes: Vec<LayerOutcome> = pool.install(|| {
            silkscreen
                .par_iter()
                .map(|layer| self.scan_layer(layer, &frame, valid, recognizer, &hooks))
                .collect()
        });

        if hooks.cancelled() || outcomes.iter().any(|o| matches!(o, LayerOutcome::Cancelled)) {
            info!("localization cancelled");
            return Ok(cancelled());
        }

        let scans: Vec<LayerScan> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                LayerOutcome::Scanned(scan) => Some(scan),
                LayerOutcome::Failed(err) => {
                    warn!("skipping layer: {err}");
                    None
                }
                LayerOutcome::Cancelled => None,
            })
            .collect();

        let designators = reconcile(&scans);
        info!(
            "located {} designators on {} silkscreen layers",
            designators.len(),
            scans.len()
        );
        hooks.emit(Progress::Finished {
            found: designators.len(),
        });
        Ok(Localization::Done { designators })
    }

    fn scan_layer<R: TextRecognizer + ?Sized>(
        &self,
        layer: &Layer,
        frame: &RasterFrame,
        valid: &DesignatorSet,
        recognizer: &R,
        hooks: &RunHooks<'_>,
    ) -> LayerOutcome {
        if hooks.cancelled() {
            return LayerOutcome::Cancelled;
        }
        hooks.emit(Progress::LayerStarted {
            filename: layer.filename.clone(),
            layer_type: layer.layer_type,
        });

        let binary = match rasterize(&layer.graphic, frame, self.params.anti_alias) {
            Ok(rgb) => binarize(&rgb, self.params.threshold),
            Err(err) => {
                return LayerOutcome::Failed(LayerError::Raster {
                    filename: layer.filename.clone(),
                    reason: err.to_string(),
                })
            }
        };

        let run = |pass| self.run_pass(pass, layer, &binary, frame, valid, recognizer, hooks);
        let (upright, rotated) = rayon::join(|| run(Pass::Upright), || run(Pass::Rotated90));

        let mut scan = LayerScan::new(layer.filename.as_str(), layer.layer_type);
        for (pass, result) in Pass::ORDER.into_iter().zip([upright, rotated]) {
            match result {
                Ok(Some(hits)) => *scan.hits_mut(pass) = hits,
                Ok(None) => return LayerOutcome::Cancelled,
                Err(err) => {
                    return LayerOutcome::Failed(LayerError::Recognize {
                        filename: layer.filename.clone(),
                        reason: format!("{pass} pass: {err}"),
                    })
                }
            }
        }

        let found = scan.upright.len() + scan.rotated.len();
        info!(
            "{} ({}): {} upright, {} rotated reads",
            layer.filename,
            layer.layer_type,
            scan.upright.len(),
            scan.rotated.len()
        );
        hooks.emit(Progress::LayerFinished {
            filename: layer.filename.clone(),
            found,
        });
        LayerOutcome::Scanned(scan)
    }

    /// One recognition pass. `Ok(None)` means the run was cancelled first.
    #[allow(clippy::too_many_arguments)]
    fn run_pass<R: TextRecognizer + ?Sized>(
        &self,
        pass: Pass,
        layer: &Layer,
        binary: &GrayImage,
        frame: &RasterFrame,
        valid: &DesignatorSet,
        recognizer: &R,
        hooks: &RunHooks<'_>,
    ) -> Result<Option<Vec<DesignatorHit>>, RecognizeError> {
        if hooks.cancelled() {
            return Ok(None);
        }
        let words = recognizer.recognize(&pass.prepare(binary))?;

        let mut hits = Vec::new();
        for word in words {
            match valid.accept(&word.text, self.params.min_designator_len) {
                Ok(designator) => {
                    let center = pass.to_source(word.bbox.center(), binary.height());
                    let p = frame.raster_to_board(center);
                    debug!(
                        "{} [{pass}] {designator} at ({:.4}, {:.4})",
                        layer.filename, p.x, p.y
                    );
                    hits.push(DesignatorHit {
                        designator,
                        x: p.x,
                        y: p.y,
                    });
                }
                Err(Rejection::TooShort { token }) => {
                    debug!("{} [{pass}] dropped {token:?}: too short", layer.filename);
                }
                Err(Rejection::NotInBom { token }) => {
                    debug!("{} [{pass}] dropped {token:?}: not in BOM", layer.filename);
                }
            }
        }

        hooks.emit(Progress::PassFinished {
            filename: layer.filename.clone(),
            pass,
            accepted: hits.len(),
        });
        Ok(Some(hits))
    }
}

fn cancelled() -> Localization {
    Localization::Empty {
        reason: EmptyReason::Cancelled,
    }
}

/// Run the localizer with default parameters.
pub fn localize_designators<R: TextRecognizer + ?Sized>(
    layers: &[Layer],
    space: &BoardSpace,
    valid: &DesignatorSet,
    recognizer: &R,
    on_progress: Option<&(dyn Fn(&Progress) + Sync)>,
) -> Result<Localization, LocalizeError> {
    let hooks = RunHooks {
        on_progress,
        cancel: None,
    };
    DesignatorLocalizer::new(LocalizerParams::default())?.localize(
        layers, space, valid, recognizer, hooks,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelBox, RecognizedWord};

    use nalgebra::Point2;
    use silkscan_core::{rect_polygon, LayerType, VectorGraphic};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports fixed words and counts calls.
    struct Scripted {
        words: Vec<RecognizedWord>,
        calls: AtomicUsize,
    }

    impl TextRecognizer for Scripted {
        fn recognize(&self, _: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.words.clone())
        }
    }

    fn layer(name: &str, layer_type: LayerType, space: BoardSpace) -> Layer {
        let mut graphic = VectorGraphic::default();
        graphic.push(rect_polygon(Point2::new(5000.0, 5000.0), 1000.0, 1000.0));
        Layer {
            filename: name.to_string(),
            layer_type,
            graphic,
            frame: space,
            visible: true,
        }
    }

    fn space() -> BoardSpace {
        BoardSpace::from_native(0.0, 0.0, 10.0, 10.0).expect("space")
    }

    #[test]
    fn no_silkscreen_is_empty_without_calling_the_engine() {
        let space = space();
        let layers = [layer("a.gtl", LayerType::TopCopper, space)];
        let ocr = Scripted {
            words: Vec::new(),
            calls: AtomicUsize::new(0),
        };
        let out = localize_designators(&layers, &space, &DesignatorSet::permissive(), &ocr, None)
            .expect("run");
        assert_eq!(
            out,
            Localization::Empty {
                reason: EmptyReason::NoSilkscreen
            }
        );
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn both_passes_run_per_silkscreen_layer() {
        let space = space();
        let layers = [
            layer("a.gto", LayerType::TopSilkscreen, space),
            layer("a.gbo", LayerType::BottomSilkscreen, space),
            layer("a.gtl", LayerType::TopCopper, space),
        ];
        let ocr = Scripted {
            words: vec![RecognizedWord::new("r1", PixelBox::new(0.0, 0.0, 10.0, 10.0))],
            calls: AtomicUsize::new(0),
        };
        let params = LocalizerParams {
            target_resolution: 200,
            worker_threads: Some(2),
            ..Default::default()
        };
        let out = DesignatorLocalizer::new(params)
            .expect("params")
            .localize(&layers, &space, &DesignatorSet::from_bom(["R1"]), &ocr, RunHooks::default())
            .expect("run");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 4);
        let map = out.into_map();
        assert_eq!(map["R1"].layer_type, LayerType::TopSilkscreen);
    }

    #[test]
    fn invalid_params_are_rejected_up_front() {
        let params = LocalizerParams {
            target_resolution: 0,
            ..Default::default()
        };
        assert!(matches!(
            DesignatorLocalizer::new(params),
            Err(LocalizeError::ZeroResolution)
        ));
    }
}
