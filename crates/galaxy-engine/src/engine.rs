//! The population engine.
//!
//! [`PopulationEngine`] is the primary user-facing API. Each call to
//! [`step()`](PopulationEngine::step) advances to the next sample time:
//! form new cohorts → build the population snapshot → synthesize the SED if
//! any product reads it → hand the step context to every product. The
//! snapshot and SED are dropped at the end of the step; only the products
//! keep state.
//!
//! # State machine
//!
//! `Initialized → Running { next } → Finalized`. The engine finalizes after
//! the last sample time or on the first error, after which `step()` returns
//! `Ok(None)`.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use galaxy_atmos::{AtmosphereLibrary, SpectralSynthesizer};
use galaxy_core::{
    InterpolationMode, OutputSelection, ProductKind, RemnantKind, StepError, StepId,
};
use galaxy_imf::Imf;
use galaxy_product::{validate_registry, Product, ProductSeries, StepContext};
use galaxy_tracks::TrackLibrary;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::cohort::Cohort;
use crate::config::{ConfigError, ModelConfig};
use crate::grid::{MassGrid, TimeGrid};
use crate::metrics::StepMetrics;
use crate::population::PopulationBuilder;

/// Steps between progress log lines.
const PROGRESS_INTERVAL: usize = 10;

// ── EngineState ─────────────────────────────────────────────────────

/// Lifecycle of a [`PopulationEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, no step taken.
    Initialized,
    /// At least one step taken.
    Running {
        /// Step that the next `step()` call executes.
        next: StepId,
    },
    /// Every step done, or a step failed.
    Finalized,
}

// ── StepReport ──────────────────────────────────────────────────────

/// Summary of one successful step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepReport {
    /// Step index.
    pub step: StepId,
    /// Sample time in years.
    pub time: f64,
    /// Number of weighted living entries.
    pub living_entries: usize,
    /// Number of remnant events.
    pub remnant_events: usize,
    /// Bolometric luminosity of living stars, L☉.
    pub bolometric_luminosity: f64,
    /// Core-collapse supernovae during the step.
    pub supernovae: f64,
    /// Timings for this step.
    pub metrics: StepMetrics,
}

// ── RunOutput ───────────────────────────────────────────────────────

/// Everything a finished run hands back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunOutput {
    /// Interpolation scheme used for every step.
    pub mode: InterpolationMode,
    /// Number of completed steps.
    pub steps: usize,
    /// One series per product, in registration order.
    pub series: Vec<ProductSeries>,
}

impl RunOutput {
    /// The series produced by the product of `kind`, if one was registered.
    pub fn series(&self, kind: ProductKind) -> Option<&ProductSeries> {
        self.series.iter().find(|s| s.kind() == kind)
    }
}

// ── PopulationEngine ────────────────────────────────────────────────

/// Single-threaded engine advancing one population through its time grid.
///
/// Created from a [`ModelConfig`] and the loaded libraries via
/// [`new()`](PopulationEngine::new).
///
/// # Example
///
/// ```ignore
/// let mut engine = PopulationEngine::new(config, tracks, atmospheres, products)?;
/// while let Some(report) = engine.step()? {
///     println!("{} yr: {} L☉", report.time, report.bolometric_luminosity);
/// }
/// let output = engine.finish();
/// ```
pub struct PopulationEngine {
    config: ModelConfig,
    tracks: Arc<TrackLibrary>,
    imf: Imf,
    mass_grid: MassGrid,
    time_grid: TimeGrid,
    synthesizer: Option<SpectralSynthesizer>,
    products: Vec<Box<dyn Product>>,
    cohorts: Vec<Cohort>,
    metallicity: f64,
    mode: InterpolationMode,
    state: EngineState,
    completed: usize,
    last_metrics: StepMetrics,
}

impl PopulationEngine {
    /// Create an engine, checking `config` against the loaded libraries.
    ///
    /// # Errors
    ///
    /// Any [`ModelConfig::validate`] failure, plus
    /// [`ConfigError::TrackSetMismatch`] and [`ConfigError::ImfOutsideTracks`]
    /// for tracks that do not fit the configuration,
    /// [`ConfigError::Atmosphere`] when the atmosphere preset needs a
    /// sub-library that is not loaded, [`ConfigError::Registry`] for
    /// conflicting products, and [`ConfigError::MissingProduct`] when an
    /// output in `config.outputs` has no product. Products beyond the
    /// configured outputs are allowed.
    pub fn new(
        config: ModelConfig,
        tracks: Arc<TrackLibrary>,
        atmospheres: Arc<AtmosphereLibrary>,
        products: Vec<Box<dyn Product>>,
    ) -> Result<Self, ConfigError> {
        // 1. Structural invariants.
        config.validate()?;
        let imf = config.build_imf()?;
        let time_grid = config.build_time_grid()?;

        // 2. Tracks match the configured set and cover the IMF.
        if tracks.set() != config.tracks {
            return Err(ConfigError::TrackSetMismatch {
                requested: config.tracks,
                loaded: tracks.set(),
            });
        }
        if !tracks.covers(imf.mass_lo(), imf.mass_hi()) {
            return Err(ConfigError::ImfOutsideTracks {
                imf_lo: imf.mass_lo(),
                imf_hi: imf.mass_hi(),
                track_lo: tracks.mass_lo(),
                track_hi: tracks.mass_hi(),
            });
        }

        // 3. Atmosphere preset routes only to loaded sub-libraries.
        let atmospheres = atmospheres.with_rule(config.atmosphere.rule())?;
        let metallicity = config.metallicity();

        // 4. Products are distinct; synthesis only when one reads the SED.
        let plan = validate_registry(&products)?;
        let registered: OutputSelection = products.iter().map(|p| p.kind()).collect();
        if let Some(kind) = config.outputs.iter().find(|&k| !registered.contains(k)) {
            return Err(ConfigError::MissingProduct { kind });
        }
        let synthesizer = if plan.needs_sed() {
            atmospheres.check_metallicity(metallicity);
            Some(SpectralSynthesizer::new(atmospheres, config.wavelengths.build()))
        } else {
            None
        };

        let mode = config.method.interpolation_mode();
        let mass_grid =
            MassGrid::logarithmic(imf.mass_lo(), imf.mass_hi(), config.method.bin_count());
        debug!(
            model = %config.name,
            products = plan.len(),
            sed = plan.needs_sed(),
            bins = mass_grid.bins(),
            steps = time_grid.len(),
            "engine configured"
        );

        Ok(Self {
            config,
            tracks,
            imf,
            mass_grid,
            time_grid,
            synthesizer,
            products,
            cohorts: Vec::new(),
            metallicity,
            mode,
            state: EngineState::Initialized,
            completed: 0,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Execute the next step.
    ///
    /// Returns `Ok(None)` once the engine is finalized.
    ///
    /// # Errors
    ///
    /// [`StepError`] if an interpolation leaves the tabulated domain or a
    /// product fails. The engine is finalized; products keep the rows of
    /// the steps that completed.
    pub fn step(&mut self) -> Result<Option<StepReport>, StepError> {
        let index = match self.state {
            EngineState::Finalized => return Ok(None),
            EngineState::Initialized => {
                info!(
                    model = %self.config.name,
                    mode = %self.mode,
                    track_set = %self.tracks.set(),
                    steps = self.time_grid.len(),
                    products = self.products.len(),
                    "population synthesis started"
                );
                0
            }
            EngineState::Running { next } => next.0 as usize,
        };
        let step = StepId(index as u64);

        let report = match self.execute(index, step) {
            Ok(report) => report,
            Err(e) => {
                self.state = EngineState::Finalized;
                error!(step = %step, error = %e, "step failed, engine finalized");
                return Err(e);
            }
        };
        self.completed += 1;
        self.last_metrics = report.metrics.clone();

        if index % PROGRESS_INTERVAL == 0 {
            info!(
                step = %step,
                time = report.time,
                luminosity = report.bolometric_luminosity,
                "progress"
            );
        }

        self.state = if index + 1 < self.time_grid.len() {
            EngineState::Running { next: step.next() }
        } else {
            info!(
                model = %self.config.name,
                steps = self.completed,
                "population synthesis finished"
            );
            EngineState::Finalized
        };
        Ok(Some(report))
    }

    fn execute(&mut self, index: usize, step: StepId) -> Result<StepReport, StepError> {
        let start = Instant::now();
        let (t_prev, time) = self.time_grid.interval(index);

        // 1. Cohorts born during this interval.
        if let Some(cohort) = self.config.star_formation.cohort(index, t_prev, time) {
            self.cohorts.push(cohort);
        }

        // 2. Snapshot of living stars and remnant events.
        let population_start = Instant::now();
        let builder = PopulationBuilder {
            tracks: &self.tracks,
            imf: &self.imf,
            grid: &self.mass_grid,
            cutoffs: self.config.cutoffs,
            mode: self.mode,
        };
        let snapshot = builder
            .snapshot(step, t_prev, time, &self.cohorts)
            .map_err(|source| StepError::Interpolation { step, source })?;
        let population_us = population_start.elapsed().as_micros() as u64;

        // 3. Composite SED.
        let synthesis_start = Instant::now();
        let sed = self
            .synthesizer
            .as_ref()
            .map(|synth| synth.synthesize(&snapshot, self.metallicity))
            .transpose()
            .map_err(|source| StepError::Synthesis { step, source })?;
        let synthesis_us = if sed.is_some() {
            synthesis_start.elapsed().as_micros() as u64
        } else {
            0
        };

        // 4. Products, in registration order.
        let ctx = StepContext::new(&snapshot, sed.as_ref(), self.metallicity);
        let mut product_us = Vec::with_capacity(self.products.len());
        for product in self.products.iter_mut() {
            let product_start = Instant::now();
            if let Err(reason) = product.observe(&ctx) {
                return Err(StepError::ProductFailed {
                    name: product.name().to_owned(),
                    reason,
                });
            }
            product_us.push((
                product.name().to_owned(),
                product_start.elapsed().as_micros() as u64,
            ));
        }

        let metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            population_us,
            synthesis_us,
            product_us,
            living_entries: snapshot.entries.len(),
            remnant_events: snapshot.events.len(),
        };
        debug!(
            step = %step,
            time,
            cohorts = self.cohorts.len(),
            entries = metrics.living_entries,
            events = metrics.remnant_events,
            total_us = metrics.total_us,
            "step complete"
        );

        Ok(StepReport {
            step,
            time,
            living_entries: snapshot.entries.len(),
            remnant_events: snapshot.events.len(),
            bolometric_luminosity: snapshot.bolometric_luminosity(),
            supernovae: snapshot.death_count(RemnantKind::Supernova),
            metrics,
        })
    }

    /// Step until finalized, then hand over the output series.
    pub fn run(mut self) -> Result<RunOutput, StepError> {
        while self.step()?.is_some() {}
        Ok(self.finish())
    }

    /// Hand over the output series collected so far.
    pub fn finish(self) -> RunOutput {
        RunOutput {
            mode: self.mode,
            steps: self.completed,
            series: self.products.into_iter().map(|p| p.finish()).collect(),
        }
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Interpolation scheme used for every step.
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// The expanded sample times.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.time_grid
    }

    /// Number of cohorts formed so far.
    pub fn cohort_count(&self) -> usize {
        self.cohorts.len()
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

impl fmt::Debug for PopulationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulationEngine")
            .field("model", &self.config.name)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("completed", &self.completed)
            .field("products", &self.products.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_atmos::AtmosphereModel;
    use galaxy_imf::ImfSegment;
    use galaxy_product::Inputs;
    use galaxy_test_utils::{
        blackbody_atmospheres, solar_set, synthetic_library, FailingProduct, RecordingProduct,
    };

    use crate::grid::TimeGridSpec;

    fn config() -> ModelConfig {
        ModelConfig {
            tracks: solar_set(),
            atmosphere: AtmosphereModel::Blackbody,
            time: TimeGridSpec::Linear {
                start: 1.0e6,
                end: 5.0e6,
                step: 1.0e6,
            },
            outputs: OutputSelection::empty(),
            ..ModelConfig::default()
        }
    }

    fn engine(
        config: ModelConfig,
        products: Vec<Box<dyn Product>>,
    ) -> Result<PopulationEngine, ConfigError> {
        PopulationEngine::new(
            config,
            Arc::new(synthetic_library(solar_set())),
            Arc::new(blackbody_atmospheres()),
            products,
        )
    }

    #[test]
    fn steps_until_finalized() {
        let recorder = RecordingProduct::new("recorder", Inputs::SNAPSHOT);
        let calls = recorder.calls();
        let mut e = engine(config(), vec![Box::new(recorder)]).unwrap();
        assert_eq!(e.state(), EngineState::Initialized);

        let first = e.step().unwrap().unwrap();
        assert_eq!(first.step, StepId(0));
        assert_eq!(first.time, 1.0e6);
        assert_eq!(e.state(), EngineState::Running { next: StepId(1) });
        assert_eq!(e.last_metrics().product_us.len(), 1);
        assert_eq!(e.last_metrics().synthesis_us, 0);

        let mut count = 1;
        while e.step().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 5);
        assert_eq!(e.state(), EngineState::Finalized);
        assert!(e.step().unwrap().is_none());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 5);

        let out = e.finish();
        assert_eq!(out.steps, 5);
        assert_eq!(out.series.len(), 1);
        assert_eq!(out.mode, InterpolationMode::MassTrack);
    }

    #[test]
    fn burst_forms_one_cohort() {
        let mut e = engine(config(), vec![]).unwrap();
        while e.step().unwrap().is_some() {}
        assert_eq!(e.cohort_count(), 1);
    }

    #[test]
    fn product_failure_finalizes() {
        let failing = FailingProduct::new("flaky", 2);
        let mut e = engine(config(), vec![Box::new(failing)]).unwrap();
        assert!(e.step().unwrap().is_some());
        assert!(e.step().unwrap().is_some());
        match e.step() {
            Err(StepError::ProductFailed { name, .. }) => assert_eq!(name, "flaky"),
            other => panic!("expected ProductFailed, got {other:?}"),
        }
        assert_eq!(e.state(), EngineState::Finalized);
        assert!(e.step().unwrap().is_none());
        assert_eq!(e.finish().steps, 2);
    }

    #[test]
    fn sed_readers_trigger_synthesis() {
        let recorder = RecordingProduct::new("sed", Inputs::SED);
        let mut e = engine(config(), vec![Box::new(recorder)]).unwrap();
        let report = e.step().unwrap().unwrap();
        assert!(report.living_entries > 0);
        assert!(report.bolometric_luminosity > 0.0);
    }

    #[test]
    fn missing_atmosphere_sublibrary_is_rejected() {
        let cfg = ModelConfig {
            atmosphere: AtmosphereModel::PauldrachHillier,
            ..config()
        };
        assert!(matches!(engine(cfg, vec![]), Err(ConfigError::Atmosphere(_))));
    }

    #[test]
    fn imf_beyond_tracks_is_rejected() {
        let cfg = ModelConfig {
            imf: vec![ImfSegment::new(2.35, 1.0, 150.0)],
            ..config()
        };
        assert!(matches!(
            engine(cfg, vec![]),
            Err(ConfigError::ImfOutsideTracks { imf_hi, .. }) if imf_hi == 150.0
        ));
    }

    #[test]
    fn wrong_track_set_is_rejected() {
        let cfg = config().with_track_code(64).unwrap();
        assert!(matches!(
            engine(cfg, vec![]),
            Err(ConfigError::TrackSetMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_products_are_rejected() {
        let products: Vec<Box<dyn Product>> = vec![
            Box::new(RecordingProduct::new("a", Inputs::SNAPSHOT)),
            Box::new(RecordingProduct::new("a", Inputs::SNAPSHOT)),
        ];
        assert!(matches!(engine(config(), products), Err(ConfigError::Registry(_))));
    }

    #[test]
    fn enabled_outputs_need_a_product() {
        let cfg = ModelConfig {
            outputs: OutputSelection::empty()
                .with(ProductKind::StellarParameters)
                .with(ProductKind::Yields),
            ..config()
        };
        let recorder = RecordingProduct::new("recorder", Inputs::SNAPSHOT);
        assert!(matches!(
            engine(cfg, vec![Box::new(recorder)]),
            Err(ConfigError::MissingProduct { kind: ProductKind::Yields })
        ));
    }

    #[test]
    fn debug_names_the_model() {
        let e = engine(config(), vec![]).unwrap();
        let text = format!("{e:?}");
        assert!(text.contains("PopulationEngine"));
        assert!(text.contains("default"));
    }
}
