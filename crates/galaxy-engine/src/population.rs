//! Construction of the per-step [`PopulationSnapshot`].
//!
//! For every cohort the living mass range is `[imf_lo, min(imf_hi,
//! turnoff(age))]`. It is split on the mass grid and each part becomes one
//! weighted entry, evaluated at the geometric mean of the part. Stars whose
//! lifetime ends inside the step become [`RemnantEvent`]s, split on the
//! same grid and at the remnant cutoffs so that every event has one kind.

use galaxy_core::{
    InterpolationError, InterpolationMode, MassCutoffs, PopulationSnapshot, RemnantEvent,
    RemnantKind, SnapshotEntry, StellarState, StepId,
};
use galaxy_imf::Imf;
use galaxy_tracks::{Isochrone, TrackLibrary};
use smallvec::SmallVec;
use tracing::error;

use crate::cohort::Cohort;
use crate::grid::MassGrid;

/// Borrowed inputs for building snapshots.
pub(crate) struct PopulationBuilder<'a> {
    pub tracks: &'a TrackLibrary,
    pub imf: &'a Imf,
    pub grid: &'a MassGrid,
    pub cutoffs: MassCutoffs,
    pub mode: InterpolationMode,
}

/// Evaluates stars of one cohort at one age.
enum Evaluator<'a> {
    MassTrack { tracks: &'a TrackLibrary, age: f64 },
    Isochrone(Isochrone),
}

impl Evaluator<'_> {
    /// `None` when rounding places the star just past its lifetime.
    fn state(&self, mass: f64) -> Result<Option<StellarState>, InterpolationError> {
        match self {
            Self::MassTrack { tracks, age } => Ok(tracks.lookup(mass, *age)?.alive()),
            Self::Isochrone(iso) => iso.lookup(mass).map(Some),
        }
    }
}

impl PopulationBuilder<'_> {
    /// Living entries at `time` and deaths during `(t_prev, time]`, over
    /// all `cohorts`.
    pub fn snapshot(
        &self,
        step: StepId,
        t_prev: f64,
        time: f64,
        cohorts: &[Cohort],
    ) -> Result<PopulationSnapshot, InterpolationError> {
        let mut entries = Vec::with_capacity(cohorts.len() * self.grid.bins());
        let mut events = Vec::new();
        for cohort in cohorts {
            let age = cohort.age_at(time);
            self.living(cohort, age, &mut entries)?;
            self.deaths(cohort, cohort.age_at(t_prev), age, &mut events)?;
        }
        Ok(PopulationSnapshot {
            step,
            time,
            dt: time - t_prev,
            mode: self.mode,
            entries,
            events,
        })
    }

    fn upper_alive(&self, age: f64) -> f64 {
        let hi = self.imf.mass_hi();
        self.tracks.turnoff_mass(age).map_or(hi, |m| m.min(hi))
    }

    fn living(
        &self,
        cohort: &Cohort,
        age: f64,
        entries: &mut Vec<SnapshotEntry>,
    ) -> Result<(), InterpolationError> {
        let top = self.upper_alive(age);
        if top <= self.imf.mass_lo() {
            return Ok(());
        }
        let eval = match self.mode {
            InterpolationMode::MassTrack => Evaluator::MassTrack {
                tracks: self.tracks,
                age,
            },
            InterpolationMode::Isochrone => Evaluator::Isochrone(self.tracks.isochrone(age)),
        };
        for (lo, hi) in self.grid.split(self.imf.mass_lo(), top) {
            let mass = (lo * hi).sqrt();
            let state = eval.state(mass).inspect_err(|e| {
                error!(
                    initial_mass = mass,
                    age,
                    cohort = %cohort.id,
                    track_set = %self.tracks.set(),
                    mode = %self.mode,
                    error = %e,
                    "track interpolation failed"
                );
            })?;
            if let Some(state) = state {
                entries.push(SnapshotEntry {
                    weight: cohort.mass * self.imf.stars_per_unit_mass(lo, hi),
                    state,
                });
            }
        }
        Ok(())
    }

    fn deaths(
        &self,
        cohort: &Cohort,
        age_prev: f64,
        age: f64,
        events: &mut Vec<RemnantEvent>,
    ) -> Result<(), InterpolationError> {
        let Some(lo) = self.tracks.turnoff_mass(age) else {
            return Ok(());
        };
        let lo = lo.max(self.imf.mass_lo());
        let hi = self.upper_alive(age_prev);
        if hi <= lo {
            return Ok(());
        }
        for (a, b) in self.grid.split(lo, hi) {
            for (m_lo, m_hi, kind) in self.classify(a, b) {
                let mass = (m_lo * m_hi).sqrt();
                let last = self.tracks.final_state(mass).inspect_err(|e| {
                    error!(
                        initial_mass = mass,
                        age,
                        cohort = %cohort.id,
                        track_set = %self.tracks.set(),
                        error = %e,
                        "final-state interpolation failed"
                    );
                })?;
                let initial_mass_total = cohort.mass * self.imf.mass_per_unit_mass(m_lo, m_hi);
                events.push(RemnantEvent {
                    kind,
                    mass_lo: m_lo,
                    mass_hi: m_hi,
                    count: cohort.mass * self.imf.stars_per_unit_mass(m_lo, m_hi),
                    initial_mass_total,
                    final_mass_total: initial_mass_total * last.mass / mass,
                });
            }
        }
        Ok(())
    }

    /// Split `[lo, hi]` at the cutoffs and label each part.
    fn classify(&self, lo: f64, hi: f64) -> SmallVec<[(f64, f64, RemnantKind); 3]> {
        let sn = self.cutoffs.supernova;
        let bh = self.cutoffs.black_hole;
        let bands = [
            (f64::NEG_INFINITY, sn, RemnantKind::WhiteDwarf),
            (sn, bh, RemnantKind::Supernova),
            (bh, f64::INFINITY, RemnantKind::BlackHole),
        ];
        bands
            .into_iter()
            .filter_map(|(band_lo, band_hi, kind)| {
                let (a, b) = (lo.max(band_lo), hi.min(band_hi));
                (b > a).then_some((a, b, kind))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_test_utils::{solar_set, synthetic_library};

    struct Fixture {
        tracks: TrackLibrary,
        imf: Imf,
        grid: MassGrid,
    }

    fn fixture() -> Fixture {
        let imf = Imf::salpeter(1.0, 100.0).unwrap();
        Fixture {
            tracks: synthetic_library(solar_set()),
            grid: MassGrid::logarithmic(1.0, 100.0, 200),
            imf,
        }
    }

    impl Fixture {
        fn builder(&self, mode: InterpolationMode) -> PopulationBuilder<'_> {
            PopulationBuilder {
                tracks: &self.tracks,
                imf: &self.imf,
                grid: &self.grid,
                cutoffs: MassCutoffs::default(),
                mode,
            }
        }
    }

    fn burst() -> Cohort {
        Cohort {
            id: galaxy_core::CohortId(0),
            birth: 0.0,
            mass: 1.0e6,
        }
    }

    #[test]
    fn young_burst_is_fully_alive() {
        let f = fixture();
        let snap = f
            .builder(InterpolationMode::MassTrack)
            .snapshot(StepId(0), 0.0, 1.0e5, &[burst()])
            .unwrap();
        assert_eq!(snap.entries.len(), 200);
        assert!(snap.events.is_empty());
        let expected = 1.0e6 * f.imf.stars_per_unit_mass(1.0, 100.0);
        assert!((snap.star_count() - expected).abs() / expected < 1e-9);
        assert_eq!(snap.dt, 1.0e5);
    }

    #[test]
    fn dead_stars_leave_the_snapshot() {
        let f = fixture();
        let age = 1.0e7;
        let turnoff = f.tracks.turnoff_mass(age).unwrap();
        let snap = f
            .builder(InterpolationMode::MassTrack)
            .snapshot(StepId(5), 9.0e6, age, &[burst()])
            .unwrap();
        assert!(snap.entries.iter().all(|e| e.state.initial_mass < turnoff));
        let top = snap.entries.last().unwrap().state.initial_mass;
        assert!(top > 0.95 * turnoff);
    }

    #[test]
    fn deaths_match_the_lost_stars() {
        let f = fixture();
        let b = f.builder(InterpolationMode::MassTrack);
        let before = b.snapshot(StepId(0), 0.0, 9.0e6, &[burst()]).unwrap();
        let after = b.snapshot(StepId(1), 9.0e6, 1.0e7, &[burst()]).unwrap();
        let died: f64 = after.events.iter().map(|e| e.count).sum();
        let lost = before.star_count() - after.star_count();
        assert!((died - lost).abs() / lost < 1e-9, "died {died}, lost {lost}");
        assert!(after
            .events
            .iter()
            .all(|e| e.kind == RemnantKind::Supernova));
    }

    #[test]
    fn events_are_split_at_the_cutoffs() {
        let f = fixture();
        let b = f.builder(InterpolationMode::MassTrack);
        // Straddles the 8 M☉ supernova cutoff.
        let (a0, a1) = (f.tracks.lifetime(9.0).unwrap(), f.tracks.lifetime(7.0).unwrap());
        let snap = b.snapshot(StepId(1), a0, a1, &[burst()]).unwrap();
        let wd = snap.death_count(RemnantKind::WhiteDwarf);
        let sn = snap.death_count(RemnantKind::Supernova);
        assert!(wd > 0.0 && sn > 0.0);
        for e in &snap.events {
            match e.kind {
                RemnantKind::WhiteDwarf => assert!(e.mass_hi <= 8.0),
                RemnantKind::Supernova => assert!(e.mass_lo >= 8.0),
                RemnantKind::BlackHole => panic!("no black holes below 120 M☉"),
            }
        }
    }

    #[test]
    fn dying_stars_carry_their_pre_collapse_mass() {
        let f = fixture();
        let b = f.builder(InterpolationMode::MassTrack);
        let (a0, a1) = (f.tracks.lifetime(61.0).unwrap(), f.tracks.lifetime(59.0).unwrap());
        let snap = b.snapshot(StepId(1), a0, a1, &[burst()]).unwrap();
        assert!(!snap.events.is_empty());
        for e in &snap.events {
            let ratio = e.final_mass_total / e.initial_mass_total;
            // Synthetic tracks above 25 M☉ end at 70% of their initial mass.
            assert!((ratio - 0.7).abs() < 1e-3, "final/initial = {ratio}");
            assert!(e.mean_final_mass() < e.mean_mass());
        }
    }

    #[test]
    fn black_holes_above_their_cutoff() {
        let f = fixture();
        let mut b = f.builder(InterpolationMode::MassTrack);
        b.cutoffs.black_hole = 40.0;
        let snap = b.snapshot(StepId(0), 0.0, 5.0e6, &[burst()]).unwrap();
        assert!(snap.death_count(RemnantKind::BlackHole) > 0.0);
        assert!(snap
            .events
            .iter()
            .filter(|e| e.kind == RemnantKind::BlackHole)
            .all(|e| e.mass_lo >= 40.0));
    }

    #[test]
    fn modes_agree_on_weights_but_tag_differently() {
        let f = fixture();
        let track = f
            .builder(InterpolationMode::MassTrack)
            .snapshot(StepId(0), 0.0, 4.0e6, &[burst()])
            .unwrap();
        let iso = f
            .builder(InterpolationMode::Isochrone)
            .snapshot(StepId(0), 0.0, 4.0e6, &[burst()])
            .unwrap();
        assert_eq!(track.mode, InterpolationMode::MassTrack);
        assert_eq!(iso.mode, InterpolationMode::Isochrone);
        assert_eq!(track.entries.len(), iso.entries.len());
        assert!((track.star_count() - iso.star_count()).abs() < 1e-6);
    }

    #[test]
    fn every_cohort_contributes_its_own_entries() {
        let f = fixture();
        let young = Cohort {
            id: galaxy_core::CohortId(1),
            birth: 2.0e6,
            mass: 1.0e3,
        };
        let snap = f
            .builder(InterpolationMode::MassTrack)
            .snapshot(StepId(2), 2.0e6, 3.0e6, &[burst(), young])
            .unwrap();
        assert_eq!(snap.entries.len(), 400);
    }
}
