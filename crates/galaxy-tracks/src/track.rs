//! Single-mass evolutionary tracks.

use galaxy_core::{DataError, EvolutionaryPhase, StellarState};
use serde::{Deserialize, Serialize};

/// One tabulated point on an evolutionary track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    /// Age in years.
    pub age: f64,
    /// `log10(L / L☉)`.
    pub log_l: f64,
    /// `log10(Teff / K)`.
    pub log_teff: f64,
    /// `log10(R / R☉)`.
    pub log_r: f64,
    /// Current mass in M☉.
    pub mass: f64,
    /// `log10(Ṁ / M☉ yr⁻¹)`.
    pub log_mdot: f64,
    /// Discrete evolutionary phase.
    pub phase: EvolutionaryPhase,
}

impl TrackSample {
    /// The stellar state this sample describes for a star of `initial_mass`.
    pub fn to_state(&self, initial_mass: f64) -> StellarState {
        StellarState {
            initial_mass,
            mass: self.mass,
            log_l: self.log_l,
            log_teff: self.log_teff,
            log_r: self.log_r,
            log_mdot: self.log_mdot,
            phase: self.phase,
        }
    }

    /// Componentwise `self + f·(other − self)`; the phase is taken from
    /// whichever sample `f` is closer to.
    pub(crate) fn lerp(&self, other: &Self, f: f64) -> Self {
        let mix = |a: f64, b: f64| a + f * (b - a);
        Self {
            age: mix(self.age, other.age),
            log_l: mix(self.log_l, other.log_l),
            log_teff: mix(self.log_teff, other.log_teff),
            log_r: mix(self.log_r, other.log_r),
            mass: mix(self.mass, other.mass),
            log_mdot: mix(self.log_mdot, other.log_mdot),
            phase: if f < 0.5 { self.phase } else { other.phase },
        }
    }

    fn validate(&self, initial_mass: f64, index: usize) -> Result<(), DataError> {
        let values = [
            self.age,
            self.log_l,
            self.log_teff,
            self.log_r,
            self.mass,
            self.log_mdot,
        ];
        if values.iter().any(|v| !v.is_finite()) || self.age < 0.0 || self.mass <= 0.0 {
            return Err(DataError::InvalidValue {
                table: format!("track M={initial_mass}"),
                reason: format!("sample {index} has a non-finite or non-physical value"),
            });
        }
        Ok(())
    }
}

/// The full evolution of a star of one initial mass, from the zero-age
/// main sequence to the end of its life.
///
/// The age of the last sample is the star's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MassTrack {
    initial_mass: f64,
    samples: Vec<TrackSample>,
}

impl MassTrack {
    /// Build a track, checking that it is non-empty, finite, and that
    /// sample ages strictly increase.
    pub fn new(initial_mass: f64, samples: Vec<TrackSample>) -> Result<Self, DataError> {
        if !(initial_mass.is_finite() && initial_mass > 0.0) {
            return Err(DataError::InvalidValue {
                table: "track".into(),
                reason: format!("initial mass {initial_mass} must be positive"),
            });
        }
        if samples.len() < 2 {
            return Err(DataError::EmptyTable {
                table: format!("track M={initial_mass}"),
            });
        }
        for (index, sample) in samples.iter().enumerate() {
            sample.validate(initial_mass, index)?;
            if index > 0 && sample.age <= samples[index - 1].age {
                return Err(DataError::NonIncreasingAge {
                    initial_mass,
                    index,
                });
            }
        }
        Ok(Self {
            initial_mass,
            samples,
        })
    }

    /// Zero-age mass in M☉.
    pub fn initial_mass(&self) -> f64 {
        self.initial_mass
    }

    /// Tabulated samples in age order.
    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    /// Age of the final sample, in years.
    pub fn lifetime(&self) -> f64 {
        self.samples[self.samples.len() - 1].age
    }

    /// The final tabulated sample.
    pub fn final_sample(&self) -> &TrackSample {
        &self.samples[self.samples.len() - 1]
    }

    /// Linear-in-age interpolation of the track at `age`.
    ///
    /// Ages before the first sample return the first sample and ages past
    /// the lifetime return the final one; callers decide death separately.
    /// A tabulated age returns its stored sample unchanged.
    pub fn at_age(&self, age: f64) -> TrackSample {
        let first = &self.samples[0];
        if age <= first.age {
            return *first;
        }
        if age >= self.lifetime() {
            return *self.final_sample();
        }
        let hi = self.samples.partition_point(|s| s.age <= age);
        let (a, b) = (&self.samples[hi - 1], &self.samples[hi]);
        if a.age == age {
            return *a;
        }
        let f = (age - a.age) / (b.age - a.age);
        a.lerp(b, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(age: f64, log_l: f64, phase: EvolutionaryPhase) -> TrackSample {
        TrackSample {
            age,
            log_l,
            log_teff: 4.0,
            log_r: 0.5,
            mass: 5.0,
            log_mdot: -9.0,
            phase,
        }
    }

    fn track() -> MassTrack {
        MassTrack::new(
            5.0,
            vec![
                sample(0.0, 2.0, EvolutionaryPhase::MainSequence),
                sample(1e7, 2.4, EvolutionaryPhase::MainSequence),
                sample(1.1e7, 3.0, EvolutionaryPhase::Giant),
            ],
        )
        .unwrap()
    }

    #[test]
    fn interpolates_linearly_in_age() {
        let s = track().at_age(5e6);
        assert!((s.log_l - 2.2).abs() < 1e-12);
        assert_eq!(s.phase, EvolutionaryPhase::MainSequence);
    }

    #[test]
    fn phase_follows_nearest_sample() {
        let t = track();
        assert_eq!(t.at_age(1.04e7).phase, EvolutionaryPhase::MainSequence);
        assert_eq!(t.at_age(1.06e7).phase, EvolutionaryPhase::Giant);
    }

    #[test]
    fn tabulated_age_is_exact() {
        let t = track();
        assert_eq!(t.at_age(1e7), t.samples()[1]);
        assert_eq!(t.lifetime(), 1.1e7);
    }

    #[test]
    fn rejects_repeated_age() {
        let err = MassTrack::new(
            5.0,
            vec![
                sample(0.0, 2.0, EvolutionaryPhase::MainSequence),
                sample(0.0, 2.1, EvolutionaryPhase::MainSequence),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            DataError::NonIncreasingAge {
                initial_mass: 5.0,
                index: 1
            }
        );
    }

    #[test]
    fn rejects_single_sample() {
        let err = MassTrack::new(5.0, vec![sample(0.0, 2.0, EvolutionaryPhase::MainSequence)])
            .unwrap_err();
        assert!(matches!(err, DataError::EmptyTable { .. }));
    }

    #[test]
    fn rejects_nan() {
        let err = MassTrack::new(
            5.0,
            vec![
                sample(0.0, f64::NAN, EvolutionaryPhase::MainSequence),
                sample(1.0, 2.0, EvolutionaryPhase::MainSequence),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { .. }));
    }
}
