//! The [`TrackLibrary`]: a mass-ordered set of tracks at one metallicity.

use galaxy_core::{DataError, Evolved, InterpolationError, Quantity, StellarState};
use tracing::info;

use crate::catalog::TrackSetId;
use crate::isochrone::Isochrone;
use crate::track::{MassTrack, TrackSample};

/// Where a query mass falls on the tabulated mass grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Bracket {
    /// Exactly on track `k`.
    Node(usize),
    /// Between tracks `lo` and `lo + 1`, at log-mass fraction `f` toward
    /// the upper one.
    Between {
        /// Index of the lower track.
        lo: usize,
        /// Fraction in `(0, 1)`.
        f: f64,
    },
}

/// Immutable collection of evolutionary tracks for one track set.
///
/// Construction enforces strictly increasing initial masses and strictly
/// decreasing lifetimes, so lifetime and turnoff mass are monotone
/// functions that can be inverted by binary search.
#[derive(Clone, Debug)]
pub struct TrackLibrary {
    set: TrackSetId,
    tracks: Vec<MassTrack>,
    log_masses: Vec<f64>,
    log_lifetimes: Vec<f64>,
}

impl TrackLibrary {
    /// Build a library, validating the mass grid and lifetime ordering.
    pub fn new(set: TrackSetId, tracks: Vec<MassTrack>) -> Result<Self, DataError> {
        if tracks.len() < 2 {
            return Err(DataError::EmptyTable {
                table: format!("track set {set}"),
            });
        }
        for index in 1..tracks.len() {
            let (prev, cur) = (&tracks[index - 1], &tracks[index]);
            if cur.initial_mass() <= prev.initial_mass() {
                return Err(DataError::NonIncreasingMass {
                    index,
                    mass: cur.initial_mass(),
                });
            }
            if cur.lifetime() >= prev.lifetime() {
                return Err(DataError::NonDecreasingLifetime {
                    mass: cur.initial_mass(),
                    lifetime: cur.lifetime(),
                    previous: prev.lifetime(),
                });
            }
        }
        let log_masses = tracks.iter().map(|t| t.initial_mass().log10()).collect();
        let log_lifetimes = tracks.iter().map(|t| t.lifetime().log10()).collect();
        let lib = Self {
            set,
            tracks,
            log_masses,
            log_lifetimes,
        };
        info!(
            set = %lib.set,
            tracks = lib.tracks.len(),
            mass_lo = lib.mass_lo(),
            mass_hi = lib.mass_hi(),
            "loaded track library"
        );
        Ok(lib)
    }

    /// The track set this library represents.
    pub fn set(&self) -> TrackSetId {
        self.set
    }

    /// Tracks in increasing initial mass.
    pub fn tracks(&self) -> &[MassTrack] {
        &self.tracks
    }

    /// Smallest tabulated initial mass.
    pub fn mass_lo(&self) -> f64 {
        self.tracks[0].initial_mass()
    }

    /// Largest tabulated initial mass.
    pub fn mass_hi(&self) -> f64 {
        self.tracks[self.tracks.len() - 1].initial_mass()
    }

    /// Whether `[lo, hi]` lies inside the tabulated mass range.
    pub fn covers(&self, lo: f64, hi: f64) -> bool {
        lo >= self.mass_lo() && hi <= self.mass_hi()
    }

    /// Lifetime of a star of initial mass `mass`, in years.
    ///
    /// Interpolated linearly in `(log m, log τ)` between tabulated tracks;
    /// exact at tabulated masses.
    pub fn lifetime(&self, mass: f64) -> Result<f64, InterpolationError> {
        Ok(match self.bracket(mass)? {
            Bracket::Node(k) => self.tracks[k].lifetime(),
            Bracket::Between { lo, f } => {
                let log_tau = self.log_lifetimes[lo]
                    + f * (self.log_lifetimes[lo + 1] - self.log_lifetimes[lo]);
                10f64.powf(log_tau)
            }
        })
    }

    /// Largest initial mass still alive at `age`.
    ///
    /// `None` when every tabulated mass is alive. When every tabulated mass
    /// is dead the lowest tabulated mass is returned. Non-increasing in
    /// `age` and consistent with [`lifetime`](Self::lifetime): for the
    /// returned `m`, `lifetime(m) == age` up to rounding.
    pub fn turnoff_mass(&self, age: f64) -> Option<f64> {
        let n = self.tracks.len();
        if age < self.tracks[n - 1].lifetime() {
            return None;
        }
        if age >= self.tracks[0].lifetime() {
            return Some(self.mass_lo());
        }
        // Lifetimes decrease with mass: first track already dead at `age`.
        let j = self.tracks.partition_point(|t| t.lifetime() > age);
        let i = j - 1;
        let log_age = age.log10();
        let f = (log_age - self.log_lifetimes[i]) / (self.log_lifetimes[j] - self.log_lifetimes[i]);
        if f <= 0.0 {
            return Some(self.tracks[i].initial_mass());
        }
        if f >= 1.0 {
            return Some(self.tracks[j].initial_mass());
        }
        Some(10f64.powf(
            self.log_masses[i] + f * (self.log_masses[j] - self.log_masses[i]),
        ))
    }

    /// State of a star of initial mass `mass` at `age` by mass-track
    /// interpolation.
    ///
    /// The target age is mapped homologously onto each bracketing track
    /// (`age_k = age · τ_k / τ(m)`) so that both neighbours sit at the same
    /// fractional lifetime, each track is interpolated linearly in age, and
    /// the two results are combined linearly in `log m`. The phase is taken
    /// from the neighbour nearer in `log m`.
    ///
    /// Returns [`Evolved::Remnant`] once `age ≥ τ(mass)`; a mass outside the
    /// tabulated range is an [`InterpolationError::OutOfRange`].
    pub fn lookup(&self, mass: f64, age: f64) -> Result<Evolved, InterpolationError> {
        if !(age.is_finite() && age >= 0.0) {
            return Err(InterpolationError::OutOfRange {
                quantity: Quantity::Age,
                value: age,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        let lifetime = self.lifetime(mass)?;
        if age >= lifetime {
            return Ok(Evolved::Remnant {
                initial_mass: mass,
                lifetime,
            });
        }
        let state = match self.bracket(mass)? {
            Bracket::Node(k) => self.tracks[k].at_age(age).to_state(mass),
            Bracket::Between { lo, f } => {
                let scale = age / lifetime;
                let (ta, tb) = (&self.tracks[lo], &self.tracks[lo + 1]);
                let a = ta.at_age(scale * ta.lifetime());
                let b = tb.at_age(scale * tb.lifetime());
                combine(mass, ta, &a, tb, &b, f)
            }
        };
        Ok(Evolved::Alive(state))
    }

    /// Isochrone at `age`: every alive track interpolated to `age`, closed
    /// by a terminal node at the turnoff mass.
    pub fn isochrone(&self, age: f64) -> Isochrone {
        let mut nodes: Vec<StellarState> = self
            .tracks
            .iter()
            .filter(|t| t.lifetime() > age)
            .map(|t| t.at_age(age).to_state(t.initial_mass()))
            .collect();
        let turnoff = self.turnoff_mass(age);
        if let Some(m_turn) = turnoff {
            let alive_top = nodes.last().map(|s| s.initial_mass);
            if alive_top.is_some_and(|top| m_turn > top) {
                if let Ok(state) = self.final_state(m_turn) {
                    nodes.push(state);
                }
            }
        }
        Isochrone::new(age, nodes, turnoff)
    }

    /// State of a star of initial mass `mass` at the end of its life,
    /// interpolated between the final samples of the bracketing tracks.
    pub fn final_state(&self, mass: f64) -> Result<StellarState, InterpolationError> {
        Ok(match self.bracket(mass)? {
            Bracket::Node(k) => self.tracks[k].final_sample().to_state(mass),
            Bracket::Between { lo, f } => {
                let (ta, tb) = (&self.tracks[lo], &self.tracks[lo + 1]);
                combine(mass, ta, ta.final_sample(), tb, tb.final_sample(), f)
            }
        })
    }

    /// Locate `mass` on the tabulated grid.
    pub(crate) fn bracket(&self, mass: f64) -> Result<Bracket, InterpolationError> {
        let (lo, hi) = (self.mass_lo(), self.mass_hi());
        if !(mass >= lo && mass <= hi) {
            return Err(InterpolationError::OutOfRange {
                quantity: Quantity::InitialMass,
                value: mass,
                min: lo,
                max: hi,
            });
        }
        let j = self.tracks.partition_point(|t| t.initial_mass() < mass);
        if self.tracks[j].initial_mass() == mass {
            return Ok(Bracket::Node(j));
        }
        let lo = j - 1;
        let f = (mass.log10() - self.log_masses[lo]) / (self.log_masses[j] - self.log_masses[lo]);
        Ok(Bracket::Between { lo, f })
    }
}

/// Blend two track samples at log-mass fraction `f` toward `b`.
///
/// Current mass is blended as a fraction of the initial mass so that mass
/// loss scales with the star.
fn combine(
    mass: f64,
    track_a: &MassTrack,
    a: &TrackSample,
    track_b: &MassTrack,
    b: &TrackSample,
    f: f64,
) -> StellarState {
    let mix = |x: f64, y: f64| x + f * (y - x);
    let frac_a = a.mass / track_a.initial_mass();
    let frac_b = b.mass / track_b.initial_mass();
    StellarState {
        initial_mass: mass,
        mass: mass * mix(frac_a, frac_b),
        log_l: mix(a.log_l, b.log_l),
        log_teff: mix(a.log_teff, b.log_teff),
        log_r: mix(a.log_r, b.log_r),
        log_mdot: mix(a.log_mdot, b.log_mdot),
        phase: if f < 0.5 { a.phase } else { b.phase },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TrackFamily, TrackSetId};
    use galaxy_core::EvolutionaryPhase;

    fn set() -> TrackSetId {
        TrackSetId::new(TrackFamily::Geneva2012 { rotating: false }, 4)
    }

    fn track(m: f64, lifetime: f64, log_l0: f64) -> MassTrack {
        let ms = EvolutionaryPhase::MainSequence;
        let samples = (0..=4)
            .map(|k| {
                let frac = k as f64 / 4.0;
                TrackSample {
                    age: frac * lifetime,
                    log_l: log_l0 + 0.2 * frac,
                    log_teff: 4.0 - 0.1 * frac,
                    log_r: 0.5 + 0.3 * frac,
                    mass: m * (1.0 - 0.1 * frac),
                    log_mdot: -9.0 + frac,
                    phase: if k == 4 { EvolutionaryPhase::RedSupergiant } else { ms },
                }
            })
            .collect();
        MassTrack::new(m, samples).unwrap()
    }

    fn library() -> TrackLibrary {
        TrackLibrary::new(
            set(),
            vec![
                track(1.0, 1e10, 0.0),
                track(10.0, 2e7, 3.5),
                track(100.0, 3e6, 6.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lifetime_exact_at_nodes_and_log_log_between() {
        let lib = library();
        assert_eq!(lib.lifetime(10.0).unwrap(), 2e7);
        let mid = lib.lifetime(10f64.sqrt()).unwrap();
        assert!((mid - (1e10f64 * 2e7).sqrt()).abs() / mid < 1e-12);
    }

    #[test]
    fn lookup_at_node_returns_stored_sample() {
        let lib = library();
        let stored = lib.tracks()[1].samples()[2];
        let got = lib.lookup(10.0, stored.age).unwrap().alive().unwrap();
        assert_eq!(got, stored.to_state(10.0));
    }

    #[test]
    fn final_state_blends_the_last_samples() {
        let lib = library();
        let node = lib.final_state(10.0).unwrap();
        assert_eq!(node, lib.tracks()[1].final_sample().to_state(10.0));
        let between = lib.final_state(30.0).unwrap();
        assert!((between.mass - 27.0).abs() < 1e-9);
        assert!(lib.final_state(150.0).is_err());
    }

    #[test]
    fn lookup_past_lifetime_is_remnant() {
        let lib = library();
        let got = lib.lookup(10.0, 2e7).unwrap();
        assert_eq!(
            got,
            Evolved::Remnant {
                initial_mass: 10.0,
                lifetime: 2e7
            }
        );
    }

    #[test]
    fn lookup_outside_mass_grid_is_out_of_range() {
        let err = library().lookup(150.0, 1e6).unwrap_err();
        assert_eq!(
            err,
            InterpolationError::OutOfRange {
                quantity: Quantity::InitialMass,
                value: 150.0,
                min: 1.0,
                max: 100.0
            }
        );
    }

    #[test]
    fn homologous_mapping_keeps_fractional_age() {
        let lib = library();
        let m = 10f64.powf(1.5);
        let tau = lib.lifetime(m).unwrap();
        let half = lib.lookup(m, 0.5 * tau).unwrap().alive().unwrap();
        // Both neighbours at half their lifetime: log L = log L0 + 0.1.
        assert!((half.log_l - (4.75 + 0.1)).abs() < 1e-12);
        assert!((half.mass - m * 0.95).abs() < 1e-9);
    }

    #[test]
    fn turnoff_inverts_lifetime() {
        let lib = library();
        for age in [4e6, 1e7, 1e8, 1e9] {
            let m = lib.turnoff_mass(age).unwrap();
            let tau = lib.lifetime(m).unwrap();
            assert!((tau - age).abs() / age < 1e-9, "age {age}: τ({m}) = {tau}");
        }
        assert_eq!(lib.turnoff_mass(1e6), None);
        assert_eq!(lib.turnoff_mass(2e10), Some(1.0));
    }

    #[test]
    fn rejects_unsorted_masses_and_lifetimes() {
        let err = TrackLibrary::new(set(), vec![track(10.0, 2e7, 3.5), track(1.0, 1e10, 0.0)])
            .unwrap_err();
        assert!(matches!(err, DataError::NonIncreasingMass { index: 1, .. }));

        let err = TrackLibrary::new(set(), vec![track(1.0, 1e7, 0.0), track(10.0, 2e7, 3.5)])
            .unwrap_err();
        assert!(matches!(err, DataError::NonDecreasingLifetime { .. }));
    }

    #[test]
    fn isochrone_ends_at_turnoff() {
        let lib = library();
        let iso = lib.isochrone(1e8);
        let m_turn = lib.turnoff_mass(1e8).unwrap();
        let top = iso.nodes().last().unwrap();
        assert!((top.initial_mass - m_turn).abs() < 1e-12);
        assert_eq!(iso.nodes().len(), 2);
    }
}
