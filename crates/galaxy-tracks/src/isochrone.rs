//! Isochrones: the locus of living stars of all masses at one age.

use galaxy_core::{InterpolationError, Quantity, StellarState};

/// Stellar states at a fixed age, ordered by initial mass.
///
/// Nodes are the tracks still alive at the age, each interpolated in age
/// only, plus a terminal node at the turnoff mass. Queries between nodes
/// interpolate linearly in `log m`.
#[derive(Clone, Debug, PartialEq)]
pub struct Isochrone {
    age: f64,
    nodes: Vec<StellarState>,
    turnoff: Option<f64>,
}

impl Isochrone {
    pub(crate) fn new(age: f64, nodes: Vec<StellarState>, turnoff: Option<f64>) -> Self {
        Self {
            age,
            nodes,
            turnoff,
        }
    }

    /// Age of the isochrone in years.
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Nodes in increasing initial mass.
    pub fn nodes(&self) -> &[StellarState] {
        &self.nodes
    }

    /// Turnoff mass, `None` when every tabulated track is still alive.
    pub fn turnoff_mass(&self) -> Option<f64> {
        self.turnoff
    }

    /// `true` when no star in the tabulated range is alive.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// State of a star of initial mass `mass` on this isochrone.
    pub fn lookup(&self, mass: f64) -> Result<StellarState, InterpolationError> {
        let (first, last) = match (self.nodes.first(), self.nodes.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(InterpolationError::EmptyGrid {
                    what: format!("isochrone at {:.4e} yr", self.age),
                })
            }
        };
        if !(mass >= first.initial_mass && mass <= last.initial_mass) {
            return Err(InterpolationError::OutOfRange {
                quantity: Quantity::InitialMass,
                value: mass,
                min: first.initial_mass,
                max: last.initial_mass,
            });
        }
        let j = self.nodes.partition_point(|s| s.initial_mass < mass);
        let b = &self.nodes[j];
        if b.initial_mass == mass {
            return Ok(*b);
        }
        let a = &self.nodes[j - 1];
        let f = (mass / a.initial_mass).log10() / (b.initial_mass / a.initial_mass).log10();
        let mix = |x: f64, y: f64| x + f * (y - x);
        let frac = mix(a.mass / a.initial_mass, b.mass / b.initial_mass);
        Ok(StellarState {
            initial_mass: mass,
            mass: mass * frac,
            log_l: mix(a.log_l, b.log_l),
            log_teff: mix(a.log_teff, b.log_teff),
            log_r: mix(a.log_r, b.log_r),
            log_mdot: mix(a.log_mdot, b.log_mdot),
            phase: if f < 0.5 { a.phase } else { b.phase },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::EvolutionaryPhase;

    fn node(m: f64, log_l: f64) -> StellarState {
        StellarState {
            initial_mass: m,
            mass: m,
            log_l,
            log_teff: 4.0,
            log_r: 0.0,
            log_mdot: -10.0,
            phase: EvolutionaryPhase::MainSequence,
        }
    }

    #[test]
    fn interpolates_in_log_mass() {
        let iso = Isochrone::new(1e6, vec![node(1.0, 0.0), node(100.0, 4.0)], None);
        let s = iso.lookup(10.0).unwrap();
        assert!((s.log_l - 2.0).abs() < 1e-12);
        assert!((s.mass - 10.0).abs() < 1e-12);
    }

    #[test]
    fn node_mass_is_exact() {
        let iso = Isochrone::new(1e6, vec![node(1.0, 0.0), node(100.0, 4.0)], None);
        assert_eq!(iso.lookup(100.0).unwrap(), node(100.0, 4.0));
    }

    #[test]
    fn empty_isochrone_is_an_error() {
        let iso = Isochrone::new(1e11, Vec::new(), Some(0.8));
        assert!(iso.is_empty());
        assert!(matches!(
            iso.lookup(1.0),
            Err(InterpolationError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn above_turnoff_is_out_of_range() {
        let iso = Isochrone::new(1e7, vec![node(1.0, 0.0), node(18.0, 4.0)], Some(18.0));
        assert!(matches!(
            iso.lookup(20.0),
            Err(InterpolationError::OutOfRange { .. })
        ));
    }
}
