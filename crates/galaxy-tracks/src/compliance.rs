//! Track library compliance helpers.
//!
//! These functions assert the invariants every [`TrackLibrary`] must satisfy,
//! whatever its source: synthetic fixtures, parsed tables or converted
//! model grids. They panic with a descriptive message on violation and are
//! meant to be called from tests.

use galaxy_core::Evolved;

use crate::library::TrackLibrary;

/// Assert that looking up any tabulated `(mass, age)` node returns the
/// stored sample exactly. The final sample of each track is the lifetime
/// and must come back as a remnant.
pub fn assert_nodes_exact(lib: &TrackLibrary) {
    for track in lib.tracks() {
        let m = track.initial_mass();
        let (last, alive) = track.samples().split_last().expect("validated tracks are non-empty");
        for sample in alive {
            let got = lib
                .lookup(m, sample.age)
                .unwrap_or_else(|e| panic!("lookup({m}, {}) failed: {e}", sample.age));
            assert_eq!(
                got,
                Evolved::Alive(sample.to_state(m)),
                "node ({m}, {}) not reproduced exactly",
                sample.age
            );
        }
        let end = lib.lookup(m, last.age).expect("lookup at lifetime");
        assert!(
            matches!(end, Evolved::Remnant { .. }),
            "M={m} still alive at its lifetime {}",
            last.age
        );
    }
}

/// Assert that `lifetime` strictly decreases across a dense log-mass sweep.
pub fn assert_lifetime_decreasing(lib: &TrackLibrary, samples: usize) {
    let (lo, hi) = (lib.mass_lo(), lib.mass_hi());
    let mut previous = f64::INFINITY;
    for k in 0..=samples {
        let m = lo * (hi / lo).powf(k as f64 / samples as f64);
        let m = m.min(hi);
        let tau = lib.lifetime(m).expect("mass inside range");
        assert!(
            tau < previous,
            "lifetime not decreasing at M={m}: {tau} >= {previous}"
        );
        previous = tau;
    }
}

/// Assert that the turnoff mass never increases with age.
pub fn assert_turnoff_monotone(lib: &TrackLibrary, ages: &[f64]) {
    let mut sorted = ages.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut previous = f64::INFINITY;
    for age in sorted {
        let m = lib.turnoff_mass(age).unwrap_or(f64::INFINITY);
        assert!(
            m <= previous,
            "turnoff mass increased at age {age}: {m} > {previous}"
        );
        previous = m;
    }
}

/// Assert that every star below the turnoff is alive and every star above
/// it is a remnant.
pub fn assert_turnoff_separates(lib: &TrackLibrary, ages: &[f64]) {
    for &age in ages {
        let Some(m_turn) = lib.turnoff_mass(age) else {
            continue;
        };
        if m_turn > lib.mass_lo() * 1.01 {
            let below = lib.lookup(m_turn * 0.99, age).expect("below turnoff");
            assert!(
                below.alive().is_some(),
                "M={} dead at age {age} below turnoff {m_turn}",
                m_turn * 0.99
            );
        }
        if m_turn < lib.mass_hi() / 1.01 {
            let above = lib.lookup(m_turn * 1.01, age).expect("above turnoff");
            assert!(
                above.alive().is_none(),
                "M={} alive at age {age} above turnoff {m_turn}",
                m_turn * 1.01
            );
        }
    }
}

/// Run every compliance check with a default sweep.
pub fn run_full_compliance(lib: &TrackLibrary) {
    assert_nodes_exact(lib);
    assert_lifetime_decreasing(lib, 500);
    let ages: Vec<f64> = (0..200).map(|k| 10f64.powf(5.0 + 6.0 * k as f64 / 199.0)).collect();
    assert_turnoff_monotone(lib, &ages);
    assert_turnoff_separates(lib, &ages);
}
