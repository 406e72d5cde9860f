//! Integration tests: the synthetic fixture library against the library
//! invariants, the table loader and the catalog.

use std::io::Cursor;
use std::sync::Arc;

use galaxy_core::{Evolved, InterpolationError};
use galaxy_test_utils::{fixture_lifetime, solar_set, synthetic_library, to_table_text};
use galaxy_tracks::compliance::run_full_compliance;
use galaxy_tracks::table::read_library;
use galaxy_tracks::{TrackCatalog, TrackFamily, TrackSetId};
use proptest::prelude::*;

#[test]
fn fixture_library_passes_compliance() {
    run_full_compliance(&synthetic_library(solar_set()));
}

#[test]
fn lifetime_reproduces_tabulated_values() {
    let lib = synthetic_library(solar_set());
    for m in [1.0, 9.0, 40.0] {
        let tau = lib.lifetime(m).unwrap();
        assert!((tau - fixture_lifetime(m)).abs() / tau < 1e-12);
    }
}

#[test]
fn turnoff_at_ten_myr_is_between_twelve_and_fifteen() {
    let lib = synthetic_library(solar_set());
    let m = lib.turnoff_mass(1.0e7).unwrap();
    assert!((12.0..15.0).contains(&m), "{m}");
}

#[test]
fn isochrone_and_mass_track_agree_at_tracks_but_not_between() {
    let lib = synthetic_library(solar_set());
    let age = 5.0e6;
    let iso = lib.isochrone(age);

    let Evolved::Alive(on_track) = lib.lookup(12.0, age).unwrap() else {
        panic!("12 M☉ should be alive at 5 Myr");
    };
    let from_iso = iso.lookup(12.0).unwrap();
    assert!((on_track.log_l - from_iso.log_l).abs() < 1e-9);

    let Evolved::Alive(between) = lib.lookup(17.0, age).unwrap() else {
        panic!("17 M☉ should be alive at 5 Myr");
    };
    let iso_between = iso.lookup(17.0).unwrap();
    assert_ne!(between.log_teff, iso_between.log_teff);
}

#[test]
fn masses_outside_the_grid_are_out_of_range() {
    let lib = synthetic_library(solar_set());
    assert!(matches!(
        lib.lookup(150.0, 1.0e6),
        Err(InterpolationError::OutOfRange { .. })
    ));
}

#[test]
fn text_table_loads_back_into_a_valid_library() {
    let lib = synthetic_library(solar_set());
    let text = to_table_text(&lib);
    let loaded = read_library(Cursor::new(text), solar_set()).unwrap();
    assert_eq!(loaded.tracks().len(), lib.tracks().len());
    for (a, b) in loaded.tracks().iter().zip(lib.tracks()) {
        assert_eq!(a.initial_mass(), b.initial_mass());
        assert!((a.lifetime() - b.lifetime()).abs() / b.lifetime() < 1e-12);
    }
    run_full_compliance(&loaded);
}

#[test]
fn catalog_falls_back_to_nearest_metallicity() {
    let solar = solar_set();
    let mut catalog = TrackCatalog::new();
    catalog.insert(Arc::new(synthetic_library(solar)));

    let low_z = TrackSetId::new(TrackFamily::Geneva2012 { rotating: false }, 1);
    let picked = catalog.select(low_z).unwrap();
    assert_eq!(picked.set(), solar);

    let padova = TrackSetId::new(TrackFamily::Padova, 4);
    assert!(catalog.select(padova).is_err());
}

proptest! {
    #[test]
    fn lifetime_decreases_with_mass(a in 0.1f64..120.0, b in 0.1f64..120.0) {
        prop_assume!(a < b);
        let lib = synthetic_library(solar_set());
        prop_assert!(lib.lifetime(a).unwrap() > lib.lifetime(b).unwrap());
    }

    #[test]
    fn turnoff_never_rises_with_age(a in 3.1e6f64..1.0e10, b in 3.1e6f64..1.0e10) {
        prop_assume!(a < b);
        let lib = synthetic_library(solar_set());
        let (Some(ma), Some(mb)) = (lib.turnoff_mass(a), lib.turnoff_mass(b)) else {
            return Ok(());
        };
        prop_assert!(mb <= ma);
    }
}
