//! Physical and astronomical constants in CGS units.
//!
//! Wavelengths are in Ångström throughout the workspace, ages in years,
//! masses in solar masses, luminosities in erg s⁻¹ unless stated otherwise.

/// Solar mass in grams.
pub const SOLAR_MASS_G: f64 = 1.989e33;

/// Solar luminosity in erg s⁻¹.
pub const SOLAR_LUMINOSITY: f64 = 3.826e33;

/// Solar radius in centimetres.
pub const SOLAR_RADIUS_CM: f64 = 6.957e10;

/// Solar effective temperature in Kelvin.
pub const SOLAR_TEFF: f64 = 5772.0;

/// `log10 g` of the Sun in cgs.
pub const SOLAR_LOG_G: f64 = 4.438;

/// One Julian year in seconds.
pub const YEAR_S: f64 = 3.1557e7;

/// One parsec in centimetres.
pub const PARSEC_CM: f64 = 3.0857e18;

/// Boltzmann constant in erg K⁻¹.
pub const K_BOLTZMANN: f64 = 1.380649e-16;

/// Planck constant in erg s.
pub const H_PLANCK: f64 = 6.62607015e-27;

/// Speed of light in cm s⁻¹.
pub const C_LIGHT: f64 = 2.99792458e10;

/// Speed of light in Å s⁻¹.
pub const C_LIGHT_ANGSTROM: f64 = 2.99792458e18;

/// Stefan–Boltzmann constant in erg cm⁻² s⁻¹ K⁻⁴.
pub const SIGMA_SB: f64 = 5.670374419e-5;

/// Gravitational constant in cm³ g⁻¹ s⁻².
pub const G_NEWTON: f64 = 6.674e-8;

/// Kinetic energy released by one core-collapse supernova, in erg.
pub const SUPERNOVA_ENERGY: f64 = 1.0e51;

/// Hydrogen ionization edge (Lyman limit) in Å.
pub const LYMAN_LIMIT: f64 = 911.76;

/// Neutral helium ionization edge in Å.
pub const HE_I_EDGE: f64 = 504.26;

/// Singly ionized helium ionization edge in Å.
pub const HE_II_EDGE: f64 = 227.84;

/// Solar-mass-per-year expressed in grams per second.
pub const SOLAR_MASS_PER_YEAR_G_S: f64 = SOLAR_MASS_G / YEAR_S;
