//! Plain-text mass-track tables.
//!
//! The format is line oriented. Blank lines and lines starting with `#`
//! are ignored. Each track starts with a header `M=<initial mass>`
//! followed by one row per sample:
//!
//! ```text
//! # age[yr]  log L   Teff[K]  R[R☉]  Ṁ[M☉/yr]  phase  [mass]
//! M=20.0
//! 0.0       4.75    35000    5.9    1.0e-7     0
//! 4.0e6     4.95    31000    8.4    3.2e-7     0      19.6
//! ```
//!
//! The trailing current-mass column is optional and defaults to the
//! initial mass. A mass-loss rate of zero is stored as [`NO_WIND_LOG_MDOT`].

use std::io::BufRead;

use galaxy_core::{DataError, EvolutionaryPhase};
use tracing::debug;

use crate::catalog::TrackSetId;
use crate::library::TrackLibrary;
use crate::track::{MassTrack, TrackSample};

/// `log10 Ṁ` recorded for samples with no mass loss.
pub const NO_WIND_LOG_MDOT: f64 = -30.0;

/// Parse every track in `reader`, in file order.
pub fn parse_tracks<R: BufRead>(reader: R) -> Result<Vec<MassTrack>, DataError> {
    let mut tracks = Vec::new();
    let mut current: Option<(f64, Vec<TrackSample>)> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| DataError::Parse {
            line: line_no,
            reason: e.to_string(),
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("M=") {
            if let Some((mass, samples)) = current.take() {
                tracks.push(MassTrack::new(mass, samples)?);
            }
            let mass = parse_field(rest.split_whitespace().next(), line_no, "initial mass")?;
            current = Some((mass, Vec::new()));
            continue;
        }
        let Some((mass, samples)) = current.as_mut() else {
            return Err(DataError::Parse {
                line: line_no,
                reason: "sample row before any 'M=' header".into(),
            });
        };
        samples.push(parse_row(line, line_no, *mass)?);
    }
    if let Some((mass, samples)) = current.take() {
        tracks.push(MassTrack::new(mass, samples)?);
    }
    if tracks.is_empty() {
        return Err(DataError::EmptyTable {
            table: "track file".into(),
        });
    }
    debug!(tracks = tracks.len(), "parsed track table");
    Ok(tracks)
}

/// Parse a whole track file into a validated [`TrackLibrary`].
pub fn read_library<R: BufRead>(reader: R, set: TrackSetId) -> Result<TrackLibrary, DataError> {
    TrackLibrary::new(set, parse_tracks(reader)?)
}

fn parse_row(line: &str, line_no: usize, initial_mass: f64) -> Result<TrackSample, DataError> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 6 {
        return Err(DataError::Parse {
            line: line_no,
            reason: format!("expected at least 6 columns, found {}", cols.len()),
        });
    }
    let age = parse_field(Some(cols[0]), line_no, "age")?;
    let log_l = parse_field(Some(cols[1]), line_no, "log L")?;
    let teff = parse_field(Some(cols[2]), line_no, "Teff")?;
    let radius = parse_field(Some(cols[3]), line_no, "radius")?;
    let mdot = parse_field(Some(cols[4]), line_no, "mass-loss rate")?;
    let phase_code: i64 = cols[5].parse().map_err(|_| DataError::Parse {
        line: line_no,
        reason: format!("invalid phase code '{}'", cols[5]),
    })?;
    let mass = match cols.get(6) {
        Some(col) => parse_field(Some(col), line_no, "current mass")?,
        None => initial_mass,
    };

    if teff <= 0.0 || radius <= 0.0 || mdot < 0.0 {
        return Err(DataError::Parse {
            line: line_no,
            reason: "Teff and radius must be positive, mass-loss rate non-negative".into(),
        });
    }
    let phase = EvolutionaryPhase::from_code(phase_code).map_err(|e| DataError::Parse {
        line: line_no,
        reason: e.to_string(),
    })?;
    let log_mdot = if mdot == 0.0 {
        NO_WIND_LOG_MDOT
    } else {
        mdot.log10()
    };

    Ok(TrackSample {
        age,
        log_l,
        log_teff: teff.log10(),
        log_r: radius.log10(),
        mass,
        log_mdot,
        phase,
    })
}

fn parse_field(raw: Option<&str>, line: usize, what: &str) -> Result<f64, DataError> {
    let raw = raw.ok_or_else(|| DataError::Parse {
        line,
        reason: format!("missing {what}"),
    })?;
    let value: f64 = raw.parse().map_err(|_| DataError::Parse {
        line,
        reason: format!("invalid {what} '{raw}'"),
    })?;
    if !value.is_finite() {
        return Err(DataError::Parse {
            line,
            reason: format!("{what} is not finite"),
        });
    }
    Ok(value)
}
