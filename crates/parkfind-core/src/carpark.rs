//! Domain types for the fused carpark snapshot.
//!
//! A [`Carpark`] is the output of the fusion pass: one entity per facility
//! identifier, carrying whichever fields its contributing sources supplied.
//! Identifier schemes differ by source family (uppercase HDB codes vs raw
//! facility names vs bare numbers) and are deliberately not reconciled, so
//! sparse entries with no position or address are normal output — they are
//! simply never surfaced by queries.

/// A geographic point in WGS84 decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One fused parking facility.
///
/// Every field except `id` is optional or zero-defaulted: which fields are
/// populated depends on which sources mentioned the facility. `total_lots`
/// and `available_lots` use `0` for "unknown" / "none reported" — the
/// original feeds make the same non-distinction and queries only care about
/// `available_lots > 0`.
///
/// `night_parking` and `has_basement` are `Option<bool>`: a populated
/// `false` ("no night parking") is a different statement from "the source
/// never said".
#[derive(Debug, Clone, Default)]
pub struct Carpark {
    /// Normalized facility identifier. Uppercase code for the HDB source
    /// family, raw facility name for the others.
    pub id: String,
    pub position: Option<Position>,
    pub address: Option<String>,
    /// Total lot count; `0` means unknown.
    pub total_lots: u32,
    /// Currently available lots; `0` means none reported or none available.
    pub available_lots: u32,
    pub lot_type: Option<String>,
    /// Source attribution from the live feed (e.g. `"HDB"`, `"LTA"`, `"URA"`).
    pub agency: Option<String>,

    // Rate-table fields.
    pub category: Option<String>,
    pub weekday_rate_1: Option<String>,
    pub weekday_rate_2: Option<String>,
    pub saturday_rate: Option<String>,
    pub sunday_holiday_rate: Option<String>,

    // Structural fields from the facility-metadata source.
    pub car_park_type: Option<String>,
    pub parking_system_type: Option<String>,
    pub short_term_parking: Option<String>,
    pub free_parking: Option<String>,
    pub night_parking: Option<bool>,
    pub decks: Option<u32>,
    pub gantry_height: Option<f64>,
    pub has_basement: Option<bool>,
}

impl Carpark {
    /// Returns an otherwise-empty entity with the given id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A carpark is valid for querying only when it has both a resolved
    /// position and a known address.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.is_some() && self.address.is_some()
    }

    /// A carpark is available when at least one lot is reported free.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available_lots > 0
    }
}
