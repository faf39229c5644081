//! The fusion pass: four raw sources into one carpark map.
//!
//! Merge order is fixed and later sources overwrite matching fields of
//! earlier ones; keys are never deleted once inserted:
//!
//! 1. HDB facility information seeds the map (uppercase facility code,
//!    position converted from SVY21, structural fields).
//! 2. The rates table merges by raw facility name. Its identifier scheme is
//!    not the HDB code scheme and is deliberately not reconciled against it:
//!    most rate rows create sparse, position-less entries that queries never
//!    surface. That mirrors the source data, not a join we declined to write.
//! 3. The DataMall feed merges by its agency-specific identifier, creating
//!    minimal entries (address only) for facilities the static tables missed.
//! 4. The data.gov.sg feed merges by bare facility number and is the only
//!    source whose unknown rows are dropped — it carries no address, and
//!    facilities without a known address are never surfaced.
//!
//! Any numeric cell that fails coercion aborts the whole pass: a partially
//! fused snapshot is worse than keeping the previous one.

use std::collections::HashMap;

use parkfind_core::carpark::{Carpark, Position};
use parkfind_core::geo;

use crate::error::FeedError;
use crate::types::{AvailabilityRow, DatamallRow, HdbInformationRow, RateRow};

/// Builds the unified carpark map from the four raw sources.
///
/// # Errors
///
/// Returns [`FeedError::MalformedField`] if a numeric or coordinate cell
/// cannot be coerced. No partial map is returned.
pub fn fuse(
    info_rows: Vec<HdbInformationRow>,
    rate_rows: Vec<RateRow>,
    datamall_rows: Vec<DatamallRow>,
    availability_rows: Vec<AvailabilityRow>,
) -> Result<HashMap<String, Carpark>, FeedError> {
    let mut map: HashMap<String, Carpark> = HashMap::with_capacity(info_rows.len());

    // Step 1: seed from the HDB facility table.
    for row in info_rows {
        let id = row.car_park_no.to_uppercase();
        let easting = parse_f64("hdb-information", &id, "x_coord", &row.x_coord)?;
        let northing = parse_f64("hdb-information", &id, "y_coord", &row.y_coord)?;
        let decks = parse_u32("hdb-information", &id, "car_park_decks", &row.car_park_decks)?;
        let gantry_height =
            parse_f64("hdb-information", &id, "gantry_height", &row.gantry_height)?;

        let carpark = Carpark {
            id: id.clone(),
            position: Some(geo::to_lat_lon(northing, easting)),
            address: Some(row.address),
            car_park_type: non_empty(row.car_park_type),
            parking_system_type: non_empty(row.type_of_parking_system),
            short_term_parking: non_empty(row.short_term_parking),
            free_parking: non_empty(row.free_parking),
            night_parking: parse_yes_no(&row.night_parking),
            decks: Some(decks),
            gantry_height: Some(gantry_height),
            has_basement: parse_yes_no(&row.car_park_basement),
            ..Carpark::default()
        };
        map.insert(id, carpark);
    }

    // Step 2: merge the rates table by raw facility name.
    for row in rate_rows {
        let entry = map
            .entry(row.carpark.clone())
            .or_insert_with(|| Carpark::with_id(row.carpark));
        entry.category = non_empty(row.category);
        entry.weekday_rate_1 = non_empty(row.weekdays_rate_1);
        entry.weekday_rate_2 = non_empty(row.weekdays_rate_2);
        entry.saturday_rate = non_empty(row.saturday_rate);
        entry.sunday_holiday_rate = non_empty(row.sunday_publicholiday_rate);
    }

    // Step 3: merge the DataMall feed by agency-specific identifier.
    for row in datamall_rows {
        // HDB records carry the facility code in CarParkID; the other
        // agencies identify facilities by development name, the same scheme
        // the rates table keys on.
        let id = if row.agency == "HDB" {
            row.car_park_id
        } else {
            row.development.clone()
        };

        let position = parse_location("lta-availability", &id, &row.location)?;

        let entry = map.entry(id.clone()).or_insert_with(|| {
            let mut cp = Carpark::with_id(id.clone());
            cp.address = Some(row.development);
            cp
        });
        if position.is_some() {
            entry.position = position;
        }
        entry.available_lots = row.available_lots;
        entry.lot_type = non_empty(row.lot_type);
        entry.agency = Some(row.agency);
        entry.category = non_empty(row.area);
    }

    // Step 4: merge the data.gov.sg feed; unknown facilities are dropped.
    for row in availability_rows {
        let Some(entry) = map.get_mut(&row.carpark_number) else {
            tracing::trace!(
                carpark_number = %row.carpark_number,
                "dropping availability row for unknown facility"
            );
            continue;
        };
        let Some(info) = row.carpark_info.into_iter().next() else {
            tracing::debug!(
                carpark_number = %row.carpark_number,
                "availability row has no lot data"
            );
            continue;
        };
        entry.total_lots = parse_u32(
            "datagov-availability",
            &row.carpark_number,
            "total_lots",
            &info.total_lots,
        )?;
        entry.available_lots = parse_u32(
            "datagov-availability",
            &row.carpark_number,
            "lots_available",
            &info.lots_available,
        )?;
        entry.lot_type = non_empty(info.lot_type);
    }

    Ok(map)
}

/// Treats an empty string cell as absent.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parses the HDB table's YES/NO (or Y/N) flags. Anything else is treated
/// as unset rather than guessed.
fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_uppercase().as_str() {
        "YES" | "Y" => Some(true),
        "NO" | "N" => Some(false),
        _ => None,
    }
}

fn parse_f64(
    source_name: &'static str,
    row_id: &str,
    field: &'static str,
    value: &str,
) -> Result<f64, FeedError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| FeedError::MalformedField {
            source_name,
            row_id: row_id.to_owned(),
            field,
            value: value.to_owned(),
        })
}

fn parse_u32(
    source_name: &'static str,
    row_id: &str,
    field: &'static str,
    value: &str,
) -> Result<u32, FeedError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| FeedError::MalformedField {
            source_name,
            row_id: row_id.to_owned(),
            field,
            value: value.to_owned(),
        })
}

/// Parses the DataMall free-text `"lat lon"` coordinate string. The empty
/// string means the agency supplied no coordinates.
fn parse_location(
    source_name: &'static str,
    row_id: &str,
    value: &str,
) -> Result<Option<Position>, FeedError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    let malformed = || FeedError::MalformedField {
        source_name,
        row_id: row_id.to_owned(),
        field: "Location",
        value: value.to_owned(),
    };
    let mut parts = value.split_whitespace();
    let lat = parts
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(malformed)?;
    let lon = parts
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(malformed)?;
    Ok(Some(Position::new(lat, lon)))
}

#[cfg(test)]
#[path = "fusion_test.rs"]
mod tests;
