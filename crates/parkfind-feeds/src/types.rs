//! Raw row types for the four carpark data sources.
//!
//! ## Observed shapes from the live endpoints
//!
//! ### data.gov.sg datastore (`/api/action/datastore_search`)
//! Both static tables come from the CKAN-style datastore. Every cell is a
//! **JSON string**, including the numeric-looking ones (`x_coord`,
//! `car_park_decks`, `gantry_height`). Coercion happens during fusion and
//! fails the refresh fast on garbage. Responses page via `limit`/`offset`;
//! a page shorter than the requested limit is the last one.
//!
//! ### LTA DataMall (`/ltaodataservice/CarParkAvailabilityv2`)
//! OData-ish envelope with a `value` array. `Location` is a free-text
//! `"lat lon"` string and is the **empty string** (not null) when the agency
//! supplies no coordinates. `AvailableLots` is a real JSON number here,
//! unlike the datastore tables. Pages via `$skip` in steps of 500.
//!
//! ### data.gov.sg availability (`/v1/transport/carpark-availability`)
//! `items[0].carpark_data` is the record array. `total_lots` and
//! `lots_available` are strings. `carpark_info` usually holds one element
//! per lot type; the first element is the car-lot entry.

use serde::Deserialize;

/// Envelope for a datastore_search response.
#[derive(Debug, Deserialize)]
pub struct DatastoreResponse<T> {
    pub result: DatastoreResult<T>,
}

#[derive(Debug, Deserialize)]
pub struct DatastoreResult<T> {
    pub records: Vec<T>,
}

/// One row of the HDB carpark information table.
#[derive(Debug, Clone, Deserialize)]
pub struct HdbInformationRow {
    /// Facility code, e.g. `"ACB"` or `"bm29"` — casing is inconsistent in
    /// the source and normalized to uppercase during fusion.
    pub car_park_no: String,
    pub address: String,
    /// SVY21 easting, as a decimal string.
    pub x_coord: String,
    /// SVY21 northing, as a decimal string.
    pub y_coord: String,
    pub car_park_type: String,
    pub type_of_parking_system: String,
    pub short_term_parking: String,
    pub free_parking: String,
    /// `"YES"` or `"NO"`.
    pub night_parking: String,
    pub car_park_decks: String,
    pub gantry_height: String,
    /// `"Y"` or `"N"`.
    pub car_park_basement: String,
}

/// One row of the carpark rates table. Keyed by raw facility name, which is
/// a different identifier scheme from [`HdbInformationRow::car_park_no`].
#[derive(Debug, Clone, Deserialize)]
pub struct RateRow {
    pub carpark: String,
    pub category: String,
    pub weekdays_rate_1: String,
    pub weekdays_rate_2: String,
    pub saturday_rate: String,
    pub sunday_publicholiday_rate: String,
}

/// Envelope for the LTA DataMall availability response.
#[derive(Debug, Deserialize)]
pub struct DatamallResponse {
    pub value: Vec<DatamallRow>,
}

/// One record from the LTA DataMall availability feed.
#[derive(Debug, Clone, Deserialize)]
pub struct DatamallRow {
    #[serde(rename = "CarParkID")]
    pub car_park_id: String,

    #[serde(rename = "Development")]
    pub development: String,

    /// Operating agency: `"HDB"`, `"LTA"`, or `"URA"`.
    #[serde(rename = "Agency", default)]
    pub agency: String,

    /// Space-separated `"lat lon"`, or the empty string when the agency
    /// publishes no coordinates.
    #[serde(rename = "Location", default)]
    pub location: String,

    #[serde(rename = "AvailableLots", default)]
    pub available_lots: u32,

    #[serde(rename = "LotType", default)]
    pub lot_type: String,

    #[serde(rename = "Area", default)]
    pub area: String,
}

/// Envelope for the data.gov.sg availability response.
#[derive(Debug, Deserialize)]
pub struct AvailabilityResponse {
    pub items: Vec<AvailabilityItem>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityItem {
    pub carpark_data: Vec<AvailabilityRow>,
}

/// One record from the data.gov.sg availability feed. Keyed by the bare
/// facility number; carries no coordinates or address of its own.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRow {
    pub carpark_number: String,

    /// Per-lot-type breakdown; the first element is the car-lot entry.
    /// Occasionally empty, in which case the row carries no usable data.
    #[serde(default)]
    pub carpark_info: Vec<CarparkInfo>,
}

/// Lot counts for one lot type. Counts arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct CarparkInfo {
    pub total_lots: String,
    pub lots_available: String,
    pub lot_type: String,
}
