use super::*;
use crate::types::CarparkInfo;

fn hdb_row(car_park_no: &str, address: &str) -> HdbInformationRow {
    HdbInformationRow {
        car_park_no: car_park_no.to_owned(),
        address: address.to_owned(),
        // Roughly central Singapore in SVY21.
        x_coord: "30000.0".to_owned(),
        y_coord: "32000.0".to_owned(),
        car_park_type: "SURFACE CAR PARK".to_owned(),
        type_of_parking_system: "ELECTRONIC PARKING".to_owned(),
        short_term_parking: "WHOLE DAY".to_owned(),
        free_parking: "NO".to_owned(),
        night_parking: "YES".to_owned(),
        car_park_decks: "0".to_owned(),
        gantry_height: "4.50".to_owned(),
        car_park_basement: "N".to_owned(),
    }
}

fn rate_row(carpark: &str) -> RateRow {
    RateRow {
        carpark: carpark.to_owned(),
        category: "Shopping Mall".to_owned(),
        weekdays_rate_1: "$2.40/hr".to_owned(),
        weekdays_rate_2: "-".to_owned(),
        saturday_rate: "$2.40/hr".to_owned(),
        sunday_publicholiday_rate: "$2.40/hr".to_owned(),
    }
}

fn datamall_row(id: &str, development: &str, agency: &str, location: &str) -> DatamallRow {
    DatamallRow {
        car_park_id: id.to_owned(),
        development: development.to_owned(),
        agency: agency.to_owned(),
        location: location.to_owned(),
        available_lots: 42,
        lot_type: "C".to_owned(),
        area: "Orchard".to_owned(),
    }
}

fn availability_row(number: &str, total: &str, available: &str) -> AvailabilityRow {
    AvailabilityRow {
        carpark_number: number.to_owned(),
        carpark_info: vec![CarparkInfo {
            total_lots: total.to_owned(),
            lots_available: available.to_owned(),
            lot_type: "C".to_owned(),
        }],
    }
}

#[test]
fn seeds_from_hdb_with_uppercase_id_and_converted_position() {
    let map = fuse(vec![hdb_row("bm29", "BLK 29 BUKIT MERAH")], vec![], vec![], vec![]).unwrap();
    let cp = map.get("BM29").expect("id should be uppercased");
    assert_eq!(cp.address.as_deref(), Some("BLK 29 BUKIT MERAH"));
    let pos = cp.position.expect("seeded entry has a position");
    // SVY21 (N=32000, E=30000) is a known reference point.
    assert!((pos.latitude - 1.305_670).abs() < 1e-4);
    assert!((pos.longitude - 103.851_289).abs() < 1e-4);
    assert_eq!(cp.night_parking, Some(true));
    assert_eq!(cp.has_basement, Some(false));
    assert_eq!(cp.decks, Some(0));
    assert_eq!(cp.total_lots, 0);
    assert_eq!(cp.available_lots, 0);
}

#[test]
fn malformed_coordinate_fails_the_whole_pass() {
    let mut row = hdb_row("ACB", "SOMEWHERE");
    row.x_coord = "not-a-number".to_owned();
    let err = fuse(vec![row], vec![], vec![], vec![]).unwrap_err();
    assert!(
        matches!(
            err,
            FeedError::MalformedField {
                source_name: "hdb-information",
                field: "x_coord",
                ..
            }
        ),
        "got: {err:?}"
    );
}

#[test]
fn rate_rows_keep_their_own_identifier_scheme() {
    // The rate table keys by facility name; it must NOT be joined onto the
    // HDB code, so this produces two separate entries.
    let map = fuse(
        vec![hdb_row("ACB", "BLK 270 QUEEN STREET")],
        vec![rate_row("Queen Street Mall")],
        vec![],
        vec![],
    )
    .unwrap();
    assert_eq!(map.len(), 2);

    let orphan = map.get("Queen Street Mall").unwrap();
    assert_eq!(orphan.weekday_rate_1.as_deref(), Some("$2.40/hr"));
    // Sparse entry: no position, no address — permanently invalid.
    assert!(!orphan.is_valid());
    assert!(map.get("ACB").unwrap().weekday_rate_1.is_none());
}

#[test]
fn fusion_precedence_hdb_structure_survives_datamall_availability() {
    let map = fuse(
        vec![hdb_row("ACB", "BLK 270 QUEEN STREET")],
        vec![],
        vec![datamall_row("ACB", "Queen Street", "HDB", "")],
        vec![],
    )
    .unwrap();
    assert_eq!(map.len(), 1);

    let cp = map.get("ACB").unwrap();
    // Structural fields from the static table are untouched...
    assert_eq!(cp.address.as_deref(), Some("BLK 270 QUEEN STREET"));
    assert_eq!(cp.car_park_type.as_deref(), Some("SURFACE CAR PARK"));
    assert!(cp.position.is_some());
    // ...while the live feed wins the fields both sources define.
    assert_eq!(cp.available_lots, 42);
    assert_eq!(cp.lot_type.as_deref(), Some("C"));
    assert_eq!(cp.agency.as_deref(), Some("HDB"));
    assert_eq!(cp.category.as_deref(), Some("Orchard"));
}

#[test]
fn datamall_non_hdb_rows_key_by_development_name() {
    let map = fuse(
        vec![],
        vec![],
        vec![datamall_row("5", "Suntec City", "LTA", "1.29375 103.85718")],
        vec![],
    )
    .unwrap();
    let cp = map.get("Suntec City").expect("keyed by development, not CarParkID");
    assert_eq!(cp.address.as_deref(), Some("Suntec City"));
    let pos = cp.position.unwrap();
    assert!((pos.latitude - 1.29375).abs() < 1e-9);
    assert!((pos.longitude - 103.85718).abs() < 1e-9);
    assert!(cp.is_valid());
}

#[test]
fn blank_location_leaves_position_absent() {
    let map = fuse(
        vec![],
        vec![],
        vec![datamall_row("N5", "Some Development", "URA", "")],
        vec![],
    )
    .unwrap();
    let cp = map.get("Some Development").unwrap();
    assert!(cp.position.is_none());
    assert_eq!(cp.address.as_deref(), Some("Some Development"));
    assert!(!cp.is_valid());
}

#[test]
fn malformed_location_fails_the_whole_pass() {
    let err = fuse(
        vec![],
        vec![],
        vec![datamall_row("N5", "Some Development", "URA", "1.29 not-a-lon")],
        vec![],
    )
    .unwrap_err();
    assert!(
        matches!(err, FeedError::MalformedField { field: "Location", .. }),
        "got: {err:?}"
    );
}

#[test]
fn datamall_row_keyed_by_rate_name_merges_onto_rate_entry() {
    // A mall appears in both the rates table and the DataMall feed under the
    // same facility name: one entry carrying rates and live availability.
    let map = fuse(
        vec![],
        vec![rate_row("Suntec City")],
        vec![datamall_row("5", "Suntec City", "LTA", "1.29375 103.85718")],
        vec![],
    )
    .unwrap();
    assert_eq!(map.len(), 1);
    let cp = map.get("Suntec City").unwrap();
    assert_eq!(cp.weekday_rate_1.as_deref(), Some("$2.40/hr"));
    assert_eq!(cp.available_lots, 42);
    // The feed's Area overwrites the rate table's category.
    assert_eq!(cp.category.as_deref(), Some("Orchard"));
}

#[test]
fn datagov_orphan_rows_are_dropped() {
    let map = fuse(
        vec![hdb_row("ACB", "BLK 270 QUEEN STREET")],
        vec![],
        vec![],
        vec![availability_row("ZZ99", "100", "50")],
    )
    .unwrap();
    assert_eq!(map.len(), 1);
    assert!(!map.contains_key("ZZ99"));
}

#[test]
fn datagov_rows_overwrite_lot_counts_for_known_facilities() {
    let map = fuse(
        vec![hdb_row("HE12", "BLK 12 HENDERSON")],
        vec![],
        vec![],
        vec![availability_row("HE12", "105", "14")],
    )
    .unwrap();
    let cp = map.get("HE12").unwrap();
    assert_eq!(cp.total_lots, 105);
    assert_eq!(cp.available_lots, 14);
    assert_eq!(cp.lot_type.as_deref(), Some("C"));
}

#[test]
fn datagov_row_without_lot_data_is_skipped() {
    let map = fuse(
        vec![hdb_row("HE12", "BLK 12 HENDERSON")],
        vec![],
        vec![],
        vec![AvailabilityRow {
            carpark_number: "HE12".to_owned(),
            carpark_info: vec![],
        }],
    )
    .unwrap();
    assert_eq!(map.get("HE12").unwrap().available_lots, 0);
}

#[test]
fn malformed_lot_count_fails_the_whole_pass() {
    let err = fuse(
        vec![hdb_row("HE12", "BLK 12 HENDERSON")],
        vec![],
        vec![],
        vec![availability_row("HE12", "105", "fourteen")],
    )
    .unwrap_err();
    assert!(
        matches!(
            err,
            FeedError::MalformedField {
                source_name: "datagov-availability",
                field: "lots_available",
                ..
            }
        ),
        "got: {err:?}"
    );
}

#[test]
fn mismatched_identifier_schemes_yield_expected_sparse_map() {
    // Deliberately disjoint keys across all four inputs: an HDB code, a mall
    // name, a DataMall development, and an unknown bare number.
    let map = fuse(
        vec![hdb_row("ACB", "BLK 270 QUEEN STREET")],
        vec![rate_row("Orchard Central")],
        vec![datamall_row("7", "Plaza Singapura", "LTA", "")],
        vec![availability_row("XX1", "10", "5")],
    )
    .unwrap();

    // Three entries survive; the orphan availability row is gone.
    assert_eq!(map.len(), 3);
    assert!(map.contains_key("ACB"));
    assert!(map.contains_key("Orchard Central"));
    assert!(map.contains_key("Plaza Singapura"));

    // Only the HDB-seeded entry is valid for querying.
    assert!(map.get("ACB").unwrap().is_valid());
    assert!(!map.get("Orchard Central").unwrap().is_valid());
    assert!(!map.get("Plaza Singapura").unwrap().is_valid());
}

#[test]
fn parse_yes_no_distinguishes_false_from_unknown() {
    assert_eq!(parse_yes_no("YES"), Some(true));
    assert_eq!(parse_yes_no("y"), Some(true));
    assert_eq!(parse_yes_no("NO"), Some(false));
    assert_eq!(parse_yes_no("n"), Some(false));
    assert_eq!(parse_yes_no(""), None);
    assert_eq!(parse_yes_no("maybe"), None);
}
