use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parkfind_core::app_config::{AppConfig, Environment};

use super::*;

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "debug".to_owned(),
        datamall_account_key: "test-account-key".to_owned(),
        datagov_base_url: base_url.to_owned(),
        datamall_base_url: base_url.to_owned(),
        hdb_information_resource_id: "hdb-info-resource".to_owned(),
        rates_resource_id: "rates-resource".to_owned(),
        feed_request_timeout_secs: 5,
        feed_user_agent: "parkfind-test/0.1".to_owned(),
        feed_max_retries: 0,
        feed_retry_backoff_base_secs: 0,
        refresh_interval_secs: 90,
        page_size: 5,
        default_radius_km: 3.0,
    }
}

fn hdb_info_record(car_park_no: &str, x_coord: &str) -> serde_json::Value {
    json!({
        "car_park_no": car_park_no,
        "address": format!("BLK 1 {car_park_no} STREET"),
        "x_coord": x_coord,
        "y_coord": "32000.0",
        "car_park_type": "SURFACE CAR PARK",
        "type_of_parking_system": "ELECTRONIC PARKING",
        "short_term_parking": "WHOLE DAY",
        "free_parking": "NO",
        "night_parking": "YES",
        "car_park_decks": "0",
        "gantry_height": "4.50",
        "car_park_basement": "N"
    })
}

/// Mounts all four feed endpoints with one small consistent dataset.
async fn mount_feeds(server: &MockServer, x_coord: &str) {
    Mock::given(method("GET"))
        .and(path("/api/action/datastore_search"))
        .and(query_param("resource_id", "hdb-info-resource"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"records": [hdb_info_record("HE12", x_coord)]}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/action/datastore_search"))
        .and(query_param("resource_id", "rates-resource"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"records": [{
                "carpark": "Suntec City",
                "category": "Shopping Mall",
                "weekdays_rate_1": "$2.40/hr",
                "weekdays_rate_2": "-",
                "saturday_rate": "$2.40/hr",
                "sunday_publicholiday_rate": "$2.40/hr"
            }]}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ltaodataservice/CarParkAvailabilityv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "CarParkID": "5",
                "Development": "Suntec City",
                "Location": "1.29375 103.85718",
                "AvailableLots": 352,
                "LotType": "C",
                "Agency": "LTA",
                "Area": "Marina"
            }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/transport/carpark-availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"carpark_data": [{
                "carpark_number": "HE12",
                "carpark_info": [
                    {"total_lots": "105", "lot_type": "C", "lots_available": "14"}
                ]
            }]}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_fuses_all_sources_into_one_snapshot() {
    let server = MockServer::start().await;
    mount_feeds(&server, "30000.0").await;

    let client = FeedClient::new(&test_config(&server.uri())).unwrap();
    let store = CarparkStore::new();
    assert!(store.snapshot().refreshed_at.is_none());

    let count = store.refresh(&client).await.unwrap();
    // HE12 (HDB) and Suntec City (rates + DataMall, same name).
    assert_eq!(count, 2);

    let snapshot = store.snapshot();
    assert!(snapshot.refreshed_at.is_some());

    let he12 = store.lookup_by_id("HE12").unwrap();
    assert_eq!(he12.available_lots, 14);
    assert_eq!(he12.total_lots, 105);

    let suntec = store.lookup_by_id("Suntec City").unwrap();
    assert_eq!(suntec.available_lots, 352);
    assert_eq!(suntec.weekday_rate_1.as_deref(), Some("$2.40/hr"));
    assert!(suntec.is_valid());
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_snapshot() {
    let server = MockServer::start().await;
    mount_feeds(&server, "30000.0").await;

    let client = FeedClient::new(&test_config(&server.uri())).unwrap();
    let store = CarparkStore::new();
    store.refresh(&client).await.unwrap();
    let before = store.snapshot();

    // Second refresh hits a server returning a malformed coordinate, which
    // fails the fusion pass.
    let bad_server = MockServer::start().await;
    mount_feeds(&bad_server, "not-a-number").await;
    let bad_client = FeedClient::new(&test_config(&bad_server.uri())).unwrap();

    let err = store.refresh(&bad_client).await.unwrap_err();
    assert!(matches!(err, FeedError::MalformedField { .. }));

    // Readers still see the full old snapshot.
    let after = store.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(store.lookup_by_id("HE12").is_ok());
}

#[tokio::test]
async fn queries_on_an_empty_store_find_nothing() {
    let store = CarparkStore::new();
    assert!(store.query_nearby(None, None, None).is_empty());
    let err = store
        .query_nearby_paged(None, None, None, Page::new(0, 5))
        .unwrap_err();
    assert!(matches!(err, QueryError::NoResults));
    assert!(matches!(
        store.lookup_by_id("HE12"),
        Err(QueryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn concurrent_refreshes_serialize_without_deadlock() {
    let server = MockServer::start().await;
    mount_feeds(&server, "30000.0").await;

    let client = Arc::new(FeedClient::new(&test_config(&server.uri())).unwrap());
    let store = Arc::new(CarparkStore::new());

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = Arc::clone(&store);
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move { store.refresh(&client).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 2);
    }
}
