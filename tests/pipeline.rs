//! End-to-end export runs over an in-memory dataset

use kravinka::config::{FilterConfig, KravinkaConfig, OutputConfig};
use kravinka::gpx::{read_creator, read_waypoints};
use kravinka::{ReferencePoint, StaticDataset, run};
use rstest::rstest;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

const PRAGUE: (f64, f64) = (50.0755, 14.4378);

fn mill(id: u32, lat: f64, lng: f64, icon: &str) -> Value {
    json!({
        "lat": lat.to_string(),
        "lng": lng.to_string(),
        "id": id,
        "name": format!("Mill {id}"),
        "icon": format!("img/icons/{icon}"),
    })
}

fn config(dir: &TempDir, limit: usize) -> KravinkaConfig {
    KravinkaConfig {
        output: OutputConfig {
            path: dir.path().join("final.gpx"),
            limit,
            ..OutputConfig::default()
        },
        filter: FilterConfig {
            reference_points: vec![ReferencePoint::new("Prague", PRAGUE.0, PRAGUE.1, 150.0)],
            icon_allow_list: None,
            append_detail_link: false,
        },
        ..KravinkaConfig::default()
    }
}

fn dataset() -> StaticDataset {
    StaticDataset::new(vec![
        mill(1, 50.9, 14.4378, "1.png"),        // ~92 km
        mill(2, 50.1, 14.4378, "2.png"),        // ~3 km
        mill(3, 49.1951, 16.6068, "1.png"),     // Brno, ~185 km
        json!({"lat": "?", "lng": "14.0", "id": 4, "name": "Broken", "icon": "1.png"}),
        mill(5, PRAGUE.0, PRAGUE.1, "1.png"),   // 0 km
        mill(6, 50.5, 14.4378, "3.png"),        // ~47 km
    ])
}

#[test]
fn export_writes_ranked_waypoints() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, 100);

    let summary = run(&config, &dataset()).unwrap();

    assert_eq!(summary.stats.seen, 6);
    assert_eq!(summary.stats.malformed, 1);
    assert_eq!(summary.stats.out_of_range, 1);
    assert_eq!(summary.stats.accepted, 4);
    assert_eq!(summary.written, 4);

    let xml = fs::read_to_string(&summary.output_path).unwrap();
    let waypoints = read_waypoints(&xml).unwrap();
    let names: Vec<String> = waypoints
        .iter()
        .filter_map(|w| w.name.as_deref())
        .map(|n| n.trim().to_string())
        .collect();
    assert_eq!(names, vec!["#5: Mill 5", "#2: Mill 2", "#6: Mill 6", "#1: Mill 1"]);
    assert_eq!(waypoints[0].lat, PRAGUE.0);
    assert_eq!(waypoints[0].lon, PRAGUE.1);
    assert_eq!(read_creator(&xml).unwrap().as_deref(), Some("kravinka"));
}

#[rstest]
#[case(1, vec!["5"])]
#[case(2, vec!["5", "2"])]
#[case(10, vec!["5", "2", "6", "1"])]
fn output_limit_keeps_closest(#[case] limit: usize, #[case] expected: Vec<&str>) {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, limit);

    let summary = run(&config, &dataset()).unwrap();
    assert_eq!(summary.written, expected.len());

    let xml = fs::read_to_string(&summary.output_path).unwrap();
    let ids: Vec<String> = read_waypoints(&xml)
        .unwrap()
        .into_iter()
        .map(|w| w.links[0].href.rsplit('=').next().unwrap().to_string())
        .collect();
    assert_eq!(ids, expected);
}

#[test]
fn icon_allow_list_filters_output() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, 100);
    config.filter.icon_allow_list = Some(BTreeSet::from(["1.png".to_string()]));

    let summary = run(&config, &dataset()).unwrap();

    assert_eq!(summary.stats.icon_rejected, 2);
    assert_eq!(summary.written, 2);
    let xml = fs::read_to_string(&summary.output_path).unwrap();
    let waypoints = read_waypoints(&xml).unwrap();
    assert!(
        waypoints
            .iter()
            .all(|w| w.links[1].href.ends_with("/img/icons/1.png"))
    );
}

#[test]
fn detail_link_is_appended_to_caption() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir, 1);
    config.filter.append_detail_link = true;

    let summary = run(&config, &dataset()).unwrap();
    let xml = fs::read_to_string(&summary.output_path).unwrap();
    let waypoints = read_waypoints(&xml).unwrap();

    assert_eq!(
        waypoints[0].name.as_deref().map(str::trim),
        Some("#5: Mill 5, https://www.vodnimlyny.cz/en/?do=estateInfo&estateId=5")
    );
}

#[test]
fn empty_dataset_yields_empty_document() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, 10);

    let summary = run(&config, &StaticDataset::default()).unwrap();
    assert_eq!(summary.written, 0);

    let xml = fs::read_to_string(&summary.output_path).unwrap();
    assert!(read_waypoints(&xml).unwrap().is_empty());
}

#[test]
fn unwritable_output_is_an_io_failure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"").unwrap();

    let mut config = config(&dir, 10);
    config.output.path = blocker.join("final.gpx");

    let err = run(&config, &dataset()).unwrap_err();
    assert!(matches!(err, kravinka::KravinkaError::Io { .. }));
}
