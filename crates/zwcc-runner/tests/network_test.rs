//! End-to-end runs against the network fixtures.

use std::path::Path;

use zwcc_command_classes::{CommandClassError, RequestFlags};
use zwcc_runner::{load_network, Driver, DriverError, NetworkConfig, SimulatedNetwork};
use zwcc_values::{GroupIndex, ValueData, ValueId};

fn fixture(name: &str) -> NetworkConfig {
    // Integration tests run from the crate directory
    let path = Path::new("../../networks").join(name);
    load_network(&path).expect("Failed to load network fixture")
}

fn scene_index(group: u8, field: u8) -> u8 {
    GroupIndex::new(group, field).encode()
}

fn read(driver: &Driver, id: ValueId) -> Option<u8> {
    let value = driver.values().get(&id)?;
    let value = value.read();
    if value.is_set() {
        value.data().as_u8()
    } else {
        None
    }
}

#[test]
fn test_refresh_populates_values() {
    let config = fixture("scene_controllers.yaml");
    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);

    let summary = driver.refresh_all(RequestFlags::ALL);
    assert_eq!(summary.attempted, 6);
    assert_eq!(summary.failed, 1, "node 12 does not answer Gets");
    assert_eq!(summary.succeeded, 5);

    let stats = driver.pump(&mut network);
    assert_eq!(stats.unhandled, 0);

    let home = config.home_id;
    assert_eq!(read(&driver, ValueId::new(home, 5, 1, 0x2D, scene_index(1, 0))), Some(10));
    assert_eq!(read(&driver, ValueId::new(home, 5, 1, 0x2D, scene_index(2, 0))), Some(5));
    assert_eq!(read(&driver, ValueId::new(home, 5, 1, 0x2D, scene_index(2, 1))), Some(10));
    assert_eq!(read(&driver, ValueId::new(home, 5, 1, 0x2D, scene_index(3, 1))), Some(255));
    assert_eq!(read(&driver, ValueId::new(home, 5, 1, 0x20, 0)), Some(0));
    assert_eq!(read(&driver, ValueId::new(home, 9, 1, 0x20, 0)), Some(99));

    // Values exist for the silent keypad but were never reported
    let garage = driver.values().values_for_node(12);
    assert_eq!(garage.len(), 4);
    assert!(garage.iter().all(|v| !v.is_set()));
    assert_eq!(driver.values().outstanding_handles(), 0);
}

#[test]
fn test_group_values_created_for_first_instance_only() {
    let config = fixture("scene_controllers.yaml");
    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);

    driver.refresh_node(6, RequestFlags::SESSION).unwrap();
    let stats = driver.pump(&mut network);
    // Two groups queried on each of the two instances
    assert_eq!(stats.sent, 4);
    assert_eq!(stats.handled, 4);

    let values = driver.values().values_for_node(6);
    assert_eq!(values.len(), 4);
    assert!(values.iter().all(|v| v.id().instance == 1));
    assert_eq!(
        read(&driver, ValueId::new(config.home_id, 6, 1, 0x2D, scene_index(2, 0))),
        Some(7)
    );
}

#[test]
fn test_set_reaches_device_and_is_confirmed_by_refresh() {
    let config = fixture("scene_controllers.yaml");
    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);

    driver.refresh_node(5, RequestFlags::ALL).unwrap();
    driver.pump(&mut network);

    let scene = ValueId::new(config.home_id, 5, 1, 0x2D, scene_index(2, 0));
    driver.set_value(&scene, ValueData::Byte(7)).unwrap();
    driver.pump(&mut network);

    // The device changed; the controller still shows the last report
    assert_eq!(network.device(5).unwrap().scene(1, 2), Some((7, 10)));
    assert_eq!(read(&driver, scene), Some(5));

    driver.refresh_node(5, RequestFlags::SESSION).unwrap();
    driver.pump(&mut network);
    assert_eq!(read(&driver, scene), Some(7));
}

#[test]
fn test_basic_set() {
    let config = fixture("scene_controllers.yaml");
    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);

    driver.create_values();
    let basic = ValueId::new(config.home_id, 9, 1, 0x20, 0);
    driver.set_value(&basic, ValueData::Byte(0)).unwrap();
    driver.pump(&mut network);
    assert_eq!(network.device(9).unwrap().basic(1), Some(0));
}

#[test]
fn test_write_only_keypad_still_accepts_sets() {
    let config = fixture("scene_controllers.yaml");
    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);

    driver.create_values();
    let duration = ValueId::new(config.home_id, 12, 1, 0x2D, scene_index(1, 1));
    driver.set_value(&duration, ValueData::Byte(20)).unwrap();
    let stats = driver.pump(&mut network);
    assert_eq!(stats.sent, 1);
    assert_eq!(network.device(12).unwrap().scene(1, 1), Some((0, 20)));
}

#[test]
fn test_driver_errors() {
    let config = fixture("scene_controllers.yaml");
    let driver = Driver::new(&config);

    let missing = ValueId::new(config.home_id, 42, 1, 0x2D, 2);
    assert!(matches!(
        driver.set_value(&missing, ValueData::Byte(1)),
        Err(DriverError::UnknownNode(42))
    ));

    // Values are not created until the node is interviewed
    let uncreated = ValueId::new(config.home_id, 5, 1, 0x2D, scene_index(1, 0));
    assert!(matches!(
        driver.set_value(&uncreated, ValueData::Byte(1)),
        Err(DriverError::Command(CommandClassError::UnknownValue(_)))
    ));

    let unregistered = ValueId::new(config.home_id, 9, 1, 0x26, 0);
    assert!(matches!(
        driver.request_value(&unregistered),
        Err(DriverError::Command(CommandClassError::UnknownCommandClass { .. }))
    ));
}

#[test]
fn test_lossy_network_is_deterministic() {
    let config = fixture("lossy.yaml");

    let run = |config: &NetworkConfig| {
        let driver = Driver::new(config);
        let mut network = SimulatedNetwork::new(config);
        driver.refresh_all(RequestFlags::ALL);
        driver.pump(&mut network);
        let set: Vec<bool> = driver.values().values().iter().map(|v| v.is_set()).collect();
        (set, network.stats())
    };

    let (first, stats) = run(&config);
    let (second, again) = run(&config);
    assert_eq!(first, second);
    assert_eq!(stats, again);
    assert_eq!(first.len(), 16);
    assert!(stats.delivered <= 8);
    assert!(stats.replies <= stats.delivered);
}

#[test]
fn test_lossless_override_reports_everything() {
    let mut config = fixture("lossy.yaml");
    config.loss_probability = 0.0;

    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);
    driver.refresh_all(RequestFlags::ALL);
    let stats = driver.pump(&mut network);

    assert_eq!(stats.sent, 8);
    assert_eq!(stats.handled, 8);
    assert!(driver.values().values().iter().all(|v| v.is_set()));
    assert_eq!(
        read(&driver, ValueId::new(config.home_id, 3, 1, 0x2D, scene_index(4, 0))),
        Some(44)
    );
}
