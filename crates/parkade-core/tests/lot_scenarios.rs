//! End-to-end lot scenarios driven through the public facade.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::{Duration, Utc};
use parkade_core::{
    Building, CategorySpotManager, EntranceGate, Error, ExitGate, FixedPricing, Level,
    LevelNumber, LotConfig, ParkingLot, RandomSpotSelector, Release, Spot, SpotId, SpotManager,
    Ticket, TicketId, Vehicle, VehicleType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TWO_BY_TWO: &str = r#"
    [[levels]]
    number = "L0"
    [[levels.managers]]
    vehicle = "bike"
    spots = ["L0-S1", "L0-S2"]

    [[levels]]
    number = "L1"
    [[levels.managers]]
    vehicle = "bike"
    spots = ["L1-S1", "L1-S2"]
"#;

fn lot(layout: &str) -> ParkingLot {
    LotConfig::from_toml_str(layout)
        .and_then(|config| config.build())
        .unwrap_or_else(|e| panic!("{e}"))
}

fn bike(plate: &str) -> Vehicle {
    Vehicle::new(VehicleType::Bike, plate)
}

fn admit(lot: &ParkingLot, vehicle: &Vehicle) -> Ticket {
    lot.vehicle_arrives(vehicle)
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("expected a ticket for {vehicle}"))
}

fn approve(_: Decimal) -> bool {
    true
}

fn decline(_: Decimal) -> bool {
    false
}

#[test]
fn test_fifth_bike_turned_away_until_one_leaves() {
    let lot = lot(TWO_BY_TWO);

    let tickets: Vec<Ticket> = (1..=4).map(|i| admit(&lot, &bike(&format!("B{i}")))).collect();

    // First-free fills the ground level before moving up
    let placements: Vec<(&str, &str)> = tickets
        .iter()
        .map(|t| (t.level().as_str(), t.spot().as_str()))
        .collect();
    assert_eq!(
        placements,
        vec![
            ("L0", "L0-S1"),
            ("L0", "L0-S2"),
            ("L1", "L1-S1"),
            ("L1", "L1-S2"),
        ]
    );
    assert_eq!(tickets[0].id(), &TicketId::new("TKT-000001"));
    assert_eq!(tickets[3].id(), &TicketId::new("TKT-000004"));

    assert_eq!(lot.vehicle_arrives(&bike("B5")), Ok(None));

    let settlement = lot
        .vehicle_exits(&tickets[0], &approve)
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(settlement.paid);
    assert_eq!(settlement.amount, dec!(100));

    let fifth = admit(&lot, &bike("B5"));
    assert_eq!(fifth.level().as_str(), "L0");
    assert_eq!(fifth.spot().as_str(), "L0-S1");
    assert_eq!(fifth.id(), &TicketId::new("TKT-000005"));
}

#[test]
fn test_declined_exit_keeps_spot_occupied() {
    let lot = lot(TWO_BY_TWO);
    let ticket = admit(&lot, &bike("B1"));
    assert_eq!(lot.occupancy().free_for(VehicleType::Bike), 3);

    let settlement = lot
        .vehicle_exits(&ticket, &decline)
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(!settlement.paid);
    assert_eq!(lot.occupancy().free_for(VehicleType::Bike), 3);

    // Nobody else gets the spot in the meantime
    let next = admit(&lot, &bike("B2"));
    assert_ne!(next.spot(), ticket.spot());
}

#[test]
fn test_fixed_pricing_ignores_duration() {
    let lot = lot(TWO_BY_TWO);
    let first = admit(&lot, &bike("B1"));
    let second = admit(&lot, &Vehicle::new(VehicleType::Bike, "B2"));

    let first = lot
        .vehicle_exits(&first, &approve)
        .unwrap_or_else(|e| panic!("{e}"));
    let second = lot
        .vehicle_exits(&second, &approve)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(first.amount, dec!(100));
    assert_eq!(second.amount, dec!(100));
}

#[test]
fn test_hourly_pricing_from_layout() {
    let layout = format!(
        r#"
        [pricing]
        strategy = "hourly"
        rates = {{ bike = "12.50" }}
        minimum = "5"
        {TWO_BY_TWO}
    "#
    );
    let lot = lot(&layout);
    let ticket = admit(&lot, &bike("B1"));

    // A stay shorter than an hour bills one started hour
    let settlement = lot
        .vehicle_exits(&ticket, &approve)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(settlement.amount, dec!(12.50));
}

#[test]
fn test_faulting_pricing_leaves_exit_retryable() {
    let manager: Box<dyn SpotManager> = Box::new(CategorySpotManager::new(
        VehicleType::Car,
        vec![Spot::vacant(SpotId::new("L0-S1"))],
        Arc::new(RandomSpotSelector),
    ));
    let level = Level::new(LevelNumber::new("L0"), [manager]).unwrap_or_else(|e| panic!("{e}"));
    let building = Building::new(vec![level]).unwrap_or_else(|e| panic!("{e}"));
    let faults_left = AtomicUsize::new(2);
    let pricing = move |_: &Ticket, _: chrono::DateTime<Utc>| -> Decimal {
        if faults_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            panic!("pricing backend unavailable");
        }
        dec!(30)
    };
    let lot = ParkingLot::new(EntranceGate, building, ExitGate::new(Box::new(pricing)));
    let ticket = admit(&lot, &Vehicle::new(VehicleType::Car, "CR-1"));

    for _ in 0..2 {
        let settlement = lot
            .vehicle_exits(&ticket, &approve)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(!settlement.paid);
        assert_eq!(lot.live_tickets(), 1);
        assert_eq!(lot.occupancy().free_for(VehicleType::Car), 0);
    }

    let settlement = lot
        .vehicle_exits(&ticket, &approve)
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(settlement.paid);
    assert_eq!(settlement.amount, dec!(30));
    assert_eq!(lot.occupancy().free_for(VehicleType::Car), 1);
    assert_eq!(lot.live_tickets(), 0);
}

#[test]
fn test_unsupported_category_is_an_error() {
    let lot = lot(TWO_BY_TWO);
    let result = lot.vehicle_arrives(&Vehicle::new(VehicleType::Truck, "TR-1"));
    assert!(matches!(
        result,
        Err(Error::UnsupportedVehicle {
            vehicle_type: VehicleType::Truck,
            ..
        })
    ));
    assert_eq!(lot.occupancy().occupied(), 0);
}

#[test]
fn test_random_selector_finds_the_single_free_spot() {
    let spots = vec![
        Spot::new(SpotId::new("L0-S1"), false),
        Spot::new(SpotId::new("L0-S2"), false),
        Spot::new(SpotId::new("L0-S3"), true),
        Spot::new(SpotId::new("L0-S4"), false),
    ];
    let manager = CategorySpotManager::new(VehicleType::Car, spots, Arc::new(RandomSpotSelector));

    assert_eq!(manager.park(), Some(SpotId::new("L0-S3")));
    assert_eq!(manager.park(), None);
    assert!(!manager.has_free_space());
}

#[test]
fn test_release_through_building_reports_outcome() {
    let manager: Box<dyn SpotManager> = Box::new(CategorySpotManager::new(
        VehicleType::Car,
        vec![Spot::vacant(SpotId::new("L0-S1"))],
        Arc::new(RandomSpotSelector),
    ));
    let level = Level::new(LevelNumber::new("L0"), [manager]).unwrap_or_else(|e| panic!("{e}"));
    let building = Building::new(vec![level]).unwrap_or_else(|e| panic!("{e}"));

    let ticket = building
        .allocate(&Vehicle::new(VehicleType::Car, "CR-1"))
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("expected a ticket"));

    assert_eq!(building.release(&ticket), Ok(Release::Freed));
    assert_eq!(building.release(&ticket), Ok(Release::AlreadyFree));
}

#[test]
fn test_custom_pricing_closure_sees_ticket() {
    let manager: Box<dyn SpotManager> = Box::new(CategorySpotManager::new(
        VehicleType::Car,
        vec![Spot::vacant(SpotId::new("L0-S1"))],
        Arc::new(RandomSpotSelector),
    ));
    let level = Level::new(LevelNumber::new("L0"), [manager]).unwrap_or_else(|e| panic!("{e}"));
    let building = Building::new(vec![level]).unwrap_or_else(|e| panic!("{e}"));
    let pricing = |ticket: &Ticket, exit_at: chrono::DateTime<Utc>| {
        if exit_at - ticket.entry_time() < Duration::hours(1) {
            dec!(7)
        } else {
            dec!(70)
        }
    };
    let lot = ParkingLot::new(EntranceGate, building, ExitGate::new(Box::new(pricing)));

    let ticket = admit(&lot, &Vehicle::new(VehicleType::Car, "CR-1"));
    let settlement = lot
        .vehicle_exits(&ticket, &approve)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(settlement.amount, dec!(7));
    assert!(FixedPricing::new(dec!(-5)).is_err());
}
