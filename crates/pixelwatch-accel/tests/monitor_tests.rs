//! Sampling loop lifecycle.

mod common;

use common::MockSpi;
use pixelwatch_accel::{
    AccelConfig, AccelerometerReader, DeviceError, Monitor, MonitorConfig, MonitorEvent,
    StartError, EVENT_QUEUE_LEN,
};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        interval_ms: 5,
        ..Default::default()
    }
}

#[test]
fn publishes_samples_and_returns_bus_on_stop() {
    // z = 0x0080 = 128 counts = 1G, above the threshold
    let spi = MockSpi::with_axes([0, 0, 0, 0, 0x80, 0x00]);
    let monitor = Monitor::open(spi.clone(), &fast_config()).unwrap();

    match monitor.events().recv_timeout(WAIT).unwrap() {
        MonitorEvent::Sample { acceleration, alert } => {
            assert_eq!(acceleration.z, 1.0);
            assert!(!alert);
        }
        MonitorEvent::Error(e) => panic!("unexpected error: {e}"),
    }
    assert_eq!(monitor.latest().map(|a| a.z), Some(1.0));

    let bus = monitor.stop().unwrap();
    assert_eq!(bus.writes().len(), 2);
    let reads = bus.transfers().len();
    assert!(reads >= 1);

    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(bus.transfers().len(), reads);
}

#[test]
fn low_z_is_flagged() {
    // z = 0x0020 = 32 counts = 0.25G
    let spi = MockSpi::with_axes([0, 0, 0, 0, 0x20, 0x00]);
    let monitor = Monitor::open(spi, &fast_config()).unwrap();
    match monitor.events().recv_timeout(WAIT).unwrap() {
        MonitorEvent::Sample { alert, .. } => assert!(alert),
        MonitorEvent::Error(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn read_errors_do_not_stop_the_loop() {
    let spi = MockSpi::with_axes([0, 0, 0, 0, 0x80, 0x00]);
    let monitor = Monitor::open(spi.clone(), &fast_config()).unwrap();
    monitor.events().recv_timeout(WAIT).unwrap();

    spi.state.lock().fail_transfers = true;
    let saw_error = monitor
        .events()
        .iter()
        .take(50)
        .any(|event| matches!(event, MonitorEvent::Error(DeviceError::Bus(_))));
    assert!(saw_error);

    spi.state.lock().fail_transfers = false;
    let recovered = monitor
        .events()
        .iter()
        .take(50)
        .any(|event| matches!(event, MonitorEvent::Sample { .. }));
    assert!(recovered);
    assert!(monitor.stop().is_some());
}

#[test]
fn failed_configure_starts_nothing() {
    let spi = MockSpi::new();
    spi.state.lock().fail_writes = true;
    let reader = AccelerometerReader::new(spi.clone(), AccelConfig::default()).unwrap();

    let result = Monitor::start(reader, Duration::from_millis(5));
    assert!(matches!(result, Err(DeviceError::Bus(_))));

    std::thread::sleep(Duration::from_millis(20));
    assert!(spi.transfers().is_empty());
}

#[test]
fn open_rejects_invalid_config() {
    let config = MonitorConfig {
        accel: AccelConfig {
            dynamic_range_g: 0,
            ..Default::default()
        },
        ..fast_config()
    };
    assert!(matches!(
        Monitor::open(MockSpi::new(), &config),
        Err(StartError::Config(_))
    ));
}

#[test]
fn dropping_the_monitor_stops_sampling() {
    let spi = MockSpi::with_axes([0; 6]);
    let monitor = Monitor::open(spi.clone(), &fast_config()).unwrap();
    monitor.events().recv_timeout(WAIT).unwrap();
    drop(monitor);

    let reads = spi.transfers().len();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(spi.transfers().len(), reads);
}

#[test]
fn unread_events_stay_bounded() {
    let spi = MockSpi::with_axes([0; 6]);
    let config = MonitorConfig {
        interval_ms: 1,
        ..Default::default()
    };
    let monitor = Monitor::open(spi.clone(), &config).unwrap();

    std::thread::sleep(Duration::from_millis(300));
    assert!(monitor.events().len() <= EVENT_QUEUE_LEN);
    std::thread::sleep(Duration::from_millis(300));
    assert!(monitor.events().len() <= EVENT_QUEUE_LEN);

    // Sampling keeps going and `latest` stays fresh even with a full queue.
    assert!(spi.transfers().len() > EVENT_QUEUE_LEN);
    assert!(monitor.latest().is_some());
    monitor.stop().unwrap();
}

#[test]
fn schedule_does_not_stretch_by_transfer_time() {
    // Each read takes 30 ms of a 40 ms period. A loop that waits a full
    // period after every read would manage about 11 reads in 800 ms.
    let spi = MockSpi::with_axes([0; 6]);
    spi.state.lock().transfer_delay = Duration::from_millis(30);
    let config = MonitorConfig {
        interval_ms: 40,
        ..Default::default()
    };
    let monitor = Monitor::open(spi, &config).unwrap();
    std::thread::sleep(Duration::from_millis(800));
    let bus = monitor.stop().unwrap();
    assert!(bus.transfers().len() >= 16, "only {} reads", bus.transfers().len());
}
