use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use sensor_hub::mock_driver::MockDriver;
use sensor_hub::{DriverBinding, HubConfig, RequestRate, SensorHub, SensorInfo, INVALID_LATENCY};

fn bench_request_release_roundtrip(c: &mut Criterion) {
    let hub = SensorHub::new(HubConfig::default());
    let driver = Arc::new(MockDriver::new());
    let info = SensorInfo { sensor_type: 1, supported_rates: vec![5, 10, 25, 50, 100] };
    let handle = hub.register(info, DriverBinding::Direct(driver)).expect("register");

    // bring the sensor to a running state once, so the benchmarked loop
    // exercises the `Running`-state branch of reconfig rather than the
    // one-time power-on path.
    hub.signal_power_state_changed(handle, true).unwrap();
    hub.drain();
    hub.signal_firmware_state_changed(handle, 25, INVALID_LATENCY).unwrap();
    hub.drain();

    let mut client = 1u32;
    c.bench_function("request_release_roundtrip", |b| {
        b.iter(|| {
            client = client.wrapping_add(1);
            let _ = hub.request(
                black_box(client),
                black_box(handle),
                black_box(RequestRate::Concrete(40)),
                black_box(INVALID_LATENCY),
            );
            let _ = hub.release(black_box(client), black_box(handle));
        })
    });
}

criterion_group!(benches, bench_request_release_roundtrip);
criterion_main!(benches);
