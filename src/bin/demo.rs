//! Runnable walkthrough of the hub's cold-start, coalescing and release
//! scenarios against the in-process mock driver.

use std::sync::Arc;

use log::info;
use sensor_hub::mock_driver::MockDriver;
use sensor_hub::{DriverBinding, HubConfig, RequestRate, SensorHub, SensorInfo, INVALID_LATENCY};

fn main() {
    env_logger::init();
    info!("sensor hub demo starting");

    let hub = SensorHub::new(HubConfig::default());
    let driver = Arc::new(MockDriver::new());
    let info = SensorInfo { sensor_type: 1, supported_rates: vec![5, 10, 25, 50, 100] };
    let handle = hub
        .register(info, DriverBinding::Direct(driver.clone()))
        .expect("sensor table has room for one sensor");
    println!("registered sensor, handle={handle}");

    hub.request(1, handle, RequestRate::Concrete(25), INVALID_LATENCY)
        .expect("25 is within the supported range");
    println!("client 1 requested 25 Hz -> currentRate={:?}", hub.get_cur_rate(handle));

    hub.signal_power_state_changed(handle, true).unwrap();
    hub.drain();
    println!("driver reported powered on -> currentRate={:?}", hub.get_cur_rate(handle));

    hub.signal_firmware_state_changed(handle, 25, INVALID_LATENCY).unwrap();
    hub.drain();
    println!("firmware ready at 25 Hz -> currentRate={:?}", hub.get_cur_rate(handle));

    hub.request(2, handle, RequestRate::Concrete(40), INVALID_LATENCY)
        .expect("50 is within the supported range");
    println!("client 2 requested 40 Hz -> driver asked to set {:?}", driver.last_set_rate());

    if let Some((rate, latency)) = driver.last_set_rate() {
        hub.signal_rate_changed(handle, rate, latency).unwrap();
        hub.drain();
    }
    println!("after coalescing -> currentRate={:?}", hub.get_cur_rate(handle));

    hub.release(2, handle).unwrap();
    if let Some((rate, latency)) = driver.last_set_rate() {
        hub.signal_rate_changed(handle, rate, latency).unwrap();
        hub.drain();
    }
    println!("client 2 released -> currentRate={:?}", hub.get_cur_rate(handle));

    hub.release(1, handle).unwrap();
    hub.signal_power_state_changed(handle, false).unwrap();
    hub.drain();
    println!("client 1 released -> currentRate={:?}", hub.get_cur_rate(handle));

    info!("sensor hub demo finished");
}
