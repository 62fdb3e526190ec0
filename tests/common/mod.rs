//! The solar-usage rule base shared by the integration tests and benches.

#![allow(dead_code)]

use fuzzy_mamdani::{Engine, EngineBuilder, EngineConfig, Inputs, MembershipFn, Rule, Terms, Universe};
use tracing_subscriber::EnvFilter;

/// Routes engine logs to the test harness; set `RUST_LOG=fuzzy_mamdani=trace` to see rule strengths.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `low`, `medium`, `high` as evenly spread triangles over `lo..=hi`.
pub fn three_levels(lo: f64, mid: f64, hi: f64) -> Terms {
    let mut terms = Terms::with_capacity(3);

    terms.insert("low", MembershipFn::triangular(lo, lo, mid).unwrap());
    terms.insert("medium", MembershipFn::triangular(lo, mid, hi).unwrap());
    terms.insert("high", MembershipFn::triangular(mid, hi, hi).unwrap());
    terms
}

pub fn solar_builder(config: EngineConfig) -> EngineBuilder {
    let mut builder = EngineBuilder::with_config(config);
    let intensity = builder
        .add_input_with(
            "solar_intensity",
            Universe::with_step(0. ..=1000., 1.).unwrap(),
            three_levels(0., 500., 1000.),
        )
        .unwrap();
    let demand = builder
        .add_input_with(
            "energy_demand",
            Universe::with_step(0. ..=5., 0.1).unwrap(),
            three_levels(0., 2.5, 5.),
        )
        .unwrap();
    let temperature = builder
        .add_input_with(
            "temperature",
            Universe::with_step(10. ..=60., 1.).unwrap(),
            three_levels(10., 35., 60.),
        )
        .unwrap();
    let usage = builder
        .add_output_with(
            "solar_usage",
            Universe::with_step(0. ..=100., 1.).unwrap(),
            three_levels(0., 50., 100.),
        )
        .unwrap();
    let rules = [
        Rule::new(intensity.is("low"), usage.then("low")),
        Rule::new(intensity.is("medium"), usage.then("medium")),
        Rule::new(
            intensity
                .is("high")
                .and2(demand.is("high"), temperature.is("medium")),
            usage.then("high"),
        ),
        Rule::new(
            intensity
                .is("high")
                .and(demand.is("medium").or(demand.is("low"))),
            usage.then("high"),
        ),
        Rule::new(
            intensity.is("high").and2(demand.is("high"), temperature.is("low")),
            usage.then("high"),
        ),
    ];

    for rule in rules {
        builder.add_rule(rule).unwrap();
    }

    builder
}

pub fn solar_engine() -> Engine {
    solar_builder(EngineConfig::default()).seal().unwrap()
}

pub fn solar_inputs(intensity: f64, demand: f64, temperature: f64) -> Inputs {
    Inputs::new()
        .with("solar_intensity", intensity)
        .with("energy_demand", demand)
        .with("temperature", temperature)
}
