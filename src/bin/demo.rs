//! Worked example: the linear three-AS baseline scenario used as a testable
//! property in `spec.md` §8 #1. Runs the engine and prints the final RIBs.

use bgpsim_core::config::SimConfig;
use bgpsim_core::run_simulation;
use bgpsim_core::types::AsId;

fn main() {
    env_logger::init();

    let config: SimConfig = serde_json::from_value(serde_json::json!({
        "nodes": ["100", "200", "300"],
        "links": [["100", "200"], ["200", "300"]],
        "prefixes": ["10.0.1.0/24"],
        "origin_as": "100",
        "scenario": "baseline",
    }))
    .expect("demo config is well-formed");

    let results = run_simulation(config).expect("demo config passes validation");

    println!("converged after {} steps", results.metrics.convergence_steps);
    println!("total events logged: {}", results.metrics.total_events);
    println!();

    for asn in ["100", "200", "300"] {
        let asn = AsId::from(asn);
        let Some(rib) = results.final_ribs.get(&asn) else {
            continue;
        };
        println!("AS{asn} RIB:");
        for (prefix, route) in rib {
            println!(
                "  {prefix}: as_path={:?} local_pref={} origin={}",
                route.as_path, route.local_pref, route.origin
            );
        }
    }
}
