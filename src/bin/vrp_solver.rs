//! Command-line entry point (§4.13): `vrp-solver <instance_file> [max_customers] [--compare] [--benchmark]`.

use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vrptw_core::config::SolverConfig;
use vrptw_core::constructive::regret_insertion;
use vrptw_core::instance;
use vrptw_core::solver::solve;

struct Args {
    instance_file: String,
    max_customers: Option<usize>,
    compare: bool,
    benchmark: bool,
}

fn parse_args() -> Option<Args> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let mut instance_file = None;
    let mut max_customers = None;
    let mut compare = false;
    let mut benchmark = false;

    for arg in raw {
        match arg.as_str() {
            "--compare" => compare = true,
            "--benchmark" => benchmark = true,
            other => {
                if instance_file.is_none() {
                    instance_file = Some(other.to_string());
                } else if max_customers.is_none() {
                    max_customers = other.parse::<usize>().ok();
                }
            }
        }
    }

    Some(Args {
        instance_file: instance_file?,
        max_customers,
        compare,
        benchmark,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().compact())
        .init();

    let Some(args) = parse_args() else {
        eprintln!("usage: vrp-solver <instance_file> [max_customers] [--compare] [--benchmark]");
        return ExitCode::FAILURE;
    };

    let text = match std::fs::read_to_string(&args.instance_file) {
        Ok(t) => t,
        Err(e) => {
            error!(file = %args.instance_file, error = %e, "failed to read instance file");
            return ExitCode::FAILURE;
        }
    };

    let parsed = match instance::parse(&text) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "failed to parse instance");
            return ExitCode::FAILURE;
        }
    };

    let mut customers = parsed.customers;
    if let Some(limit) = args.max_customers {
        customers.truncate(limit + 1);
    }
    info!(customers = customers.len() - 1, capacity = parsed.capacity, "loaded instance");

    let config = SolverConfig::default();
    let runs = if args.benchmark { 5 } else { 1 };
    let mut timings = Vec::with_capacity(runs);
    let mut last_solution = None;

    for _ in 0..runs {
        let started = Instant::now();
        match solve(&customers, parsed.capacity, &config) {
            Ok(solution) => {
                timings.push(started.elapsed());
                last_solution = Some(solution);
            }
            Err(e) => {
                error!(error = %e, "solve failed");
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(solution) = last_solution else {
        return ExitCode::FAILURE;
    };

    println!("vehicles used: {}", solution.num_vehicles());
    println!("total cost:    {:.2}", solution.total_cost());
    for (i, route) in solution.routes().iter().enumerate() {
        println!("  route {i}: {:?} (load {}, cost {:.2})", route.customer_ids(), route.current_load(), route.total_cost());
    }

    if args.compare {
        let baseline = regret_insertion(&customers, parsed.capacity);
        println!(
            "baseline (construction only): {} vehicles, cost {:.2}",
            baseline.num_vehicles(),
            baseline.total_cost()
        );
    }

    if args.benchmark {
        timings.sort();
        let min = timings.first().copied().unwrap_or_default();
        let median = timings[timings.len() / 2];
        println!("benchmark over {} runs: min {:?}, median {:?}", runs, min, median);
    }

    ExitCode::SUCCESS
}
