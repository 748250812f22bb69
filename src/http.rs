//! HTTP façade over the solver core (§4.14, feature `http`).
//!
//! Thin translation layer: handlers read request bodies/query params,
//! hand off to [`crate::instance::parse`] and [`crate::solver::solve`] on a
//! blocking thread pool (the core is synchronous and CPU-bound), and
//! translate the result into JSON. No solver logic lives here.

use std::path::{Path as StdPath, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::limit::ConcurrencyLimitLayer;

use crate::config::SolverConfig;
use crate::models::{Customer, Solution};

/// Caps concurrent in-flight solves so a burst of requests can't pile up
/// more `spawn_blocking` work than the solver's CPU-bound core can chew
/// through at once.
const MAX_CONCURRENT_SOLVES: usize = 4;

/// Shared state: the directory instance files are served from.
#[derive(Clone)]
pub struct AppState {
    pub instances_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/solve", post(solve_handler))
        .route("/instances", get(list_instances))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_SOLVES))
        .with_state(Arc::new(state))
}

#[derive(Deserialize)]
struct SolveRequest {
    instance_file: String,
    max_customers: Option<usize>,
}

#[derive(Serialize)]
struct RouteView {
    customer_ids: Vec<usize>,
    load: i32,
    cost: f64,
}

#[derive(Serialize)]
struct SolveResponse {
    success: bool,
    instance_name: String,
    total_cost: f64,
    num_vehicles: usize,
    solve_time_ms: f64,
    feasible: bool,
    routes: Vec<RouteView>,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

async fn solve_handler(State(state): State<Arc<AppState>>, Json(req): Json<SolveRequest>) -> Response {
    let path = state.instances_dir.join(&req.instance_file);
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(t) => t,
        Err(e) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    success: false,
                    error: format!("cannot read instance file: {e}"),
                }),
            )
                .into_response();
        }
    };

    let name = req.instance_file.clone();
    let result = tokio::task::spawn_blocking(move || solve_instance(&name, &text, req.max_customers)).await;

    match result {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(message)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse { success: false, error: message }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                error: "solver task panicked".to_string(),
            }),
        )
            .into_response(),
    }
}

fn solve_instance(name: &str, text: &str, max_customers: Option<usize>) -> Result<SolveResponse, String> {
    let parsed = crate::instance::parse(text).map_err(|e| e.to_string())?;
    let mut customers: Vec<Customer> = parsed.customers;
    if let Some(limit) = max_customers {
        customers.truncate(limit + 1);
    }

    let config = SolverConfig::default();
    let started = std::time::Instant::now();
    let solution: Solution = crate::solver::solve(&customers, parsed.capacity, &config).map_err(|e| e.to_string())?;
    let elapsed = started.elapsed();

    let routes = solution
        .routes()
        .iter()
        .map(|r| RouteView {
            customer_ids: r.customer_ids().to_vec(),
            load: r.current_load(),
            cost: r.total_cost(),
        })
        .collect();

    Ok(SolveResponse {
        success: true,
        instance_name: name.to_string(),
        total_cost: solution.total_cost(),
        num_vehicles: solution.num_vehicles(),
        solve_time_ms: elapsed.as_secs_f64() * 1000.0,
        feasible: solution.validate_coverage(&customers).is_ok(),
        routes,
    })
}

#[derive(Serialize)]
struct InstanceListEntry {
    name: String,
}

async fn list_instances(State(state): State<Arc<AppState>>) -> Response {
    let dir = state.instances_dir.clone();
    let entries = tokio::task::spawn_blocking(move || list_instance_files(&dir)).await;
    match entries {
        Ok(Ok(names)) => Json(names.into_iter().map(|name| InstanceListEntry { name }).collect::<Vec<_>>()).into_response(),
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { success: false, error: e }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                error: "listing task panicked".to_string(),
            }),
        )
            .into_response(),
    }
}

fn list_instance_files(dir: &StdPath) -> Result<Vec<String>, String> {
    let entries = std::fs::read_dir(dir).map_err(|e| e.to_string())?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| e.to_string())?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_instance_valid_text() {
        let text = "VEHICLE\nNUMBER CAPACITY\n5 100\nCUST\n0 0 0 0 0 1000 0\n1 10 0 5 0 500 5\n";
        let response = solve_instance("sample.txt", text, None).expect("solvable");
        assert!(response.success);
        assert!(response.feasible);
    }

    #[test]
    fn test_solve_instance_malformed_text_is_error() {
        let text = "not an instance";
        assert!(solve_instance("bad.txt", text, None).is_err());
    }

    #[test]
    fn test_solve_instance_respects_max_customers() {
        let text = "VEHICLE\nNUMBER CAPACITY\n5 100\nCUST\n0 0 0 0 0 1000 0\n1 10 0 5 0 500 5\n2 20 0 5 0 500 5\n3 30 0 5 0 500 5\n";
        let response = solve_instance("sample.txt", text, Some(1)).expect("solvable");
        let served: usize = response.routes.iter().map(|r| r.customer_ids.len()).sum();
        assert_eq!(served, 1);
    }
}
