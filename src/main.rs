use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use classtime::app::App;
use classtime::cli::{Args, Command};
use classtime::logging::setup_logging;
use classtime::{data, scheduler, web};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let early_config = figment::Figment::new()
        .merge(figment::providers::Env::raw())
        .extract::<classtime::config::Config>()
        .expect("failed to load config for logging setup");
    setup_logging(&early_config, args.tracing);

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "starting classtime");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => app.run().await,
        Command::Solve => solve_from_stdin(app).await,
    }
}

/// Reads one `ScheduleRequestDto` as JSON from stdin, solves it against the
/// live catalog, and writes the response JSON to stdout. Useful for
/// scripting and local testing without standing up an HTTP client.
async fn solve_from_stdin(app: App) -> ExitCode {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        tracing::error!(error = %e, "failed to read request from stdin");
        return ExitCode::FAILURE;
    }

    let request: web::schedule::ScheduleRequestDto = match serde_json::from_str(&input) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse request JSON");
            return ExitCode::FAILURE;
        }
    };

    let state = app.state();
    let mut courses = Vec::with_capacity(request.courses.len());
    for course in &request.courses {
        match data::catalog::fetch_components(&state.db_pool, &request.institution, &request.term, course).await {
            Ok(components) => courses.push(scheduler::CourseRequest {
                course: course.clone(),
                components,
            }),
            Err(e) => {
                tracing::error!(error = %e, course = %course, "failed to load components");
                return ExitCode::FAILURE;
            }
        }
    }

    let busy_times = request
        .busy_times
        .into_iter()
        .map(|b| scheduler::BusyTime {
            days: b.day,
            start_time: b.start_time,
            end_time: b.end_time,
        })
        .collect();

    let solve_request = scheduler::ScheduleRequest {
        courses,
        busy_times,
        result_cap: state.solver_result_cap,
        deadline: state.solver_deadline,
    };

    let response = match scheduler::orchestrator::run(solve_request, &CancellationToken::new()) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "solve failed");
            return ExitCode::FAILURE;
        }
    };

    let dto: web::schedule::ScheduleResponseDto = response.into();
    match serde_json::to_string_pretty(&dto) {
        Ok(json) => {
            let _ = writeln!(std::io::stdout(), "{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            ExitCode::FAILURE
        }
    }
}
