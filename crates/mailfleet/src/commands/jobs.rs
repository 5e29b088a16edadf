use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info, warn};

use mailfleet_core::api::timestamps::format_timestamp;
use mailfleet_core::events;
use mailfleet_core::jobs::{JobDetail, JobPollController, JobSummary, PollSession};
use mailfleet_core::{ApiClient, MailfleetConfig, job_ops};

use super::helpers::{connect, print_json};
use crate::table::TableFormatter;

pub async fn run_jobs_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => handle_list_command(sub_matches).await,
        Some(("show", sub_matches)) => handle_show_command(sub_matches).await,
        Some(("log", sub_matches)) => handle_log_command(sub_matches).await,
        Some(("run", sub_matches)) => handle_run_command(sub_matches).await,
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches).await,
        _ => {
            error!(event = "cli.jobs_command_unknown");
            Err("Unknown jobs command".into())
        }
    }
}

async fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let (config, client) = connect(matches)?;
    let limit = matches
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or_else(|| config.jobs.history_limit());

    info!(event = "cli.jobs_list_started", limit = limit, json_output = json_output);

    match job_ops::list_jobs(&client, limit).await {
        Ok(jobs) => {
            if json_output {
                print_json(&jobs)?;
            } else if jobs.is_empty() {
                println!("No jobs found.");
            } else {
                print_jobs_table(&jobs);
            }

            info!(event = "cli.jobs_list_completed", count = jobs.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load jobs: {}", e);
            error!(event = "cli.jobs_list_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

async fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let job_id = matches
        .get_one::<String>("job-id")
        .ok_or("Job id argument is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.jobs_show_started", job_id = job_id);

    let (_, client) = connect(matches)?;

    match job_ops::get_job(&client, job_id).await {
        Ok(job) => {
            if json_output {
                print_json(&job)?;
            } else {
                println!("{}", render_job(&job));
            }

            info!(event = "cli.jobs_show_completed", job_id = job_id);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load job '{}': {}", job_id, e);
            error!(event = "cli.jobs_show_failed", job_id = job_id, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

async fn handle_log_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let job_id = matches
        .get_one::<String>("job-id")
        .ok_or("Job id argument is required")?;
    let server_id = matches
        .get_one::<String>("server-id")
        .ok_or("Server id argument is required")?;

    info!(event = "cli.jobs_log_started", job_id = job_id, server_id = server_id);

    let (_, client) = connect(matches)?;

    match job_ops::get_server_log(&client, job_id, server_id).await {
        Ok(log) => {
            match log.log_text.as_deref() {
                Some(text) if !text.is_empty() => println!("{}", text),
                _ => println!("(no log output)"),
            }

            info!(event = "cli.jobs_log_completed", job_id = job_id, server_id = server_id);
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "❌ Failed to load log for server '{}' in job '{}': {}",
                server_id, job_id, e
            );
            error!(
                event = "cli.jobs_log_failed",
                job_id = job_id,
                server_id = server_id,
                error = %e
            );
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

async fn handle_run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let watch = matches.get_flag("watch");
    let (config, client) = connect(matches)?;
    let max_parallel = matches
        .get_one::<u32>("max-parallel")
        .copied()
        .or(config.jobs.max_parallel_servers);

    info!(
        event = "cli.jobs_run_started",
        max_parallel_servers = max_parallel,
        watch = watch
    );

    let mut controller = build_controller(matches, &config, client);

    let job_id = match job_ops::run_job(&mut controller, max_parallel).await {
        Ok(job_id) => job_id,
        Err(e) => {
            eprintln!("❌ Failed to start job: {}", e);
            error!(event = "cli.jobs_run_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    info!(event = "cli.jobs_run_completed", job_id = job_id);

    if !watch {
        controller.shutdown();
        println!("✅ Job started: {}", job_id);
        println!("   Watch it with: mailfleet jobs watch {}", job_id);
        return Ok(());
    }

    run_watch_loop(&mut controller).await
}

async fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let job_id = matches
        .get_one::<String>("job-id")
        .ok_or("Job id argument is required")?;

    let (config, client) = connect(matches)?;
    let mut controller = build_controller(matches, &config, client);

    info!(
        event = "cli.jobs_watch_started",
        job_id = job_id,
        interval = ?controller.interval()
    );

    if let Err(e) = controller.select_job(job_id).await {
        eprintln!("❌ Failed to watch job '{}': {}", job_id, e);
        error!(event = "cli.jobs_watch_failed", job_id = job_id, error = %e);
        events::log_app_error(&e);
        return Err(e.into());
    }

    run_watch_loop(&mut controller).await
}

fn build_controller(
    matches: &ArgMatches,
    config: &MailfleetConfig,
    client: ApiClient,
) -> JobPollController<ApiClient> {
    let interval = matches
        .get_one::<u64>("interval")
        .map(|ms| Duration::from_millis(*ms))
        .unwrap_or_else(|| config.jobs.poll_interval());

    JobPollController::new(Arc::new(client), interval, config.jobs.history_limit())
}

/// Redraw on every session change until the job is terminal or Ctrl+C.
async fn run_watch_loop(
    controller: &mut JobPollController<ApiClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = controller.interval();
    let mut updates = controller.subscribe();

    let session = updates.borrow_and_update().clone();
    redraw(&session, interval)?;

    let mut interrupted = false;
    while controller.is_polling() {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = updates.borrow_and_update().clone();
                redraw(&session, interval)?;
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(event = "cli.jobs_watch_signal_failed", error = %e);
                }
                interrupted = true;
                break;
            }
        }
    }

    controller.shutdown();
    let session = controller.session();

    if interrupted {
        println!("\nStopped watching.");
    } else if let Some(job) = session.job() {
        println!("\nJob {} finished with status {}.", job.job_id, job.status);
    }

    info!(
        event = "cli.jobs_watch_completed",
        job_id = session.active_job_id(),
        interrupted = interrupted
    );
    Ok(())
}

fn redraw(session: &PollSession, interval: Duration) -> io::Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    println!("{}", render_session(session, interval));
    io::stdout().flush()
}

fn render_session(session: &PollSession, interval: Duration) -> String {
    let mut lines = Vec::new();

    match session.job() {
        Some(job) => lines.push(render_job(job)),
        None => lines.push(format!(
            "Job {}: waiting for first update...",
            session.active_job_id().unwrap_or("-")
        )),
    }

    lines.push(String::new());
    lines.push(format!(
        "Last refresh: {}",
        format_timestamp(session.last_refresh().as_ref())
    ));
    if let Some(error) = session.error() {
        lines.push(format!("⚠️  {}", error));
    }
    if session.is_polling() {
        lines.push(format!(
            "Refreshing every {}ms. Press Ctrl+C to exit.",
            interval.as_millis()
        ));
    }

    lines.join("\n")
}

fn render_job(job: &JobDetail) -> String {
    let mut out = format!(
        "Job:      {}\nName:     {}\nStatus:   {}\nCreated:  {}\nStarted:  {}\nFinished: {}",
        job.job_id,
        job.name,
        job.status,
        format_timestamp(Some(&job.created_at)),
        format_timestamp(job.started_at.as_ref()),
        format_timestamp(job.finished_at.as_ref()),
    );

    if job.servers.is_empty() {
        out.push_str("\n\nNo server results yet.");
        return out;
    }

    let rows: Vec<Vec<String>> = job
        .servers
        .iter()
        .map(|s| {
            vec![
                s.server_id.clone(),
                s.server_name.clone(),
                s.status.to_string(),
                format_timestamp(s.started_at.as_ref()),
                format_timestamp(s.finished_at.as_ref()),
            ]
        })
        .collect();
    let columns = [
        ("Server ID", 36),
        ("Server", 24),
        ("Status", 9),
        ("Started", 22),
        ("Finished", 22),
    ];

    out.push_str("\n\n");
    out.push_str(&TableFormatter::new(&columns, &rows).render(&rows));
    out
}

fn print_jobs_table(jobs: &[JobSummary]) {
    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|j| {
            vec![
                j.job_id.clone(),
                j.name.clone(),
                j.status.to_string(),
                format_timestamp(Some(&j.created_at)),
                format_timestamp(j.finished_at.as_ref()),
            ]
        })
        .collect();
    let columns = [
        ("Job ID", 36),
        ("Name", 28),
        ("Status", 9),
        ("Created", 22),
        ("Finished", 22),
    ];
    TableFormatter::new(&columns, &rows).print_table(&rows);
}
