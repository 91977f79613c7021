use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mlfq_model::{
    Averages, Job, Schedule, Scheduler, Sim,
    config::{SimConfig, Workload},
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Mlq,
    Mlfq,
    Both,
}

/// Simulate multi-level queue and multi-level feedback queue scheduling.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// TOML file with scheduler parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file with `[[jobs]]` entries; a five-job demo set otherwise
    #[arg(long)]
    workload: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,

    /// Print every dispatch event as it happens
    #[arg(long)]
    events: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let jobs = match &args.workload {
        Some(path) => {
            Workload::load(path)
                .with_context(|| format!("loading workload {}", path.display()))?
                .jobs
        }
        None => demo_jobs(),
    };

    print_jobs(&jobs);

    let mut results = Vec::new();
    if args.algorithm != Algorithm::Mlfq {
        let sim = Sim::new(jobs.clone(), config.mlq.build()?, config.admission)?;
        results.push(("MLQ", simulate(sim, args.events)));
    }
    if args.algorithm != Algorithm::Mlq {
        let sim = Sim::new(jobs.clone(), config.mlfq.build()?, config.admission)?;
        results.push(("MLFQ", simulate(sim, args.events)));
    }

    for (name, schedule) in &results {
        print_results(name, schedule);
    }
    if let [(a_name, a), (b_name, b)] = results.as_slice() {
        print_comparison(a_name, a, b_name, b);
    }

    Ok(())
}

fn simulate<S: Scheduler>(mut sim: Sim<S>, show_events: bool) -> Schedule {
    if show_events {
        println!("\n{} events:", sim.core.scheduler.name());
        while !sim.all_jobs_completed() {
            let now = sim.core.now();
            for event in sim.step() {
                println!("t={} {:?}", now, event);
            }
        }
    }
    sim.run()
}

fn demo_jobs() -> Vec<Job> {
    vec![
        Job::new(1, 0, 8, 1),
        Job::new(2, 1, 4, 2),
        Job::new(3, 2, 2, 4),
        Job::new(4, 3, 1, 3),
        Job::new(5, 4, 6, 5),
    ]
}

fn print_jobs(jobs: &[Job]) {
    println!("{:<5} {:<8} {:<6} {:<8}", "PID", "Arrival", "Burst", "Priority");
    println!("{}", "-".repeat(30));
    for job in jobs {
        println!(
            "{:<5} {:<8} {:<6} {:<8}",
            job.id, job.arrival_time, job.burst_time, job.priority
        );
    }
}

fn print_results(name: &str, schedule: &Schedule) {
    println!("\n{name} results:");
    println!("{}", "=".repeat(60));
    println!(
        "{:<5} {:<5} {:<5} {:<5} {:<5} {:<5} {:<5} {:<5}",
        "PID", "AT", "BT", "CT", "TAT", "WT", "RT", "Queue"
    );
    println!("{}", "-".repeat(60));

    let mut completed: Vec<_> = schedule.completed.iter().collect();
    completed.sort_by_key(|c| c.job.id);
    for c in completed {
        println!(
            "{:<5} {:<5} {:<5} {:<5} {:<5} {:<5} {:<5} {:<5}",
            c.job.id,
            c.job.arrival_time,
            c.job.burst_time,
            c.completion_time,
            c.turnaround_time,
            c.waiting_time,
            c.response_time,
            c.queue_level
        );
    }

    println!("{}", "-".repeat(60));
    match schedule.averages() {
        Some(avg) => {
            println!("Average turnaround time: {:.2}", avg.turnaround);
            println!("Average waiting time: {:.2}", avg.waiting);
            println!("Average response time: {:.2}", avg.response);
        }
        None => println!("No jobs were scheduled"),
    }

    let times: Vec<_> = schedule
        .timeline
        .iter()
        .map(|s| format!("{:<7}", format!("{}-{}", s.start, s.end)))
        .collect();
    let jobs: Vec<_> = schedule
        .timeline
        .iter()
        .map(|s| format!("{:<7}", format!("P{}", s.job)))
        .collect();
    println!("\nGantt chart:");
    println!("Time: {}", times.join(""));
    println!("Proc: {}", jobs.join(""));
}

fn print_comparison(a_name: &str, a: &Schedule, b_name: &str, b: &Schedule) {
    let (Some(a_avg), Some(b_avg)) = (a.averages(), b.averages()) else {
        return;
    };

    println!("\n{}", "=".repeat(65));
    println!(
        "{:<25} {:<15} {:<15} {:<10}",
        "Metric", a_name, b_name, "Better"
    );
    println!("{}", "-".repeat(65));

    let rows: [(&str, fn(&Averages) -> f64); 3] = [
        ("Avg turnaround time", |avg: &Averages| avg.turnaround),
        ("Avg waiting time", |avg: &Averages| avg.waiting),
        ("Avg response time", |avg: &Averages| avg.response),
    ];
    for (label, metric) in rows {
        let (x, y) = (metric(&a_avg), metric(&b_avg));
        let better = if y < x { b_name } else { a_name };
        println!("{label:<25} {x:<15.2} {y:<15.2} {better:<10}");
    }
}
