use mlfq_model::{
    Admission, ClassTable, CompletedJob, Job, MlqScheduler, PriorityClass, Schedule, Sim,
    schedule_mlfq, schedule_mlq,
};

fn demo_jobs() -> Vec<Job> {
    vec![
        Job::new(1, 0, 8, 1),
        Job::new(2, 1, 4, 2),
        Job::new(3, 2, 2, 4),
        Job::new(4, 3, 1, 3),
        Job::new(5, 4, 6, 5),
    ]
}

fn slices(schedule: &Schedule) -> Vec<(u64, usize, u64, u64)> {
    schedule
        .timeline
        .iter()
        .map(|s| (s.job, s.tier, s.start, s.end))
        .collect()
}

// (completion, turnaround, waiting, response, queue level)
fn metrics(c: &CompletedJob) -> (u64, i64, i64, i64, usize) {
    (
        c.completion_time,
        c.turnaround_time,
        c.waiting_time,
        c.response_time,
        c.queue_level,
    )
}

#[test]
fn mlq_demo_workload() {
    let schedule = schedule_mlq(&demo_jobs(), 3).unwrap();

    assert_eq!(
        slices(&schedule),
        vec![
            (1, 0, 0, 3),
            (1, 0, 3, 6),
            (1, 0, 6, 8),
            (2, 1, 8, 11),
            (4, 1, 11, 12),
            (2, 1, 12, 13),
            (3, 2, 13, 15),
            (5, 2, 15, 21),
        ]
    );
    assert_eq!(schedule.timeline.busy_time(), 21);
    assert_eq!(schedule.completed.len(), 5);

    let expected = [
        (1, (8, 8, 0, 0, 0)),
        (2, (13, 12, 8, 7, 1)),
        (3, (15, 13, 11, 11, 2)),
        (4, (12, 9, 8, 8, 1)),
        (5, (21, 17, 11, 11, 2)),
    ];
    for (id, want) in expected {
        let got = schedule.completed_job(id).unwrap();
        assert_eq!(metrics(got), want, "job {id}");
    }

    // Completion order, not id order
    let order: Vec<_> = schedule.completed.iter().map(|c| c.job.id).collect();
    assert_eq!(order, vec![1, 4, 2, 3, 5]);

    let avg = schedule.averages().unwrap();
    assert!((avg.turnaround - 11.8).abs() < 1e-9);
    assert!((avg.waiting - 7.6).abs() < 1e-9);
    assert!((avg.response - 7.4).abs() < 1e-9);
}

#[test]
fn mlfq_demo_workload() {
    let schedule = schedule_mlfq(&demo_jobs(), 3, 2).unwrap();

    assert_eq!(
        slices(&schedule),
        vec![
            (1, 0, 0, 2),
            (2, 0, 2, 4),
            (3, 0, 4, 6),
            (4, 0, 6, 7),
            (5, 0, 7, 9),
            (1, 1, 9, 13),
            (2, 1, 13, 15),
            (5, 1, 15, 19),
            (1, 2, 19, 21),
        ]
    );

    let expected = [
        (1, (21, 21, 13, 0, 2)),
        (2, (15, 14, 10, 1, 1)),
        (3, (6, 4, 2, 2, 0)),
        (4, (7, 4, 3, 3, 0)),
        (5, (19, 15, 9, 3, 1)),
    ];
    for (id, want) in expected {
        let got = schedule.completed_job(id).unwrap();
        assert_eq!(metrics(got), want, "job {id}");
    }
}

#[test]
fn mlfq_demotes_anything_longer_than_first_quantum() {
    let schedule = schedule_mlfq(&demo_jobs(), 3, 2).unwrap();

    for job in demo_jobs() {
        let tiers: Vec<_> = schedule
            .timeline
            .slices_of(job.id)
            .map(|s| s.tier)
            .collect();
        assert_eq!(tiers[0], 0, "job {} starts on tier 0", job.id);
        if job.burst_time > 2 {
            assert_eq!(tiers[1], 1, "job {} demoted after one slice", job.id);
        } else {
            assert_eq!(tiers.len(), 1);
        }
    }
}

#[test]
fn mlq_tier_two_starves_while_upper_tiers_have_work() {
    let jobs = vec![
        Job::new(1, 0, 5, 9),
        Job::new(2, 0, 6, 0),
        Job::new(3, 0, 6, 2),
    ];
    let schedule = schedule_mlq(&jobs, 2).unwrap();

    let first_low = schedule.timeline.slices_of(1).next().unwrap();
    assert_eq!(first_low.start, 12);
    assert_eq!(first_low.end, 17);
    assert_eq!(schedule.completed_job(1).unwrap().response_time, 12);
}

#[test]
fn single_tier_mlfq_is_fcfs() {
    let schedule = schedule_mlfq(&demo_jobs(), 1, 2).unwrap();
    let order: Vec<_> = schedule
        .timeline
        .iter()
        .map(|s| (s.job, s.start, s.end))
        .collect();
    assert_eq!(
        order,
        vec![(1, 0, 8), (2, 8, 12), (3, 12, 14), (4, 14, 15), (5, 15, 21)]
    );
}

#[test]
fn custom_class_table_changes_admission_only() {
    // Everything at or below priority 4 is interactive
    let classes = ClassTable::new(
        vec![PriorityClass {
            max_priority: 4,
            tier: 0,
        }],
        2,
    );
    let scheduler = MlqScheduler::new(3, classes).unwrap();
    let schedule = Sim::new(demo_jobs(), scheduler, Admission::Upfront)
        .unwrap()
        .run();

    for c in &schedule.completed {
        let want = if c.job.priority <= 4 { 0 } else { 2 };
        assert_eq!(c.queue_level, want, "job {}", c.job.id);
    }
    // Job 5 is alone on tier 2 and runs last, uninterrupted
    let last = schedule.timeline.slices().last().unwrap();
    assert_eq!((last.job, last.start, last.end), (5, 15, 21));
}

#[test]
fn on_arrival_mlq_matches_upfront_for_demo() {
    let upfront = schedule_mlq(&demo_jobs(), 3).unwrap();
    let scheduler = MlqScheduler::with_quantum(3).unwrap();
    let on_arrival = Sim::new(demo_jobs(), scheduler, Admission::OnArrival)
        .unwrap()
        .run();

    assert_eq!(slices(&upfront), slices(&on_arrival));
}

#[test]
fn upfront_admission_allows_dispatch_before_arrival() {
    let jobs = vec![Job::new(1, 10, 2, 0)];
    let schedule = schedule_mlq(&jobs, 2).unwrap();
    let c = schedule.completed_job(1).unwrap();

    assert_eq!(c.completion_time, 2);
    assert_eq!(c.turnaround_time, -8);
    assert_eq!(c.waiting_time, -10);
    assert_eq!(c.response_time, -10);
}
