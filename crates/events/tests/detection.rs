use mhw_calendar::{Date, date_sequence};
use mhw_events::{EventConfig, EventLabels, Run, define_events, detect_runs, find_runs};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bools(s: &str) -> Vec<bool> {
    s.chars().map(|c| c == 'T').collect()
}

#[test]
fn minimal_case_without_joining() {
    let exceed = bools("FFFFTTTTTFF");
    let cfg = EventConfig::new().with_join_gaps(false);
    let runs = detect_runs(&exceed, &cfg);
    assert_eq!(runs, vec![Run::new(4, 8)]);

    let labels = EventLabels::from_runs(exceed.len(), &runs);
    assert_eq!(labels.start[4], Some(4));
    assert_eq!(labels.end[8], Some(8));
    assert!(labels.event[..4].iter().all(Option::is_none));
    assert!(labels.event[4..=8].iter().all(|e| *e == Some(4)));
}

#[test]
fn sub_minimum_positions_stay_unlabelled() {
    let exceed = bools("TTTTFFTTTTTTF");
    let runs = detect_runs(&exceed, &EventConfig::new().with_join_gaps(false));
    let labels = EventLabels::from_runs(exceed.len(), &runs);
    for t in 0..4 {
        assert_eq!(labels.start[t], None);
        assert_eq!(labels.end[t], None);
        assert_eq!(labels.event[t], None);
    }
    assert_eq!(runs, vec![Run::new(6, 11)]);
}

#[test]
fn gap_of_max_gap_joins_and_one_more_does_not() {
    let cfg = EventConfig::new().with_min_duration(5).with_max_gap(2);
    // two runs of 5 separated by 2 days
    let joined = bools("TTTTTFFTTTTT");
    assert_eq!(detect_runs(&joined, &cfg), vec![Run::new(0, 11)]);
    // separated by 3 days
    let split = bools("TTTTTFFFTTTTT");
    assert_eq!(
        detect_runs(&split, &cfg),
        vec![Run::new(0, 4), Run::new(8, 12)]
    );
}

#[test]
fn joined_event_relabels_gap_days() {
    let exceed = bools("FTTTTTFTTTTTF");
    let runs = detect_runs(&exceed, &EventConfig::new());
    let labels = EventLabels::from_runs(exceed.len(), &runs);
    assert_eq!(labels.event[6], Some(1));
    assert_eq!(labels.end.iter().flatten().copied().collect::<Vec<_>>(), vec![11]);
}

#[test]
fn short_run_only_survives_joined_to_qualifying_run() {
    // a 2-day run is dropped before joining and never resurrected,
    // while the joined span keeps its qualifying members
    let cfg = EventConfig::new().with_min_duration(5).with_max_gap(2);
    let exceed = bools("TTFFTTTTTFTTTTTFTTF");
    let runs = detect_runs(&exceed, &cfg);
    assert_eq!(runs, vec![Run::new(4, 14)]);
    // the tail run at 16..=17 is within max_gap of the event but too short
    assert!(runs.iter().all(|r| r.end < 16));
    // no re-filtering: a joined event is never split or dropped
    assert!(runs.iter().all(|r| r.duration() >= cfg.min_duration()));
}

#[test]
fn random_series_invariants() {
    let mut rng = StdRng::seed_from_u64(2016);
    let cfg = EventConfig::new();
    for _ in 0..200 {
        let n = rng.random_range(1..400);
        let exceed: Vec<bool> = (0..n).map(|_| rng.random_bool(0.6)).collect();
        let raw = find_runs(&exceed, 1);
        let runs = detect_runs(&exceed, &cfg);
        for w in runs.windows(2) {
            assert!(w[0].end < w[1].start);
            assert!(w[1].start - w[0].end - 1 > cfg.max_gap());
        }
        for r in &runs {
            assert!(r.start <= r.end && r.end < n);
            assert!(r.duration() >= cfg.min_duration());
            assert!(exceed[r.start] && exceed[r.end]);
        }
        // every maximal run of min_duration or more lies inside an event
        for r in raw.iter().filter(|r| r.duration() >= cfg.min_duration()) {
            assert!(runs.iter().any(|e| e.start <= r.start && r.end <= e.end));
        }
    }
}

#[test]
fn category_durations_never_exceed_duration() {
    let mut rng = StdRng::seed_from_u64(99);
    let n = 3 * 365;
    let times = date_sequence(Date::ymd(2000, 1, 1).unwrap(), n);
    let seas: Vec<f64> = vec![18.0; n];
    let thresh: Vec<f64> = vec![19.0; n];
    let temp: Vec<f64> = (0..n).map(|_| 17.0 + 6.0 * rng.random::<f64>()).collect();
    let out = define_events(&temp, &thresh, &seas, &times, &EventConfig::new(), false).unwrap();
    for ev in &out.events {
        let total: usize = ev.category_durations().iter().sum();
        assert!(total <= ev.duration, "{total} > {}", ev.duration);
        assert_eq!(ev.duration, ev.end - ev.start + 1);
        assert!(ev.index_peak < ev.duration);
    }
}
