use ecowatch_aqi::breakpoints::{BENZENE, OZONE, PM10, PM25};
use ecowatch_aqi::{classify, compute_index, AqiLevel, PollutantKind, AQI_MAX};

fn kinds() -> Vec<PollutantKind> {
    vec![
        PollutantKind::Pm25,
        PollutantKind::Pm10,
        PollutantKind::Ozone,
        PollutantKind::Benzene,
        PollutantKind::from("no2"),
    ]
}

/// 0.0 to `top` in steps of 0.01, built from integers to avoid drift.
fn sweep(top: f64) -> impl Iterator<Item = f64> {
    let steps = (top * 100.0) as u32;
    (0..=steps).map(|i| f64::from(i) / 100.0)
}

#[test]
fn unknown_kind_matches_pm25_everywhere() {
    let unknown = PollutantKind::from("unknown_kind");
    for c in sweep(700.0) {
        assert_eq!(
            compute_index(c, &unknown),
            compute_index(c, &PollutantKind::Pm25),
            "concentration {c}"
        );
    }
}

#[test]
fn index_is_monotone_in_concentration() {
    for kind in kinds() {
        let mut last = 0u16;
        for c in sweep(kind.table().ceiling() + 50.0) {
            let index = compute_index(c, &kind);
            assert!(index >= last, "{kind} dropped from {last} to {index} at {c}");
            last = index;
        }
        assert_eq!(last, AQI_MAX);
    }
}

#[test]
fn index_stays_on_scale() {
    for kind in kinds() {
        for c in sweep(1_000.0) {
            assert!(compute_index(c, &kind) <= AQI_MAX);
        }
    }
}

#[test]
fn table_edges_hit_their_index_bounds() {
    let tables = [
        (PollutantKind::Pm25, &PM25),
        (PollutantKind::Pm10, &PM10),
        (PollutantKind::Ozone, &OZONE),
        (PollutantKind::Benzene, &BENZENE),
    ];
    for (kind, table) in tables {
        for row in table.rows() {
            assert_eq!(compute_index(row.c_low, &kind), row.i_low, "{kind} low {}", row.c_low);
            assert_eq!(compute_index(row.c_high, &kind), row.i_high, "{kind} high {}", row.c_high);
        }
    }
}

#[test]
fn classify_is_total_and_ordered() {
    let mut last = AqiLevel::Good;
    for index in 0..=u16::MAX {
        let level = classify(index).level;
        assert!(level >= last);
        last = level;
    }
    assert_eq!(last, AqiLevel::Hazardous);
}

#[test]
fn every_level_is_reachable_from_a_reading() {
    let pm25 = PollutantKind::Pm25;
    let seen: Vec<AqiLevel> = [5.0, 20.0, 40.0, 100.0, 200.0, 300.0]
        .into_iter()
        .map(|c| classify(compute_index(c, &pm25)).level)
        .collect();
    assert_eq!(seen, AqiLevel::ALL.to_vec());
}

#[test]
fn repeated_calls_are_identical() {
    for kind in kinds() {
        for c in [0.0, 11.999, 12.05, 55.45, 199.9, 1e6] {
            assert_eq!(compute_index(c, &kind), compute_index(c, &kind));
            assert_eq!(
                classify(compute_index(c, &kind)),
                classify(compute_index(c, &kind))
            );
        }
    }
}

#[test]
fn computation_is_shareable_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|t| {
            std::thread::spawn(move || {
                let kind = PollutantKind::Pm25;
                (0..1_000)
                    .map(|i| compute_index(f64::from(t * 1_000 + i) / 10.0, &kind))
                    .max()
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap().is_some());
    }
}
