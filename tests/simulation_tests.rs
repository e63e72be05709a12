#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use probe_engine::{
        ConfigAdjustment, ProbeCounts, ProbeSimulation, SimulationConfig, Variant,
    };

    fn config(stations: u32, ready: u32, level: u32, scenarios: u32, variant: Variant) -> SimulationConfig {
        SimulationConfig::new(stations, ready, level, scenarios, variant)
    }

    fn collision_percent(stations: u32, ready: u32, scenarios: u32, variant: Variant, seed: u64) -> f64 {
        let mut sim = ProbeSimulation::with_seed(config(stations, ready, 0, scenarios, variant), seed);
        sim.run().unwrap().percentages.collision
    }

    // ========== Per-Trial Invariants ==========

    #[test]
    fn test_every_trial_probes_at_least_once() {
        for variant in [Variant::Basic, Variant::Advanced] {
            for ready in [1, 2, 7, 33, 100] {
                let mut sim = ProbeSimulation::with_seed(config(100, ready, 3, 50, variant), 21);
                sim.run_with(|trial, counts| {
                    assert!(counts.total() >= 1, "trial {} issued no probe", trial);
                })
                .unwrap();
            }
        }
    }

    #[test]
    fn test_basic_isolates_every_ready_station() {
        for level in [0, 2, 5, 9] {
            for ready in [1, 3, 64, 300, 512] {
                let mut sim = ProbeSimulation::with_seed(config(512, ready, level, 20, Variant::Basic), 8);
                sim.run_with(|trial, counts| {
                    assert_eq!(
                        counts.success, ready as u64,
                        "trial {} at level {} resolved {} of {}",
                        trial, level, counts.success, ready
                    );
                })
                .unwrap();
            }
        }
    }

    #[test]
    fn test_advanced_isolates_every_ready_station() {
        for ready in [1, 2, 5, 40, 255] {
            let mut sim = ProbeSimulation::with_seed(config(255, ready, 0, 20, Variant::Advanced), 13);
            sim.run_with(|_, counts| assert_eq!(counts.success, ready as u64)).unwrap();
        }
    }

    // ========== Seed Determinism ==========

    #[test]
    fn test_rerun_with_seed_is_identical() {
        let cfg = config(256, 12, 2, 300, Variant::Advanced);
        let mut sim = ProbeSimulation::with_seed(cfg, 99);

        let mut first: Vec<ProbeCounts> = Vec::new();
        let a = sim.run_with(|_, c| first.push(*c)).unwrap();
        let mut second: Vec<ProbeCounts> = Vec::new();
        let b = sim.run_with(|_, c| second.push(*c)).unwrap();

        assert_eq!(first, second);
        assert_eq!(a.cumulative, b.cumulative);

        let c = ProbeSimulation::with_seed(cfg, 99).run().unwrap();
        assert_eq!(a.percentages, c.percentages);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let cfg = config(256, 12, 0, 300, Variant::Basic);
        let a = ProbeSimulation::with_seed(cfg, 1).run().unwrap();
        let b = ProbeSimulation::with_seed(cfg, 2).run().unwrap();
        assert_ne!(a.cumulative, b.cumulative);
    }

    // ========== Clamping ==========

    #[test]
    fn test_ready_count_clamped_to_station_count() {
        let mut sim = ProbeSimulation::with_seed(config(16, 40, 0, 10, Variant::Basic), 3);
        let report = sim.run().unwrap();

        assert_eq!(report.config.ready_stations, 16);
        assert_eq!(
            report.adjustments,
            vec![ConfigAdjustment::ReadyStations { requested: 40, applied: 16 }]
        );
        assert!(report.status.contains("ready stations"));
        assert!(report.status.contains("40"));
    }

    #[test]
    fn test_probe_level_clamped_to_leaf_level() {
        let mut sim = ProbeSimulation::with_seed(config(16, 4, 9, 10, Variant::Basic), 3);
        let report = sim.run().unwrap();

        assert_eq!(report.config.probe_level, 4);
        assert_eq!(report.start_level, 4);
        assert_eq!(
            report.adjustments,
            vec![ConfigAdjustment::ProbeLevel { requested: 9, applied: 4 }]
        );
        assert!(report.status.contains("probe level"));
    }

    #[test]
    fn test_valid_configuration_reports_no_change() {
        let mut sim = ProbeSimulation::with_seed(config(16, 4, 2, 10, Variant::Basic), 3);
        let report = sim.run().unwrap();
        assert!(report.adjustments.is_empty());
        assert_eq!(report.status, "Finished simulation.\n");
    }

    // ========== Boundaries ==========

    #[test]
    fn test_single_station_always_succeeds() {
        for variant in [Variant::Basic, Variant::Advanced] {
            let mut sim = ProbeSimulation::with_seed(config(1, 1, 0, 25, variant), 0);
            sim.run_with(|_, counts| {
                assert_eq!(*counts, ProbeCounts { success: 1, collision: 0, idle: 0 });
            })
            .unwrap();
            assert_relative_eq!(sim.success_percent(), 100.0);
            assert_relative_eq!(sim.collision_percent(), 0.0);
            assert_relative_eq!(sim.idle_percent(), 0.0);
        }
    }

    #[test]
    fn test_four_ready_of_four_basic() {
        let mut sim = ProbeSimulation::with_seed(config(4, 4, 0, 1, Variant::Basic), 6);
        let mut seen = Vec::new();
        let report = sim.run_with(|_, counts| seen.push(*counts)).unwrap();

        assert_eq!(seen, vec![ProbeCounts { success: 4, collision: 3, idle: 0 }]);
        assert_relative_eq!(report.percentages.success, 400.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(report.percentages.collision, 300.0 / 7.0, epsilon = 1e-9);
        assert_relative_eq!(report.percentages.idle, 0.0);
    }

    #[test]
    fn test_all_ready_advanced_needs_no_collision() {
        let mut sim = ProbeSimulation::with_seed(config(64, 64, 0, 5, Variant::Advanced), 6);
        let report = sim.run().unwrap();
        assert_relative_eq!(report.percentages.success, 100.0);
        assert_relative_eq!(report.probes_per_trial.mean, 64.0);
    }

    #[test]
    fn test_lone_ready_station_found_at_root() {
        for variant in [Variant::Basic, Variant::Advanced] {
            let mut sim = ProbeSimulation::with_seed(config(1024, 1, 0, 50, variant), 31);
            let report = sim.run().unwrap();
            assert_relative_eq!(report.percentages.success, 100.0);
            assert_relative_eq!(report.probes_per_trial.mean, 1.0);
        }
    }

    // ========== Statistical Behaviour ==========

    #[test]
    fn test_basic_collisions_grow_with_ready_count() {
        let ready_counts = [1, 2, 4, 8, 16, 32, 64];
        let collisions: Vec<f64> = ready_counts
            .iter()
            .map(|&k| collision_percent(64, k, 400, Variant::Basic, 77))
            .collect();

        assert_relative_eq!(collisions[0], 0.0);
        for pair in collisions.windows(2) {
            assert!(
                pair[1] + 1.0 >= pair[0],
                "collision share dropped: {:?}",
                collisions
            );
        }
        // fully loaded tree: 63 internal collisions over 127 probes
        assert_relative_eq!(collisions[6], 6300.0 / 127.0, epsilon = 1e-9);
    }

    #[test]
    fn test_advanced_collision_free_at_extremes() {
        assert_relative_eq!(collision_percent(64, 1, 100, Variant::Advanced, 4), 0.0);
        assert_relative_eq!(collision_percent(64, 64, 100, Variant::Advanced, 4), 0.0);
        assert!(collision_percent(64, 8, 400, Variant::Advanced, 4) > 0.0);
    }

    #[test]
    fn test_advanced_needs_fewer_probes_for_two_ready() {
        // same seed, same activations: the advanced walk skips the root
        // collision and prunes, so it can never need more probes
        let mut basic_probes = Vec::new();
        ProbeSimulation::with_seed(config(128, 2, 0, 300, Variant::Basic), 12)
            .run_with(|_, c| basic_probes.push(c.total()))
            .unwrap();
        let mut advanced_probes = Vec::new();
        ProbeSimulation::with_seed(config(128, 2, 0, 300, Variant::Advanced), 12)
            .run_with(|_, c| advanced_probes.push(c.total()))
            .unwrap();

        for (b, a) in basic_probes.iter().zip(&advanced_probes) {
            assert!(a < b, "advanced {} vs basic {}", a, b);
        }
    }

    #[test]
    fn test_percentages_sum_to_one_hundred() {
        for variant in [Variant::Basic, Variant::Advanced] {
            let mut sim = ProbeSimulation::with_seed(config(300, 17, 4, 200, variant), 5);
            let p = sim.run().unwrap().percentages;
            assert_relative_eq!(p.success + p.collision + p.idle, 100.0, epsilon = 1e-9);
        }
    }
}
