use colored::Colorize;
use serde::Serialize;
use std::time::{Duration, Instant};

use anyhow::Result;
use chronos_game::GameConfig;

use super::playthrough::{Playthrough, RunSummary};
use super::scenarios::{self, Scenario, ScenarioKind};
use super::seeds::SeedInfo;

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(serialize_with = "duration_serde::serialize")]
    pub average_duration: Duration,
    #[serde(serialize_with = "duration_vec_serde::serialize")]
    pub performance_data: Vec<Duration>,
    /// State at the end of the last scripted iteration.
    pub last_run: Option<RunSummary>,
}

pub struct LogicTester {
    config: GameConfig,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(config: GameConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        seeds: &[SeedInfo],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();
        for seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (seed: {})",
                    scenario.key.bright_white(),
                    seed.label()
                );
            }
            results.push(self.run_single_scenario(scenario, seed, iterations).await);
        }
        results
    }

    async fn run_single_scenario(
        &self,
        scenario: &Scenario,
        seed: &SeedInfo,
        iterations: usize,
    ) -> ScenarioResult {
        let iterations = iterations.max(1);
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::with_capacity(iterations);
        let mut last_run = None;

        for i in 0..iterations {
            let run_seed = seed.for_iteration(i);
            let start_time = Instant::now();
            let outcome = match scenario.kind {
                ScenarioKind::Scripted(script) => {
                    let mut run = Playthrough::new(run_seed.seed, &self.config, self.verbose);
                    let outcome = script(&mut run);
                    last_run = Some(run.summary());
                    outcome
                }
                ScenarioKind::Live => scenarios::live_timeout(run_seed.seed, &self.config).await,
            };
            performance_data.push(start_time.elapsed());
            match outcome {
                Ok(()) => successes += 1,
                Err(err) => {
                    log::debug!("{} failed on {}: {err:?}", scenario.key, run_seed.label());
                    failures.push(format!(
                        "Iteration {} (seed {}): {err:#}",
                        i + 1,
                        run_seed.label()
                    ));
                }
            }
        }

        let average_duration = performance_data.iter().sum::<Duration>()
            / u32::try_from(performance_data.len()).unwrap_or(1);

        ScenarioResult {
            scenario_name: scenario.key.to_string(),
            seed: seed.label(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
            last_run,
        }
    }
}

/// Load a JSON config file, or the defaults when none is given.
pub fn load_config(path: Option<&std::path::Path>) -> Result<GameConfig> {
    use anyhow::Context;
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GameConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

mod duration_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }
}

mod duration_vec_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::get_scenario;

    #[tokio::test(flavor = "current_thread")]
    async fn results_count_iterations_per_seed() {
        let tester = LogicTester::new(GameConfig::default(), false);
        let scenario = get_scenario("full-win").unwrap();
        let seeds = [SeedInfo::from_numeric(5), SeedInfo::from_numeric(6)];
        let results = tester.run_scenario(&scenario, &seeds, 2).await;
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed, "{:?}", result.failures);
            assert_eq!(result.successful_iterations, 2);
            assert_eq!(result.performance_data.len(), 2);
            assert_eq!(result.last_run.as_ref().unwrap().keys, 3);
        }
    }

    #[test]
    fn config_files_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chronos.json");
        std::fs::write(&path, r#"{"location_time_limit_secs": 30, "scoring": {"key_points": 5}}"#)
            .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!((config.location_time_limit_secs - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.scoring.key_points, 5);
        assert_eq!(config.scoring.answer_points, 500);

        std::fs::write(&path, r#"{"max_catch_up_secs": 0}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert!(load_config(None).is_ok());
    }
}
