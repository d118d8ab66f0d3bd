//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 各组件之间的选项一致性
//! - 选项文件 → 记录 → 校验 → 传输 → 结果回传 的完整流程
//! - 并发编解码

#[cfg(test)]
mod contract_tests {
    use std::collections::BTreeSet;

    use contracts::{OptionRole, SensorKind};
    use sensors::{dispatch, KindVisitor, RegisteredSensor};

    /// Every option a writer emits is declared with the matching role
    struct WriterMatchesSchema {
        prefix: String,
    }

    impl KindVisitor for WriterMatchesSchema {
        type Output = ();

        fn visit<M: RegisteredSensor>(&mut self) {
            let schema = M::declared_options();
            let prefix = format!("{}{}_", self.prefix, M::KIND);

            let spec_names: BTreeSet<String> = M::write_spec(&prefix, &M::Spec::default())
                .unwrap()
                .names()
                .map(str::to_string)
                .collect();
            let declared: BTreeSet<String> = schema
                .names_for(OptionRole::Spec)
                .into_iter()
                .map(str::to_string)
                .collect();
            assert_eq!(spec_names, declared, "{} spec", M::KIND);

            let params_names: BTreeSet<String> = M::write_params(&M::Params::default())
                .names()
                .map(str::to_string)
                .collect();
            let declared: BTreeSet<String> = schema
                .names_for(OptionRole::Params)
                .into_iter()
                .map(str::to_string)
                .collect();
            assert_eq!(params_names, declared, "{} params", M::KIND);

            // absent readings write nothing
            assert!(M::write_results(&prefix, &M::Results::default()).unwrap().is_empty());
        }
    }

    #[test]
    fn test_writers_match_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let mut visitor = WriterMatchesSchema {
            prefix: format!("{}/", dir.path().display()),
        };
        for kind in SensorKind::ALL {
            dispatch(kind, &mut visitor);
        }
    }

    #[test]
    fn test_schema_names_are_namespaced() {
        for schema in sensors::all_declared_options() {
            let heading = format!("{}.", schema.kind.heading());
            for decl in &schema.options {
                assert!(decl.name.starts_with(&heading), "{}", decl.name);
            }
            assert!(schema.get(&schema.kind.option("enabled")).is_some());
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use config_loader::ConfigLoader;
    use contracts::{
        Axis, CodecError, RecordType, SensorKind, SensorModel, SensorResults, Violation,
    };
    use sensors::kinds::{GravityParams, GravityResults, GravitySpec, Thermal, ThermalResults};
    use sensors::{wire, SensorSuite};
    use tokio::sync::mpsc;

    fn survey(dir: &Path, gravity_locations: &str, gravity_readings: Option<&str>) -> PathBuf {
        let grav = dir.join("grav_locations.csv");
        let therm = dir.join("therm_locations.csv");
        fs::write(&grav, gravity_locations).unwrap();
        fs::write(&therm, "50,50,-100\n50,50,-900\n").unwrap();

        let readings_line = match gravity_readings {
            Some(readings) => {
                let path = dir.join("grav_readings.csv");
                fs::write(&path, readings).unwrap();
                format!("sensorReadings = \"{}\"", path.display())
            }
            None => String::new(),
        };

        let config = dir.join("survey.toml");
        fs::write(
            &config,
            format!(
                r#"
[world]
xBounds = "0 100"
yBounds = "0 100"
zBounds = "-1000 0"

[gravity]
enabled = true
sensorLocations = "{grav}"
{readings_line}
gridResolution = [4, 4, 4]
supersample = 2
noiseAlpha = 1.0
noiseBeta = 0.5
returnSensorData = true

[magnetism]
enabled = false
sensorLocations = "nowhere.csv"
gridResolution = "bogus"

[thermal]
enabled = true
sensorLocations = "{therm}"
gridResolution = "5, 5, 10"
supersample = 0
noiseAlpha = 2.0
noiseBeta = 2.0
surfaceTemperature = 15.0
lowerBoundary = 0.065
lowerBoundaryIsHeatFlow = true
"#,
                grav = grav.display(),
                therm = therm.display(),
            ),
        )
        .unwrap();
        config
    }

    fn load(config: &Path) -> SensorSuite {
        let options = ConfigLoader::load_from_path(config).unwrap();
        SensorSuite::from_options(&options).unwrap()
    }

    #[test]
    fn test_valid_survey() {
        let dir = tempfile::tempdir().unwrap();
        let suite = load(&survey(dir.path(), "10,10,0\n90,90,0\n", Some("1.5\n2.5\n")));

        assert_eq!(
            suite.enabled.iter().copied().collect::<Vec<_>>(),
            vec![SensorKind::Gravity, SensorKind::Thermal]
        );
        assert_eq!(suite.magnetism, Default::default());
        assert!(suite.gravity.params.return_sensor_data);
        assert_eq!(suite.gravity.results.readings(), Some(&[1.5, 2.5][..]));
        assert_eq!(suite.gravity.results.likelihood(), 0.0);
        assert_eq!(suite.thermal.spec.voxelisation.resolutions(), [5, 5, 10]);

        let report = suite.validate();
        assert!(report.is_valid(), "{:?}", report.diagnostics());
        assert_eq!(suite.property_mask().count(), 3);
    }

    #[test]
    fn test_reading_count_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let suite = load(&survey(
            dir.path(),
            "10,10,0\n20,20,0\n",
            Some("1.0\n2.0\n3.0\n"),
        ));

        let failure = suite.validate().into_result().unwrap_err();
        assert_eq!(failure.diagnostics.len(), 1);
        assert_eq!(
            failure.diagnostics[0].violation,
            Violation::ReadingCountMismatch {
                locations: 2,
                readings: 3
            }
        );
    }

    #[test]
    fn test_out_of_bounds_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let suite = load(&survey(dir.path(), "0,0,10\n10,150,10\n", None));

        let report = suite.validate();
        assert_eq!(report.len(), 1);
        let diagnostic = &report.diagnostics()[0];
        assert_eq!(diagnostic.kind, SensorKind::Gravity);
        assert_eq!(diagnostic.index, Some(1));
        assert!(matches!(
            diagnostic.violation,
            Violation::LocationOutOfBounds { axis: Axis::Y, .. }
        ));
    }

    #[test]
    fn test_two_independent_violations() {
        let dir = tempfile::tempdir().unwrap();
        let config = survey(dir.path(), "10,150,0\n", Some("1\n2\n"));
        let mut options = ConfigLoader::load_from_path(&config).unwrap();
        options.insert("thermal.noiseAlpha", "0");

        let report = SensorSuite::from_options(&options).unwrap().validate();
        let kinds: Vec<(SensorKind, &str)> = report
            .diagnostics()
            .iter()
            .map(|d| (d.kind, d.field))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (SensorKind::Gravity, "sensorLocations"),
                (SensorKind::Gravity, "sensorReadings"),
                (SensorKind::Thermal, "noiseAlpha"),
            ]
        );
    }

    #[test]
    fn test_rewrite_bundle_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let suite = load(&survey(dir.path(), "10,10,0\n90,90,0\n", Some("1.5\n2.5\n")));

        let prefix = format!("{}/bundle/", dir.path().display());
        let options = suite.to_options(&prefix).unwrap();
        let bundle = dir.path().join("bundle/options.json");
        ConfigLoader::write_to_path(&bundle, &options).unwrap();

        assert_eq!(load(&bundle), suite);
    }

    /// Coordinator ships Spec + Params to workers, workers send Results back
    #[tokio::test]
    async fn test_evaluation_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let suite = Arc::new(load(&survey(dir.path(), "10,10,0\n90,90,0\n", None)));
        suite.validate().into_result().unwrap();

        let spec = wire::encode(&suite.gravity.spec).unwrap();
        let params = wire::encode(&suite.gravity.params).unwrap();

        let (results_tx, mut results_rx) = mpsc::channel::<Vec<u8>>(8);
        let mut workers = Vec::new();
        for worker in 0..4u32 {
            let (spec, params, tx) = (spec.clone(), params.clone(), results_tx.clone());
            workers.push(tokio::spawn(async move {
                let spec = wire::decode::<GravitySpec>(&spec).unwrap();
                let params = wire::decode::<GravityParams>(&params).unwrap();

                // stand-in forward model: one reading per location
                let readings = params.return_sensor_data.then(|| {
                    spec.locations
                        .iter()
                        .map(|p| p.x * 1e-6 + f64::from(worker))
                        .collect()
                });
                let results = GravityResults {
                    readings,
                    likelihood: -f64::from(worker),
                };
                tx.send(wire::encode(&results).unwrap().to_vec()).await.unwrap();
            }));
        }
        drop(results_tx);

        let mut received = Vec::new();
        while let Some(payload) = results_rx.recv().await {
            assert_eq!(
                wire::Header::parse(&payload).unwrap().record,
                RecordType::Results
            );
            received.push(wire::decode::<GravityResults>(&payload).unwrap());
        }
        for worker in workers {
            worker.await.unwrap();
        }

        assert_eq!(received.len(), 4);
        for results in &received {
            let report = sensors::registry::validate::<sensors::Gravity>(
                &suite.world,
                &suite.gravity.spec,
                results,
            );
            assert!(report.is_valid());
        }
        let mut likelihoods: Vec<f64> = received.iter().map(|r| r.likelihood).collect();
        likelihoods.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(likelihoods, vec![0.0, -1.0, -2.0, -3.0]);
    }

    #[tokio::test]
    async fn test_concurrent_encode_decode_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let suite = Arc::new(load(&survey(dir.path(), "10,10,0\n90,90,0\n", Some("1\n2\n"))));
        let reference = sensors::encode_suite(&suite).unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let suite = Arc::clone(&suite);
            tasks.spawn(async move {
                let envelopes = sensors::encode_suite(&suite).unwrap();
                for envelope in &envelopes {
                    let (_, matches) = sensors::verify_payload(&suite, &envelope.payload).unwrap();
                    assert!(matches);
                }
                envelopes
            });
        }
        while let Some(envelopes) = tasks.join_next().await {
            assert_eq!(envelopes.unwrap(), reference);
        }
    }

    #[test]
    fn test_results_cannot_masquerade_as_another_kind() {
        let payload = wire::encode(&ThermalResults {
            readings: Some(vec![20.0]),
            likelihood: -1.0,
        })
        .unwrap();

        assert_eq!(
            wire::decode::<GravityResults>(&payload),
            Err(CodecError::KindMismatch {
                expected: SensorKind::Gravity,
                found: SensorKind::Thermal
            })
        );
        assert_eq!(
            wire::decode::<<Thermal as SensorModel>::Spec>(&payload).unwrap_err().reason(),
            "record_mismatch"
        );
    }
}
