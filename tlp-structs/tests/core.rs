use std::path::{Path, PathBuf};
use tlp_structs::core::{Instance, ProgramTiming, TimingPlan, TlLogic};
use tlp_structs::error::PlanError;

fn test_instance() -> Instance {
    Instance {
        name: "cross3".to_string(),
        simulation_time: 500,
        num_vehicles: 5,
        tl_logics: vec![
            TlLogic {
                id: "n1".to_string(),
                phases: vec!["GGrr".to_string(), "rrGG".to_string()],
            },
            TlLogic {
                id: "n2".to_string(),
                phases: vec!["Gr".to_string()],
            },
        ],
        base_dir: PathBuf::from("/data/instances"),
    }
}

#[test]
fn test_required_plan_values() {
    // one offset per program plus one duration per phase
    assert_eq!(test_instance().required_plan_values(), 5);

    let empty = Instance {
        tl_logics: vec![],
        ..test_instance()
    };
    assert_eq!(empty.required_plan_values(), 0);
}

#[test]
fn test_file_naming() {
    let instance = test_instance();
    assert_eq!(instance.network_file(), Path::new("/data/instances/cross3.net.xml"));
    assert_eq!(instance.routes_file(), Path::new("/data/instances/cross3.rou.xml"));

    let run_dir = Path::new("run0");
    assert_eq!(
        instance.additional_file(run_dir),
        Path::new("/data/instances/run0/cross3.add.xml")
    );
    assert_eq!(
        instance.tripinfo_file(run_dir),
        Path::new("/data/instances/run0/cross3-tripinfo.xml")
    );
    assert_eq!(
        instance.summary_file(run_dir),
        Path::new("/data/instances/run0/cross3-summary.xml")
    );
    assert_eq!(
        instance.vehroutes_file(run_dir),
        Path::new("/data/instances/run0/cross3-vehicles.xml")
    );
    assert_eq!(
        instance.emissions_file(run_dir),
        Path::new("/data/instances/run0/cross3-emissions.xml")
    );
}

#[test]
fn test_absolute_run_dir_wins() {
    let instance = test_instance();
    assert_eq!(
        instance.additional_file(Path::new("/tmp/eval7")),
        Path::new("/tmp/eval7/cross3.add.xml")
    );
}

#[test]
fn test_instance_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cross3.json");
    std::fs::write(
        &path,
        r#"{
            "name": "cross3",
            "simulation_time": 500,
            "num_vehicles": 5,
            "tl_logics": [
                {"id": "n1", "phases": ["GGrr", "rrGG"]},
                {"id": "n2", "phases": ["Gr"]}
            ]
        }"#,
    )
    .unwrap();

    let instance = Instance::load(&path).unwrap();
    assert_eq!(instance.name, "cross3");
    assert_eq!(instance.simulation_time, 500);
    assert_eq!(instance.num_vehicles, 5);
    assert_eq!(instance.tl_logics.len(), 2);
    assert_eq!(instance.tl_logics[0].phases, vec!["GGrr", "rrGG"]);
    assert_eq!(instance.base_dir, dir.path());
}

#[test]
fn test_instance_load_failures() {
    assert!(Instance::load(Path::new("/no/such/instance.json")).is_err());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Instance::load(&path).is_err());
}

#[test]
fn test_plan_from_values() {
    let instance = test_instance();
    let plan = TimingPlan::from_values(&instance, &[7, 10, 20, 3, 30]).unwrap();
    assert_eq!(
        plan.programs,
        vec![
            ProgramTiming {
                offset: 7,
                durations: vec![10, 20],
            },
            ProgramTiming {
                offset: 3,
                durations: vec![30],
            },
        ]
    );
}

#[test]
fn test_plan_length_is_validated_both_ways() {
    let instance = test_instance();

    let err = TimingPlan::from_values(&instance, &[7, 10]).unwrap_err();
    assert!(matches!(err, PlanError::Length { expected: 5, actual: 2 }));

    let err = TimingPlan::from_values(&instance, &[7, 10, 20, 3, 30, 99]).unwrap_err();
    assert!(matches!(err, PlanError::Length { expected: 5, actual: 6 }));
}

#[test]
fn test_plan_load() {
    let instance = test_instance();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.txt");
    std::fs::write(&path, "7 10 20\n3\t30\n").unwrap();

    let plan = TimingPlan::load(&path, &instance).unwrap();
    assert_eq!(plan, TimingPlan::from_values(&instance, &[7, 10, 20, 3, 30]).unwrap());
}

#[test]
fn test_plan_load_failures() {
    let instance = test_instance();

    let err = TimingPlan::load(Path::new("/no/such/plan.txt"), &instance).unwrap_err();
    assert!(matches!(err, PlanError::Load { .. }));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.txt");
    std::fs::write(&path, "7 ten 20 3 30").unwrap();
    let err = TimingPlan::load(&path, &instance).unwrap_err();
    match err {
        PlanError::Parse { token, .. } => assert_eq!(token, "ten"),
        other => panic!("expected parse error, got {:?}", other),
    }

    // negative values are not valid durations
    std::fs::write(&path, "7 -10 20 3 30").unwrap();
    assert!(matches!(
        TimingPlan::load(&path, &instance).unwrap_err(),
        PlanError::Parse { .. }
    ));
}
