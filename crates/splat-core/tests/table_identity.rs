use splat_core::{ResultRow, ResultTable};

fn row(design: &str, script: &str, iteration: u32, area: f64, delay: f64) -> ResultRow {
    ResultRow {
        design_id: design.to_string(),
        artifact_name: format!("{script}_{iteration}.blif"),
        script_name: script.to_string(),
        iteration,
        cpu_time: 0.0,
        gates: 100,
        area,
        delay,
        is_pareto: false,
    }
}

#[test]
fn push_preserves_generation_order() {
    let mut table = ResultTable::new();
    table.push(row("d", "area1", 1, 10.0, 2.0)).unwrap();
    table.push(row("d", "area1", 2, 9.0, 2.1)).unwrap();
    table.push(row("d", "delay1", 1, 12.0, 1.5)).unwrap();
    let order: Vec<(String, u32)> = table
        .rows()
        .iter()
        .map(|r| (r.script_name.clone(), r.iteration))
        .collect();
    assert_eq!(
        order,
        [
            ("area1".to_string(), 1),
            ("area1".to_string(), 2),
            ("delay1".to_string(), 1)
        ]
    );
}

#[test]
fn duplicate_identity_is_rejected() {
    let mut table = ResultTable::new();
    table.push(row("d", "area1", 1, 10.0, 2.0)).unwrap();
    let err = table.push(row("d", "area1", 1, 8.0, 2.5)).unwrap_err();
    assert_eq!(err.info().code, "splat_core.duplicate_row");
    // Same script/iteration under another design is a distinct identity.
    table.push(row("other", "area1", 1, 8.0, 2.5)).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn pareto_flags_are_applied_in_place() {
    let mut table = ResultTable::new();
    table.push(row("d", "area1", 1, 10.0, 2.0)).unwrap();
    table.push(row("d", "area1", 2, 9.0, 2.1)).unwrap();
    table.set_pareto_flags(|r| r.iteration == 2);
    assert!(!table.rows()[0].is_pareto);
    assert!(table.rows()[1].is_pareto);
}

#[test]
fn columns_extract_in_order() {
    let mut table = ResultTable::new();
    table.push(row("d", "a", 1, 1.0, 5.0)).unwrap();
    table.push(row("d", "a", 2, 2.0, 3.0)).unwrap();
    assert_eq!(table.areas(), [1.0, 2.0]);
    assert_eq!(table.delays(), [5.0, 3.0]);
}
