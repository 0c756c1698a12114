use splat_core::{ScriptCatalog, ScriptText};

fn script(text: &str) -> ScriptText {
    ScriptText::new(text).expect("valid script")
}

#[test]
fn declaration_order_is_preserved() {
    let catalog = ScriptCatalog::new(
        vec![
            ("zeta".to_string(), script("strash;dch")),
            ("alpha".to_string(), script("strash;amap")),
        ],
        ScriptText::empty(),
        ScriptText::empty(),
    )
    .expect("catalog");
    let names: Vec<&str> = catalog.entries().map(|(name, _)| name).collect();
    assert_eq!(names, ["zeta", "alpha"]);
}

#[test]
fn duplicate_names_are_rejected() {
    let err = ScriptCatalog::new(
        vec![
            ("area1".to_string(), script("strash")),
            ("area1".to_string(), script("dch")),
        ],
        ScriptText::empty(),
        ScriptText::empty(),
    )
    .expect_err("duplicate must fail");
    assert_eq!(err.info().code, "splat_core.duplicate_script");
}

#[test]
fn empty_script_body_is_rejected() {
    assert!(ScriptText::new("   ").is_err());
    assert!(ScriptText::new("strash").is_ok());
}

#[test]
fn empty_hooks_mean_skip() {
    let catalog = ScriptCatalog::new(
        vec![("simple".to_string(), script("strash;dch;map -B 0.9"))],
        ScriptText::empty(),
        ScriptText::empty(),
    )
    .expect("catalog");
    assert!(catalog.initialize().is_empty());
    assert!(catalog.finalize().is_empty());
}

#[test]
fn standard_catalog_shape() {
    let catalog = ScriptCatalog::standard();
    assert_eq!(catalog.len(), 8);
    assert!(catalog.get("area1").is_some());
    assert!(catalog.get("delay3").is_some());
    assert!(!catalog.initialize().is_empty());
    assert!(!catalog.finalize().is_empty());
}

#[test]
fn flatten_expands_hooks_and_iterations() {
    let catalog = ScriptCatalog::new(
        vec![("simple".to_string(), script("strash;dch"))],
        script("init_cmd"),
        script("final_cmd"),
    )
    .expect("catalog");
    let flat = catalog.flatten("simple", 2).expect("flatten");
    let lines: Vec<&str> = flat.lines().collect();
    assert_eq!(
        lines,
        ["init_cmd", "strash", "dch", "strash", "dch", "final_cmd"]
    );
}

#[test]
fn flatten_unknown_script_fails() {
    let catalog = ScriptCatalog::standard();
    assert!(catalog.flatten("nonesuch", 1).is_err());
}
