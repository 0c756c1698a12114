use std::path::PathBuf;

use splat_sweep::{parse_sta_output, ClockRef, TimingCheck};

fn check(is_port: bool) -> TimingCheck {
    TimingCheck {
        liberty_path: PathBuf::from("libs/sky130_tt.lib"),
        netlist_path: PathBuf::from("mapped.v"),
        top_module: "counter".to_string(),
        clock: ClockRef {
            name: "clk".to_string(),
            is_port,
        },
        period: 1.5,
        input_delay: 0.1,
        output_delay: 0.2,
    }
}

#[test]
fn constraints_cover_the_full_flow() {
    let script = check(false).render_constraints();
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines[0], "read_liberty libs/sky130_tt.lib");
    assert_eq!(lines[1], "read_verilog mapped.v");
    assert_eq!(lines[2], "link counter");
    assert_eq!(lines[3], "create_clock clk -period 1.5");
    assert!(lines[4].starts_with("set_input_delay -clock [get_clocks clk] 0.1"));
    assert!(lines[5].starts_with("set_output_delay -clock [get_clocks clk] 0.2"));
    assert_eq!(lines[6], "report_checks");
}

#[test]
fn port_clocks_get_the_name_flag() {
    // A bit-blasted port named like the clock needs the -name form or the
    // tool silently analyzes the wrong clock.
    let ported = check(true).render_constraints();
    assert!(ported.contains("create_clock -name clk -period 1.5"));
    let named = check(false).render_constraints();
    assert!(named.contains("create_clock clk -period 1.5"));
    assert!(!named.contains("-name"));
}

#[test]
fn paths_with_spaces_are_quoted() {
    let mut odd = check(false);
    odd.liberty_path = PathBuf::from("my libs/tt.lib");
    let script = odd.render_constraints();
    assert!(script.contains("read_liberty \"my libs/tt.lib\""));
}

#[test]
fn arrival_takes_the_last_definition_negated() {
    let report = "\
  1.20   data arrival time\n\
  ...\n\
 -1.35   data arrival time\n\
  0.15   slack (MET)\n";
    let summary = parse_sta_output(report);
    assert_eq!(summary.arrival_delay, Some(1.35));
    assert_eq!(summary.slack, Some(0.15));
}

#[test]
fn missing_lines_leave_fields_unset() {
    let summary = parse_sta_output("nothing useful here\n");
    assert_eq!(summary.arrival_delay, None);
    assert_eq!(summary.slack, None);
}
