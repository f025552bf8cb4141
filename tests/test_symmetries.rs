use assert_cmd::Command;
use predicates::prelude::{predicate, PredicateBooleanExt};

fn test_group_order(space: &str, order: u128) {
    let mut cmd = Command::cargo_bin("distcover").unwrap();
    cmd.args(["symmetries", "-s", space, "--logging-level", "off"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::ends_with(format!("group order: {}\n", order)));
}

#[test]
fn test_grid_3x3() {
    test_group_order("grid:3x3", 8)
}

#[test]
fn test_grid_3x4() {
    test_group_order("grid:3x4", 4)
}

#[test]
fn test_cube() {
    test_group_order("cube:3x2", 48)
}

#[test]
fn test_levels() {
    let mut cmd = Command::cargo_bin("distcover").unwrap();
    cmd.args(["symmetries", "-s", "grid:2x2", "--logging-level", "off"]);
    cmd.assert().success().stdout(
        predicate::str::starts_with("level 0: base pair ")
            .and(predicate::str::contains(", breaking\n"))
            .and(predicate::str::ends_with("group order: 8\n")),
    );
}

#[test]
fn test_budget_exhausted() {
    let mut cmd = Command::cargo_bin("distcover").unwrap();
    cmd.args(["symmetries", "-s", "grid:4x4", "--budget", "1"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("resource exhausted"));
}
