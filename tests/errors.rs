use std::{error::Error, path::Path};

use test_utils::check_failing_run;

#[test]
fn reassigning_a_const_fails() -> Result<(), Box<dyn Error>> {
    check_failing_run(
        Path::new("./demos/const_error.mq"),
        "ERROR: cannot reassign to const: x",
    )
}

#[test]
fn parse_errors_are_reported() -> Result<(), Box<dyn Error>> {
    check_failing_run(Path::new("./demos/parse_error.mq"), "parser error: ")
}
