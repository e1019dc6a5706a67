use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/fib.mq";

// the runner echoes the final value of the program
const EXPECTED: Expected = Expected {
    stdout: "55\n",
    stderr: "",
};

#[test]
fn run_fib() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
