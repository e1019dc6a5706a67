use std::{
    error::Error,
    io::{self, Write},
    path::Path,
    process::{Command, Output, Stdio},
    str,
};

const MACAQUE_PATH: &str = "./target/debug/macaque";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_interpreter(src_path: &Path) -> Result<Output, io::Error> {
    Command::new(MACAQUE_PATH).arg(src_path).output()
}

fn run_interpreter_with_input(src_path: &Path, input: &str) -> Result<Output, io::Error> {
    let mut child = Command::new(MACAQUE_PATH)
        .arg(src_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(input.as_bytes())?;
    }

    child.wait_with_output()
}

/// Run a demo program and assert its exact stdout/stderr and a zero exit
/// status.
pub fn check_run(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter(src_path)?;

    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "macaque exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Same as `check_run`, but with a string fed to the interpreter's stdin.
pub fn check_run_with_input(
    src_path: &Path,
    input: &str,
    expected: Expected,
) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter_with_input(src_path, input)?;

    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "macaque exited with status {:?}",
        output.status.code()
    );

    Ok(())
}

/// Run a program that must fail: non-zero exit status and the given
/// fragment somewhere on stderr.
pub fn check_failing_run(
    src_path: &Path,
    expected_stderr_fragment: &str,
) -> Result<(), Box<dyn Error>> {
    let output = run_interpreter(src_path)?;

    assert!(
        !output.status.success(),
        "macaque should exit with a non-zero status"
    );

    let stderr = str::from_utf8(&output.stderr)?;
    assert!(
        stderr.contains(expected_stderr_fragment),
        "stderr {stderr:?} does not contain {expected_stderr_fragment:?}"
    );

    Ok(())
}
