use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const SCENARIO: &str = "a,b,z\n1,2,A\n2,4,A\n3,6,B\n4,8,B\n";

/// Temporary working directory with a `data/` folder and small figures.
struct Workspace {
    tmp: TempDir,
}

impl Workspace {
    fn new(files: &[(&str, &str)]) -> Self {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir(&data).unwrap();
        for (name, text) in files {
            fs::write(data.join(name), text).unwrap();
        }
        fs::write(
            tmp.path().join("pairplot.json"),
            r#"{"plot": {"cell_size": 120, "scatter_size": [400, 300], "scatter_box_size": [440, 400]}}"#,
        )
        .unwrap();
        Workspace { tmp }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pairplot").unwrap();
        cmd.current_dir(self.tmp.path());
        cmd
    }

    fn output(&self, name: &str) -> PathBuf {
        self.tmp.path().join("output").join(name)
    }

    fn written(&self) -> Vec<String> {
        let dir = self.tmp.path().join("output");
        if !dir.is_dir() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn is_png(path: &Path) -> bool {
    fs::read(path).is_ok_and(|bytes| bytes.starts_with(b"\x89PNG"))
}

#[test]
fn basic_pairplot_prints_correlation_and_saves() {
    let ws = Workspace::new(&[("scenario.csv", SCENARIO)]);
    ws.cmd()
        .write_stdin("1\n1\n2\n")
        .assert()
        .success()
        .stdout(contains("1.000"))
        .stdout(contains("scenario_pairplot.png"));
    assert!(is_png(&ws.output("scenario_pairplot.png")));
}

#[test]
fn colored_pairplot_saves_colored_file() {
    let ws = Workspace::new(&[("scenario.csv", SCENARIO)]);
    ws.cmd()
        .write_stdin("2\n1\n1\n")
        .assert()
        .success()
        .stdout(contains("A, B"));
    assert!(is_png(&ws.output("scenario_pairplot_colored.png")));
}

#[test]
fn colored_pairplot_without_group_column_fails() {
    let ws = Workspace::new(&[("plain.csv", "a,b\n1,2\n3,4\n5,7\n")]);
    ws.cmd()
        .write_stdin("2\n1\n1\n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("'z'"));
    assert!(ws.written().is_empty());
}

#[test]
fn group_column_flag_overrides_default() {
    let ws = Workspace::new(&[("g.csv", "a,b,kind\n1,2,x\n2,4,y\n3,5,x\n")]);
    ws.cmd()
        .args(["--group-column", "kind"])
        .write_stdin("2\n1\n1\n")
        .assert()
        .success()
        .stdout(contains("Unique values in 'kind': x, y"));
}

#[test]
fn scatter_names_encode_box_option() {
    let ws = Workspace::new(&[("scenario.csv", SCENARIO)]);
    ws.cmd().write_stdin("3\n1\n1\n2\n1\n1\n").assert().success();
    ws.cmd().write_stdin("3\n1\n1\n2\n2\n3\n").assert().success();
    assert_eq!(
        ws.written(),
        vec![
            "scenario_a_vs_b_colored.png".to_string(),
            "scenario_a_vs_b_with_boxplot_colored.png".to_string(),
        ]
    );
}

#[test]
fn whitespace_file_with_comments_loads() {
    let text = "# exported\n# by hand\n  x   y\n 1.0  2.0\n 2.0  3.9\n 3.0  6.1\n";
    let ws = Workspace::new(&[("spaced.csv", text)]);
    ws.cmd()
        .write_stdin("1\n1\n1\n")
        .assert()
        .success()
        .stdout(contains("Numeric columns: x, y"));
    assert!(is_png(&ws.output("spaced_pairplot.png")));
}

#[test]
fn invalid_answers_are_reprompted() {
    let ws = Workspace::new(&[("scenario.csv", SCENARIO)]);
    ws.cmd()
        .write_stdin("7\nbasic\n1\n1\n1\n")
        .assert()
        .success()
        .stdout(contains("Please enter a number between 1 and 3."))
        .stdout(contains("Please enter a number."));
}

#[test]
fn single_numeric_column_fails() {
    let ws = Workspace::new(&[("thin.csv", "a,label\n1,x\n2,y\n")]);
    ws.cmd()
        .write_stdin("1\n1\n")
        .assert()
        .code(1)
        .stderr(contains("at least 2 numeric columns"));
}

#[test]
fn missing_csv_files_fail() {
    let ws = Workspace::new(&[]);
    ws.cmd()
        .write_stdin("1\n")
        .assert()
        .code(1)
        .stderr(contains("no .csv files"));
}

#[test]
fn closed_stdin_exits_cleanly() {
    let ws = Workspace::new(&[("scenario.csv", SCENARIO)]);
    ws.cmd()
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("Interrupted."));
}

#[cfg(unix)]
#[test]
fn ctrl_c_at_the_menu_exits_cleanly() {
    use std::io::Read;
    use std::process::{Command as StdCommand, Stdio};

    let ws = Workspace::new(&[("scenario.csv", SCENARIO)]);
    let mut child = StdCommand::new(env!("CARGO_BIN_EXE_pairplot"))
        .current_dir(ws.tmp.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    // wait for the menu so the handler is installed
    let mut stdout = child.stdout.take().unwrap();
    let mut seen = Vec::new();
    let mut buf = [0u8; 256];
    while !String::from_utf8_lossy(&seen).contains("Select (1-3): ") {
        let n = stdout.read(&mut buf).unwrap();
        assert!(n > 0, "exited before the menu was shown");
        seen.extend_from_slice(&buf[..n]);
    }

    let kill = StdCommand::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(kill.success());

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0));
    assert!(rest.contains("Interrupted."));
    assert!(ws.written().is_empty());
}
