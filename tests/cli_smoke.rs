use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskbot_help_works() {
    Command::cargo_bin("taskbot")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["add", "list", "done", "remove", "showall", "rank", "init"];

    for cmd in subcommands {
        Command::cargo_bin("taskbot")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_user_is_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("taskbot")
        .expect("binary")
        .current_dir(dir.path())
        .env("DISCORD_TOKEN", "test-token")
        .env_remove("TASKBOT_USER")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("--user"));
}
