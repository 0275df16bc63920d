//! Integration tests for the assassin server binary.
//!
//! Spawns the server process, sends commands via stdin and checks the
//! response lines on stdout.

use std::io::{BufRead, Write};
use std::path::Path;
use std::process::{Command, Stdio};

const SECRET: &str = "s3cret";

/// Sends a sequence of commands to the server and collects stdout lines.
fn run_server(extra_args: &[&str], commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_assassin");
    let mut child = Command::new(exe)
        .args(["--admin-secret", SECRET, "--seed", "42"])
        .args(extra_args)
        .env_remove("ASSASSIN_STORE_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start assassin");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

fn json_after(line: &str, keyword: &str) -> serde_json::Value {
    let body = line
        .strip_prefix(keyword)
        .and_then(|s| s.strip_prefix(' '))
        .unwrap_or_else(|| panic!("expected '{keyword}' line, got: {line}"));
    serde_json::from_str(body).unwrap()
}

#[test]
fn isready_response() {
    let lines = run_server(&[], &["isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn unknown_and_malformed_commands_are_ignored() {
    let lines = run_server(&[], &["dance", "kill ivy", "", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok".to_string()]);
}

#[test]
fn quit_stops_processing() {
    let lines = run_server(&[], &["quit", "isready"]);
    assert!(lines.is_empty());
}

#[test]
fn full_game_session() {
    let newgame = format!("newgame ivy {SECRET} alice bob carol dave");
    let lines = run_server(&[], &[&newgame, "state ivy", "quit"]);
    assert_eq!(lines[0], "created ivy 4");
    let state = json_after(&lines[1], "state");
    assert_eq!(state["alive"].as_array().unwrap().len(), 4);
    assert_eq!(state["dead"].as_array().unwrap().len(), 0);

    // Seeded: the same ring comes back, so the killer's victim is known.
    let killer = state["alive"][0].as_str().unwrap().to_string();
    let victim = state["successor"][&killer].as_str().unwrap().to_string();
    let next = state["successor"][&victim].as_str().unwrap().to_string();

    let kill = format!("kill ivy {killer} {SECRET}");
    let dead_kill = format!("kill ivy {victim} {SECRET}");
    let bad_secret = format!("kill ivy {killer} wrong");
    let lines = run_server(
        &[],
        &[
            &newgame,
            &kill,
            &dead_kill,
            &bad_secret,
            "stats ivy",
            "leaderboard ivy",
            "quit",
        ],
    );
    assert_eq!(lines[0], "created ivy 4");
    assert_eq!(lines[1], format!("killed {victim} next {next}"));
    assert!(lines[2].starts_with("error not_alive "), "{}", lines[2]);
    assert!(lines[3].starts_with("error unauthorized "), "{}", lines[3]);

    let stats = json_after(&lines[4], "stats");
    assert_eq!(stats[&killer]["kills"], 1);
    assert_eq!(stats[&victim]["isAlive"], false);
    assert_eq!(stats.as_object().unwrap().len(), 4);

    let board = json_after(&lines[5], "leaderboard");
    assert_eq!(board[0]["id"], killer.as_str());
}

#[test]
fn remove_and_addplayer() {
    let lines = run_server(
        &[],
        &[
            &format!("newgame ivy {SECRET} alice bob carol"),
            &format!("remove ivy bob {SECRET}"),
            &format!("remove ivy bob {SECRET}"),
            &format!("addplayer ivy bob {SECRET}"),
            &format!("addplayer ivy Erin {SECRET}"),
            "stats ivy",
            "quit",
        ],
    );
    assert_eq!(lines[0], "created ivy 3");
    assert_eq!(lines[1], "removed bob");
    assert_eq!(lines[2], "unchanged bob");
    assert!(lines[3].starts_with("error already_present "), "{}", lines[3]);
    assert_eq!(lines[4], "reshuffled ivy 3");
    let stats = json_after(&lines[5], "stats");
    assert_eq!(stats["erin"]["isAlive"], true);
    assert_eq!(stats["bob"]["isAlive"], false);
    assert_eq!(stats["bob"]["kills"], 0);
}

#[test]
fn game_over_after_last_kill() {
    let lines = run_server(
        &[],
        &[
            &format!("newgame duel {SECRET} alice bob"),
            &format!("kill duel alice {SECRET}"),
            &format!("kill duel alice {SECRET}"),
            "quit",
        ],
    );
    assert_eq!(lines[1], "killed bob next alice");
    assert!(lines[2].starts_with("error game_over "), "{}", lines[2]);
}

#[test]
fn setup_commands_require_the_secret() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.jsonl");
    std::fs::write(&roster_path, "{\"id\": \"dee\", \"name\": \"Dee Dee\"}\n").unwrap();
    let import = format!("import oak {} wrong", roster_path.display());
    let lines = run_server(
        &[],
        &[
            "newgame ivy wrong alice bob",
            "stats ivy",
            &format!("newgame ivy {SECRET} alice bob"),
            "addplayer ivy carol wrong",
            &import,
            "stats ivy",
            "quit",
        ],
    );
    assert!(lines[0].starts_with("error unauthorized "), "{}", lines[0]);
    assert!(lines[1].starts_with("error not_found "), "{}", lines[1]);
    assert_eq!(lines[2], "created ivy 2");
    assert!(lines[3].starts_with("error unauthorized "), "{}", lines[3]);
    assert!(lines[4].starts_with("error unauthorized "), "{}", lines[4]);
    let stats = json_after(&lines[5], "stats");
    assert_eq!(stats.as_object().unwrap().len(), 2);
}

#[test]
fn import_and_persist_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.jsonl");
    std::fs::write(
        &roster_path,
        "{\"id\": \"PM12\", \"name\": \"Pierce Maloney\", \"nickname\": \"Killa\"}\n\
         {\"id\": \"jd34\", \"name\": \"Jane Doe\"}\n\
         {\"name\": \"No Id\"}\n",
    )
    .unwrap();
    let store_dir = dir.path().join("data");
    let store_arg = store_dir.to_str().unwrap();

    let import = format!("import ivy {} {SECRET}", roster_path.display());
    let lines = run_server(&["--store-dir", store_arg], &[&import, "quit"]);
    assert_eq!(lines, vec!["imported ivy 2 skipped 1".to_string()]);
    assert!(Path::new(&store_dir).join("games").join("ivy.json").exists());

    let lines = run_server(&["--store-dir", store_arg], &["player pm12", "stats ivy", "quit"]);
    let player = json_after(&lines[0], "player");
    assert_eq!(player["fullDisplayName"], "Pierce 'Killa' Maloney");
    let stats = json_after(&lines[1], "stats");
    assert_eq!(stats.as_object().unwrap().len(), 2);
}
