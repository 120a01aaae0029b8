mod common;

use common::{Sandbox, stderr, stdout};

#[test]
fn add_command_appends_and_persists() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(common::sample_tasks());

    let output = sandbox.run(&["add", "  demo task  "]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Added task: demo task"));
    assert!(stdout(&output).contains("Completed: 2 | Uncompleted: 2"));

    let stored = sandbox.stored_tasks();
    let tasks = stored.as_array().unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[3]["text"], "demo task");
    assert_eq!(tasks[3]["completed"], false);
    assert!(tasks[3]["id"].is_i64());
    assert!(tasks[3]["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn add_command_rejects_missing_text() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERROR: empty_text - please write down a task"));
    assert!(!sandbox.slot_path().exists());
}

#[test]
fn add_command_rejects_blank_text() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(common::sample_tasks());

    let output = sandbox.run(&["add", "   "]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERROR: empty_text"));
    assert_eq!(sandbox.stored_tasks(), common::sample_tasks());
}

#[test]
fn add_command_json_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add", "demo", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(json["task"]["text"], "demo");
    assert_eq!(json["counts"]["uncompleted"], 1);
}

#[test]
fn add_command_honors_slot_key_override() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["add", "work item", "--config-override", "slot_key=work"]);

    assert!(output.status.success());
    assert!(sandbox.path().join("work.json").exists());
    assert!(!sandbox.slot_path().exists());
}

#[test]
fn corrupt_slot_is_treated_as_empty() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.slot_path(), "{ definitely not tasks").unwrap();

    let output = sandbox.run(&["add", "fresh start"]);

    assert!(output.status.success());
    let stored = sandbox.stored_tasks();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["text"], "fresh start");
}
