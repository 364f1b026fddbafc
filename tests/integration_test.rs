//! Integration tests for `taskindicator`.

use std::fs;
use std::path::Path;

use taskindicator::database::{DESCRIPTION, NOTE};
use taskindicator::record::TAGS;
use taskindicator::testing::MockCommandRunner;
use taskindicator::{
    CommandRunner, Config, Database, Error, Properties, RealCommandRunner, TaskTool, Value,
    Warning, VERSION,
};
use tempfile::TempDir;

const EXPORT_ARGS: &[&str] = &["rc.json.array=1", "export"];

const PENDING: &str = concat!(
    r#"[description:"write report" entry:"1360000000" project:"work" status:"pending" tags:"office,q1" uuid:"11111111-aaaa"]"#,
    "\n",
    r#"[description:"read http:\/\/example.com" entry:"1360000100" start:"1360000200" status:"pending" uuid:"22222222-bbbb"]"#,
    "\n",
);

const COMPLETED: &str = concat!(
    r#"[description:"old thing" end:"1360001000" project:"home" status:"completed" uuid:"33333333-cccc"]"#,
    "\n",
);

fn data_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pending.data"), PENDING).unwrap();
    fs::write(dir.path().join("completed.data"), COMPLETED).unwrap();
    dir
}

fn show_output(dir: &Path) -> String {
    format!("color=on\ndata.location={}\n", dir.display())
}

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_real_command_runner() {
    let runner = RealCommandRunner::new();
    let output = runner.run("echo", &["hello"], None).unwrap();
    assert!(output.success());
    assert!(output.stdout.contains("hello"));
}

#[test]
fn test_full_load_through_facade() {
    let dir = data_folder();
    let mut runner = MockCommandRunner::new();
    runner.expect_stdout("task", &["_show"], &show_output(dir.path()));
    runner.expect_stdout(
        "task",
        EXPORT_ARGS,
        r#"[{"uuid": "11111111-aaaa", "urgency": 4.5}, {"uuid": "22222222-bbbb", "urgency": 9.1}]"#,
    );
    let config = Config::default();

    let mut db = Database::open(TaskTool::from_config(&runner, &config), &config).unwrap();
    let tasks = db.get_tasks().unwrap();

    assert_eq!(tasks.len(), 3);
    let report = tasks.get("11111111-aaaa").unwrap();
    assert_eq!(report.tags(), ["office", "q1"]);
    assert_eq!(report.urgency(), Some(4.5));
    assert!(!report.is_active());

    let reading = tasks.get("22222222-bbbb").unwrap();
    assert_eq!(reading.text(DESCRIPTION), Some("read http://example.com"));
    assert!(reading.is_active());

    let old = tasks.get("33333333-cccc").unwrap();
    assert_eq!(old.urgency(), None);
    assert_eq!(tasks.warnings(), [Warning::NotExported("33333333-cccc".to_string())]);

    assert_eq!(db.projects().unwrap(), vec!["work".to_string(), "home".to_string()]);
    runner.verify();
}

#[test]
fn test_notes_follow_task_lifecycle() {
    let dir = data_folder();
    let runner = MockCommandRunner::new();
    let config = Config { data_location: Some(dir.path().to_path_buf()), ..Config::default() };
    let mut db = Database::open(TaskTool::from_config(&runner, &config), &config).unwrap();

    let mut properties = Properties::new();
    properties.insert(NOTE, "call the client first");
    db.update_task("11111111-aaaa", &properties).unwrap();

    let note_path = dir.path().join("notes/11111111-aaaa");
    assert_eq!(fs::read_to_string(&note_path).unwrap(), "call the client first");

    let mut properties = Properties::new();
    properties.insert(NOTE, "   ");
    db.update_task("11111111-aaaa", &properties).unwrap();
    assert!(!note_path.exists());
    runner.verify();
}

#[test]
fn test_add_then_refresh() {
    let dir = data_folder();
    let mut runner = MockCommandRunner::new();
    runner.expect_stdout("task", &["add", "home", "buy milk"], "Created task 42.\n");
    runner.expect_stdout("task", &["42", "uuid"], "44444444-dddd\n");
    runner.expect_stdout("task", EXPORT_ARGS, "[]");
    let config = Config { data_location: Some(dir.path().to_path_buf()), ..Config::default() };
    let mut db = Database::open(TaskTool::from_config(&runner, &config), &config).unwrap();

    let mut properties = Properties::new();
    properties.insert(DESCRIPTION, "buy milk");
    properties.insert(TAGS, Value::Tags(vec!["home".to_string()]));
    let uuid = db.add_task(&properties).unwrap();
    assert_eq!(uuid.as_deref(), Some("44444444-dddd"));

    fs::write(
        dir.path().join("pending.data"),
        format!("{PENDING}[description:\"buy milk\" tags:\"home\" uuid:\"44444444-dddd\"]\n"),
    )
    .unwrap();
    assert_eq!(db.refresh().unwrap().len(), 4);
    runner.verify();
}

#[test]
fn test_malformed_pending_names_file() {
    let dir = data_folder();
    fs::write(dir.path().join("pending.data"), "[uuid:\"broken\"\n").unwrap();
    let runner = MockCommandRunner::new();
    let config = Config { data_location: Some(dir.path().to_path_buf()), ..Config::default() };
    let mut db = Database::open(TaskTool::from_config(&runner, &config), &config).unwrap();

    let err = db.get_tasks().unwrap_err();
    assert!(matches!(err, Error::Format { .. }));
    assert!(err.to_string().contains("pending.data"));
}

#[test]
fn test_missing_data_location_is_configuration_error() {
    let mut runner = MockCommandRunner::new();
    runner.expect_stdout("task", &["_show"], "color=on\n");
    let config = Config::default();

    let result = Database::open(TaskTool::from_config(&runner, &config), &config);
    assert!(matches!(result, Err(Error::Configuration(_))));
}
