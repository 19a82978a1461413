//! Unit tests for pipeline execution
//!
//! Every test parses real pipeline source and runs it against the mock
//! adapter, then checks both the report and the adapter call log.

use std::sync::Arc;
use wrci_parser::PipelineParser;
use wrci_runtime::*;

fn run(source: &str, adapter: &Arc<MockAdapter>) -> Result<RunReport> {
    let program = PipelineParser::parse(source).expect("pipeline should parse");
    Executor::new(adapter.clone()).execute(&program)
}

fn create_names(adapter: &MockAdapter) -> Vec<String> {
    adapter
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            AdapterCall::Create { name, .. } => Some(name),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Basic Execution Tests
// =============================================================================

#[test]
fn test_message_step_and_if_else() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        r#"
PIPELINE(name="p", helper_image="img")
MSG("hi $LAST_RC")
STEP a.sh
IF $LAST_RC == "0":
MSG("ok")
ELSE:
MSG("fail")
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.messages, vec!["hi 0", "ok"]);
    assert_eq!(report.last_rc, 0);
    assert_eq!(adapter.executed_commands(), vec!["/pipeline/p/a.sh"]);
    assert_eq!(adapter.create_count(), 1);
    assert_eq!(adapter.destroy_count(), 1);
}

#[test]
fn test_failing_step_takes_else_branch() {
    let adapter = Arc::new(MockAdapter::new().with_exit_code("/pipeline/p/a.sh", 2));
    let report = run(
        r#"
PIPELINE(name="p", helper_image="img")
STEP a.sh
IF $LAST_RC == "0":
MSG("ok")
ELSE:
MSG("failed with $LAST_RC")
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(report.messages, vec!["failed with 2"]);
    assert_eq!(report.last_rc, 2);
    assert_eq!(report.variables.get("LAST_RC"), Some("2"));
    assert_eq!(report.failed_steps().count(), 1);
}

#[test]
fn test_start_command_and_mounts_reach_create() {
    let adapter = Arc::new(MockAdapter::new());
    let program = PipelineParser::parse(
        "PIPELINE(name=\"p\", helper_image=\"img\", start_command=\"sleep 600\")\nEND",
    )
    .unwrap();
    let mounts = vec![MountSpec::new("/work/scripts", "/pipeline")];
    Executor::new(adapter.clone())
        .with_options(ExecutorOptions::default().with_mounts(mounts.clone()))
        .execute(&program)
        .unwrap();

    assert_eq!(
        adapter.calls()[0],
        AdapterCall::Create {
            name: "p".to_string(),
            image: "img".to_string(),
            start_command: Some("sleep 600".to_string()),
            mounts,
        }
    );
}

#[test]
fn test_env_bindings_are_sorted_variables() {
    let adapter = Arc::new(MockAdapter::new());
    run(
        r#"
PIPELINE(name="p", helper_image="img")
$ZONE = "eu"
STEP a.sh
END
"#,
        &adapter,
    )
    .unwrap();

    let env = adapter
        .calls()
        .into_iter()
        .find_map(|call| match call {
            AdapterCall::Exec { env, .. } => Some(env),
            _ => None,
        })
        .unwrap();
    let pairs: Vec<(&str, &str)> = env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            ("LAST_RC", "0"),
            ("ZONE", "eu"),
            ("helper_image", "img"),
            ("name", "p"),
        ]
    );
}

// =============================================================================
// Container Resolution Tests
// =============================================================================

#[test]
fn test_child_without_image_reuses_parent_container() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        r#"
PIPELINE(name="outer", helper_image="img")
PIPELINE(name="inner")
STEP b.sh
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(adapter.create_count(), 1);
    assert_eq!(adapter.executed_commands(), vec!["/pipeline/inner/b.sh"]);
    assert_eq!(report.steps[0].container, "mock-outer-1");
    assert_eq!(report.steps[0].pipeline.as_deref(), Some("inner"));
}

#[test]
fn test_nameless_child_uses_root_mount_path() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        r#"
PIPELINE(name="outer", helper_image="img")
PIPELINE()
STEP cleanup.sh
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(adapter.executed_commands(), vec!["/pipeline/cleanup.sh"]);
    assert_eq!(report.steps[0].pipeline, None);
}

#[test]
fn test_named_pipeline_reuses_registered_container() {
    let adapter = Arc::new(MockAdapter::new());
    run(
        r#"
PIPELINE(name="root", helper_image="img")
PIPELINE(name="build", helper_image="rust:1.80")
STEP first.sh
END
PIPELINE(name="build", helper_image="rust:1.80")
STEP second.sh
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(create_names(&adapter), vec!["root", "build"]);
    let build_container = adapter
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            AdapterCall::Exec { container, .. } => Some(container),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(build_container, vec!["mock-build-2", "mock-build-2"]);
    assert_eq!(adapter.destroy_count(), 2);
}

#[test]
fn test_child_with_own_image_gets_own_container() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        r#"
PIPELINE(name="root", helper_image="img")
STEP a.sh
PIPELINE(name="lint", helper_image="alpine")
STEP b.sh
END
STEP c.sh
END
"#,
        &adapter,
    )
    .unwrap();

    let containers: Vec<&str> = report.steps.iter().map(|s| s.container.as_str()).collect();
    assert_eq!(containers, vec!["mock-root-1", "mock-lint-2", "mock-root-1"]);
    assert_eq!(report.containers, vec!["mock-root-1", "mock-lint-2"]);
}

#[test]
fn test_root_without_image_fails_before_any_adapter_call() {
    let adapter = Arc::new(MockAdapter::new());
    let err = run("PIPELINE(name=\"p\")\nSTEP a.sh\nEND", &adapter).unwrap_err();

    assert!(matches!(err, RuntimeError::Configuration(_)));
    assert!(adapter.calls().is_empty());
}

#[test]
fn test_image_without_name_is_configuration_error() {
    let adapter = Arc::new(MockAdapter::new());
    let err = run("PIPELINE(helper_image=\"img\")\nEND", &adapter).unwrap_err();

    assert!(matches!(err, RuntimeError::Configuration(_)));
    assert_eq!(adapter.create_count(), 0);
}

#[test]
fn test_configuration_error_in_child_stops_running_containers() {
    let adapter = Arc::new(MockAdapter::new());
    let err = run(
        r#"
PIPELINE(name="r", helper_image="img")
STEP before.sh
PIPELINE(helper_image="x")
STEP never.sh
END
END
"#,
        &adapter,
    )
    .unwrap_err();

    assert!(matches!(err, RuntimeError::Configuration(_)));
    assert_eq!(create_names(&adapter), vec!["r"]);
    assert_eq!(adapter.executed_commands(), vec!["/pipeline/r/before.sh"]);
    assert_eq!(adapter.destroy_count(), 1);
    assert_eq!(
        adapter.calls().last(),
        Some(&AdapterCall::Destroy {
            container: "mock-r-1".to_string()
        })
    );
}

// =============================================================================
// Variable Tests
// =============================================================================

#[test]
fn test_assignment_in_child_is_visible_to_parent() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        r#"
PIPELINE(name="root", helper_image="img")
PIPELINE(name="child")
$STAGE = "deploy"
END
MSG("stage=$STAGE")
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(report.messages, vec!["stage=deploy"]);
    assert_eq!(report.variables.get("STAGE"), Some("deploy"));
}

#[test]
fn test_absent_variable_comparisons() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        r#"
PIPELINE(name="p", helper_image="img")
IF $UNSET == "":
MSG("eq taken")
ELSE:
MSG("eq not taken")
END
IF $UNSET != "x":
MSG("ne taken")
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(report.messages, vec!["eq not taken", "ne taken"]);
}

#[test]
fn test_unmatched_placeholder_is_kept() {
    let adapter = Arc::new(MockAdapter::new());
    let report = run(
        "PIPELINE(name=\"p\", helper_image=\"img\")\nMSG(\"$name uses $NOPE\")\nEND",
        &adapter,
    )
    .unwrap();

    assert_eq!(report.messages, vec!["p uses $NOPE"]);
}

// =============================================================================
// EXIT Tests
// =============================================================================

#[test]
fn test_exit_from_nested_else_stops_run_and_tears_down() {
    let adapter = Arc::new(MockAdapter::new().with_exit_code("/pipeline/inner/check.sh", 1));
    let report = run(
        r#"
PIPELINE(name="outer", helper_image="img")
PIPELINE(name="inner", helper_image="alpine")
STEP check.sh
IF $LAST_RC == "0":
MSG("passed")
ELSE:
MSG("bailing out")
EXIT
END
STEP unreachable.sh
END
STEP after.sh
END
"#,
        &adapter,
    )
    .unwrap();

    assert!(report.exited_early());
    assert_eq!(report.messages, vec!["bailing out"]);
    assert_eq!(adapter.executed_commands(), vec!["/pipeline/inner/check.sh"]);
    assert_eq!(adapter.destroy_count(), 2);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_create_failure_cleans_up_earlier_containers() {
    let adapter = Arc::new(MockAdapter::new().fail_create("broken"));
    let err = run(
        r#"
PIPELINE(name="root", helper_image="img")
PIPELINE(name="broken", helper_image="nope:latest")
STEP a.sh
END
END
"#,
        &adapter,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Adapter {
            operation: "create",
            ..
        }
    ));
    assert_eq!(adapter.exec_count(), 0);
    assert_eq!(
        adapter.calls().last(),
        Some(&AdapterCall::Destroy {
            container: "mock-root-1".to_string()
        })
    );
}

#[test]
fn test_exec_failure_aborts_and_cleans_up() {
    let adapter = Arc::new(MockAdapter::new().fail_exec("/pipeline/p/a.sh"));
    let err = run(
        "PIPELINE(name=\"p\", helper_image=\"img\")\nSTEP a.sh\nSTEP b.sh\nEND",
        &adapter,
    )
    .unwrap_err();

    assert!(matches!(err, RuntimeError::Adapter { operation: "exec", .. }));
    assert_eq!(adapter.exec_count(), 1);
    assert_eq!(adapter.destroy_count(), 1);
}

#[test]
fn test_destroy_failure_does_not_fail_run() {
    let adapter = Arc::new(MockAdapter::new().fail_destroy("inner"));
    let report = run(
        r#"
PIPELINE(name="outer", helper_image="img")
PIPELINE(name="inner", helper_image="alpine")
END
END
"#,
        &adapter,
    )
    .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(adapter.destroy_count(), 2);
}
