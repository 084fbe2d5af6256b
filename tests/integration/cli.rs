mod common;
use common::*;

use rebindc::model::ast::{MethodDecl, Program, TypeDecl};

const DENY_UNSPECIFIED: &str = "[validation]\nunspecified = \"deny\"\n";

fn too_much_type_params() -> Program {
    Program::new(vec![unit(
        TypeDecl::class("test.TooMuchTypeParams").method(
            6,
            MethodDecl::new("foo")
                .annotated(rebind())
                .param(type_param("t0"))
                .param(type_param("t1")),
        ),
        4,
    )])
}

fn bare_rebind() -> Program {
    Program::new(vec![unit(
        TypeDecl::class("test.Bare").method(4, MethodDecl::new("foo").annotated(rebind())),
        3,
    )])
}

#[test]
fn clean_model_exits_zero() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &bare_rebind());
    let output = run_in(dir.path(), &["check", "model.json"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stderr_of(&output).contains("1 unit(s) checked, no errors"));
}

#[test]
fn failing_unit_exits_one_with_report() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &too_much_type_params());
    let output = run_in(dir.path(), &["check", "model.json"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Errors in 'test/TooMuchTypeParams.java'"), "stderr: {stderr}");
    assert!(stderr.contains("Line 6: Too much type parameters"), "stderr: {stderr}");
    assert!(stderr.contains("1 of 1 unit(s) failed"));
}

#[test]
fn serial_flag_gives_same_report() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &too_much_type_params());
    let parallel = run_in(dir.path(), &["check", "model.json"]);
    let serial = run_in(dir.path(), &["check", "--serial", "model.json"]);
    assert_eq!(parallel.status.code(), serial.status.code());
    assert_eq!(stderr_of(&parallel), stderr_of(&serial));
}

#[test]
fn malformed_model_exits_two() {
    let dir = workspace();
    std::fs::write(dir.path().join("model.json"), "{ \"units\": [ }").unwrap();
    let output = run_in(dir.path(), &["check", "model.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("error: Model error"));
}

#[test]
fn missing_model_exits_two() {
    let dir = workspace();
    let output = run_in(dir.path(), &["check", "nope.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("I/O error on 'nope.json'"));
}

#[test]
fn discovered_config_applies() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &bare_rebind());
    std::fs::write(dir.path().join("rebind.toml"), DENY_UNSPECIFIED).unwrap();
    let output = run_in(dir.path(), &["check", "model.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Line 4: Rebind annotation must define a type"));
}

#[test]
fn explicit_config_flag() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &bare_rebind());
    std::fs::create_dir(dir.path().join("conf")).unwrap();
    std::fs::write(dir.path().join("conf/strict.toml"), DENY_UNSPECIFIED).unwrap();
    let output = run_in(dir.path(), &["check", "--config", "conf/strict.toml", "model.json"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn bad_config_exits_two() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &bare_rebind());
    let config = "[validation]\nunspecified = \"sometimes\"\n";
    std::fs::write(dir.path().join("rebind.toml"), config).unwrap();
    let output = run_in(dir.path(), &["check", "model.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Config error in"));
}

#[test]
fn json_diagnostics_on_stdout() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &too_much_type_params());
    let output = run_in(dir.path(), &["check", "--json", "model.json"]);
    assert_eq!(output.status.code(), Some(1));
    let diags: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let diags = diags.as_array().unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0]["unit"], "test/TooMuchTypeParams.java");
    assert_eq!(diags[0]["span"]["line"], 6);
    assert_eq!(diags[0]["severity"], "error");
}

#[test]
fn source_snippets_unless_plain() {
    let dir = workspace();
    let source = concat!(
        "package test;\n",
        "import com.google.gwt.core.shared.Rebind;\n",
        "import com.google.gwt.core.shared.Rebind.Type;\n",
        "public class TooMuchTypeParams {\n",
        "  @Rebind\n",
        "  public void foo(@Type final Class<?> t0, @Type final Class<?> t1) {}\n",
        "}\n",
    );
    let mut program = too_much_type_params();
    program.units[0].source = Some(source.to_string());
    write_model(dir.path(), "model.json", &program);

    let fancy = stderr_of(&run_in(dir.path(), &["check", "model.json"]));
    assert!(fancy.contains("Errors in 'test/TooMuchTypeParams.java'"));
    assert!(fancy.contains("public void foo(@Type final Class<?> t0"), "stderr: {fancy}");
    assert!(fancy.contains("Too much type parameters"));

    let plain = stderr_of(&run_in(dir.path(), &["check", "--plain", "model.json"]));
    assert!(plain.contains("  Line 6: Too much type parameters"), "stderr: {plain}");
}

#[test]
fn contracts_command_prints_json() {
    let dir = workspace();
    let program = Program::new(vec![unit(
        TypeDecl::interface("test.Api").method(
            4,
            MethodDecl::new("make")
                .annotated(rebind())
                .param(type_param("t"))
                .param(rebind_param("seed", "int")),
        ),
        3,
    )]);
    write_model(dir.path(), "model.json", &program);
    let output = run_in(dir.path(), &["contracts", "model.json"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let contracts: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let contract = &contracts[0];
    assert_eq!(contract["owner"], "test.Api");
    assert_eq!(contract["type_source"]["kind"], "parameter_supplied");
    assert_eq!(contract["type_source"]["index"], 0);
    assert_eq!(contract["param_roles"], serde_json::json!(["type_carrier", "rebind_param"]));
    assert_eq!(contract["location"]["file"], "test/Api.java");
}

#[test]
fn logging_goes_to_stderr_only() {
    let dir = workspace();
    write_model(dir.path(), "model.json", &bare_rebind());
    let output = rebindc()
        .current_dir(dir.path())
        .env("REBINDC_LOG", "debug")
        .env("REBINDC_LOG_FORMAT", "json")
        .args(["contracts", "model.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert!(stdout.is_array());
    assert!(stderr_of(&output).contains("loaded configuration"));
}
