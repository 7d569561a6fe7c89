use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const DECLS: &str = r#"{"name":"pj_status_t","declaration":{"decl":"typedef","name":"pj_status_t","ty":{"named":"int"}},"source_location":{"file":"pj/types.h","line":1,"column":1}}
{"name":"pjsip_uri","declaration":{"decl":"aggregate","keyword":"struct","name":"pjsip_uri","fields":[{"name":"vptr","ty":{"pointer":{"named":"pjsip_uri_vptr"}}}]}}
{"name":"pjsua_callback","declaration":{"decl":"aggregate","keyword":"struct","name":"pjsua_callback","fields":[{"name":"on_call_state","ty":{"pointer":{"function":{"ret":{"named":"void"},"params":[{"name":"call_id","ty":{"named":"int"}}]}}}},{"name":"on_call_redirected","ty":{"pointer":{"function":{"ret":{"named":"pjsip_redirect_op"},"params":[{"ty":{"named":"int"}},{"ty":{"pointer":{"const":{"named":"pjsip_uri"}}}}]}}}}]}}
{"name":"pjsua_config","declaration":{"decl":"aggregate","keyword":"struct","name":"pjsua_config","fields":[{"name":"cb","ty":{"tagged":{"kind":"struct","name":"pjsua_callback"}}},{"name":"timer","ty":{"aggregate":{"keyword":"struct","fields":[{"name":"ms","ty":{"named":"long"}}]}}}]}}
{"name":"pjsua_init","declaration":{"decl":"function","name":"pjsua_init","sig":{"ret":{"named":"pj_status_t"},"params":[{"name":"cfg","ty":{"pointer":{"const":{"named":"pjsua_config"}}}}]}}}
{"name":"pjsua_vid_preview_start","declaration":{"decl":"function","name":"pjsua_vid_preview_start","sig":{"ret":{"named":"pj_status_t"}}}}
"#;

fn declsift() -> Command {
    Command::new(cargo_bin("declsift"))
}

fn fixture() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("pjsua.jsonl");
    fs::write(&input, DECLS).unwrap();
    (tmp, input)
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn test_closure_prints_dependency_order() {
    let (_tmp, input) = fixture();
    let stdout = stdout_of(declsift().arg("closure").arg("--input").arg(&input));
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        ["pjsip_uri", "pjsua_callback", "pjsua_config", "pj_status_t", "pjsua_init"]
    );
}

#[test]
fn test_generate_writes_interface_and_callbacks() {
    let (tmp, input) = fixture();
    let output = tmp.path().join("out/pjsua.i");
    let callbacks = tmp.path().join("jni");

    declsift()
        .arg("generate")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--callbacks-dir")
        .arg(&callbacks)
        .assert()
        .success();

    let interface = read(&output);
    assert!(interface.starts_with(
        "%nodefaultctor pjsip_uri; %nodefaultdtor pjsip_uri;\nstruct pjsip_uri {};\n"
    ));
    assert!(interface.contains("%apply NESTED_INNER { pjsua_config_timer timer };"));
    assert!(!interface.contains("pjsua_vid_preview_start"));

    let header = read(&callbacks.join("callbacks.h"));
    assert!(header.contains("  virtual void on_call_state(int call_id) {}\n"));
    assert!(header.contains(
        "  virtual pjsip_redirect_op on_call_redirected(int p0, const pjsip_uri *p1) { return PJSIP_REDIRECT_STOP; }\n"
    ));
    let source = read(&callbacks.join("callbacks.cpp"));
    assert!(source.contains("static void on_call_state(int call_id) { cb->on_call_state(call_id); }"));
    assert!(source.contains("struct pjsua_callback native_callbacks = {\n  &on_call_state,\n  &on_call_redirected\n};"));
}

#[test]
fn test_generate_with_config_to_stdout() {
    let (tmp, input) = fixture();
    let config = tmp.path().join("rules.toml");
    fs::write(
        &config,
        "base_prefix = \"pj\"\nmodule_prefix = \"pjsua_\"\nalways_exported = [\"pjsua_vid_preview_start\"]\n",
    )
    .unwrap();
    let header_template = tmp.path().join("never-read.h");

    let stdout = stdout_of(
        declsift()
            .current_dir(tmp.path())
            .arg("generate")
            .arg("--input")
            .arg(&input)
            .arg("--config")
            .arg(&config)
            .arg("--header-template")
            .arg(&header_template),
    );

    // without callback rules the struct is emitted as is and no adapter is written
    assert!(stdout.contains("struct pjsua_callback {\n"));
    assert!(stdout.contains("pj_status_t pjsua_vid_preview_start(void);\n"));
    // pjsip_uri has a full definition and is not forced opaque here
    assert!(stdout.contains("struct pjsip_uri {\n  pjsip_uri_vptr *vptr;\n};\n"));
    assert!(!tmp.path().join("callbacks.h").exists());
}

#[test]
fn test_missing_input_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let output = declsift()
        .arg("closure")
        .arg("--input")
        .arg(tmp.path().join("missing.jsonl"))
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.starts_with("error: failed to read"));
}
