mod common;

use common::TestEnv;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn contracts_check() {
    let env = TestEnv::new();
    env.write_key("ana.pub", 3, "Ana Lima <ana@example.com>");
    env.commit("chore: initial commit");
    env.commit("Broken subject.");
    env.signed_commit(3, "feat(core): signed change");
    env.write_config(&format!(
        "[rules]\nenabled = [\"signature\", \"signed-identity\", \"branch-ahead\"]\n[signature]\nkey_directory = \"{}\"\n",
        env.key_dir().display()
    ));

    let (report, code) = env.run_json(&["validate", "--count", "3"]);
    assert_eq!(code, 1);
    assert_eq!(report["ok"], false);
    validate("validation-report.schema.json", &report["data"]);

    let (verified, code) = env.run_json(&["verify"]);
    assert_eq!(code, 0);
    validate("verification.schema.json", &verified["data"]);

    let (unsigned, _) = env.run_json(&["verify", "--ref", "HEAD~1"]);
    assert_eq!(unsigned["ok"], false);
    validate("verification.schema.json", &unsigned["data"]);

    let (rules, _) = env.run_json(&["rules"]);
    assert_eq!(rules["ok"], true);
    validate("rules.schema.json", &rules["data"]);

    let (keys, _) = env.run_json(&["keys", "list"]);
    assert_eq!(keys["ok"], true);
    validate("keys.schema.json", &keys["data"]);
}
