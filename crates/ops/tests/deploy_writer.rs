//! Integration tests for writing deployment descriptors to disk.

use databridge_core::deploy::{
    DeploymentConfig, AMPLIFY_FILE, CLOUDFORMATION_FILE, DEPLOY_SCRIPT_FILE, DOCKERFILE,
    PLATFORM_CONFIG_FILE, TERRAFORM_FILE,
};
use databridge_ops::deploy::write_descriptors;

#[test]
fn writes_every_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("deploy");

    let written = write_descriptors(&DeploymentConfig::default(), &out).unwrap();
    assert_eq!(written.len(), 6);

    for name in [
        TERRAFORM_FILE,
        CLOUDFORMATION_FILE,
        AMPLIFY_FILE,
        PLATFORM_CONFIG_FILE,
        DOCKERFILE,
        DEPLOY_SCRIPT_FILE,
    ] {
        let path = out.join(name);
        assert!(path.is_file(), "{name} was not written");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn json_descriptors_are_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    write_descriptors(&DeploymentConfig::default(), dir.path()).unwrap();

    for name in [TERRAFORM_FILE, CLOUDFORMATION_FILE, AMPLIFY_FILE] {
        let raw = std::fs::read_to_string(dir.path().join(name)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_object(), "{name} should be a JSON object");
    }
}

#[cfg(unix)]
#[test]
fn deploy_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    write_descriptors(&DeploymentConfig::default(), dir.path()).unwrap();

    let mode = std::fs::metadata(dir.path().join(DEPLOY_SCRIPT_FILE))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);

    let mode = std::fs::metadata(dir.path().join(DOCKERFILE))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0);
}

#[test]
fn rewriting_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(DOCKERFILE), "stale").unwrap();

    write_descriptors(&DeploymentConfig::default(), dir.path()).unwrap();
    let contents = std::fs::read_to_string(dir.path().join(DOCKERFILE)).unwrap();
    assert_ne!(contents, "stale");
}
