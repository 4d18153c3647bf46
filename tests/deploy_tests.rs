use std::fs;
use std::path::Path;
use tempfile::TempDir;
use web_deployer::fs::DiskFs;
use web_deployer::validation::verify_deploy;
use web_deployer::{BuildConfig, BuildPipeline, Copier, DeployError, OverwritePolicy};

/// Create a small static site under `root/web/dev`
fn create_test_site(root: &Path) {
    let dev = root.join("web/dev");
    fs::create_dir_all(dev.join("js")).unwrap();
    fs::create_dir_all(dev.join("test")).unwrap();
    fs::create_dir_all(dev.join("css/fonts")).unwrap();
    fs::create_dir_all(dev.join("img/empty")).unwrap();

    fs::write(dev.join("index.html"), "<html><head></head></html>").unwrap();
    fs::write(dev.join("test.html"), "<html>tests</html>").unwrap();
    fs::write(dev.join("about.html"), "<html>about</html>").unwrap();
    fs::write(dev.join("js/main.js"), "var synth = new Synth();").unwrap();
    fs::write(dev.join("js/synth.js"), "function Synth() {}").unwrap();
    fs::write(dev.join("test/test.js"), "describe('synth');").unwrap();
    fs::write(dev.join("css/site.css"), "body { margin: 0 }").unwrap();
    fs::write(dev.join("css/fonts/font.woff"), [0u8, 1, 2, 3, 255]).unwrap();
}

fn config_for(root: &Path) -> BuildConfig {
    BuildConfig::new(root.join("web/dev"), root.join("web/deploy"))
}

#[test]
fn test_default_excludes_deploy() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let pipeline = BuildPipeline::new(config_for(root), DiskFs::new());
    let report = pipeline.run().expect("Deploy failed");

    let deploy = root.join("web/deploy");
    assert!(deploy.join("about.html").exists());
    assert!(deploy.join("css/site.css").exists());
    assert_eq!(
        fs::read(deploy.join("css/fonts/font.woff")).unwrap(),
        vec![0u8, 1, 2, 3, 255]
    );
    assert!(deploy.join("img/empty").is_dir());

    assert!(!deploy.join("index.html").exists());
    assert!(!deploy.join("test.html").exists());
    assert!(!deploy.join("js").exists());
    assert!(!deploy.join("test").exists());

    assert_eq!(report.copy.files_copied, 3);
    assert_eq!(report.verified, Some(3));
}

#[test]
fn test_empty_exclusions_mirror_tree() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let config = config_for(root).with_excludes(Vec::new());
    let report = BuildPipeline::new(config, DiskFs::new())
        .run()
        .expect("Deploy failed");

    assert_eq!(report.copy.files_copied, 8);
    for relative in [
        "index.html",
        "test.html",
        "js/main.js",
        "js/synth.js",
        "test/test.js",
        "css/fonts/font.woff",
    ] {
        assert_eq!(
            fs::read(root.join("web/dev").join(relative)).unwrap(),
            fs::read(root.join("web/deploy").join(relative)).unwrap(),
            "mismatch for {}",
            relative
        );
    }
}

#[test]
fn test_rerun_produces_same_tree() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let pipeline = BuildPipeline::new(config_for(root), DiskFs::new());
    pipeline.run().expect("First deploy failed");
    let second = pipeline.run().expect("Second deploy failed");

    assert_eq!(second.copy.files_copied, 3);
    assert_eq!(second.copy.dirs_created, 0);
    assert_eq!(second.verified, Some(3));
}

#[test]
fn test_skip_existing_keeps_output_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);
    fs::create_dir_all(root.join("web/deploy")).unwrap();
    fs::write(root.join("web/deploy/about.html"), "hand edited").unwrap();

    let config = config_for(root).with_overwrite(OverwritePolicy::Skip);
    let report = BuildPipeline::new(config, DiskFs::new())
        .run()
        .expect("Deploy failed");

    assert_eq!(report.copy.skipped_existing, 1);
    assert_eq!(report.verified, None);
    assert_eq!(
        fs::read_to_string(root.join("web/deploy/about.html")).unwrap(),
        "hand edited"
    );
}

#[test]
fn test_dry_run_leaves_output_untouched() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let config = config_for(root).with_dry_run(true);
    let report = BuildPipeline::new(config, DiskFs::new())
        .run()
        .expect("Dry run failed");

    assert_eq!(report.copy.files_copied, 3);
    assert!(!root.join("web/deploy").exists());
}

#[test]
fn test_missing_input_root_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let err = BuildPipeline::new(config_for(temp_dir.path()), DiskFs::new())
        .run()
        .unwrap_err();

    let deploy_err = err.downcast_ref::<DeployError>().expect("DeployError");
    assert!(matches!(deploy_err, DeployError::Config { .. }));
    assert_eq!(deploy_err.exit_code(), 2);
}

#[test]
fn test_verify_detects_changed_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let disk = DiskFs::new();
    let copier = Copier::new(
        &disk,
        root.join("web/dev"),
        root.join("web/deploy"),
        &["js", "test"],
    )
    .unwrap();
    copier.copy().unwrap();
    fs::write(root.join("web/deploy/css/site.css"), "body { margin: 1px }").unwrap();

    let err = verify_deploy(&copier).unwrap_err();
    assert!(matches!(err, DeployError::Mismatch { .. }));
}

#[test]
fn test_config_file_round_trip_through_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let config_path = root.join("deploy.json");
    let json = format!(
        r#"{{ "input_path": {:?}, "output_path": {:?}, "exclude": ["js", "test", "css/fonts"] }}"#,
        root.join("web/dev"),
        root.join("public")
    );
    fs::write(&config_path, json).unwrap();

    let config = BuildConfig::load(&config_path).expect("Failed to load config");
    BuildPipeline::new(config, DiskFs::new())
        .run()
        .expect("Deploy failed");

    assert!(root.join("public/index.html").exists());
    assert!(root.join("public/css/site.css").exists());
    assert!(!root.join("public/css/fonts").exists());
}

#[test]
fn test_output_inside_input_through_dotdot_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);

    let config = BuildConfig::new(root.join("web/../web/dev"), root.join("web/dev/out"))
        .with_excludes(Vec::new());
    let err = BuildPipeline::new(config, DiskFs::new())
        .run()
        .unwrap_err();

    let deploy_err = err.downcast_ref::<DeployError>().expect("DeployError");
    assert!(matches!(deploy_err, DeployError::Config { .. }));
    assert!(!root.join("web/dev/out").exists());
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_is_not_followed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_test_site(root);
    fs::create_dir_all(root.join("web/dev/a")).unwrap();
    fs::write(root.join("web/dev/a/page.html"), "<p>page</p>").unwrap();
    std::os::unix::fs::symlink("..", root.join("web/dev/a/loop")).unwrap();

    let config = config_for(root).with_excludes(Vec::new());
    let report = BuildPipeline::new(config, DiskFs::new())
        .run()
        .expect("Deploy failed");

    let deploy = root.join("web/deploy");
    assert_eq!(report.copy.symlinks_skipped, 1);
    assert_eq!(report.copy.files_copied, 9);
    assert_eq!(report.verified, Some(9));
    assert!(deploy.join("a/page.html").exists());
    assert!(fs::symlink_metadata(deploy.join("a/loop")).is_err());
}
