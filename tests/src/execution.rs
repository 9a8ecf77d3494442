#![cfg(test)]
use std::path::{Path, PathBuf};

use qcmd_common::DiskFormat;
use qcmd_core::image::{ImageConfig, ImageError, create_image};
use qcmd_core::{Compiler, ExecuteError};
use qcmd_devices::machine::{Memory, Smp, switch};
use qcmd_devices::monitor::{Monitor, MonitorMode};

use crate::support::{MockLauncher, argv};

/*************************************************************
                    Hypervisor execution
**************************************************************/

#[tokio::test]
async fn launcher_receives_the_rendered_vector() {
    let launcher = MockLauncher::exiting_with(0);
    let mut compiler = Compiler::new();
    compiler.add(Memory::new("3G")).add(Smp::new(2)).add(switch("nographic"));

    let outcome = compiler
        .execute(&launcher, Path::new("qemu-system-x86_64"))
        .await
        .unwrap();

    assert!(outcome.success());
    assert_eq!(
        launcher.calls(),
        vec![(
            PathBuf::from("qemu-system-x86_64"),
            argv(&["-m", "3G", "-smp", "2", "-nographic"])
        )]
    );
}

#[tokio::test]
async fn exit_code_is_passed_through() {
    let launcher = MockLauncher::exiting_with(3);
    let mut compiler = Compiler::new();
    compiler.add(Memory::new("1G"));

    let outcome = compiler.execute(&launcher, Path::new("qemu")).await.unwrap();
    assert_eq!(outcome.code, Some(3));
    assert!(!outcome.success());
}

#[tokio::test]
async fn invalid_command_never_reaches_the_launcher() {
    let launcher = MockLauncher::exiting_with(0);
    let mut compiler = Compiler::new();
    compiler.add(Monitor::new("c0").mode(MonitorMode::Readline).pretty(true));

    let result = compiler.execute(&launcher, Path::new("qemu")).await;
    assert!(matches!(result, Err(ExecuteError::Compile(_))));
    assert!(launcher.calls().is_empty());
}

/*************************************************************
                       Image tool
**************************************************************/

#[tokio::test]
async fn image_creation_invokes_the_tool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("root.qcow2");
    let launcher = MockLauncher::exiting_with(0);

    let config = ImageConfig::new(&path, "20G").format(DiskFormat::Qcow2);
    create_image(&config, &launcher, Path::new("qemu-img")).await.unwrap();

    let calls = launcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, PathBuf::from("qemu-img"));
    assert_eq!(
        calls[0].1,
        vec![
            "create".to_string(),
            "-f".to_string(),
            "qcow2".to_string(),
            path.to_string_lossy().into_owned(),
            "20G".to_string(),
        ]
    );
}

#[tokio::test]
async fn existing_image_is_kept_unless_overwritten() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let launcher = MockLauncher::exiting_with(0);

    let config = ImageConfig::new(file.path(), "1G");
    assert!(matches!(
        create_image(&config, &launcher, Path::new("qemu-img")).await,
        Err(ImageError::Exists(_))
    ));
    assert!(launcher.calls().is_empty());

    let config = config.overwrite(true);
    create_image(&config, &launcher, Path::new("qemu-img")).await.unwrap();
    assert_eq!(launcher.calls().len(), 1);
}

#[tokio::test]
async fn failing_tool_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = MockLauncher::exiting_with(1);

    let config = ImageConfig::new(dir.path().join("x.raw"), "1M").format(DiskFormat::Raw);
    assert!(matches!(
        create_image(&config, &launcher, Path::new("qemu-img")).await,
        Err(ImageError::Failed { code: Some(1), .. })
    ));
}
