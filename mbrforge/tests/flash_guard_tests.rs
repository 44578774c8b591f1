use mbrforge::errors::ForgeError;
use mbrforge::flash::{self, FlashRequest};
use mbrforge_hal::{DeviceRecord, FakeCatalog, HalError};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::tempdir;

const STICK: &str = "usb-Kingston_DataTraveler_3.0_60A44C413BBF-0:0";
const FIXED_DISK: &str = "scsi-35000c500b4ac4f1b";

fn record(path: &Path, class: &str) -> DeviceRecord {
    DeviceRecord {
        physical_path: path.to_path_buf(),
        class_identifier: class.to_string(),
    }
}

fn request(source: &Path, selector: &str) -> FlashRequest {
    FlashRequest {
        source: source.to_path_buf(),
        selector: selector.to_string(),
    }
}

#[test]
fn flash_writes_the_image_to_the_resolved_node() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0u8; 1024]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"bootable payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&source_path, STICK);

    flash::flash(&catalog, false, |_| Ok(req), |_| Ok(true)).unwrap();

    let contents = fs::read(&target_path).unwrap();
    assert_eq!(&contents[..16], b"bootable payload");
    assert_eq!(contents.len(), 1024);
}

#[test]
fn the_catalog_is_consulted_exactly_once() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0u8; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&source_path, STICK);

    flash::flash(&catalog, false, |_| Ok(req), |_| Ok(true)).unwrap();

    assert_eq!(catalog.enumerate_calls(), 1);
}

#[test]
fn unknown_selector_aborts_before_confirmation() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&dir.path().join("image.bin"), "usb-NoSuchStick-0:0");
    let confirmed = AtomicBool::new(false);

    let err = flash::flash(
        &catalog,
        false,
        |_| Ok(req),
        |_| {
            confirmed.store(true, Ordering::SeqCst);
            Ok(true)
        },
    )
    .unwrap_err();

    assert!(matches!(err, ForgeError::UnknownDevice { .. }));
    assert!(!confirmed.load(Ordering::SeqCst));
    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn non_usb_selector_is_refused_even_when_present() {
    let dir = tempdir().unwrap();
    let disk_path = dir.path().join("fixed");
    fs::write(&disk_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&disk_path, FIXED_DISK)]);
    let req = request(&source_path, FIXED_DISK);
    let confirmed = AtomicBool::new(false);

    let err = flash::flash(
        &catalog,
        false,
        |_| Ok(req),
        |_| {
            confirmed.store(true, Ordering::SeqCst);
            Ok(true)
        },
    )
    .unwrap_err();

    assert!(matches!(err, ForgeError::UnsafeTarget { .. }));
    assert!(!confirmed.load(Ordering::SeqCst));
    assert_eq!(fs::read(&disk_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn declined_confirmation_writes_nothing() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&source_path, STICK);

    let err = flash::flash(&catalog, false, |_| Ok(req), |_| Ok(false)).unwrap_err();

    assert!(matches!(err, ForgeError::UserCancelled));
    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn confirmation_failure_aborts_the_write() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&source_path, STICK);

    let err = flash::flash(
        &catalog,
        false,
        |_| Ok(req),
        |_| {
            Err(ForgeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "prompt lost its terminal",
            )))
        },
    )
    .unwrap_err();

    assert!(matches!(err, ForgeError::Io(_)));
    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn confirmation_sees_the_resolved_node() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0u8; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![
        record(&dir.path().join("other"), "usb-Other_Stick-0:0"),
        record(&target_path, STICK),
    ]);
    let req = request(&source_path, STICK);
    let expected_path = target_path.clone();
    let saw_target = AtomicBool::new(false);

    flash::flash(
        &catalog,
        false,
        |_| Ok(req),
        |target| {
            assert_eq!(target.physical_path, expected_path);
            assert_eq!(target.class_identifier, STICK);
            saw_target.store(true, Ordering::SeqCst);
            Ok(true)
        },
    )
    .unwrap();

    assert!(saw_target.load(Ordering::SeqCst));
}

#[test]
fn dry_run_stops_after_confirmation() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&source_path, STICK);
    let confirmed = AtomicBool::new(false);

    flash::flash(
        &catalog,
        true,
        |_| Ok(req),
        |_| {
            confirmed.store(true, Ordering::SeqCst);
            Ok(true)
        },
    )
    .unwrap();

    assert!(confirmed.load(Ordering::SeqCst));
    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn missing_source_image_is_reported_with_its_path() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("absent.bin");

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);
    let req = request(&source_path, STICK);

    let err = flash::flash(&catalog, false, |_| Ok(req), |_| Ok(true)).unwrap_err();

    match err {
        ForgeError::SourceReadFailed { path, .. } => assert_eq!(path, source_path),
        other => panic!("expected SourceReadFailed, got {other:?}"),
    }
    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn enumeration_failure_aborts_the_operation() {
    let catalog = FakeCatalog::failing();
    let selected = AtomicBool::new(false);

    let err = flash::flash(
        &catalog,
        false,
        |_| {
            selected.store(true, Ordering::SeqCst);
            Ok(request(Path::new("image.bin"), STICK))
        },
        |_| Ok(true),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ForgeError::Hal(HalError::EnumerationFailed { .. })
    ));
    assert!(!selected.load(Ordering::SeqCst));
}

#[test]
fn dangerous_write_requires_the_token() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);

    let err = flash::run_dangerous(&catalog, &source_path, STICK, false, false).unwrap_err();

    assert!(matches!(err, ForgeError::MissingYesIKnow));
    // Refused before the catalog was even touched.
    assert_eq!(catalog.enumerate_calls(), 0);
    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn dangerous_write_flashes_without_prompts() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0u8; 32]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"scripted payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);

    flash::run_dangerous(&catalog, &source_path, STICK, true, false).unwrap();

    let contents = fs::read(&target_path).unwrap();
    assert_eq!(&contents[..16], b"scripted payload");
    assert_eq!(catalog.enumerate_calls(), 1);
}

#[test]
fn dangerous_write_still_refuses_non_usb_targets() {
    let dir = tempdir().unwrap();
    let disk_path = dir.path().join("fixed");
    fs::write(&disk_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&disk_path, FIXED_DISK)]);

    let err = flash::run_dangerous(&catalog, &source_path, FIXED_DISK, true, false).unwrap_err();

    assert!(matches!(err, ForgeError::UnsafeTarget { .. }));
    assert_eq!(fs::read(&disk_path).unwrap(), vec![0xEE; 64]);
}

#[test]
fn dangerous_write_honors_dry_run() {
    let dir = tempdir().unwrap();
    let target_path = dir.path().join("stick");
    fs::write(&target_path, vec![0xEE; 64]).unwrap();
    let source_path = dir.path().join("image.bin");
    fs::write(&source_path, b"payload").unwrap();

    let catalog = FakeCatalog::with_records(vec![record(&target_path, STICK)]);

    flash::run_dangerous(&catalog, &source_path, STICK, true, true).unwrap();

    assert_eq!(fs::read(&target_path).unwrap(), vec![0xEE; 64]);
}
