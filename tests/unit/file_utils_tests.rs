/*!
 * Tests for the filesystem abstraction
 */

use dbtrans::file_utils::{Filesystem, LocalFilesystem};

use crate::common;

#[test]
fn test_localFilesystem_write_shouldReplaceContents() {
    let temp = common::create_temp_dir().unwrap();
    let path = temp.path().join("bucket.json");

    LocalFilesystem.write(&path, b"first").unwrap();
    LocalFilesystem.write(&path, b"second").unwrap();

    assert_eq!(LocalFilesystem.read(&path).unwrap(), b"second");
}

#[test]
fn test_localFilesystem_delete_withMissingFile_shouldReturnNotFound() {
    let temp = common::create_temp_dir().unwrap();
    let error = LocalFilesystem.delete(&temp.path().join("missing.json")).unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_localFilesystem_read_withMissingFile_shouldFail() {
    let temp = common::create_temp_dir().unwrap();
    assert!(LocalFilesystem.read(&temp.path().join("missing.json")).is_err());
}
