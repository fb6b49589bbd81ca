//! Test that the store can be moved behind a mutex for concurrent embeddings.

fn assert_sync_send<T: Sync + Send>() {}

#[test]
fn test_override_store_is_sync_send() {
    assert_sync_send::<webmime_core::OverrideStore>();
}

#[test]
fn test_store_config_is_sync_send() {
    assert_sync_send::<webmime_core::StoreConfig>();
}

#[test]
fn test_filesystems_are_sync_send() {
    assert_sync_send::<webmime_core::RealFileSystem>();
}

#[cfg(feature = "test-utils")]
#[test]
fn test_mock_filesystem_is_sync_send() {
    assert_sync_send::<webmime_core::MockFileSystem>();
}
