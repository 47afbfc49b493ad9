#[cfg(test)]
mod tests {
    use crate::environment::{EnvironmentStore, StoreError, SKELETON_DIRS};
    use crate::parser::SiteFiles;
    use crate::server::ServerManager;
    use tempfile::TempDir;

    fn store() -> (TempDir, EnvironmentStore) {
        let tmp = TempDir::new().unwrap();
        let store = EnvironmentStore::new(tmp.path().join("environments")).unwrap();
        (tmp, store)
    }

    // ========================================================================
    // create / skeleton
    // ========================================================================

    #[test]
    fn test_create_builds_full_skeleton() {
        let (_tmp, store) = store();
        let root = store.create("shop", true).unwrap();

        assert!(root.is_dir());
        for dir in SKELETON_DIRS {
            assert!(root.join(dir).is_dir(), "missing skeleton dir {}", dir);
        }
    }

    #[test]
    fn test_create_clean_wipes_previous_contents() {
        let (_tmp, store) = store();
        let root = store.create("shop", true).unwrap();
        std::fs::write(root.join("stale.html"), "old").unwrap();

        let root = store.create("shop", true).unwrap();
        assert!(!root.join("stale.html").exists());
    }

    #[test]
    fn test_create_without_clean_preserves_contents() {
        let (_tmp, store) = store();
        let root = store.create("shop", true).unwrap();
        std::fs::write(root.join("keep.html"), "kept").unwrap();

        let root = store.create("shop", false).unwrap();
        assert!(root.join("keep.html").exists());
    }

    #[test]
    fn test_create_rejects_traversal_name() {
        let (_tmp, store) = store();
        let result = store.create("../outside", true);
        assert!(matches!(result, Err(StoreError::InvalidName(_))));
    }

    // ========================================================================
    // write_files
    // ========================================================================

    #[test]
    fn test_write_files_creates_nested_paths() {
        let (_tmp, store) = store();
        let root = store.create("shop", true).unwrap();

        let mut files = SiteFiles::new();
        files.insert("index.html".to_string(), "<h1>hi</h1>".to_string());
        files.insert("css/styles.css".to_string(), "body{}".to_string());
        store.write_files(&root, &files).unwrap();

        assert_eq!(
            std::fs::read_to_string(root.join("index.html")).unwrap(),
            "<h1>hi</h1>"
        );
        assert_eq!(
            std::fs::read_to_string(root.join("css/styles.css")).unwrap(),
            "body{}"
        );
    }

    #[test]
    fn test_write_files_overwrites_existing() {
        let (_tmp, store) = store();
        let root = store.create("shop", true).unwrap();

        let mut files = SiteFiles::new();
        files.insert("index.html".to_string(), "first".to_string());
        store.write_files(&root, &files).unwrap();

        files.insert("index.html".to_string(), "second".to_string());
        store.write_files(&root, &files).unwrap();

        assert_eq!(
            std::fs::read_to_string(root.join("index.html")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_write_files_rejects_traversal_before_any_write() {
        let (tmp, store) = store();
        let root = store.create("shop", true).unwrap();

        let mut files = SiteFiles::new();
        files.insert("index.html".to_string(), "<h1>hi</h1>".to_string());
        files.insert("../../etc/passwd".to_string(), "pwned".to_string());

        let result = store.write_files(&root, &files);
        assert!(matches!(result, Err(StoreError::InvalidPath(_))));

        // Nothing at all may have been written, including the valid entry.
        assert!(!root.join("index.html").exists());
        assert!(!tmp.path().join("etc/passwd").exists());
    }

    #[test]
    fn test_write_files_filters_empty_keys() {
        let (_tmp, store) = store();
        let root = store.create("shop", true).unwrap();

        let mut files = SiteFiles::new();
        files.insert(String::new(), "orphan".to_string());
        files.insert("index.html".to_string(), "<h1>hi</h1>".to_string());

        store.write_files(&root, &files).unwrap();
        assert!(root.join("index.html").exists());
    }

    // ========================================================================
    // list / info / cleanup
    // ========================================================================

    #[test]
    fn test_list_returns_environment_names() {
        let (_tmp, store) = store();
        store.create("alpha", true).unwrap();
        store.create("beta", true).unwrap();

        let mut names = store.list().unwrap();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_info_unknown_environment_is_not_found() {
        let (_tmp, store) = store();
        let servers = ServerManager::new(store.base_dir());

        let result = store.info("missing", &servers).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_info_lists_relative_files() {
        let (_tmp, store) = store();
        let servers = ServerManager::new(store.base_dir());
        let root = store.create("shop", true).unwrap();

        let mut files = SiteFiles::new();
        files.insert("index.html".to_string(), "x".to_string());
        files.insert("js/app.js".to_string(), "y".to_string());
        store.write_files(&root, &files).unwrap();

        let info = store.info("shop", &servers).await.unwrap();
        assert!(info.exists);
        assert!(!info.server_running);
        assert_eq!(info.server_url, None);
        assert_eq!(info.files, vec!["index.html", "js/app.js"]);
    }

    #[tokio::test]
    async fn test_cleanup_removes_directory() {
        let (_tmp, store) = store();
        let servers = ServerManager::new(store.base_dir());
        let root = store.create("shop", true).unwrap();

        store.cleanup("shop", &servers).await.unwrap();
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_cleanup_unknown_environment_is_noop() {
        let (_tmp, store) = store();
        let servers = ServerManager::new(store.base_dir());

        assert!(store.cleanup("never-existed", &servers).await.is_ok());
        assert!(store.list().unwrap().is_empty());
    }
}
