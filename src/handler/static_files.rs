//! Static file serving module
//!
//! Serves files under the public directory for request paths beginning
//! with `/public/`. Anything that does not resolve to a regular file
//! inside that directory is a 404.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Request path prefix handled by the static resolver
pub const PUBLIC_PREFIX: &str = "/public/";

/// Serve `path` from `root`, or 404
pub async fn serve(root: &Path, path: &str) -> Response<Full<Bytes>> {
    match resolve(root, path).await {
        Some(file_path) => read_resolved(&file_path).await,
        None => http::build_404_response(),
    }
}

/// Read a file `resolve` accepted; a file removed since then is a 404
async fn read_resolved(file_path: &Path) -> Response<Full<Bytes>> {
    match fs::read(file_path).await {
        Ok(content) => {
            logger::log_debug(&format!(
                "Static file {} ({} bytes)",
                file_path.display(),
                content.len()
            ));
            http::build_file_response(content, mime::content_type_for(file_path))
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            http::build_404_response()
        }
    }
}

/// Map a `/public/...` request path to a canonical file inside `root`
///
/// Returns `None` when the path is outside the prefix, fails to decode,
/// does not exist, escapes `root` once symlinks and `..` are resolved, or
/// names something other than a regular file.
pub async fn resolve(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = path.strip_prefix(PUBLIC_PREFIX)?;
    let relative = urlencoding::decode(relative).ok()?;
    if relative.contains('\0') {
        return None;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Public directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // Missing files are ordinary 404s, not worth a log line
    let file_canonical = fs::canonicalize(root_canonical.join(relative.as_ref()))
        .await
        .ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let metadata = fs::metadata(&file_canonical).await.ok()?;
    metadata.is_file().then_some(file_canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::body_string;
    use hyper::header::CONTENT_TYPE;
    use hyper::StatusCode;

    fn public_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
    }

    /// Fresh public root under the system temp dir
    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "student_records_static_{}_{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("public")).unwrap();
        root
    }

    #[tokio::test]
    async fn test_serve_stylesheet() {
        let response = serve(&public_root(), "/public/style.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn test_resolve_decodes_percent_escapes() {
        let resolved = resolve(&public_root(), "/public/style%2Ecss").await;
        assert_eq!(
            resolved,
            Some(public_root().canonicalize().unwrap().join("style.css"))
        );
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let root = public_root();
        assert!(resolve(&root, "/public/../Cargo.toml").await.is_none());
        assert!(resolve(&root, "/public/%2E%2E/Cargo.toml").await.is_none());
        let response = serve(&root, "/public/../Cargo.toml").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_and_directory_are_not_found() {
        let root = public_root();
        assert!(resolve(&root, "/public/missing.css").await.is_none());
        assert!(resolve(&root, "/public/").await.is_none());
        assert!(resolve(&root, "/other/style.css").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let root = public_root().join("does-not-exist");
        let response = serve(&root, "/public/style.css").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_file_removed_after_resolve_is_not_found() {
        let root = scratch_root("removed");
        let public = root.join("public");
        std::fs::write(public.join("gone.css"), "body {}").unwrap();

        let file_path = resolve(&public, "/public/gone.css").await.unwrap();
        std::fs::remove_file(&file_path).unwrap();

        let response = read_resolved(&file_path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_string(response).await;
        assert!(!body.contains("gone.css"));
        assert!(!body.contains(&*public.to_string_lossy()));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_rejected() {
        let root = scratch_root("symlink");
        let public = root.join("public");
        std::fs::write(root.join("secret.txt"), "private").unwrap();
        std::os::unix::fs::symlink(root.join("secret.txt"), public.join("link.txt")).unwrap();
        std::fs::write(public.join("inside.txt"), "public").unwrap();
        std::os::unix::fs::symlink(public.join("inside.txt"), public.join("alias.txt")).unwrap();

        assert!(resolve(&public, "/public/link.txt").await.is_none());
        let response = serve(&public, "/public/link.txt").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!body_string(response).await.contains("private"));

        // Links that stay inside the root still resolve
        assert!(resolve(&public, "/public/alias.txt").await.is_some());

        let _ = std::fs::remove_dir_all(&root);
    }
}
