//! Attachment storage for the intake form.
//!
//! An uploaded reference file is written to the upload directory under a
//! sanitized, collision-resistant name: the current Unix timestamp (seconds)
//! prefixed to the cleaned-up client filename. The stored name is what the
//! customer record's `referencia` column points at, and what
//! `GET /uploads/{filename}` serves back.

use std::io;
use std::path::Path;

use chrono::Utc;
use tokio::io::AsyncWriteExt;

/// Strips path separators and unsafe characters from a client-supplied
/// filename.
///
/// Separators become spaces, whitespace runs collapse to a single `_`,
/// anything outside ASCII `[A-Za-z0-9_.-]` is dropped, and leading/trailing
/// dots and underscores are trimmed. The result can be empty (for example a
/// name of just `"../.."`); callers still get a usable stored name from the
/// timestamp prefix.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    filtered.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Writes an uploaded file into `upload_dir` and returns the stored filename.
///
/// The name is `{unix_timestamp}{sanitized_original}`. The file is opened
/// with `create_new`, so a second upload landing on the same name within the
/// same second never truncates the first: an attempt counter is inserted
/// after the timestamp until creation succeeds.
///
/// # Errors
///
/// Returns any I/O error from directory creation or the write itself. A
/// failure mid-write can leave a partial file behind; nothing references it
/// until the caller inserts the record, so it is simply orphaned.
pub async fn store_upload(upload_dir: &str, original_name: &str, data: &[u8]) -> io::Result<String> {
    tokio::fs::create_dir_all(upload_dir).await?;
    store_upload_at(upload_dir, original_name, data, Utc::now().timestamp()).await
}

async fn store_upload_at(
    upload_dir: &str,
    original_name: &str,
    data: &[u8],
    timestamp: i64,
) -> io::Result<String> {
    let sanitized = sanitize_filename(original_name);

    let mut attempt = 0u32;
    loop {
        let stored_name = if attempt == 0 {
            format!("{timestamp}{sanitized}")
        } else {
            format!("{timestamp}-{attempt}{sanitized}")
        };

        let path = Path::new(upload_dir).join(&stored_name);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(data).await?;
                file.flush().await?;
                return Ok(stored_name);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
