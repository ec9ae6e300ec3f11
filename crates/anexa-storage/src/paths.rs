//! Shared destination-path assembly.
//!
//! Layout: `<baseDir>/<fieldDir>` relative to the store root, with the
//! physical filename appended by the store.

/// Assemble the store-relative destination directory for a field.
///
/// Leading/trailing slashes on either component are trimmed so configuration
/// like `"uploads/"` and `"/files"` still produces `uploads/files`.
pub fn destination_dir(base_dir: &str, field_dir: &str) -> String {
    let base = base_dir.trim_matches('/');
    let field = field_dir.trim_matches('/');
    match (base.is_empty(), field.is_empty()) {
        (true, true) => String::new(),
        (true, false) => field.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, field),
    }
}
