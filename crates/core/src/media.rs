//! Absolute media URLs for storage-relative image paths.

use serde_json::Value;

/// Join a storage-relative path onto the media base URL.
///
/// Absolute `http(s)://` URLs, `data:` URIs and empty strings are returned
/// unchanged.
pub fn resolve_media_url(base: &str, path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("data:")
    {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        trimmed.trim_start_matches('/')
    )
}

/// Rewrite every named string field in a record (or list of records).
pub fn resolve_media_fields(payload: &mut Value, fields: &[&str], base: &str) {
    match payload {
        Value::Object(map) => {
            for field in fields {
                if let Some(Value::String(path)) = map.get_mut(*field) {
                    *path = resolve_media_url(base, path);
                }
            }
        }
        Value::Array(records) => {
            for record in records.iter_mut() {
                if record.is_object() {
                    resolve_media_fields(record, fields, base);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000/storage/";

    #[test]
    fn relative_paths_are_joined() {
        assert_eq!(
            resolve_media_url(BASE, "/partners/logo.png"),
            "http://localhost:8000/storage/partners/logo.png"
        );
        assert_eq!(
            resolve_media_url("http://cdn", "a.png"),
            "http://cdn/a.png"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        for url in ["https://x.org/a.png", "http://x/b.jpg", "data:image/png;base64,AAAA", ""] {
            assert_eq!(resolve_media_url(BASE, url), url);
        }
    }

    #[test]
    fn fields_in_record_lists_are_rewritten() {
        let mut records = json!([
            { "photo": "p/1.png", "name": "Store" },
            { "photo": null },
        ]);
        resolve_media_fields(&mut records, &["photo"], BASE);
        assert_eq!(records[0]["photo"], "http://localhost:8000/storage/p/1.png");
        assert_eq!(records[0]["name"], "Store");
        assert!(records[1]["photo"].is_null());
    }
}
