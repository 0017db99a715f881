//! Best-effort content-type guessing keyed by file extension.

use std::path::Path;

/// Content-type prefixes treated as mergeable text.
const TEXT_LIKE_PREFIXES: &[&str] =
    &["text/", "application/json", "application/xml", "application/javascript"];

/// Guess a MIME content type from the path's extension.
///
/// Returns `None` for unknown extensions so the caller can fall through to
/// content sniffing. Source code extensions map to `text/*` types.
pub fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        // Plain text and markup
        "txt" | "text" | "log" | "conf" | "def" | "list" | "in" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "rst" => "text/x-rst",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" | "xsl" | "xsd" | "rss" | "plist" => "application/xml",
        "json" | "map" | "ipynb" => "application/json",
        "js" | "mjs" | "cjs" => "application/javascript",
        "yaml" | "yml" => "text/yaml",
        "toml" => "text/x-toml",
        "ini" | "cfg" => "text/x-ini",
        "vcf" => "text/vcard",
        "ics" => "text/calendar",
        // Source code
        "py" | "pyi" | "pyx" => "text/x-python",
        "c" => "text/x-c",
        "h" => "text/x-chdr",
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" => "text/x-c++src",
        "java" => "text/x-java",
        "kt" | "kts" => "text/x-kotlin",
        "rs" => "text/x-rust",
        "go" => "text/x-go",
        "ts" | "tsx" | "jsx" => "text/x-typescript",
        "rb" => "text/x-ruby",
        "php" => "text/x-php",
        "cs" => "text/x-csharp",
        "swift" => "text/x-swift",
        "scala" => "text/x-scala",
        "sh" | "bash" | "zsh" => "text/x-sh",
        "pl" | "pm" => "text/x-perl",
        "sql" => "text/x-sql",
        "tex" => "text/x-tex",
        // Binary payloads that slip past the extension denylist
        "bin" | "dat" | "o" | "a" | "lib" | "obj" => "application/octet-stream",
        "wasm" => "application/wasm",
        "bz2" => "application/x-bzip2",
        "xz" => "application/x-xz",
        "tgz" => "application/gzip",
        "iso" => "application/x-iso9660-image",
        "dmg" => "application/x-apple-diskimage",
        "deb" => "application/vnd.debian.binary-package",
        "rpm" => "application/x-rpm",
        "apk" => "application/vnd.android.package-archive",
        "msi" => "application/x-msi",
        "epub" => "application/epub+zip",
        "odt" => "application/vnd.oasis.opendocument.text",
        "rtf" => "application/rtf",
        "ps" | "eps" => "application/postscript",
        "sqlite" | "db" => "application/vnd.sqlite3",
        "pickle" | "pkl" => "application/octet-stream",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "webp" => "image/webp",
        "psd" => "image/vnd.adobe.photoshop",
        "heic" => "image/heic",
        "wav" => "audio/x-wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "webm" => "video/webm",
        "flv" => "video/x-flv",
        "wmv" => "video/x-ms-wmv",
        _ => return None,
    };
    Some(content_type)
}

/// Whether a content type is text, JSON, XML or JavaScript.
pub fn is_text_like(content_type: &str) -> bool {
    TEXT_LIKE_PREFIXES.iter().any(|prefix| content_type.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_files_are_text_like() {
        for name in ["README.md", "app.py", "main.rs", "index.ts", "run.sh", "data.json", "a.xml"] {
            let ct = guess_content_type(Path::new(name)).expect(name);
            assert!(is_text_like(ct), "{name} guessed as {ct}");
        }
    }

    #[test]
    fn binary_payloads_are_not_text_like() {
        for name in ["binary_file.bin", "module.wasm", "font.woff2", "clip.webm"] {
            let ct = guess_content_type(Path::new(name)).expect(name);
            assert!(!is_text_like(ct), "{name} guessed as {ct}");
        }
    }

    #[test]
    fn unknown_extensions_have_no_guess() {
        assert!(guess_content_type(Path::new("Makefile")).is_none());
        assert!(guess_content_type(Path::new("notes.zzz")).is_none());
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(guess_content_type(Path::new("README.MD")), Some("text/markdown"));
    }
}
