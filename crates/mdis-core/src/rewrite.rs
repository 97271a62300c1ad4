//! Rewrites image links to point at a server-path prefix.

use crate::extract::IMAGE_LINK;
use crate::filename::derive_filename;
use std::path::{Path, PathBuf};

/// Guarantees a trailing `/` on a non-empty server path. Empty input stays
/// empty, so substitution degrades to the bare filename.
pub fn normalize_server_path(server_path: &str) -> String {
    if server_path.is_empty() || server_path.ends_with('/') {
        server_path.to_string()
    } else {
        format!("{}/", server_path)
    }
}

/// Replaces every remote image URL in `text` with `server_path` plus the
/// derived filename.
///
/// Every occurrence is rewritten, duplicates included. Only the URL inside
/// each link changes; alt text, brackets, and any query or fragment after
/// the extension survive as written. Text without image links passes
/// through untouched.
pub fn rewrite_markdown(text: &str, server_path: &str) -> String {
    let server_path = normalize_server_path(server_path);
    IMAGE_LINK
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let whole = &caps[0];
            let url = &caps[1];
            let new_url = format!("{}{}", server_path, derive_filename(url));
            whole.replace(url, &new_url)
        })
        .into_owned()
}

/// Output path for the rewritten document: `<stem>_new.md` beside the input.
/// The input's own extension is dropped, whatever it was.
pub fn rewritten_path(md_path: &Path) -> PathBuf {
    let mut name = md_path.file_stem().unwrap_or_default().to_os_string();
    name.push("_new.md");
    md_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_missing_slash() {
        assert_eq!(
            normalize_server_path("https://cdn.example.com/dir"),
            "https://cdn.example.com/dir/"
        );
        assert_eq!(
            normalize_server_path("https://cdn.example.com/dir/"),
            "https://cdn.example.com/dir/"
        );
    }

    #[test]
    fn normalize_keeps_empty_empty() {
        assert_eq!(normalize_server_path(""), "");
    }

    #[test]
    fn rewrites_image_link() {
        let text = "![alt](https://img.example.com/photo.png)";
        let out = rewrite_markdown(text, "https://server.example.com/static");
        assert_eq!(out, "![alt](https://server.example.com/static/photo.png)");
    }

    #[test]
    fn query_after_extension_survives() {
        let text = "![big](https://img.example.com/photo.png?size=large)";
        let out = rewrite_markdown(text, "https://server.example.com/static/");
        assert_eq!(
            out,
            "![big](https://server.example.com/static/photo.png?size=large)"
        );
    }

    #[test]
    fn every_occurrence_is_rewritten() {
        let text = "![a](https://x.example.com/p.gif) and again ![b](https://x.example.com/p.gif)";
        let out = rewrite_markdown(text, "https://s.example.com/i");
        assert_eq!(
            out,
            "![a](https://s.example.com/i/p.gif) and again ![b](https://s.example.com/i/p.gif)"
        );
    }

    #[test]
    fn empty_server_path_leaves_bare_filename() {
        let text = "[pic](https://img.example.com/a/b/c.jpeg)";
        assert_eq!(rewrite_markdown(text, ""), "[pic](c.jpeg)");
    }

    #[test]
    fn non_image_links_untouched() {
        let text = "[doc](https://example.com/paper.pdf) ![local](img/x.png)";
        assert_eq!(rewrite_markdown(text, "https://s.example.com/"), text);
    }

    #[test]
    fn surrounding_text_is_preserved() {
        let text = "before\n\n![alt text](https://img.example.com/p.png)\n\nafter";
        let out = rewrite_markdown(text, "https://s.example.com");
        assert_eq!(
            out,
            "before\n\n![alt text](https://s.example.com/p.png)\n\nafter"
        );
    }

    #[test]
    fn rewrite_is_deterministic() {
        let text = "![a](https://x.example.com/one.png)\n![b](https://x.example.com/two.jpg?v=3)\n";
        let first = rewrite_markdown(text, "https://s.example.com/img");
        let second = rewrite_markdown(text, "https://s.example.com/img");
        assert_eq!(first, second);
    }

    #[test]
    fn rewritten_path_replaces_extension() {
        assert_eq!(
            rewritten_path(Path::new("notes.md")),
            PathBuf::from("notes_new.md")
        );
        assert_eq!(
            rewritten_path(Path::new("/docs/guide.markdown")),
            PathBuf::from("/docs/guide_new.md")
        );
    }

    #[test]
    fn rewritten_path_without_extension() {
        assert_eq!(
            rewritten_path(Path::new("README")),
            PathBuf::from("README_new.md")
        );
    }
}
