//! Text-editor bind preconditions.
//!
//! Binding an editor only makes sense when the user can see both the
//! source and the destination, so a split layout is required, and the
//! document has to accept text.

use crate::destination::{DocumentUri, EditorRef};

use super::BindRefusal;

/// Schemes whose documents can be edited.
const WRITABLE_SCHEMES: &[&str] = &["file", "untitled", "vscode-remote", "vscode-userdata"];

/// Extensions of files that are never edited as text.
const BINARY_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "psd",
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "jar",
    // executables and objects
    "exe", "dll", "so", "dylib", "bin", "o", "a", "class", "wasm", "pyc",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // media
    "mp3", "mp4", "wav", "ogg", "flac", "avi", "mov", "mkv", "webm",
    // fonts
    "ttf", "otf", "woff", "woff2",
    // data
    "sqlite", "db",
];

pub fn is_writable_scheme(uri: &DocumentUri) -> bool {
    WRITABLE_SCHEMES.contains(&uri.scheme())
}

pub fn is_binary_file(uri: &DocumentUri) -> bool {
    let name = uri.file_name();
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    if stem.is_empty() {
        // Dotfiles such as `.bin` have no extension.
        return false;
    }
    BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// Check every editor precondition in order and hand back the editor to
/// bind. The first failing check decides the refusal.
pub fn check_editor(
    active: Option<EditorRef>,
    tab_group_count: usize,
) -> Result<EditorRef, BindRefusal> {
    let editor = active.ok_or(BindRefusal::NoActiveEditor)?;

    if tab_group_count < 2 {
        return Err(BindRefusal::NoSplitLayout);
    }

    if !is_writable_scheme(&editor.document) {
        return Err(BindRefusal::ReadOnlyScheme {
            scheme: editor.document.scheme().to_string(),
        });
    }

    if is_binary_file(&editor.document) {
        return Err(BindRefusal::BinaryFile {
            file: editor.document.file_name().to_string(),
        });
    }

    Ok(editor)
}
