use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// Logo files looked up in the asset root, in order of preference.
pub const LOGO_CANDIDATES: [&str; 4] = ["logo.png", "logo.webp", "logo.jpg", "logo.jpeg"];

const OCTET_STREAM: &str = "application/octet-stream";

/// A self-contained, inline-renderable image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub mime: &'static str,
    pub data_uri: String,
}

/// Turns relative image paths into `data:` URIs.
///
/// Paths resolve against a fixed root directory. Absolute paths and paths
/// leaving the root through `..` never resolve.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate `path`, trying it as given and then with the `./` prefix
    /// toggled, and return the first existing file.
    pub fn locate(&self, path: &str) -> Option<PathBuf> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }

        let toggled = match path.strip_prefix("./") {
            Some(stripped) => stripped.to_string(),
            None => format!("./{path}"),
        };

        [path, toggled.as_str()]
            .into_iter()
            .filter(|candidate| is_contained(Path::new(candidate)))
            .map(|candidate| self.root.join(candidate))
            .find(|candidate| candidate.is_file())
    }

    pub fn exists(&self, path: &str) -> bool {
        self.locate(path).is_some()
    }

    /// Read the file behind `path` and encode it as a data URI. Missing or
    /// unreadable files resolve to `None`.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve(&self, path: &str) -> Option<AssetRef> {
        let located = self.locate(path)?;
        let bytes = match std::fs::read(&located) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(?err, path = %located.display(), "Failed to read asset");
                return None;
            }
        };

        let mime = mime_for(&located);
        Some(AssetRef {
            mime,
            data_uri: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
        })
    }

    /// First existing file out of [`LOGO_CANDIDATES`], relative to the root.
    pub fn find_logo(&self) -> Option<PathBuf> {
        LOGO_CANDIDATES
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| self.root.join(candidate).is_file())
    }

    pub fn resolve_logo(&self) -> Option<AssetRef> {
        let logo = self.find_logo()?;
        self.resolve(logo.to_str()?)
    }
}

/// Infer a MIME type from the file extension, case-insensitively.
pub fn mime_for(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return OCTET_STREAM;
    };
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => OCTET_STREAM,
    }
}

fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
