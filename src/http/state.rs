use std::path::PathBuf;

use crate::catalog::store::CatalogHandle;
use crate::http::range::SuffixMode;

/// Shared application state injected into all route handlers via axum::extract::State.
/// The streaming handlers never touch the catalog; they resolve paths straight
/// from the request.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogHandle,
    pub suffix_mode: SuffixMode,
    /// Where uploaded show posters are written.
    pub posters_dir: PathBuf,
}
