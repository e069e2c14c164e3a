//! Routing of downloaded files to decoder backends.
//!
//! The dispatcher holds one backend per choice and picks by
//! `(category, choice)`; no decoding logic lives here. Extracted
//! content lands in a sibling of the category directory, so
//! `out/AssetBundles/foo.bundle` decodes into `out/AssetExtracted/`.

mod backend;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Category;

pub use backend::{CommandDecoder, DecoderBackend, DecoderError, ExtractionOutcome};

/// Which registered decoder handles the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// The default decoder, valid for every category.
    Primary,
    /// The alternate studio decoder; only asset bundles.
    Studio,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("the {choice:?} backend does not handle {category:?} files")]
    Unsupported {
        category: Category,
        choice: BackendChoice,
    },

    #[error(transparent)]
    Decoder(#[from] DecoderError),
}

/// Routes a completed download to the right decoder backend.
pub struct ExtractionDispatcher {
    primary: Box<dyn DecoderBackend>,
    studio: Box<dyn DecoderBackend>,
}

impl ExtractionDispatcher {
    pub fn new(primary: Box<dyn DecoderBackend>, studio: Box<dyn DecoderBackend>) -> Self {
        Self { primary, studio }
    }

    pub fn extract(
        &self,
        category: Category,
        source: &Path,
        choice: BackendChoice,
    ) -> Result<ExtractionOutcome, ExtractError> {
        let backend = match (category, choice) {
            (_, BackendChoice::Primary) => self.primary.as_ref(),
            (Category::BundleAsset, BackendChoice::Studio) => self.studio.as_ref(),
            (_, BackendChoice::Studio) => {
                return Err(ExtractError::Unsupported { category, choice });
            }
        };

        let out_dir = extraction_dir(category, source);
        info!(source = %source.display(), out = %out_dir.display(), "extracting");
        Ok(backend.decode(source, &out_dir)?)
    }
}

/// Output directory for a source file of the given category.
///
/// Walks up from the source until the category directory is found and
/// places the extracted directory next to it. When the source lives
/// outside the usual layout, falls back to a sibling of the file itself.
pub fn extraction_dir(category: Category, source: &Path) -> PathBuf {
    let mut cur = source.parent();
    while let Some(dir) = cur {
        if dir.file_name().is_some_and(|n| n == category.dir_name()) {
            return dir
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(category.extracted_dir_name());
        }
        cur = dir.parent();
    }
    source
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(category.extracted_dir_name())
}
