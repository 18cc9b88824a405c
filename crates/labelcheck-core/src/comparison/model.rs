//! Process-wide embedding model.

use once_cell::sync::OnceCell;
use tracing::info;

use labelcheck_inference::SentenceEmbedder;

use crate::error::ComparisonError;
use crate::models::ModelConfig;

static EMBEDDER: OnceCell<SentenceEmbedder> = OnceCell::new();

/// Load the sentence embedder on first use and reuse it afterwards.
///
/// The first call decides which model is used for the rest of the process;
/// later calls ignore `config`. A failed load is not cached, so a later
/// call may retry.
pub fn shared_embedder(config: &ModelConfig) -> Result<&'static SentenceEmbedder, ComparisonError> {
    EMBEDDER.get_or_try_init(|| {
        info!(
            "Loading embedding model ({} search path(s))",
            config.search_paths.len()
        );
        SentenceEmbedder::load_first(&config.search_paths, &config.embedder_options())
            .map_err(|e| ComparisonError::ModelLoad(e.to_string()))
    })
}
