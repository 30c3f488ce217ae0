//! Contract loader: fetch the shared index and pick one character out of it.

use log::{debug, error};

use crate::config::Config;
use crate::contract::{parse_contract_index_json, AnimationContract};
use crate::error::AnimdexError;
use crate::source::AssetSource;

/// Fetch and parse the index at `index_url`, then build the contract for
/// `character_id`. No retries; the caller decides whether to try again.
pub async fn load_contract<S: AssetSource>(
    source: &S,
    index_url: &str,
    character_id: &str,
    cfg: &Config,
) -> Result<AnimationContract, AnimdexError> {
    let text = source.fetch_text(index_url).await?;
    let index = parse_contract_index_json(&text).map_err(|e| {
        error!("contract index '{index_url}' is malformed: {e}");
        e
    })?;
    if !index.contains(character_id) {
        error!(
            "no animation contract for '{character_id}' in '{index_url}' (known: {})",
            index.character_ids().join(", ")
        );
    }
    let contract = index
        .contract(character_id, cfg.default_cross_fade_seconds)
        .map_err(|e| {
            if !matches!(e, AnimdexError::ContractNotFound { .. }) {
                error!("contract for '{character_id}' is invalid: {e}");
            }
            e
        })?;
    debug!(
        "'{character_id}': {} animations declared, skeleton '{}', clips '{}'",
        contract.entries.len(),
        contract.skeleton_url,
        contract.animation_source_url
    );
    Ok(contract)
}
