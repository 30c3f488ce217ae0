//! animdex core (engine-agnostic)
//!
//! Binds stable animation ids from a JSON contract to clips in externally
//! loaded assets, validates that binding once at load time, and plays one
//! current action per character with crossfades.
//!
//! Flow: [`load_contract`] → [`resolve_contract`] → [`PlaybackController`],
//! or all three at once through [`load_character`]. Assets arrive through an
//! [`AssetSource`] supplied by the host.

pub mod assets;
pub mod character;
pub mod config;
pub mod contract;
pub mod controller;
pub mod error;
#[cfg(feature = "gltf")]
pub mod gltf_source;
pub mod ids;
pub mod loader;
pub mod mixer;
pub mod outputs;
pub mod resolver;
pub mod source;

// Re-exports for consumers (hosts and adapters)
pub use assets::{Clip, ClipMatch, ClipSet, Skeleton};
pub use character::{load_character, load_character_cancellable, LoadedCharacter};
pub use config::{Config, DefaultPolicy, SameIdPolicy};
pub use contract::{
    parse_contract_index_json, AnimationContract, AnimationEntry, ContractIndex, LoopMode,
};
pub use controller::{PlaybackController, ResolvedAction};
pub use error::AnimdexError;
#[cfg(feature = "gltf")]
pub use gltf_source::GltfFileSource;
pub use ids::ActionId;
pub use loader::load_contract;
pub use mixer::{Action, Mixer};
pub use outputs::{ActionSample, MixerEvent, Outputs};
pub use resolver::{
    load_assets, resolve_against, resolve_contract, Diagnostic, Resolution, ResolvedClip,
};
pub use source::{AssetSource, MemoryAssetSource};
