use animdex_core::{
    load_character, load_character_cancellable, AnimdexError, AssetSource, ClipSet, Config,
    Diagnostic, MemoryAssetSource, Skeleton,
};

const INDEX_URL: &str = "index.json";

fn fixture_source() -> MemoryAssetSource {
    let index = animdex_test_fixtures::contracts::json("characters").unwrap();
    let humanoid: Skeleton = animdex_test_fixtures::skeletons::load("humanoid").unwrap();
    let hero: ClipSet = animdex_test_fixtures::clip_sets::load("hero-full").unwrap();
    let scout: ClipSet = animdex_test_fixtures::clip_sets::load("hero-idle-only").unwrap();
    MemoryAssetSource::new()
        .with_text(INDEX_URL, index)
        .with_skeleton("hero/rig.glb", humanoid)
        .with_clips("hero/anims.glb", hero)
        .with_clips("scout/anims.glb", scout)
}

/// Serves the index, then never finishes loading the rig.
struct StalledSource(MemoryAssetSource);

impl AssetSource for StalledSource {
    async fn fetch_text(&self, url: &str) -> Result<String, AnimdexError> {
        self.0.fetch_text(url).await
    }

    async fn load_skeleton(&self, _url: &str) -> Result<Skeleton, AnimdexError> {
        std::future::pending().await
    }

    async fn load_clips(&self, url: &str) -> Result<ClipSet, AnimdexError> {
        self.0.load_clips(url).await
    }
}

#[tokio::test]
async fn scout_loads_with_one_diagnostic_and_plays_idle() {
    let scout = load_character(&fixture_source(), INDEX_URL, "scout", &Config::default())
        .await
        .expect("scout loads");

    assert_eq!(scout.character_id(), "scout");
    assert_eq!(scout.skeleton.name, "Humanoid");
    let ids: Vec<&str> = scout
        .playback
        .actions()
        .map(|a| a.entry_id.as_str())
        .collect();
    assert_eq!(ids, vec!["idle"]);
    assert_eq!(
        scout.diagnostics,
        vec![Diagnostic::UnresolvedClip {
            entry_id: "walk".into(),
            clip_name: "Walk_Clip".into()
        }]
    );
    // Autoplay starts the default at full weight
    assert_eq!(scout.playback.current(), Some("idle"));
    let idle = scout.playback.current_action().unwrap();
    assert_eq!(scout.playback.mixer().action(idle).unwrap().weight(), 1.0);
}

#[tokio::test]
async fn startup_messages_name_the_character() {
    let scout = load_character(&fixture_source(), INDEX_URL, "scout", &Config::default())
        .await
        .unwrap();
    assert_eq!(
        scout.startup_messages(),
        vec!["scout: animation 'walk': clip 'Walk_Clip' not found in the animation source"]
    );
}

#[tokio::test]
async fn autoplay_can_be_disabled() {
    let cfg = Config {
        autoplay_default: false,
        ..Config::default()
    };
    let hero = load_character(&fixture_source(), INDEX_URL, "hero", &cfg)
        .await
        .unwrap();
    assert!(hero.diagnostics.is_empty());
    assert_eq!(hero.playback.current(), None);
    assert_eq!(hero.playback.default_id(), Some("idle"));
}

#[tokio::test]
async fn empty_contract_is_a_load_error() {
    let err = load_character(&fixture_source(), INDEX_URL, "mannequin", &Config::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AnimdexError::EmptyContract {
            character_id: "mannequin".into()
        }
    );
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn dispose_leaves_nothing_to_play() {
    let mut hero = load_character(&fixture_source(), INDEX_URL, "hero", &Config::default())
        .await
        .unwrap();
    hero.dispose();
    assert!(hero.playback.mixer().is_empty());
    assert!(hero.playback.update(0.1).samples.is_empty());
    assert!(hero.playback.crossfade_to("walk").is_err());
}

#[tokio::test]
async fn abort_before_first_poll_is_cancelled() {
    let src = fixture_source();
    let cfg = Config::default();
    let (load, handle) = load_character_cancellable(&src, INDEX_URL, "hero", &cfg);
    handle.abort();
    let err = load.await.unwrap_err();
    assert_eq!(
        err,
        AnimdexError::Cancelled {
            character_id: "hero".into()
        }
    );
    assert_eq!(err.category(), "cancelled");
}

#[tokio::test]
async fn abort_while_assets_are_in_flight() {
    let src = StalledSource(fixture_source());
    let cfg = Config::default();
    let (load, handle) = load_character_cancellable(&src, INDEX_URL, "hero", &cfg);

    let (result, ()) = tokio::join!(load, async {
        tokio::task::yield_now().await;
        handle.abort();
    });
    assert!(matches!(result, Err(AnimdexError::Cancelled { .. })));
}

#[tokio::test]
async fn uncancelled_load_completes_normally() {
    let src = fixture_source();
    let cfg = Config::default();
    let (load, _handle) = load_character_cancellable(&src, INDEX_URL, "hero", &cfg);
    let hero = load.await.unwrap();
    assert_eq!(hero.playback.actions().count(), 5);
}

#[cfg(feature = "gltf")]
mod gltf_files {
    use std::path::PathBuf;

    use animdex_core::{load_character, Config, Diagnostic, GltfFileSource, LoopMode};

    const RIG: &str = r#"{
        "asset": { "version": "2.0" },
        "scenes": [ { "name": "Blob", "nodes": [0] } ],
        "nodes": [ { "name": "Root", "children": [1] }, { "name": "Body" } ],
        "skins": [ { "joints": [0, 1] } ],
        "buffers": [ { "byteLength": 64 } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 8 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [0.5] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [0.25] }
        ],
        "animations": [
            {
                "name": "Bounce",
                "channels": [ { "sampler": 0, "target": { "node": 1, "path": "translation" } } ],
                "samplers": [ { "input": 0, "output": 1 } ]
            },
            {
                "name": "Squish",
                "channels": [ { "sampler": 0, "target": { "node": 1, "path": "scale" } } ],
                "samplers": [ { "input": 2, "output": 1 } ]
            }
        ]
    }"#;

    const INDEX: &str = r#"{
        "characters": {
            "blob": {
                "skeleton": { "url": "/blob/blob.gltf" },
                "animations": [
                    { "id": "bounce", "sourceClipName": "Bounce", "loop": "repeat" },
                    { "id": "squish", "sourceClipName": "Squish", "loop": "once" },
                    { "id": "melt", "sourceClipName": "Melt" }
                ],
                "defaults": { "defaultAnimationId": "squish", "crossFadeSec": 0.1 }
            }
        }
    }"#;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("animdex-gltf-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("blob")).expect("scratch dir");
        dir
    }

    #[tokio::test]
    async fn loads_a_character_from_gltf_on_disk() {
        let dir = scratch_dir();
        tokio::fs::write(dir.join("blob/blob.gltf"), RIG).await.unwrap();
        tokio::fs::write(dir.join("index.json"), INDEX).await.unwrap();

        let src = GltfFileSource::new(&dir);
        let blob = load_character(&src, "index.json", "blob", &Config::default())
            .await
            .expect("blob loads");

        assert_eq!(blob.skeleton.name, "Blob");
        assert_eq!(blob.skeleton.joints, vec!["Root", "Body"]);
        assert_eq!(blob.playback.actions().count(), 2);
        assert_eq!(blob.playback.loop_mode("squish"), Some(LoopMode::Once));
        assert_eq!(blob.playback.current(), Some("squish"));
        assert_eq!(
            blob.diagnostics,
            vec![Diagnostic::UnresolvedClip {
                entry_id: "melt".into(),
                clip_name: "Melt".into()
            }]
        );

        let squish = blob.playback.action("squish").unwrap().action;
        let action = blob.playback.mixer().action(squish).unwrap();
        assert!((action.duration - 0.25).abs() < 1e-6);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_file_is_an_asset_error() {
        let src = GltfFileSource::new(std::env::temp_dir().join("animdex-does-not-exist"));
        let err = load_character(&src, "index.json", "blob", &Config::default())
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.category(), "io");
    }
}
