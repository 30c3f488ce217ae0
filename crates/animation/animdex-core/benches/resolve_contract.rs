use animdex_core::{
    parse_contract_index_json, resolve_against, AnimationContract, Clip, ClipSet, Config,
    PlaybackController, Skeleton,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic(entries: usize) -> (AnimationContract, ClipSet) {
    let animations: Vec<serde_json::Value> = (0..entries)
        .map(|i| {
            serde_json::json!({
                "id": format!("anim_{i}"),
                "sourceClipName": format!("Clip_{i}"),
                "loop": if i % 3 == 0 { "once" } else { "repeat" },
            })
        })
        .collect();
    let index = serde_json::json!({
        "characters": {
            "bench": {
                "skeleton": { "url": "bench.glb" },
                "animations": animations,
                "defaults": { "defaultAnimationId": "anim_0" }
            }
        }
    });
    let contract = parse_contract_index_json(&index.to_string())
        .and_then(|idx| idx.contract("bench", 0.25))
        .expect("synthetic contract");
    // Every other clip is missing so both paths are exercised.
    let clips = (0..entries)
        .step_by(2)
        .map(|i| Clip::new(format!("Clip_{i}"), 1.0 + i as f32 * 0.01))
        .collect();
    (contract, clips)
}

fn bench_resolve(c: &mut Criterion) {
    let cfg = Config::default();
    let mut group = c.benchmark_group("resolve_against");
    for &n in &[16usize, 128, 1024] {
        let (contract, clips) = synthetic(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let r = resolve_against(&contract, Skeleton::default(), &clips, &cfg)
                    .expect("resolve");
                black_box(r.resolved.len())
            })
        });
    }
    group.finish();
}

fn bench_crossfade_tick(c: &mut Criterion) {
    let cfg = Config::default();
    let (contract, clips) = synthetic(128);
    let resolution =
        resolve_against(&contract, Skeleton::default(), &clips, &cfg).expect("resolve");
    let ids: Vec<String> = resolution.resolved.keys().cloned().collect();
    let mut playback = PlaybackController::new(&resolution, &cfg);
    let mut next = 0usize;

    c.bench_function("crossfade_tick", |b| {
        b.iter(|| {
            next = (next + 1) % ids.len();
            playback
                .crossfade_to(&ids[next])
                .expect("resolved id");
            black_box(playback.update(1.0 / 60.0).samples.len())
        })
    });
}

criterion_group!(benches, bench_resolve, bench_crossfade_tick);
criterion_main!(benches);
