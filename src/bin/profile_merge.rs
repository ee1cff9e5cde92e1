use std::{fs::File, time::Instant};

use tua_assets::catalog::{LineStyle, MapLayerQuads, Quad, Sprite};
use tua_assets::{load_package, save_package, AssetCollection, AssetPath, AssetRegistry, LoadOptions};

fn build_collection(layers: usize) -> AssetCollection {
    let mut collection = AssetCollection::new();
    let sprites: Vec<_> = (0..32).map(|_| collection.insert(Sprite::default())).collect();
    for i in 0..layers {
        let mut layer = MapLayerQuads::default();
        layer.quads = (0..8)
            .map(|q| Quad {
                sprite_path: sprites[(i + q) % sprites.len()],
                ..Quad::default()
            })
            .collect();
        collection.insert(layer);
        collection.insert(LineStyle {
            sprite_path: sprites[i % sprites.len()],
            ..LineStyle::default()
        });
    }
    collection
}

#[tracing::instrument(skip(base, incoming))]
fn profile_merges(base: &mut AssetCollection, incoming: &AssetCollection, count: usize) {
    for i in 0..count {
        if i % 10 == 0 {
            tracing::info!("Merging batch {}/{}", i, count);
        }
        base.merge(incoming.clone());
    }
}

fn main() -> tua_assets::Result<()> {
    // Set up tracing subscriber to write to a file
    let file = File::create("trace.json")?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::TRACE)
        .init();

    let registry = AssetRegistry::with_catalog();

    println!("Round-tripping package...");
    let package = save_package(&build_collection(1_000), &registry)?;
    let (mut base, report) = load_package(&package, &registry, &LoadOptions::default());
    println!("Loaded {} assets, {} failures", report.loaded, report.failures.len());

    println!("Profiling merge of 100 batches...");
    let incoming = build_collection(100);
    let start = Instant::now();
    profile_merges(&mut base, &incoming, 100);
    println!("Merge complete in: {:?}", start.elapsed());

    println!("Profiling cascading deletes...");
    let start = Instant::now();
    for _ in 0..16 {
        base.delete(AssetPath::of::<Sprite>(0))?;
    }
    println!("Deletes complete in: {:?}", start.elapsed());
    println!(
        "{} assets, {} dangling references",
        base.len(),
        base.dangling_references().len()
    );
    Ok(())
}
