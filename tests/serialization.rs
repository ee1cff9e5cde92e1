use glam::{Vec2, Vec4};
use serde_json::json;
use tua_assets::{
    catalog::{LineStyle, Map, MapLayer, MapLayerQuads, Quad, QuadKeyFrame, Sprite},
    load_package, save_package, Asset, AssetCollection, AssetError, AssetPath, AssetRegistry,
    LoadOptions, Record, SaveLoadContext, TuaPackage, TuaRecord,
};

fn sample_collection() -> AssetCollection {
    let mut collection = AssetCollection::new();
    let mut sprite = Sprite::default();
    sprite.set_name("tile");
    sprite.width = 2;
    sprite.height = 2;
    let sprite = collection.insert(sprite);

    let mut map = Map::default();
    map.set_name("level 1");
    map.camera = Vec2::new(10.0, 20.0);
    let map = collection.insert(map);

    let mut layer = MapLayerQuads::default();
    layer.set_name("decor");
    layer.parent_path = map;
    layer.quads.push(Quad {
        sprite_path: sprite,
        angle: 0.5,
        keyframes: vec![
            QuadKeyFrame::default(),
            QuadKeyFrame {
                time: 1.0,
                color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            },
        ],
        ..Quad::default()
    });
    layer.focus = MapLayerQuads::keyframe_path(0, 1);
    let layer = collection.insert(layer);

    collection
        .get_mut::<Map>(map)
        .unwrap()
        .layers
        .push(MapLayer {
            path: layer,
            visible: false,
        });
    collection
}

#[test]
fn test_record_form() {
    let registry = AssetRegistry::with_catalog();
    let ctx = SaveLoadContext::new(&registry);
    let mut style = LineStyle::default();
    style.set_name("rail");
    style.sprite_path = AssetPath::of::<Sprite>(3);

    let record = style.write_tua(&ctx).unwrap();
    assert_eq!(
        serde_json::Value::Object(record.clone()),
        json!({ "name": "rail", "sprite_path": { "type": "Sprite", "key": 3 } })
    );

    let mut restored = LineStyle::default();
    restored.read_tua(&ctx, &record).unwrap();
    assert_eq!(restored, style);
}

#[test]
fn test_sub_path_and_array_form() {
    let registry = AssetRegistry::with_catalog();
    let ctx = SaveLoadContext::new(&registry);
    let collection = sample_collection();
    let layer = collection
        .get::<MapLayerQuads>(AssetPath::of::<MapLayerQuads>(0))
        .unwrap();

    let record = layer.write_tua(&ctx).unwrap();
    assert_eq!(
        record["focus"],
        json!([[MapLayerQuads::QUADS.0, 0], [Quad::KEYFRAMES.0, 1]])
    );
    assert_eq!(record["quads"][0]["keyframes"][1]["time"], json!(1.0));
    assert_eq!(record["parent_path"], json!({ "type": "Map", "key": 0 }));
}

#[test]
fn test_missing_fields_keep_defaults() {
    let registry = AssetRegistry::with_catalog();
    let ctx = SaveLoadContext::new(&registry);
    let record: TuaRecord = serde_json::from_value(json!({ "name": "bare", "quads": [{}] })).unwrap();

    let mut layer = MapLayerQuads::default();
    layer.read_tua(&ctx, &record).unwrap();
    assert_eq!(layer.name(), "bare");
    assert!(layer.focus.is_null());
    assert_eq!(layer.quads, vec![Quad::default()]);
}

#[test]
fn test_malformed_field_is_reported() {
    let registry = AssetRegistry::with_catalog();
    let ctx = SaveLoadContext::new(&registry);
    let record: TuaRecord = serde_json::from_value(json!({ "width": "wide" })).unwrap();

    let mut sprite = Sprite::default();
    let err = sprite.read_tua(&ctx, &record).unwrap_err();
    assert!(matches!(err, AssetError::MalformedField { field: "width", .. }));
}

#[test]
fn test_package_round_trip() {
    let registry = AssetRegistry::with_catalog();
    let collection = sample_collection();

    let text = save_package(&collection, &registry)
        .unwrap()
        .to_json_string()
        .unwrap();
    let package = TuaPackage::from_json_string(&text).unwrap();
    let (restored, report) = load_package(&package, &registry, &LoadOptions::new().strict_references(true));

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.loaded, collection.len());
    for path in collection.paths() {
        let before = collection.get_dyn(path).unwrap();
        let after = restored.get_dyn(path).unwrap();
        assert_eq!(after.asset_name(), before.asset_name());
    }
    assert_eq!(
        restored.get::<MapLayerQuads>(AssetPath::of::<MapLayerQuads>(0)),
        collection.get::<MapLayerQuads>(AssetPath::of::<MapLayerQuads>(0))
    );
    assert_eq!(
        restored.get::<Map>(AssetPath::of::<Map>(0)),
        collection.get::<Map>(AssetPath::of::<Map>(0))
    );
    let layer = restored
        .get::<MapLayerQuads>(AssetPath::of::<MapLayerQuads>(0))
        .unwrap();
    assert_eq!(
        layer.get_value(QuadKeyFrame::TIME, &layer.focus, 0.0f32),
        1.0
    );
}

#[test]
fn test_file_round_trip() {
    let registry = AssetRegistry::with_catalog();
    let package = save_package(&sample_collection(), &registry).unwrap();
    let path = std::env::temp_dir().join(format!("tua_assets_{}.json", std::process::id()));

    package.save_to_file(&path).unwrap();
    let loaded = TuaPackage::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, package);

    assert!(matches!(
        TuaPackage::load_from_file(&path),
        Err(AssetError::IoError(_))
    ));
}
