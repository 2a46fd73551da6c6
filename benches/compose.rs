use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rackview::{
    Compositor, DisplayColor, ElevationRegistry, EquipmentModel, MountedAsset, Rack, RackId,
};

fn dense_rack() -> (Rack, Vec<MountedAsset>) {
    let rack = Rack::new(RackId::new('A', 1), 48);
    let model = EquipmentModel::new("Acme", "X1", 2, DisplayColor::rgb(0x20, 0x60, 0xa0));
    let assets = (0..24)
        .map(|i| MountedAsset::new(i, (i as u16) * 2 + 1, model.clone()))
        .collect();
    (rack, assets)
}

fn compose_dense_rack(c: &mut Criterion) {
    let (rack, assets) = dense_rack();
    let compositor = Compositor::new();
    c.bench_function("compose_dense_rack", |b| {
        b.iter(|| compositor.compose(black_box(&rack), black_box(&assets)));
    });
}

fn registry_sync_warm_cache(c: &mut Criterion) {
    let (rack, assets) = dense_rack();
    let compositor = Compositor::new();
    let mut registry = ElevationRegistry::new();
    registry.sync(&rack, &assets, &compositor).expect("sync");
    c.bench_function("registry_sync_warm_cache", |b| {
        b.iter(|| {
            registry
                .sync(black_box(&rack), black_box(&assets), &compositor)
                .expect("sync");
        });
    });
}

criterion_group!(benches, compose_dense_rack, registry_sync_warm_cache);
criterion_main!(benches);
