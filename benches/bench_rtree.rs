use criterion::{criterion_group, criterion_main, Criterion};
use rand::{thread_rng, Rng};
use rtree_crdt::rtree::{BoundingBox, Dispatcher, Key, PlainNodeMap, TreeOptions};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("insert w=256,h=256,width=8", |b| {
        let mut dispatcher: Dispatcher<f64, PlainNodeMap<f64>> =
            Dispatcher::new(TreeOptions::default().width(8), Default::default());
        let mut rng = thread_rng();
        let mut id: i32 = 0;

        b.iter(|| {
            let x = rng.gen_range(1.0..256.0);
            let y = rng.gen_range(1.0..256.0);
            let hx = rng.gen_range(1.0..16.0);
            let hy = rng.gen_range(1.0..16.0);
            dispatcher
                .insert(
                    Key::from(id),
                    BoundingBox::from([(x - hx)..=(x + hx), (y - hy)..=(y + hy)].as_slice()),
                )
                .expect("insert should work");
            id += 1;
        })
    });

    c.bench_function("query w=256,h=256,width=8,n=512", |b| {
        let mut dispatcher: Dispatcher<f64, PlainNodeMap<f64>> =
            Dispatcher::new(TreeOptions::default().width(8), Default::default());
        let mut rng = thread_rng();
        for id in 0..512 {
            let x = rng.gen_range(1.0..256.0);
            let y = rng.gen_range(1.0..256.0);
            dispatcher
                .insert(
                    Key::from(id),
                    BoundingBox::from([(x - 4.0)..=(x + 4.0), (y - 4.0)..=(y + 4.0)].as_slice()),
                )
                .expect("insert should work");
        }
        let area = BoundingBox::from([64.0..=192.0, 64.0..=192.0].as_slice());

        b.iter(|| dispatcher.query(&area).expect("tree is initialized"))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
