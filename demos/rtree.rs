use indicatif::{ProgressBar, ProgressStyle};
use rand::{thread_rng, Rng};
use rtree_crdt::rtree::{BoundingBox, Dispatcher, Key, PlainNodeMap, TreeOptions};
use std::time::Duration;

const NUM_STATIC_ELEMENTS: u32 = 512;
const WORLD_HALF_EXTENT: f64 = 256.0;
const MAX_RADIUS: f64 = 16.0;

struct Disk {
    id: u32,
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Disk {
    fn aabb(&self) -> BoundingBox<f64> {
        BoundingBox::from(
            [
                (self.cx - self.radius)..=(self.cx + self.radius),
                (self.cy - self.radius)..=(self.cy + self.radius),
            ]
            .as_slice(),
        )
    }
}

fn main() {
    let mut dispatcher: Dispatcher<f64, PlainNodeMap<f64>> =
        Dispatcher::new(TreeOptions::default().width(8), Default::default());
    let mut rng = thread_rng();

    let mut disks: Vec<Disk> = (0..NUM_STATIC_ELEMENTS)
        .map(|id| Disk {
            id,
            cx: rng.gen_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT),
            cy: rng.gen_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT),
            radius: rng.gen_range(2.0..MAX_RADIUS),
        })
        .collect();

    for disk in &disks {
        dispatcher
            .insert(Key::from(disk.id as i32), disk.aabb())
            .expect("insert should succeed");
    }

    let pb = ProgressBar::new(0);
    pb.set_message("Simulating");
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("[{spinner}] [{elapsed_precise} {per_sec:.cyan/blue}] {msg}"),
    );

    let dt_dur = Duration::from_millis(16);
    let mut previous = std::time::Instant::now();
    let mut cycles: u64 = 0;

    loop {
        cycles += 1;
        let now = std::time::Instant::now();
        if now - previous >= dt_dur {
            pb.inc(cycles);
            cycles = 0;
            previous = now;

            // Jitter every disk a little and move it in the tree.
            for disk in disks.iter_mut() {
                disk.cx += rng.gen_range(-2.0..2.0);
                disk.cy += rng.gen_range(-2.0..2.0);
                dispatcher
                    .update(Key::from(disk.id as i32), disk.aabb())
                    .expect("update should succeed");
            }
        }

        // Query the center of the world as quickly as possible.
        let query_box = BoundingBox::from([-32.0..=32.0, -32.0..=32.0].as_slice());
        let _hits = dispatcher.query(&query_box).expect("tree is initialized");

        if cycles > 10_000 {
            break;
        }
    }
}
