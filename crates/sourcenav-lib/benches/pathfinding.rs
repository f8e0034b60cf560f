use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use sourcenav_lib::{
    find_path_default, AreaExtent, AreaId, Direction, NavArea, NavMesh, NavMeshBuilder, Vector3,
};
use std::hint::black_box;

const GRID: u32 = 48;
const CELL: f32 = 32.0;

fn cell_id(col: u32, row: u32) -> AreaId {
    row * GRID + col + 1
}

// Gently sloped grid of square areas, each connected to its four neighbours.
fn grid_mesh() -> NavMesh {
    let mut builder = NavMeshBuilder::new();
    for row in 0..GRID {
        for col in 0..GRID {
            let x = col as f32 * CELL - 768.0;
            let y = row as f32 * CELL - 768.0;
            let z = (col + row) as f32;
            let mut area = NavArea::new(
                cell_id(col, row),
                AreaExtent::flat((x, y), (x + CELL, y + CELL), z),
            );
            if row > 0 {
                area.connect(cell_id(col, row - 1), Direction::North);
            }
            if col + 1 < GRID {
                area.connect(cell_id(col + 1, row), Direction::East);
            }
            if row + 1 < GRID {
                area.connect(cell_id(col, row + 1), Direction::South);
            }
            if col > 0 {
                area.connect(cell_id(col - 1, row), Direction::West);
            }
            builder.add_area(area);
        }
    }
    builder.link()
}

static MESH: Lazy<NavMesh> = Lazy::new(grid_mesh);

fn benchmark_pathfinding(c: &mut Criterion) {
    let mesh = &*MESH;

    c.bench_function("quadtree_point_lookup", |b| {
        let point = Vector3::new(101.0, -233.0, 500.0);
        b.iter(|| black_box(mesh.find_area(black_box(point), true).map(|area| area.id)));
    });

    c.bench_function("astar_grid_corner_to_corner", |b| {
        let goal = cell_id(GRID - 1, GRID - 1);
        b.iter(|| {
            let path = find_path_default(mesh, 1, goal).expect("grid is connected");
            black_box(path.len())
        });
    });

    c.bench_function("astar_grid_short_hop", |b| {
        let start = cell_id(GRID / 2, GRID / 2);
        let goal = cell_id(GRID / 2 + 3, GRID / 2 - 2);
        b.iter(|| {
            let path = find_path_default(mesh, start, goal).expect("grid is connected");
            black_box(path.cost())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
