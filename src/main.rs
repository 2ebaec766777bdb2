use lbtunnel::functions;
use lbtunnel::io::{OBSTACLE_MAP_FILE, PRE_PROCESSING_PATH};
use lbtunnel::lattice;
use std::path::Path;

fn main() {
    let n = [300, 120];

    let map_path = Path::new(PRE_PROCESSING_PATH).join(OBSTACLE_MAP_FILE);
    let node_types = if map_path.exists() {
        functions::from_obstacle_map_file()
    } else {
        functions::disk_in_channel(
            n,
            [n[0] as f64 / 4.0, n[1] as f64 / 2.0],
            n[1] as f64 / 10.0,
        )
    };

    let parameters = lattice::Parameters {
        n,
        inlet_velocity: 0.05,
        viscosity: 0.02,
        node_types,
    };

    lattice::load(parameters);
}
