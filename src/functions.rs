use crate::NodeType::{self, Fluid, Solid};
use crate::constants::Float;
use std::path::Path;

pub fn only_fluid_nodes(n: [usize; 2]) -> Vec<NodeType> {
    vec![Fluid; n[0] * n[1]]
}

/// Solid top and bottom rows, fluid everywhere else: the wind-tunnel channel.
pub fn channel_nodes(n: [usize; 2]) -> Vec<NodeType> {
    let [nx, ny] = n;
    let mut node_types = vec![Fluid; nx * ny];
    if ny == 0 {
        return node_types;
    }
    for x in 0..nx {
        node_types[x] = Solid;
        node_types[x + (ny - 1) * nx] = Solid;
    }
    node_types
}

/// Channel walls plus a solid disk obstacle centered at `center` (in cell
/// units, fractional centers allowed).
pub fn disk_in_channel(n: [usize; 2], center: [Float; 2], radius: Float) -> Vec<NodeType> {
    let [nx, ny] = n;
    let mut node_types = channel_nodes(n);
    for y in 0..ny {
        for x in 0..nx {
            let d_x = x as Float - center[0];
            let d_y = y as Float - center[1];
            if d_x * d_x + d_y * d_y <= radius * radius {
                node_types[x + y * nx] = Solid;
            }
        }
    }
    node_types
}

/// Reads the obstacle mask written by the external geometry tooling from the
/// pre-processing directory.
pub fn from_obstacle_map_file() -> Vec<NodeType> {
    let pre_processing_path = Path::new(crate::io::PRE_PROCESSING_PATH);
    let path = pre_processing_path.join(crate::io::OBSTACLE_MAP_FILE);
    crate::io::read_obstacle_map(path).unwrap_or_else(|e| {
        eprintln!("Error reading the obstacle map file: {e}");
        std::process::exit(1);
    })
}
