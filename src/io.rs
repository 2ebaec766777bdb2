use crate::NodeType;
use crate::cli::{Config, LbResult};
use crate::constants::Float;
use crate::lattice::{Lattice, Parameters};
use colored::*;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

pub const DATA_PATH: &str = "./data";
pub const PRE_PROCESSING_PATH: &str = "./pre_processing";
pub const DENSITY_FILE: &str = "density.csv";
pub const VELOCITY_FILE: &str = "velocity.csv";
pub const FORCES_FILE: &str = "forces.csv";
pub const OBSTACLE_MAP_FILE: &str = "map.dat";

pub fn create_case_directories() -> io::Result<()> {
    let list_of_paths = [DATA_PATH, PRE_PROCESSING_PATH];
    for path_str in list_of_paths {
        let path = Path::new(path_str);
        if !path.exists() {
            println!("Creating the {} path.\n", path_str.yellow().bold());
            fs::create_dir(path)?;
        }
    }
    Ok(())
}

pub fn print_case(params: &Parameters, config: &Config) {
    println!(
        "Wind tunnel: {} x {} cells, inlet velocity {}, viscosity {}\n",
        params.n[0].to_string().cyan().bold(),
        params.n[1].to_string().cyan().bold(),
        params.inlet_velocity.to_string().cyan().bold(),
        params.viscosity.to_string().cyan().bold(),
    );
    println!(
        "Running {} steps, force averaged over batches of {}.\n",
        config.max_steps.to_string().cyan().bold(),
        config.batch_size.to_string().cyan().bold(),
    );
}

pub fn print_force(step: usize, force: [Float; 2]) {
    println!(
        "step {}: Fx = {}, Fy = {}",
        format!("{step:>8}").green().bold(),
        format!("{:>13.6e}", force[0]).cyan(),
        format!("{:>13.6e}", force[1]).cyan(),
    );
}

/// Appends the batch-averaged force pair to the history file, writing the
/// header on first use.
pub fn append_force(step: usize, force: [Float; 2]) -> LbResult<()> {
    let path = Path::new(DATA_PATH).join(FORCES_FILE);
    let new_file = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if new_file {
        writeln!(file, "step,fx,fy")?;
    }
    writeln!(file, "{step},{:e},{:e}", force[0], force[1])?;
    Ok(())
}

/// Writes the macroscopic fields for one time step under `./data/<step>/`,
/// one cell per line, indexed the same way the lattice is.
pub fn write_fields(lattice: &Lattice, step: usize) -> LbResult<()> {
    let step_path = Path::new(DATA_PATH).join(step.to_string());
    if !step_path.exists() {
        fs::create_dir(&step_path)?;
    }

    let mut density_file = File::create(step_path.join(DENSITY_FILE))?;
    let mut velocity_file = File::create(step_path.join(VELOCITY_FILE))?;
    writeln!(density_file, "x,y,density")?;
    writeln!(velocity_file, "x,y,ux,uy")?;
    for y in 0..lattice.get_ny() {
        for x in 0..lattice.get_nx() {
            let i = lattice.get_index(x, y);
            writeln!(density_file, "{x},{y},{:e}", lattice.get_density()[i])?;
            writeln!(
                velocity_file,
                "{x},{y},{:e},{:e}",
                lattice.get_velocity_x()[i],
                lattice.get_velocity_y()[i],
            )?;
        }
    }
    Ok(())
}

/// Parses a whitespace-separated 0/1 obstacle map. Rows in the file read
/// top-down, so they are reversed into the bottom-up lattice indexing.
pub fn read_obstacle_map<P>(path: P) -> LbResult<Vec<NodeType>>
where
    P: AsRef<Path>,
{
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    let mut rows = contents
        .trim()
        .lines()
        .map(|line| {
            line.split_whitespace()
                .map(|value| {
                    let value = value.parse::<i32>().unwrap();
                    match value {
                        0 => NodeType::Fluid,
                        1 => NodeType::Solid,
                        _ => panic!("Invalid value in obstacle map: {value}"),
                    }
                })
                .collect::<Vec<NodeType>>()
        })
        .collect::<Vec<Vec<NodeType>>>();
    rows.reverse();
    Ok(rows.concat())
}
