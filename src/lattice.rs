// ------------------------------------------------------------------------------- MODULES

mod bc;
mod force;

// ------------------------------------------------------------------------------- IMPORTS

use crate::NodeType::{self, Solid};
use crate::cli::{self, Config};
use crate::constants::*;
use crate::functions;
use crate::io;
use crate::kernel;
use crate::velocity_set::{C, Q, velocity_computation};
use rayon::prelude::*;

// -------------------------------------------------------------------- STRUCT: Parameters

pub struct Parameters {
    pub n: [usize; 2],
    pub inlet_velocity: Float,
    pub viscosity: Float,
    pub node_types: Vec<NodeType>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            n: [40, 20],
            inlet_velocity: 0.05,
            viscosity: 0.02,
            node_types: functions::channel_nodes([40, 20]),
        }
    }
}

// ----------------------------------------------------------------------- STRUCT: Lattice

/// The D2Q9 wind-tunnel lattice.
///
/// All per-cell state lives in flat contiguous arrays addressed by
/// `x + y * width`, populations by `(x + y * width) * Q + direction`.
/// Neighbor access is pure index arithmetic, which is what keeps the
/// per-phase rayon passes free of synchronization.
///
/// Populations are double-buffered: collision writes into `f_star`, streaming
/// reads only `f_star` and writes back into `f`. An in-place single-buffer
/// variant would race under the parallel pull scheme and is treated as a bug.
#[derive(Debug)]
pub struct Lattice {
    n: [usize; 2],
    inlet_velocity: Float,
    tau: Float,
    node_types: Vec<NodeType>,
    f: Vec<Float>,
    f_star: Vec<Float>,
    density: Vec<Float>,
    velocity_x: Vec<Float>,
    velocity_y: Vec<Float>,
    force: [Float; 2],
}

impl Lattice {
    pub fn new(params: Parameters) -> Self {
        let n = params.n;
        let num_nodes = n[0] * n[1];
        if num_nodes != params.node_types.len() {
            panic!(
                "Number of nodes ({num_nodes}) does not match the length of node types ({})",
                params.node_types.len()
            );
        }
        let tau = 0.5 + params.viscosity * CS_2_INV;
        let mut lattice = Lattice {
            n,
            inlet_velocity: params.inlet_velocity,
            tau,
            node_types: params.node_types,
            f: vec![0.0; num_nodes * Q],
            f_star: vec![0.0; num_nodes * Q],
            density: vec![LATTICE_DENSITY; num_nodes],
            velocity_x: vec![0.0; num_nodes],
            velocity_y: vec![0.0; num_nodes],
            force: [0.0, 0.0],
        };
        lattice.initialize_nodes();
        lattice
    }

    pub fn test_default() -> Self {
        Lattice::new(Parameters::default())
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Lattice::new(Parameters::default())
    }
}

impl Lattice {
    pub fn get_nx(&self) -> usize {
        self.n[0]
    }

    pub fn get_ny(&self) -> usize {
        self.n[1]
    }

    pub fn get_n(&self) -> &[usize; 2] {
        &self.n
    }

    pub fn get_number_of_nodes(&self) -> usize {
        self.n[0] * self.n[1]
    }

    pub fn get_tau(&self) -> Float {
        self.tau
    }

    pub fn get_inlet_velocity(&self) -> Float {
        self.inlet_velocity
    }

    /// # Examples
    /// ```
    /// # use lbtunnel::lattice::Lattice;
    /// let lattice = Lattice::test_default();
    ///
    /// assert_eq!(lattice.get_index(3, 7), 3 + 7 * 40);
    /// ```
    pub fn get_index(&self, x: usize, y: usize) -> usize {
        x + y * self.n[0]
    }

    pub fn get_density(&self) -> &[Float] {
        &self.density
    }

    pub fn get_velocity_x(&self) -> &[Float] {
        &self.velocity_x
    }

    pub fn get_velocity_y(&self) -> &[Float] {
        &self.velocity_y
    }

    pub fn get_node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    pub fn get_f(&self, i: usize) -> [Float; Q] {
        std::array::from_fn(|k| self.f[i * Q + k])
    }

    pub fn set_f(&mut self, i: usize, f: [Float; Q]) {
        self.f[i * Q..(i + 1) * Q].copy_from_slice(&f);
    }

    #[cfg(test)]
    pub(crate) fn set_f_star(&mut self, i: usize, f_star: [Float; Q]) {
        self.f_star[i * Q..(i + 1) * Q].copy_from_slice(&f_star);
    }

    /// Replaces the solid mask between steps.
    ///
    /// Populations at cells whose solid/fluid status changed are NOT reset;
    /// the retained state makes geometry updates cheap at the price of a
    /// short nonphysical transient at newly exposed cells.
    pub fn set_node_types(&mut self, node_types: Vec<NodeType>) {
        let num_nodes = self.get_number_of_nodes();
        if num_nodes != node_types.len() {
            panic!(
                "Number of nodes ({num_nodes}) does not match the length of node types ({})",
                node_types.len()
            );
        }
        self.node_types = node_types;
    }
}

impl Lattice {
    /// Equilibrium at uniform density 1; the inlet column starts pre-biased
    /// at the target velocity, everything else at rest.
    pub fn initialize_nodes(&mut self) {
        let [nx, _ny] = self.n;
        let u_in = self.inlet_velocity;
        self.f
            .par_chunks_mut(Q)
            .zip(self.velocity_x.par_iter_mut())
            .zip(self.density.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((f, velocity_x), density))| {
                let u_x = if i % nx == 0 { u_in } else { 0.0 };
                for k in 0..Q {
                    f[k] = kernel::equilibrium(k, LATTICE_DENSITY, u_x, 0.0);
                }
                *velocity_x = u_x;
                *density = LATTICE_DENSITY;
            });
        self.velocity_y.iter_mut().for_each(|u_y| *u_y = 0.0);
    }

    /// BGK relaxation toward local equilibrium, written into the second
    /// buffer. Solid cells are copied through unchanged; bounce-back will
    /// overwrite them after streaming. Their macroscopic state is reset to
    /// density 1 and zero velocity.
    pub fn collision_step(&mut self) {
        let tau = self.tau;
        let f = &self.f;
        let node_types = &self.node_types;
        self.f_star
            .par_chunks_mut(Q)
            .zip(self.density.par_iter_mut())
            .zip(self.velocity_x.par_iter_mut())
            .zip(self.velocity_y.par_iter_mut())
            .enumerate()
            .for_each(|(i, (((f_star, density), velocity_x), velocity_y))| {
                let base = i * Q;
                if matches!(node_types[i], Solid) {
                    f_star.copy_from_slice(&f[base..base + Q]);
                    *density = LATTICE_DENSITY;
                    *velocity_x = 0.0;
                    *velocity_y = 0.0;
                    return;
                }
                let f_cell = &f[base..base + Q];
                let mut rho = f_cell.iter().sum::<Float>();
                if rho <= 0.0 {
                    rho = DENSITY_EPSILON;
                }
                let [u_x, u_y] = velocity_computation(rho, f_cell);
                *density = rho;
                *velocity_x = u_x;
                *velocity_y = u_y;
                for k in 0..Q {
                    let f_eq = kernel::equilibrium(k, rho, u_x, u_y);
                    f_star[k] = kernel::bgk_collision(f[base + k], f_eq, tau);
                }
            });
    }

    /// Pull streaming: every destination cell reads its upstream neighbor's
    /// post-collision value, so the pass only ever reads `f_star` and each
    /// cell writes its own nine slots. When the upstream neighbor lies
    /// outside the grid the local post-collision value is kept — a documented
    /// approximation at domain edges, not to be "corrected".
    pub fn streaming_step(&mut self) {
        let [nx, ny] = self.n;
        let f_star = &self.f_star;
        self.f.par_chunks_mut(Q).enumerate().for_each(|(i, f)| {
            let x = (i % nx) as i32;
            let y = (i / nx) as i32;
            for k in 0..Q {
                let x_up = x - C[k][0];
                let y_up = y - C[k][1];
                if x_up < 0 || x_up >= nx as i32 || y_up < 0 || y_up >= ny as i32 {
                    f[k] = f_star[i * Q + k];
                } else {
                    f[k] = f_star[(x_up as usize + y_up as usize * nx) * Q + k];
                }
            }
        });
    }

    /// Recomputes density and velocity for every cell from the current
    /// populations. Solid cells and cells with non-positive density get zero
    /// velocity; solid cells keep the neutral density 1. This is the state
    /// the presentation layer reads between steps.
    pub fn update_density_and_velocity_step(&mut self) {
        let f = &self.f;
        let node_types = &self.node_types;
        self.density
            .par_iter_mut()
            .zip(self.velocity_x.par_iter_mut())
            .zip(self.velocity_y.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((density, velocity_x), velocity_y))| {
                let base = i * Q;
                let f_cell = &f[base..base + Q];
                let rho = f_cell.iter().sum::<Float>();
                if matches!(node_types[i], Solid) {
                    *density = LATTICE_DENSITY;
                    *velocity_x = 0.0;
                    *velocity_y = 0.0;
                } else if rho <= 0.0 {
                    *density = rho;
                    *velocity_x = 0.0;
                    *velocity_y = 0.0;
                } else {
                    let [u_x, u_y] = velocity_computation(rho, f_cell);
                    *density = rho;
                    *velocity_x = u_x;
                    *velocity_y = u_y;
                }
            });
    }

    /// One discrete time step. The phase order is fixed; callers only ever
    /// observe the state between whole steps.
    pub fn step(&mut self) {
        self.collision_step();
        self.streaming_step();
        let step_force = self.compute_obstacle_force();
        self.force[0] += step_force[0];
        self.force[1] += step_force[1];
        self.bounce_back_step();
        self.inlet_step();
        self.outlet_step();
        self.update_density_and_velocity_step();
    }

    /// Runs `num` steps and returns the per-step arithmetic mean of the
    /// momentum-exchange force. Single-step values are noisy; averaging is
    /// what makes the output usable. An empty batch leaves the lattice
    /// untouched and reports zero force.
    pub fn perform_steps(&mut self, num: usize) -> [Float; 2] {
        if num == 0 {
            return [0.0, 0.0];
        }
        self.force = [0.0, 0.0];
        for _ in 0..num {
            self.step();
        }
        [
            self.force[0] / num as Float,
            self.force[1] / num as Float,
        ]
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

pub fn run(config: Config, params: Parameters) {
    io::create_case_directories().unwrap_or_else(|e| {
        eprintln!("Error while creating the case directories: {e}");
        std::process::exit(1);
    });
    io::print_case(&params, &config);
    let mut lattice = Lattice::new(params);
    let mut step = 0;
    let mut batch = 0;
    while step < config.max_steps {
        let num = usize::from(config.batch_size).min(config.max_steps - step);
        let force = lattice.perform_steps(num);
        step += num;
        batch += 1;
        io::print_force(step, force);
        io::append_force(step, force).unwrap_or_else(|e| {
            eprintln!("Error while writing the force history file: {e}");
            std::process::exit(1);
        });
        if let Some(frequency) = config.write_data {
            if batch % usize::from(frequency) == 0 {
                io::write_fields(&lattice, step).unwrap_or_else(|e| {
                    eprintln!("Error while writing the field files: {e}");
                    std::process::exit(1);
                });
            }
        }
    }
}

pub fn load(params: Parameters) {
    let config = match cli::get_args().and_then(|matches| cli::parse_matches(&matches)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    cli::init_global_pool(config.get_number_of_threads(), config.core_affinity);

    run(config, params);
}
