use super::Lattice;
use crate::NodeType::Solid;
use crate::constants::Float;
use crate::velocity_set::{Q, Q_BAR, Q_WEST_OUTGOING};
use rayon::prelude::*;

impl Lattice {
    /// Half-way bounce-back: every solid cell replaces each direction with
    /// the just-streamed population of the opposite direction. All nine
    /// values are read before any is written, which keeps the reflection a
    /// pure per-cell permutation.
    pub(crate) fn bounce_back_step(&mut self) {
        let node_types = &self.node_types;
        self.f
            .par_chunks_mut(Q)
            .zip(node_types.par_iter())
            .for_each(|(f, node_type)| {
                if matches!(node_type, Solid) {
                    let reflected: [Float; Q] = std::array::from_fn(|k| f[Q_BAR[k]]);
                    f.copy_from_slice(&reflected);
                }
            });
    }

    /// Zou/He velocity inlet on the west face, excluding the top and bottom
    /// boundary rows. The rest population, the vertical pair and the three
    /// outgoing populations survived streaming intact; the local density and
    /// the three incoming populations are reconstructed so that the cell ends
    /// up with velocity (u_in, 0) exactly.
    pub(crate) fn inlet_step(&mut self) {
        let [nx, ny] = self.n;
        if nx == 0 {
            return;
        }
        let u_in = self.inlet_velocity;
        for y in 1..ny.saturating_sub(1) {
            let i = y * nx;
            if matches!(self.node_types[i], Solid) {
                continue;
            }
            let base = i * Q;
            let f = &mut self.f;
            let outgoing = Q_WEST_OUTGOING
                .iter()
                .map(|&k| f[base + k])
                .sum::<Float>();
            let rho = (f[base] + f[base + 2] + f[base + 4] + 2.0 * outgoing) / (1.0 - u_in);
            f[base + 1] = f[base + 3] + (2.0 / 3.0) * rho * u_in;
            f[base + 5] =
                f[base + 7] + 0.5 * (f[base + 4] - f[base + 2]) + (1.0 / 6.0) * rho * u_in;
            f[base + 8] =
                f[base + 6] + 0.5 * (f[base + 2] - f[base + 4]) + (1.0 / 6.0) * rho * u_in;
        }
    }

    /// Zero-gradient outlet on the east face: copy all nine populations from
    /// the second-to-last column. Crude and not strictly momentum-conserving,
    /// which is the intended behavior of this open boundary.
    pub(crate) fn outlet_step(&mut self) {
        let [nx, ny] = self.n;
        if nx < 2 {
            return;
        }
        for y in 1..ny.saturating_sub(1) {
            let i = y * nx + nx - 1;
            if matches!(self.node_types[i], Solid) {
                continue;
            }
            for k in 0..Q {
                self.f[i * Q + k] = self.f[(i - 1) * Q + k];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Parameters;
    use super::*;
    use crate::functions;
    use crate::velocity_set::velocity_computation;

    #[test]
    fn test_inlet_reconstruction_hits_target_velocity_exactly() {
        let mut lattice = Lattice::test_default();
        let i = lattice.get_index(0, 7);
        lattice.set_f(i, [0.44, 0.11, 0.12, 0.10, 0.115, 0.03, 0.025, 0.028, 0.032]);

        lattice.inlet_step();

        let f = lattice.get_f(i);
        let rho = f.iter().sum::<Float>();
        let target_rho = (0.44 + 0.12 + 0.115 + 2.0 * (0.10 + 0.025 + 0.028)) / (1.0 - 0.05);
        assert!((rho - target_rho).abs() < 1e-12);

        let velocity = velocity_computation(rho, &f);
        assert!((velocity[0] - 0.05).abs() < 1e-12);
        assert!(velocity[1].abs() < 1e-12);
    }

    #[test]
    fn test_inlet_skips_solid_and_boundary_rows() {
        let n = [5, 5];
        let mut node_types = functions::channel_nodes(n);
        node_types[2 * 5] = Solid; // solid cell inside the inlet column
        let mut lattice = Lattice::new(Parameters {
            n,
            node_types,
            ..Default::default()
        });

        let solid = lattice.get_index(0, 2);
        let bottom = lattice.get_index(0, 0);
        lattice.set_f(solid, [0.2; Q]);
        lattice.set_f(bottom, [0.3; Q]);

        lattice.inlet_step();

        for value in lattice.get_f(solid) {
            assert!((value - 0.2).abs() < 1e-12);
        }
        for value in lattice.get_f(bottom) {
            assert!((value - 0.3).abs() < 1e-12);
        }
    }

    #[test]
    fn test_outlet_copies_from_second_to_last_column() {
        let mut lattice = Lattice::test_default();
        let source = lattice.get_index(38, 9);
        let target = lattice.get_index(39, 9);
        lattice.set_f(source, [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
        lattice.set_f(target, [1.0; Q]);

        lattice.outlet_step();

        let actual = lattice.get_f(target);
        let expected = lattice.get_f(source);
        for (a, b) in actual.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bounce_back_leaves_fluid_cells_untouched() {
        let mut lattice = Lattice::test_default();
        let i = lattice.get_index(20, 10);
        lattice.set_f(i, [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);

        lattice.bounce_back_step();

        let actual = lattice.get_f(i);
        let target = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        for (a, b) in actual.iter().zip(target.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
