use crate::constants::*;
use crate::velocity_set::{C, W};

/// $$ f\_{i}^{\text{eq}} = w\_{i}\rho\left[1+\frac{\mathbf{u}\cdot\mathbf{c}\_{i}}{c\_{s}^{2}}+\frac{\left(\mathbf{u}\cdot\mathbf{c}\_{i}\right)^{2}}{2 c\_{s}^{4}}-\frac{\mathbf{u}\cdot\mathbf{u}}{2 c\_{s}^{2}}\right] $$
///
/// The single equilibrium formula shared by initialization, collision and the
/// inlet reconstruction.
///
/// # Examples
/// ```
/// # use lbtunnel::constants::Float;
/// # use lbtunnel::kernel::equilibrium;
/// let f_eq = (0..9)
///     .map(|i| equilibrium(i, 1.2, 0.05, -0.02))
///     .collect::<Vec<Float>>();
///
/// let density = f_eq.iter().sum::<Float>();
/// assert!((density - 1.2).abs() < 1e-12);
/// ```
pub fn equilibrium(i: usize, density: Float, velocity_x: Float, velocity_y: Float) -> Float {
    let u_dot_c = velocity_x * (C[i][0] as Float) + velocity_y * (C[i][1] as Float);
    let u_dot_u = velocity_x * velocity_x + velocity_y * velocity_y;
    W[i] * density
        * (1.0 + u_dot_c * CS_2_INV + 0.5 * u_dot_c * u_dot_c * CS_4_INV
            - 0.5 * u_dot_u * CS_2_INV)
}

/// BGK relaxation of one population toward its equilibrium value.
pub fn bgk_collision(f_i: Float, f_eq_i: Float, tau: Float) -> Float {
    f_i - DELTA_T * (f_i - f_eq_i) / tau
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::velocity_set::Q;

    #[test]
    fn test_equilibrium_density_moment() {
        let density = 1.1;
        let velocity = [0.07, -0.03];

        let sum = (0..Q)
            .map(|i| equilibrium(i, density, velocity[0], velocity[1]))
            .sum::<Float>();

        assert!((sum - density).abs() < 1e-12);
    }

    #[test]
    fn test_equilibrium_momentum_moments() {
        let density = 0.95;
        let velocity = [-0.04, 0.08];

        let mut momentum = [0.0, 0.0];
        for i in 0..Q {
            let f_eq = equilibrium(i, density, velocity[0], velocity[1]);
            momentum[0] += f_eq * C[i][0] as Float;
            momentum[1] += f_eq * C[i][1] as Float;
        }

        let actual = momentum;
        let target = [density * velocity[0], density * velocity[1]];
        for (a, b) in actual.iter().zip(target.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_equilibrium_at_rest_is_weighted_density() {
        for i in 0..Q {
            let f_eq = equilibrium(i, 1.0, 0.0, 0.0);
            assert!((f_eq - W[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bgk_collision_full_relaxation_at_unit_tau() {
        assert!((bgk_collision(0.3, 0.1, 1.0) - 0.1).abs() < 1e-12);
    }
}
