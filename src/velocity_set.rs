use crate::constants::Float;

pub const D: usize = 2;

pub const Q: usize = 9;

/// Discrete velocity vectors: rest, east, north, west, south, then the four
/// diagonals (NE, NW, SW, SE).
pub const C: [[i32; D]; Q] = [
    [0, 0],
    [1, 0],
    [0, 1],
    [-1, 0],
    [0, -1],
    [1, 1],
    [-1, 1],
    [-1, -1],
    [1, -1],
];

pub const W: [Float; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Direction-to-opposite-direction lookup table.
pub const Q_BAR: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Directions pointing out of the domain at the west face. These survive
/// streaming intact at an inlet column and are the known populations of the
/// Zou/He reconstruction.
pub const Q_WEST_OUTGOING: [usize; 3] = [3, 6, 7];

/// Unrolled momentum sums for the D2Q9 direction ordering above.
pub fn velocity_computation(density: Float, f: &[Float]) -> [Float; D] {
    [
        (1.0 / density) * (f[1] - f[3] + f[5] - f[6] - f[7] + f[8]),
        (1.0 / density) * (f[2] - f[4] + f[5] + f[6] - f[7] - f[8]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions_d2q9() {
        for i in 0..Q {
            let i_bar = Q_BAR[i];
            assert_eq!(C[i_bar][0], -C[i][0]);
            assert_eq!(C[i_bar][1], -C[i][1]);
            assert_eq!(Q_BAR[i_bar], i);
        }
    }

    #[test]
    fn test_weights_sum_to_unity_d2q9() {
        let sum = W.iter().sum::<Float>();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_west_face_outgoing_directions_d2q9() {
        for &i in &Q_WEST_OUTGOING {
            assert_eq!(C[i][0], -1);
        }
    }

    #[test]
    fn test_velocity_computation_d2q9() {
        let density = 1.0;
        let f = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

        let velocity = velocity_computation(density, &f);

        let actual = velocity;
        let target = [-0.2, -0.6];
        for (a, b) in actual.iter().zip(target.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        let density = 0.5;

        let velocity = velocity_computation(density, &f);

        let actual = velocity;
        let target = [-0.4, -1.2];
        for (a, b) in actual.iter().zip(target.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
