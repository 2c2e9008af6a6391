use num_complex::Complex64;
use std::f64::consts::PI;

/// Discrete sine transforms of types II and III, the real-to-real pair that
/// carries radially symmetric functions between real and wavenumber space.
///
/// When the grid length is a power of two the transforms run through a
/// radix-2 complex FFT over an odd-antisymmetric embedding of length 4N;
/// otherwise they fall back to direct summation. Both paths evaluate the
/// same sums:
///
///   DST-II:  y[k] = 2 * sum_n x[n] * sin(pi*(k+1)*(2n+1)/(2N))
///   DST-III: y[k] = x[N-1]*(-1)^k + 2 * sum_{n<N-1} x[n] * sin(pi*(2k+1)*(n+1)/(2N))
///
/// The unnormalized pair satisfies DST-III(DST-II(x)) = 2N * x.
#[derive(Debug, Clone)]
pub struct SineTransformPlan {
    length: usize,
    fft: Option<Fft>,
}

impl SineTransformPlan {
    pub fn new(length: usize) -> Self {
        let fft = if length > 0 && length.is_power_of_two() {
            Some(Fft::new(4 * length))
        } else {
            None
        };
        Self { length, fft }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn dst_ii(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.length,
            "sine transform input length mismatch"
        );

        match &self.fft {
            Some(fft) => {
                let size = fft.size();
                let mut buffer = vec![Complex64::new(0.0, 0.0); size];
                for (index, &value) in input.iter().enumerate() {
                    let position = 2 * index + 1;
                    buffer[position] = Complex64::new(value, 0.0);
                    buffer[size - position] = Complex64::new(-value, 0.0);
                }
                fft.forward(&mut buffer);

                (0..self.length).map(|k| -buffer[k + 1].im).collect()
            }
            None => dst_ii_direct(input),
        }
    }

    pub fn dst_iii(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.length,
            "sine transform input length mismatch"
        );

        match &self.fft {
            Some(fft) => {
                let size = fft.size();
                let last = self.length - 1;
                let mut buffer = vec![Complex64::new(0.0, 0.0); size];
                for (index, &value) in input.iter().enumerate() {
                    let value = if index == last { value / 2.0 } else { value };
                    let position = index + 1;
                    buffer[position] = Complex64::new(value, 0.0);
                    buffer[size - position] = Complex64::new(-value, 0.0);
                }
                fft.forward(&mut buffer);

                (0..self.length).map(|k| -buffer[2 * k + 1].im).collect()
            }
            None => dst_iii_direct(input),
        }
    }
}

fn dst_ii_direct(input: &[f64]) -> Vec<f64> {
    let length = input.len();
    let scale = PI / (2.0 * length as f64);
    (0..length)
        .map(|k| {
            let mut sum = 0.0;
            for (n, &value) in input.iter().enumerate() {
                sum += value * (scale * ((k + 1) * (2 * n + 1)) as f64).sin();
            }
            2.0 * sum
        })
        .collect()
}

fn dst_iii_direct(input: &[f64]) -> Vec<f64> {
    let length = input.len();
    let last = length - 1;
    let scale = PI / (2.0 * length as f64);
    (0..length)
        .map(|k| {
            let parity = if k % 2 == 0 { 1.0 } else { -1.0 };
            let mut sum = input[last] * parity / 2.0;
            for (n, &value) in input[..last].iter().enumerate() {
                sum += value * (scale * ((2 * k + 1) * (n + 1)) as f64).sin();
            }
            2.0 * sum
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Fft {
    size: usize,
    twiddles: Vec<Complex64>,
}

impl Fft {
    fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        let twiddles = (0..size / 2)
            .map(|index| Complex64::from_polar(1.0, -2.0 * PI * index as f64 / size as f64))
            .collect();
        Self { size, twiddles }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn forward(&self, buffer: &mut [Complex64]) {
        let size = self.size;
        debug_assert_eq!(buffer.len(), size);

        let mut target = 0_usize;
        for index in 1..size {
            let mut bit = size >> 1;
            while target & bit != 0 {
                target ^= bit;
                bit >>= 1;
            }
            target |= bit;
            if index < target {
                buffer.swap(index, target);
            }
        }

        let mut span = 2;
        while span <= size {
            let half = span / 2;
            let stride = size / span;
            for start in (0..size).step_by(span) {
                for offset in 0..half {
                    let twiddle = self.twiddles[offset * stride];
                    let even = buffer[start + offset];
                    let odd = buffer[start + offset + half] * twiddle;
                    buffer[start + offset] = even + odd;
                    buffer[start + offset + half] = even - odd;
                }
            }
            span *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{dst_ii_direct, dst_iii_direct, SineTransformPlan};

    fn sample_curve(length: usize) -> Vec<f64> {
        (0..length)
            .map(|index| (0.37 * index as f64).sin() + 0.25 * (0.11 * index as f64).cos())
            .collect()
    }

    #[test]
    fn fft_path_matches_direct_summation() {
        let length = 32;
        let plan = SineTransformPlan::new(length);
        let input = sample_curve(length);

        let fast_ii = plan.dst_ii(&input);
        let slow_ii = dst_ii_direct(&input);
        for (fast, slow) in fast_ii.iter().zip(&slow_ii) {
            assert!((fast - slow).abs() < 1.0e-10, "DST-II {fast} vs {slow}");
        }

        let fast_iii = plan.dst_iii(&input);
        let slow_iii = dst_iii_direct(&input);
        for (fast, slow) in fast_iii.iter().zip(&slow_iii) {
            assert!((fast - slow).abs() < 1.0e-10, "DST-III {fast} vs {slow}");
        }
    }

    #[test]
    fn type_iii_inverts_type_ii_up_to_two_n() {
        for length in [16_usize, 21, 64] {
            let plan = SineTransformPlan::new(length);
            let input = sample_curve(length);

            let forward = plan.dst_ii(&input);
            let recovered = plan.dst_iii(&forward);

            let scale = 2.0 * length as f64;
            for (index, (&original, &value)) in input.iter().zip(&recovered).enumerate() {
                assert!(
                    (value / scale - original).abs() < 1.0e-9,
                    "length {length}, entry {index}: {} vs {original}",
                    value / scale
                );
            }
        }
    }
}
