use std::f64::consts::PI;

use anyhow::{Context, Result};

use dbscan_filter::cluster::EARTH_RADIUS_KM;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Offset `(lat, lon)` by a displacement in metres (north, east).
fn offset_metres(lat: f64, lon: f64, north_m: f64, east_m: f64) -> (f64, f64) {
    let km_per_deg = EARTH_RADIUS_KM * PI / 180.0;
    let dlat = north_m / 1000.0 / km_per_deg;
    let dlon = east_m / 1000.0 / (km_per_deg * lat.to_radians().cos());
    (lat + dlat, lon + dlon)
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_points.csv".to_string());
    let mut rng = SimpleRng::new(42);

    // Stops where a tracker lingered: (name, lat, lon, fixes, jitter in metres)
    let stops = [
        ("depot", 59.955982, 30.244759, 40, 8.0),
        ("market", 59.966980, 30.244358, 25, 12.0),
        ("harbour", 59.951557, 30.258387, 30, 10.0),
        ("station", 60.029499, 30.434124, 15, 5.0),
    ];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["latitude", "longitude", "id"])?;

    let mut row_id = 0usize;
    for &(name, lat, lon, fixes, jitter) in &stops {
        for _ in 0..fixes {
            let (plat, plon) = offset_metres(
                lat,
                lon,
                rng.gauss(0.0, jitter),
                rng.gauss(0.0, jitter),
            );
            writer.write_record([
                format!("{plat:.6}"),
                format!("{plon:.6}"),
                format!("{name}-{row_id}"),
            ])?;
            row_id += 1;
        }

        // Fixes recorded while moving on to the next stop.
        for _ in 0..3 {
            let (plat, plon) = offset_metres(
                lat,
                lon,
                (rng.next_f64() - 0.5) * 4000.0,
                (rng.next_f64() - 0.5) * 4000.0,
            );
            writer.write_record([
                format!("{plat:.6}"),
                format!("{plon:.6}"),
                format!("transit-{row_id}"),
            ])?;
            row_id += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {row_id} points to {output_path}");
    Ok(())
}
