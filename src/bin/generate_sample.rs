use chrono::{NaiveDate, TimeDelta};

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Daily temperature curve: coolest before dawn, warmest mid-afternoon.
fn room_temperature(hour_of_day: f64) -> f64 {
    let phase = (hour_of_day - 15.0) / 24.0 * std::f64::consts::TAU;
    24.0 + 3.5 * phase.cos()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();
    let step = TimeDelta::minutes(10);
    let readings = 2 * 24 * 6; // two days at a 10-minute cadence

    let output_path = "sample_temperatures.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    // A title row above the real header exercises the header scan.
    writer
        .write_record(["房间温度记录", "", ""])
        .expect("Failed to write title row");
    writer
        .write_record(["备注", "时间", "室内温度(°C)"])
        .expect("Failed to write header row");

    let mut t = start;
    for _ in 0..readings {
        let hour = t.and_utc().timestamp().rem_euclid(86_400) as f64 / 3600.0;
        let temperature = room_temperature(hour) + rng.gauss(0.0, 0.15);
        writer
            .write_record([
                "",
                &t.format("%Y年%m月%d日 %H:%M").to_string(),
                &format!("{temperature:.1}°C"),
            ])
            .expect("Failed to write data row");
        t += step;
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {readings} readings to {output_path}");
}
