use std::error::Error;

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

/// Emit a deliberately messy lab export for exercising the cleaner:
/// unstandardized headers, sentinel tokens, malformed dates, empty cells,
/// and a sprinkling of exact duplicate rows.
fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = SimpleRng::new(42);

    let samples = ["A1", "A2", "B1", "B2", "C1"];
    let operators = ["Alice", "Bob"];
    let dates = ["2024-03-01", "2024-03-02", "03/04/2024", "2024-03-05"];

    let output_path = "sample_lab_data.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["Sample_ID", "Test_Date", "Temp (°C)", "Result_Value", "Operator"])?;

    let mut rows = 0usize;
    for (run, &date) in dates.iter().enumerate() {
        for (i, &sample) in samples.iter().enumerate() {
            let index = run * samples.len() + i;

            let date_field = if index % 9 == 3 { "pending" } else { date };

            let temp = if index % 7 == 2 {
                "N/A".to_string()
            } else {
                format!("{:.1}", rng.gauss(21.0, 1.5))
            };

            let result = if index % 11 == 5 {
                "<0.3".to_string()
            } else {
                format!("{:.3}", rng.gauss(2.5, 0.8).abs())
            };

            let operator = if index % 13 == 7 {
                ""
            } else {
                operators[index % operators.len()]
            };

            let record = [sample, date_field, temp.as_str(), result.as_str(), operator];
            writer.write_record(record)?;
            rows += 1;

            // Exact duplicate of every tenth row, as lab merges tend to leave.
            if index % 10 == 4 {
                writer.write_record(record)?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
