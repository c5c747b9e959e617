use std::path::Path;

use anyhow::{Context, Result};

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

fn mean_var(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

/// Standard normal CDF (Abramowitz & Stegun 7.1.26 via erf).
fn normal_cdf(z: f64) -> f64 {
    let x = z.abs() / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let erf = 1.0 - poly * (-x * x).exp();
    if z >= 0.0 { 0.5 * (1.0 + erf) } else { 0.5 * (1.0 - erf) }
}

/// Welch t, two-sided normal-approximation p-value, pooled Cohen's d.
/// `None` when either group has fewer than two samples.
fn compare(group: &[f64], neutral: &[f64]) -> Option<(f64, f64, f64)> {
    if group.len() < 2 || neutral.len() < 2 {
        return None;
    }
    let (m1, v1) = mean_var(group);
    let (m0, v0) = mean_var(neutral);
    let (n1, n0) = (group.len() as f64, neutral.len() as f64);
    let t = (m1 - m0) / (v1 / n1 + v0 / n0).sqrt();
    let p = 2.0 * (1.0 - normal_cdf(t.abs()));
    let pooled = (((n1 - 1.0) * v1 + (n0 - 1.0) * v0) / (n1 + n0 - 2.0)).sqrt();
    Some((t, p, (m1 - m0) / pooled))
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_default()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data directory")?;

    // (gene, amplification shift, deletion shift, deletion samples)
    let genes: [(&str, f64, f64, usize); 10] = [
        ("EGFR", 1.4, -0.1, 6),
        ("ERBB2", 1.1, 0.0, 5),
        ("MYC", 0.6, -0.2, 7),
        ("CCND1", 0.9, 0.1, 4),
        ("PTEN", 0.0, -1.3, 9),
        ("CDKN2A", 0.1, -0.9, 8),
        ("RB1", -0.1, -0.7, 6),
        ("TP53", 0.2, -0.4, 5),
        ("GAPDH", 0.0, 0.0, 6),
        ("SMAD4", 0.0, -1.0, 1),
    ];

    let mut cnv = csv::Writer::from_path(out_dir.join("cnv_prot_boxplot.csv"))
        .context("creating measurement file")?;
    cnv.write_record(["Gene", "CNA", "Protein"])?;

    let mut stats = csv::Writer::from_path(out_dir.join("per_gene_stats_filtered.csv"))
        .context("creating statistics file")?;
    stats.write_record([
        "Gene",
        "T-statistic (Amplification vs Neutral)",
        "P-value (Amplification vs Neutral)",
        "Cohen's d (Amplification vs Neutral)",
        "T-statistic (Deletion vs Neutral)",
        "P-value (Deletion vs Neutral)",
        "Cohen's d (Deletion vs Neutral)",
    ])?;

    let mut rows = 0usize;
    for &(gene, amp_shift, del_shift, n_del) in &genes {
        // GISTIC scores: -2/-1 deletion, 0 neutral, 1/2 amplification
        let groups: [(i32, usize, f64); 5] = [
            (-2, n_del / 2, del_shift * 1.3),
            (-1, n_del - n_del / 2, del_shift),
            (0, 30, 0.0),
            (1, 8, amp_shift),
            (2, 4, amp_shift * 1.3),
        ];

        let mut deletion = Vec::new();
        let mut neutral = Vec::new();
        let mut amplification = Vec::new();
        for &(score, n, shift) in &groups {
            for _ in 0..n {
                let value = rng.gauss(shift, 1.0);
                cnv.write_record([gene.to_string(), score.to_string(), format!("{value:.5}")])?;
                rows += 1;
                match score {
                    s if s < 0 => deletion.push(value),
                    0 => neutral.push(value),
                    _ => amplification.push(value),
                }
            }
        }

        let amp = compare(&amplification, &neutral);
        let del = compare(&deletion, &neutral);
        stats.write_record([
            gene.to_string(),
            opt(amp.map(|s| s.0)),
            opt(amp.map(|s| s.1)),
            opt(amp.map(|s| s.2)),
            opt(del.map(|s| s.0)),
            opt(del.map(|s| s.1)),
            opt(del.map(|s| s.2)),
        ])?;
    }

    cnv.flush()?;
    stats.flush()?;

    println!(
        "Wrote {rows} measurements and statistics for {} genes to {}",
        genes.len(),
        out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((normal_cdf(1.959964) - 0.975).abs() < 1e-4);
        assert!((normal_cdf(-1.959964) - 0.025).abs() < 1e-4);
    }

    #[test]
    fn compare_needs_two_samples_per_group() {
        assert!(compare(&[1.0], &[0.0, 1.0]).is_none());
        let (t, p, d) = compare(&[2.0, 3.0, 4.0], &[0.0, 1.0, 2.0]).unwrap();
        assert!(t > 0.0 && d > 0.0);
        assert!(p > 0.0 && p < 1.0);
    }
}
