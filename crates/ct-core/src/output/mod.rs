//! Report rendering: pretty JSON, Markdown tables or a one-line summary.
//!
//! The entropy trajectory of an estimation report is thinned to every
//! `trajectory_stride`-th position here, at render time; the report itself
//! always holds the full trajectory.

use crate::run::{CheckReport, EstimationReport, LikelihoodReport, ModelSummary, SequenceOrigin};
use ct_common::{OutputFormat, Result};
use serde::Serialize;
use std::fmt::Write;

/// A report that can be rendered in every [`OutputFormat`].
pub trait Render: Serialize {
    fn to_markdown(&self) -> String;
    fn to_summary(&self) -> String;
}

/// Render `report` as `format`.
pub fn render<R: Render>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Md => Ok(report.to_markdown()),
        OutputFormat::Summary => Ok(report.to_summary()),
    }
}

/// Render an estimation report with its trajectory thinned by the report's
/// stride.
pub fn render_estimation(report: &EstimationReport, format: OutputFormat) -> Result<String> {
    if report.trajectory_stride <= 1 {
        return render(report, format);
    }
    let mut thinned = report.clone();
    thinned.estimate.entropy_trajectory =
        thin_trajectory(&report.estimate.entropy_trajectory, report.trajectory_stride);
    render(&thinned, format)
}

/// Keep positions `stride, 2·stride, ...` (1-based) of a trajectory.
pub fn thin_trajectory(trajectory: &[Option<f64>], stride: usize) -> Vec<Option<f64>> {
    if stride <= 1 {
        return trajectory.to_vec();
    }
    trajectory
        .iter()
        .skip(stride - 1)
        .step_by(stride)
        .copied()
        .collect()
}

/// Label of past `index` at `depth`, symbols oldest first.
fn past_label(index: usize, depth: usize, symbols: &[String]) -> String {
    let m = symbols.len();
    let mut digits = vec![0usize; depth];
    let mut rest = index;
    for slot in digits.iter_mut().rev() {
        *slot = rest % m;
        rest /= m;
    }
    digits
        .iter()
        .map(|&d| symbols[d].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fmt_bits(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "n/a".to_string(),
    }
}

fn write_model_section(out: &mut String, model: &ModelSummary) {
    let _ = writeln!(out, "## Model");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Property | Value |");
    let _ = writeln!(out, "|----------|-------|");
    let _ = writeln!(out, "| Alphabet | {} |", model.alphabet.join(" "));
    let _ = writeln!(out, "| Height | {} |", model.height);
    let _ = writeln!(out, "| Contexts | {} |", model.contexts);
    let _ = writeln!(
        out,
        "| Entropy rate (bits) | {} |",
        fmt_bits(model.theoretical_entropy_rate)
    );
    let _ = writeln!(out);
}

impl Render for EstimationReport {
    fn to_markdown(&self) -> String {
        let est = &self.estimate;
        let symbols = &self.model.alphabet;
        let mut out = String::new();

        let _ = writeln!(out, "# Context-Tree Estimate");
        let _ = writeln!(out);
        let _ = writeln!(out, "Run `{}` at {}", self.header.run_id, self.header.generated_at);
        let _ = writeln!(out);
        write_model_section(&mut out, &self.model);

        let _ = writeln!(out, "## Sequence");
        let _ = writeln!(out);
        match &self.sequence {
            SequenceOrigin::Generated { length, seed } => {
                let seed = seed.map_or_else(|| "random".to_string(), |s| s.to_string());
                let _ = writeln!(out, "Generated {} symbols (seed {})", length, seed);
            }
            SequenceOrigin::File { path } => {
                let _ = writeln!(out, "Read {} symbols from `{}`", est.sequence_length, path.display());
            }
        }
        let _ = writeln!(
            out,
            "Final entropy-rate estimate: {} bits",
            fmt_bits(self.final_entropy_rate)
        );
        let _ = writeln!(out);

        for (i, probs) in est.occurrence.iter().enumerate() {
            let depth = i + 1;
            let _ = writeln!(out, "## Occurrence probabilities (depth {})", depth);
            let _ = writeln!(out);
            let _ = writeln!(out, "| Past | Probability |");
            let _ = writeln!(out, "|------|-------------|");
            for (index, p) in probs.iter().enumerate() {
                let _ = writeln!(out, "| {} | {:.6} |", past_label(index, depth, symbols), p);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Transition probabilities (depth {})", est.height);
        let _ = writeln!(out);
        let _ = writeln!(out, "| Past | {} |", symbols.join(" | "));
        let _ = writeln!(out, "|------|{}", "---|".repeat(symbols.len()));
        for (index, row) in est.transition.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|p| format!("{:.6}", p)).collect();
            let _ = writeln!(
                out,
                "| {} | {} |",
                past_label(index, est.height, symbols),
                cells.join(" | ")
            );
        }
        let _ = writeln!(out);
        if est.unobserved_pasts > 0 {
            let _ = writeln!(out, "{} pasts were never observed.", est.unobserved_pasts);
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Entropy trajectory");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Position | Entropy (bits) |");
        let _ = writeln!(out, "|----------|----------------|");
        let stride = self.trajectory_stride.max(1);
        for (i, h) in est.entropy_trajectory.iter().enumerate() {
            if let Some(h) = h {
                let _ = writeln!(out, "| {} | {:.6} |", (i + 1) * stride, h);
            }
        }
        out
    }

    fn to_summary(&self) -> String {
        format!(
            "[{}] estimate: {} symbols, height {}, entropy rate {} bits (model {})",
            self.header.run_id,
            self.estimate.sequence_length,
            self.model.height,
            fmt_bits(self.final_entropy_rate),
            fmt_bits(self.model.theoretical_entropy_rate)
        )
    }
}

impl Render for LikelihoodReport {
    fn to_markdown(&self) -> String {
        let outcome = &self.outcome;
        let mut out = String::new();
        let _ = writeln!(out, "# Context-Tree Likelihood");
        let _ = writeln!(out);
        let _ = writeln!(out, "Run `{}` at {}", self.header.run_id, self.header.generated_at);
        let _ = writeln!(out);
        write_model_section(&mut out, &self.model);

        let _ = writeln!(out, "## Result");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Property | Value |");
        let _ = writeln!(out, "|----------|-------|");
        let _ = writeln!(out, "| Sequence length | {} |", self.sequence_length);
        let _ = writeln!(out, "| Alignment | {} |", outcome.alignment);
        let _ = writeln!(out, "| Observations | {} |", outcome.observations);
        let _ = writeln!(out, "| Undetermined positions | {} |", outcome.undetermined);
        let _ = writeln!(out, "| Log-likelihood (nats) | {} |", outcome.log_likelihood);
        if let Some(mismatch) = &outcome.mismatch {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "The tree does not cover the input: {} unmatched windows, first at position {}.",
                mismatch.unmatched_positions, mismatch.first_unmatched
            );
        }
        out
    }

    fn to_summary(&self) -> String {
        match &self.outcome.mismatch {
            None => format!(
                "[{}] likelihood: ln L = {:.6} over {} observations",
                self.header.run_id, self.outcome.log_likelihood, self.outcome.observations
            ),
            Some(mismatch) => format!(
                "[{}] likelihood: -inf ({} unmatched windows, first at {})",
                self.header.run_id, mismatch.unmatched_positions, mismatch.first_unmatched
            ),
        }
    }
}

impl Render for CheckReport {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# ct-core check");
        let _ = writeln!(out);
        write_model_section(&mut out, &self.model);
        if self.complete {
            let _ = writeln!(out, "✓ tree is complete");
        } else {
            let _ = writeln!(
                out,
                "✗ tree is incomplete: past [{}] has no context",
                self.uncovered_past.as_deref().unwrap_or("?")
            );
        }
        let mark = if self.stationary_available { "✓" } else { "ℹ" };
        let _ = writeln!(
            out,
            "{} stationary distribution {}",
            mark,
            if self.stationary_available {
                "available"
            } else {
                "unavailable"
            }
        );
        out
    }

    fn to_summary(&self) -> String {
        match &self.uncovered_past {
            None => format!(
                "[{}] check: complete, height {}, {} contexts",
                self.header.run_id, self.model.height, self.model.contexts
            ),
            Some(past) => format!(
                "[{}] check: incomplete (past [{}] uncovered)",
                self.header.run_id, past
            ),
        }
    }
}
