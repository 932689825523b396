//! Parsed sweep data.
//!
//! The instrument returns trace data as one comma-separated numeric string per
//! query. The frequency axis is a plain float list in Hz. Raw trace buffers
//! are interleaved (real, imaginary) pairs: even-indexed values are real
//! parts, odd-indexed values imaginary parts, in strict alternation starting
//! with real. One complex value is reconstructed per pair, so a parsed trace
//! has exactly half as many values as its raw response and must match the
//! frequency axis point for point.

use crate::error::{Result, VnaError};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Parses a comma-separated numeric response into floats, in order.
///
/// Any token that fails to parse is a hard error; trace data must never be
/// silently corrupted.
pub fn parse_float_list(response: &str) -> Result<Vec<f64>> {
    response
        .trim()
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .map_err(|_| VnaError::MalformedResponse {
                    token: token.trim().to_string(),
                })
        })
        .collect()
}

/// Parses a raw trace response into complex values.
///
/// The flat float list is interpreted as interleaved (re, im) pairs; an odd
/// value count means the protocol desynchronized and is a hard error.
pub fn parse_complex_pairs(response: &str) -> Result<Vec<Complex64>> {
    let values = parse_float_list(response)?;
    if values.len() % 2 != 0 {
        return Err(VnaError::OddPairCount {
            count: values.len(),
        });
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| Complex64::new(pair[0], pair[1]))
        .collect())
}

/// Removes 2π discontinuities from a wrapped phase sequence.
///
/// Each step between consecutive samples is mapped into (−π, π] and the
/// correction accumulated, so a trace crossing the ±π branch cut comes out
/// continuous.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let mut correction = 0.0;
    let mut prev = match phase.first() {
        Some(&p) => {
            out.push(p);
            p
        }
        None => return out,
    };

    for &p in &phase[1..] {
        let delta = p - prev;
        // Steps within (-π, π) are left alone; larger jumps are branch-cut
        // crossings and get folded back.
        if delta.abs() >= PI {
            let mut wrapped = (delta + PI).rem_euclid(2.0 * PI) - PI;
            if wrapped == -PI && delta > 0.0 {
                wrapped = PI;
            }
            correction += wrapped - delta;
        }
        out.push(p + correction);
        prev = p;
    }
    out
}

/// One measured quantity: a parameter label and its complex values, aligned
/// index-for-index with the sweep's frequency axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Measurement parameter, e.g. "S11".
    pub label: String,
    /// One complex value per frequency point.
    pub values: Vec<Complex64>,
}

impl Trace {
    /// Linear magnitude, |Z| per point.
    pub fn magnitude(&self) -> Vec<f64> {
        self.values.iter().map(|z| z.norm()).collect()
    }

    /// Log magnitude, 20·log10(|Z|) per point.
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.values.iter().map(|z| 20.0 * z.norm().log10()).collect()
    }

    /// Wrapped phase, the raw angle of Z per point, in radians.
    pub fn phase(&self) -> Vec<f64> {
        self.values.iter().map(|z| z.arg()).collect()
    }

    /// Unwrapped phase: the raw angle with 2π discontinuities removed.
    pub fn phase_unwrapped(&self) -> Vec<f64> {
        unwrap_phase(&self.phase())
    }
}

/// One complete sweep: a frequency axis in MHz and the complex traces
/// measured over it, in instrument trace order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    /// Frequency axis in MHz.
    pub freq_mhz: Vec<f64>,
    /// Traces in the order they were configured and queried.
    pub traces: Vec<Trace>,
}

impl Sweep {
    /// Assembles a sweep, enforcing that every trace matches the frequency
    /// axis length. A mismatch signals a protocol or parsing bug and is
    /// fatal; data is never truncated or padded to fit.
    pub fn assemble(freq_mhz: Vec<f64>, traces: Vec<Trace>) -> Result<Self> {
        for trace in &traces {
            if trace.values.len() != freq_mhz.len() {
                return Err(VnaError::TraceLengthMismatch {
                    label: trace.label.clone(),
                    expected: freq_mhz.len(),
                    actual: trace.values.len(),
                });
            }
        }
        Ok(Self { freq_mhz, traces })
    }

    /// Number of frequency points.
    pub fn points(&self) -> usize {
        self.freq_mhz.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_list() {
        let parsed = parse_float_list("1.0,2.5, -3e2 ,4").unwrap();
        assert_eq!(parsed, vec![1.0, 2.5, -300.0, 4.0]);
    }

    #[test]
    fn test_parse_float_list_rejects_garbage() {
        let err = parse_float_list("1.0,oops,3.0").unwrap_err();
        assert!(matches!(
            err,
            VnaError::MalformedResponse { ref token } if token == "oops"
        ));
    }

    #[test]
    fn test_parse_complex_pairs() {
        // 2n tokens yield n values with value k = (token[2k], token[2k+1]).
        let parsed = parse_complex_pairs("1,0,0,1,-1,-1").unwrap();
        assert_eq!(
            parsed,
            vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 1.0),
                Complex64::new(-1.0, -1.0),
            ]
        );
    }

    #[test]
    fn test_parse_complex_pairs_odd_count() {
        let err = parse_complex_pairs("1,2,3").unwrap_err();
        assert!(matches!(err, VnaError::OddPairCount { count: 3 }));
    }

    #[test]
    fn test_assemble_rejects_length_mismatch() {
        let trace = Trace {
            label: "S11".into(),
            values: vec![Complex64::new(1.0, 0.0); 2],
        };
        let err = Sweep::assemble(vec![1.0, 2.0, 3.0], vec![trace]).unwrap_err();
        assert!(matches!(
            err,
            VnaError::TraceLengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_trace_math() {
        let trace = Trace {
            label: "S11".into(),
            values: vec![Complex64::new(0.0, 10.0)],
        };
        assert!((trace.magnitude()[0] - 10.0).abs() < 1e-12);
        assert!((trace.magnitude_db()[0] - 20.0).abs() < 1e-12);
        assert!((trace.phase()[0] - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unwrap_phase_removes_branch_cut() {
        // Phase climbing through +π wraps to negative; unwrap restores a
        // monotonic sequence.
        let wrapped = vec![3.0, 3.1, -3.1, -3.0];
        let unwrapped = unwrap_phase(&wrapped);
        assert!((unwrapped[2] - (2.0 * PI - 3.1)).abs() < 1e-12);
        for pair in unwrapped.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_unwrap_phase_identity_when_continuous() {
        let phase = vec![0.0, 0.1, 0.2, 0.15];
        assert_eq!(unwrap_phase(&phase), phase);
    }

    #[test]
    fn test_unwrap_phase_empty() {
        assert!(unwrap_phase(&[]).is_empty());
    }
}
