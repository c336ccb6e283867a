//! Hard-decision Viterbi convolutional codec.
//!
//! Parameterized by constraint length `K` and a list of generator
//! polynomials; the reference scheme uses `K=7, (0o171, 0o133)`, but the
//! source's own codec construction actually instantiates a `K=3, (7,5)`
//! pair for day-to-day testing, so both are exposed as named parameter
//! sets rather than hard-coding one.

use crate::bitpack;
use crate::error::{Error, Result};
use crate::fec::FecCodec;
use crate::fec::scheme::FecScheme;

/// Constraint length and generator polynomials for a convolutional code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvParams {
    /// Constraint length. The state space has `2^(constraint - 1)` states.
    pub constraint: u32,
    /// Generator polynomials, LSB-current convention, each nonzero and
    /// less than `2^constraint`.
    pub polynomials: [u32; 2],
}

impl ConvParams {
    /// The CCSDS rate-1/2 polynomials, `K=7`.
    pub const CCSDS_K7: ConvParams = ConvParams {
        constraint: 7,
        polynomials: [0o171, 0o133],
    };

    /// A smaller `K=3` pair used for development and test fixtures.
    pub const DEV_K3: ConvParams = ConvParams {
        constraint: 3,
        polynomials: [7, 5],
    };

    fn num_states(&self) -> usize {
        1 << (self.constraint - 1)
    }
}

fn reverse_bits(num_bits: u32, input: u32) -> u32 {
    let mut output = 0u32;
    let mut input = input;
    for _ in 0..num_bits {
        output = (output << 1) | (input & 1);
        input >>= 1;
    }
    output
}

/// Hard-decision Viterbi codec over a fixed [`ConvParams`].
#[derive(Debug, Clone)]
pub struct ConvolutionalHd {
    params: ConvParams,
    scheme: FecScheme,
    k_bytes: usize,
    n_bytes: usize,
    /// `outputs[state_with_input]` gives the two output bits for that
    /// combined (previous-state, input) index, precomputed once.
    outputs: Vec<[u8; 2]>,
}

impl ConvolutionalHd {
    /// `max_continuous_cw_len_bits` is the configured continuous codeword
    /// length, used to derive `k`/`n` the way [`crate::fec::continuous_block_info`] does.
    pub fn new(scheme: FecScheme, params: ConvParams, k_bytes: usize, n_bytes: usize) -> Self {
        let num_combined = 1 << params.constraint;
        let mut outputs = vec![[0u8; 2]; num_combined];
        for (i, out) in outputs.iter_mut().enumerate() {
            for (j, &poly) in params.polynomials.iter().enumerate() {
                let reversed = reverse_bits(params.constraint, poly);
                let mut input = i as u32;
                let mut polynomial = reversed;
                let mut bit = 0u8;
                for _ in 0..params.constraint {
                    bit ^= ((input & 1) & (polynomial & 1)) as u8;
                    polynomial >>= 1;
                    input >>= 1;
                }
                out[j] = bit;
            }
        }
        ConvolutionalHd {
            params,
            scheme,
            k_bytes,
            n_bytes,
            outputs,
        }
    }

    fn curr_output(&self, state: usize, input: u8) -> [u8; 2] {
        self.outputs[state | ((input as usize) << (self.params.constraint - 1))]
    }

    fn next_state(&self, state: usize, input: u8) -> usize {
        (state >> 1) | ((input as usize) << (self.params.constraint - 2))
    }
}

impl FecCodec for ConvolutionalHd {
    fn encode(&self, message: &[u8]) -> Result<Vec<u8>> {
        if message.len() != self.k_bytes {
            return Err(Error::FecEncodeFailed(self.scheme));
        }
        let bits = bitpack::unpack(message);
        let mut encoded = Vec::with_capacity(bits.len() * 2);
        let mut state = 0usize;
        for &bit in &bits {
            let out = self.curr_output(state, bit);
            encoded.push(out[0]);
            encoded.push(out[1]);
            state = self.next_state(state, bit);
        }
        Ok(bitpack::pack(&encoded))
    }

    fn decode(&self, codeword: &[u8]) -> (Vec<u8>, u32) {
        let bits = bitpack::unpack(codeword);
        let poly_len = self.params.polynomials.len();
        let num_states = self.params.num_states();

        let mut path_metrics = vec![u32::MAX; num_states];
        path_metrics[0] = 0;
        // trellis[i][state] = predecessor state chosen when arriving at
        // `state` at step `i`.
        let mut trellis: Vec<Vec<u8>> = Vec::new();

        let mut i = 0;
        while i < bits.len() {
            let end = (i + poly_len).min(bits.len());
            let mut group = [0u8; 2];
            group[..end - i].copy_from_slice(&bits[i..end]);

            let mut new_metrics = vec![u32::MAX; num_states];
            let mut column = vec![0u8; num_states];
            for state in 0..num_states {
                let s = (state & ((1 << (self.params.constraint - 2)) - 1)) << 1;
                let source0 = s;
                let source1 = s | 1;

                let branch = |source: usize| -> u32 {
                    let out = self.curr_output(source, (state >> (self.params.constraint - 2)) as u8);
                    (0..poly_len).filter(|&k| out[k] != group[k]).count() as u32
                };

                let pm0 = path_metrics[source0].saturating_add(if path_metrics[source0] == u32::MAX {
                    0
                } else {
                    branch(source0)
                });
                let pm1 = path_metrics[source1].saturating_add(if path_metrics[source1] == u32::MAX {
                    0
                } else {
                    branch(source1)
                });

                if pm0 <= pm1 {
                    new_metrics[state] = pm0;
                    column[state] = source0 as u8;
                } else {
                    new_metrics[state] = pm1;
                    column[state] = source1 as u8;
                }
            }
            path_metrics = new_metrics;
            trellis.push(column);
            i += poly_len;
        }

        let mut state = path_metrics
            .iter()
            .enumerate()
            .min_by_key(|&(_, &m)| m)
            .map(|(s, _)| s)
            .unwrap_or(0);

        let mut decoded = vec![0u8; trellis.len()];
        for (i, column) in trellis.iter().enumerate().rev() {
            decoded[i] = (state >> (self.params.constraint - 2)) as u8;
            state = column[state] as usize;
        }

        let mut out = bitpack::pack(&decoded);
        out.resize(self.k_bytes, 0);
        (out, 0)
    }

    fn k_bytes(&self) -> usize {
        self.k_bytes
    }

    fn n_bytes(&self) -> usize {
        self.n_bytes
    }
}
