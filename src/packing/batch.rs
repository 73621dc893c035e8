// src/packing/batch.rs

//! 행 단위 배치 인코딩/디코딩
//!
//! `[rows, parameters]` 실수 행렬을 `[rows, words]` 워드 행렬로 변환하고 그 역변환을 수행합니다.
//! 검증과 연산 목록 생성은 한 번만 하고, 각 행은 rayon으로 병렬 처리합니다.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

use super::assembler::{self, WordProgram};
use super::codec::{ranges_for, QuantizationRange};
use super::disassembler::{self, ParameterProgram};
use super::planner::plan;
use super::types::{Parameter, Plan};
use crate::error::{PackError, Result};

pub struct BatchCodec {
    plan: Plan,
    ranges: Vec<QuantizationRange>,
    word_programs: Vec<WordProgram>,
    parameter_programs: Vec<ParameterProgram>,
}

impl BatchCodec {
    pub fn new(parameters: &[Parameter], word_width: u32) -> Result<Self> {
        let plan = plan(parameters, word_width)?;
        let ranges = ranges_for(parameters)?;
        let word_programs = assembler::assemble(&plan);
        let parameter_programs = disassembler::disassemble(&plan);
        Ok(Self {
            plan,
            ranges,
            word_programs,
            parameter_programs,
        })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// 한 행을 양자화 후 패킹
    pub fn encode_row(&self, values: &[f64]) -> Result<Vec<u32>> {
        check_len(self.ranges.len(), values.len())?;
        Ok(self.pack_values(values))
    }

    /// 한 행을 언패킹 후 역양자화
    pub fn decode_row(&self, words: &[u32]) -> Result<Vec<f64>> {
        check_len(self.plan.word_count, words.len())?;
        Ok(self.unpack_values(words))
    }

    pub fn encode_rows(&self, values: &ArrayView2<f64>) -> Result<Array2<u32>> {
        check_shape(self.ranges.len(), values.ncols())?;
        let mut out = Array2::<u32>::zeros((values.nrows(), self.plan.word_count));
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(values.axis_iter(Axis(0)).into_par_iter())
            .for_each(|(mut out_row, in_row)| {
                let words = self.pack_values(&in_row.to_vec());
                out_row.assign(&ArrayView1::from(&words[..]));
            });
        log::debug!("encoded {} rows into {} words each", out.nrows(), out.ncols());
        Ok(out)
    }

    pub fn decode_rows(&self, words: &ArrayView2<u32>) -> Result<Array2<f64>> {
        check_shape(self.plan.word_count, words.ncols())?;
        let mut out = Array2::<f64>::zeros((words.nrows(), self.ranges.len()));
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(words.axis_iter(Axis(0)).into_par_iter())
            .for_each(|(mut out_row, in_row)| {
                let values = self.unpack_values(&in_row.to_vec());
                out_row.assign(&ArrayView1::from(&values[..]));
            });
        Ok(out)
    }

    fn pack_values(&self, values: &[f64]) -> Vec<u32> {
        let codes: Vec<u32> = self
            .ranges
            .iter()
            .zip(values)
            .map(|(q, &v)| q.quantize(v))
            .collect();
        let mut words = vec![0u32; self.plan.word_count];
        assembler::run_programs(&self.plan, &self.word_programs, &codes, &mut words);
        words
    }

    fn unpack_values(&self, words: &[u32]) -> Vec<f64> {
        let mut codes = vec![0u32; self.ranges.len()];
        disassembler::run_programs(&self.parameter_programs, words, &mut codes);
        self.ranges
            .iter()
            .zip(&codes)
            .map(|(q, &c)| q.dequantize(c))
            .collect()
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(PackError::ValueCountMismatch { expected, actual });
    }
    Ok(())
}

fn check_shape(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(PackError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn sample_params() -> Vec<Parameter> {
        vec![
            Parameter::new("roughness", 10, 0.0, 1.0),
            Parameter::new("height", 20, -50.0, 50.0),
            Parameter::new("hue", 6, 0.0, 360.0),
        ]
    }

    #[test]
    fn test_batch_matches_single_row() {
        let codec = BatchCodec::new(&sample_params(), 16).unwrap();
        let values = array![[0.25, 12.5, 90.0], [1.0, -50.0, 0.0], [0.0, 49.9, 359.0]];
        let words = codec.encode_rows(&values.view()).unwrap();
        assert_eq!(words.dim(), (3, 3));
        for (i, row) in values.rows().into_iter().enumerate() {
            let single = codec.encode_row(&row.to_vec()).unwrap();
            assert_eq!(words.row(i).to_vec(), single);
        }
    }

    #[test]
    fn test_batch_round_trip_within_step() {
        let params = sample_params();
        let codec = BatchCodec::new(&params, 32).unwrap();
        let values = array![[0.3, -12.75, 200.0], [0.999, 0.0, 17.5]];
        let words = codec.encode_rows(&values.view()).unwrap();
        let decoded = codec.decode_rows(&words.view()).unwrap();

        for (j, param) in params.iter().enumerate() {
            let step = QuantizationRange::new(param).unwrap().step();
            for i in 0..values.nrows() {
                assert!((decoded[[i, j]] - values[[i, j]]).abs() <= step);
            }
        }
        assert_abs_diff_eq!(decoded[[1, 1]], values[[1, 1]], epsilon = 1e-4);
    }

    #[test]
    fn test_many_rows_keep_order() {
        let codec = BatchCodec::new(&sample_params(), 7).unwrap();
        let rows = 1000;
        let values = Array2::from_shape_fn((rows, 3), |(i, j)| match j {
            0 => i as f64 / rows as f64,
            1 => (i as f64 / rows as f64) * 100.0 - 50.0,
            _ => (i % 360) as f64,
        });
        let words = codec.encode_rows(&values.view()).unwrap();
        let decoded = codec.decode_rows(&words.view()).unwrap();
        for i in (0..rows).step_by(97) {
            let row = values.row(i).to_vec();
            assert_eq!(words.row(i).to_vec(), codec.encode_row(&row).unwrap());
            let single = codec.decode_row(&words.row(i).to_vec()).unwrap();
            assert_eq!(decoded.row(i).to_vec(), single);
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let codec = BatchCodec::new(&sample_params(), 32).unwrap();
        let values = array![[0.1, 0.2]];
        assert!(matches!(
            codec.encode_rows(&values.view()),
            Err(PackError::ShapeMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_degenerate_parameter_rejected() {
        let params = vec![Parameter::new("flat", 8, 1.0, 1.0)];
        assert!(matches!(
            BatchCodec::new(&params, 32),
            Err(PackError::DegenerateRange { .. })
        ));
    }
}
