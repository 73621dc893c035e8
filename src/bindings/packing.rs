// src/bindings/packing.rs

//! # ParameterModel을 위한 Python 바인딩
//!
//! 편집 화면(Python 측)이 파라미터를 추가/수정하고, 코드 생성과 배치 인코딩을
//! 호출할 수 있도록 `ParameterModel`을 클래스로 노출합니다.

use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::codegen::{CodeSink, EmitOptions, LogSink};
use crate::packing::{BatchCodec, ParameterId, ParameterModel, ParameterUpdate};

#[pyclass(name = "ParameterModel", module = "bitpack_gen._rust")]
pub struct PyParameterModel {
    inner: ParameterModel,
    options: EmitOptions,
}

#[pymethods]
impl PyParameterModel {
    #[new]
    #[pyo3(signature = (options_json=None))]
    fn new(options_json: Option<&str>) -> PyResult<Self> {
        let options = match options_json {
            Some(json) => EmitOptions::from_json(json)?,
            None => EmitOptions::default(),
        };
        Ok(Self {
            inner: ParameterModel::new(),
            options,
        })
    }

    fn add(&mut self) -> PyResult<u32> {
        Ok(self.inner.add()?.0)
    }

    fn remove(&mut self, id: u32) -> PyResult<()> {
        self.inner.remove(ParameterId(id))?;
        Ok(())
    }

    #[pyo3(signature = (id, name=None, bit_length=None, minimum=None, maximum=None))]
    fn update(
        &mut self,
        id: u32,
        name: Option<String>,
        bit_length: Option<f64>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    ) -> PyResult<()> {
        let update = ParameterUpdate {
            name,
            bit_length,
            minimum,
            maximum,
        };
        self.inner.update(ParameterId(id), update)?;
        Ok(())
    }

    #[getter]
    fn word_width(&self) -> u32 {
        self.inner.word_width()
    }

    #[setter]
    fn set_word_width(&mut self, width: f64) {
        self.inner.set_word_width(width);
    }

    /// (id, name, bit_length, minimum, maximum) 목록
    fn parameters(&self) -> Vec<(u32, String, u32, f64, f64)> {
        self.inner
            .parameters()
            .iter()
            .map(|p| (p.id.0, p.name.clone(), p.bit_length, p.minimum, p.maximum))
            .collect()
    }

    /// 코드를 생성해 반환하고, 로그로도 출력
    fn generate(&self) -> PyResult<String> {
        let code = self.inner.generate(&self.options)?;
        LogSink.write_code(&code)?;
        Ok(code)
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.inner.to_json()?)
    }

    fn encode<'py>(&self, py: Python<'py>, values: PyReadonlyArray2<f64>) -> PyResult<&'py PyArray2<u32>> {
        let (parameters, word_width) = self.inner.snapshot();
        let codec = BatchCodec::new(&parameters, word_width)?;
        let view = values.as_array();
        let words = py.allow_threads(|| codec.encode_rows(&view))?;
        Ok(words.into_pyarray(py))
    }

    fn decode<'py>(&self, py: Python<'py>, words: PyReadonlyArray2<u32>) -> PyResult<&'py PyArray2<f64>> {
        let (parameters, word_width) = self.inner.snapshot();
        let codec = BatchCodec::new(&parameters, word_width)?;
        let view = words.as_array();
        let values = py.allow_threads(|| codec.decode_rows(&view))?;
        Ok(values.into_pyarray(py))
    }
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_class::<PyParameterModel>()?;
    Ok(())
}
