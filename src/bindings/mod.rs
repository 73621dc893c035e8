mod packing;

use pyo3::prelude::*;
use pyo3::types::PyModule;

/// bitpack_gen - bit layout planner and shader code generator
#[pymodule]
pub fn _rust(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", "0.2.0")?;
    packing::register(m)?;
    Ok(())
}
