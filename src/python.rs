use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::core::{IdentifyResponse, MatchEntry, PillQuery, PillRecord};
use crate::store::InsertOutcome;
use crate::{EngineConfig, PillEngine as RustPillEngine};

fn runtime_error(e: impl ToString) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string())
}

/// Python wrapper for PillEngine
#[pyclass]
struct PillEngine {
    engine: Arc<RustPillEngine>,
    runtime: Arc<Runtime>,
}

#[pymethods]
impl PillEngine {
    /// Create new PillEngine over a SQLite store, optionally with a live JSON source
    #[new]
    fn new(db_path: String, remote_url: Option<String>) -> PyResult<Self> {
        let runtime = Arc::new(Runtime::new().map_err(runtime_error)?);

        let config = EngineConfig {
            db_path,
            remote_url,
            ..EngineConfig::default()
        };
        let engine = runtime
            .block_on(RustPillEngine::from_config(&config))
            .map_err(runtime_error)?;

        Ok(Self {
            engine: Arc::new(engine),
            runtime,
        })
    }

    /// Identify a pill by imprint, with optional color and shape
    fn identify(&self, imprint: String, color: Option<String>, shape: Option<String>) -> PyResult<PyObject> {
        let query = PillQuery { imprint, color, shape };

        let engine = self.engine.clone();
        let result = self.runtime.block_on(async move {
            engine.identify(query).await.map_err(runtime_error)
        })?;

        Python::with_gil(|py| identify_response_to_py(py, &result))
    }

    /// Imprint autocomplete
    fn suggest(&self, partial: String) -> Vec<String> {
        let engine = self.engine.clone();
        self.runtime.block_on(async move { engine.suggest(&partial).await })
    }

    /// Add a pill to the local store, returning its id (existing id for duplicates)
    fn add_pill(
        &self,
        imprint: String,
        drug_name: String,
        color: Option<String>,
        shape: Option<String>,
        strength: Option<String>,
    ) -> PyResult<i64> {
        let pill = PillRecord::new(imprint, drug_name)
            .with_appearance(color.unwrap_or_default(), shape.unwrap_or_default())
            .with_strength(strength.unwrap_or_default());

        let engine = self.engine.clone();
        let outcome = self.runtime.block_on(async move {
            engine.add_pill(pill).await.map_err(runtime_error)
        })?;

        Ok(match outcome {
            InsertOutcome::Inserted(id) | InsertOutcome::Duplicate(id) => id,
        })
    }

    /// Get local store statistics
    fn store_stats(&self) -> PyResult<PyObject> {
        let engine = self.engine.clone();
        let stats = self.runtime.block_on(async move {
            engine.store_stats().await.map_err(runtime_error)
        })?;

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("total_pills", stats.total_pills)?;
            dict.set_item("distinct_imprints", stats.distinct_imprints)?;
            dict.set_item("last_added", stats.last_added.map(|t| t.to_rfc3339()))?;
            Ok(dict.into())
        })
    }
}

/// Convert MatchEntry to Python dict
fn match_entry_to_py(py: Python, entry: &MatchEntry) -> PyResult<PyObject> {
    let pill = &entry.pill;
    let dict = PyDict::new(py);
    dict.set_item("id", pill.id)?;
    dict.set_item("imprint", &pill.imprint)?;
    dict.set_item("color", &pill.color)?;
    dict.set_item("shape", &pill.shape)?;
    dict.set_item("drug_name", &pill.drug_name)?;
    dict.set_item("generic_name", &pill.generic_name)?;
    dict.set_item("strength", &pill.strength)?;
    dict.set_item("drug_class", &pill.drug_class)?;
    dict.set_item("uses", &pill.uses)?;
    dict.set_item("image_url", &pill.image_url)?;
    dict.set_item("confidence", entry.confidence)?;
    dict.set_item("difference", &entry.difference)?;
    Ok(dict.into())
}

/// Convert IdentifyResponse to Python dict
fn identify_response_to_py(py: Python, response: &IdentifyResponse) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("imprint", &response.imprint)?;
    dict.set_item("search_color", &response.search_color)?;
    dict.set_item("search_shape", &response.search_shape)?;

    let results: PyResult<Vec<PyObject>> = response
        .results
        .iter()
        .map(|entry| match_entry_to_py(py, entry))
        .collect();
    dict.set_item("results", results?)?;

    let potential: PyResult<Vec<PyObject>> = response
        .potential_matches
        .iter()
        .map(|entry| match_entry_to_py(py, entry))
        .collect();
    dict.set_item("potential_matches", potential?)?;

    dict.set_item("disclaimer", &response.disclaimer)?;
    dict.set_item("source", format!("{:?}", response.source).to_lowercase())?;
    dict.set_item("latency_ms", response.latency_ms)?;

    Ok(dict.into())
}

/// Python module
#[pymodule]
fn pill_identifier_engine(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PillEngine>()?;
    m.add("__version__", crate::VERSION)?;
    Ok(())
}
