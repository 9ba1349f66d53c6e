//! Python bindings for wordhelper
//!
//! Exposes the query service to the HTTP layer. Requests and responses
//! cross the boundary as JSON strings.

use pyo3::create_exception;
use pyo3::exceptions::{PyIOError, PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{BuildError, QueryError};
use crate::service::{Domain, QueryRequest, QueryService, Status};

create_exception!(wordhelper, NotReadyError, PyRuntimeError);

/// Convert QueryError to Python exception
impl From<QueryError> for PyErr {
    fn from(err: QueryError) -> PyErr {
        match err {
            QueryError::NotReady => NotReadyError::new_err(err.to_string()),
            QueryError::BuildFailed(_) => PyRuntimeError::new_err(err.to_string()),
            QueryError::DomainUnavailable(_) => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Convert BuildError to Python exception
impl From<BuildError> for PyErr {
    fn from(err: BuildError) -> PyErr {
        match err {
            BuildError::MissingDataset { .. } | BuildError::Io { .. } | BuildError::Spawn(_) => {
                PyIOError::new_err(err.to_string())
            }
            BuildError::Config { .. } => PyValueError::new_err(err.to_string()),
            BuildError::WorkerPanicked => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

fn parse_domain(domain: &str) -> PyResult<Domain> {
    domain
        .parse()
        .map_err(|d| PyValueError::new_err(format!("unknown domain: {d}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Word-guessing helper over nouns, first names and places.
///
/// The indexes build in the background as soon as the helper is created.
/// Queries made before the build finishes raise NotReadyError.
///
/// Args:
///     config: Optional path to a TOML config file
///
/// Example:
///     helper = wordhelper.WordHelper("wordhelper.toml")
///     helper.wait()
///     helper.lookup("nouns", 5, "a", 1, 5)
#[pyclass(name = "WordHelper")]
pub struct PyWordHelper {
    inner: Arc<QueryService>,
}

#[pymethods]
impl PyWordHelper {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<PathBuf>) -> PyResult<Self> {
        let config = match config {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };
        Ok(PyWordHelper {
            inner: QueryService::spawn(config)?,
        })
    }

    /// Build state: "building", "ready" or "failed"
    #[getter]
    fn status(&self) -> String {
        match self.inner.status() {
            Status::Building => "building".to_string(),
            Status::Ready => "ready".to_string(),
            Status::Failed(_) => "failed".to_string(),
        }
    }

    /// Error message of a failed build
    #[getter]
    fn error(&self) -> Option<String> {
        match self.inner.status() {
            Status::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Block until the indexes are built.
    ///
    /// Raises:
    ///     RuntimeError: If the build failed
    fn wait(&self) -> PyResult<()> {
        self.inner.wait()?;
        Ok(())
    }

    /// Words with exactly this structural key, in dataset order
    #[pyo3(signature = (domain, length, letter, v1, v2=0))]
    fn lookup(
        &self,
        domain: &str,
        length: usize,
        letter: char,
        v1: usize,
        v2: usize,
    ) -> PyResult<Vec<String>> {
        let words = self
            .inner
            .lookup(parse_domain(domain)?, length, letter, v1, v2)?;
        Ok(words.to_vec())
    }

    /// Run a filtered query.
    ///
    /// Args:
    ///     request: JSON object with `domain`, `length`, `letter` or
    ///         `category`, `v1`, `v2` and optional filters
    ///
    /// Returns:
    ///     JSON object with `results` and `by_category`
    fn query(&self, request: &str) -> PyResult<String> {
        let request: QueryRequest = serde_json::from_str(request)
            .map_err(|e| PyValueError::new_err(format!("invalid request: {e}")))?;
        to_json(&self.inner.query(&request)?)
    }

    /// Per-domain build reports as JSON
    fn reports(&self) -> PyResult<String> {
        to_json(&self.inner.indexes()?.reports())
    }

    fn __repr__(&self) -> String {
        format!("<WordHelper status={}>", self.status())
    }
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn wordhelper(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyWordHelper>()?;
    m.add("NotReadyError", m.py().get_type::<NotReadyError>())?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
