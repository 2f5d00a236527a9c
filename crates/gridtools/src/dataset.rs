//! In-memory labeled dataset.
//!
//! [`GridDataset`] mirrors the structure of a netCDF file: an ordered table of
//! named dimensions and an ordered list of named variables, each of which
//! records the dimensions it spans. Reading and writing files lives in
//! [`crate::native`]; everything here is pure bookkeeping.

use ndarray::ArrayD;

use crate::error::{GridError, GridResult};

/// Values held by a dataset variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableData {
    /// Numeric array, widened to f64 on load
    Float(ArrayD<f64>),
    /// Character or string variable, decoded to a single string
    Text(String),
}

impl VariableData {
    /// Returns the numeric array, if this is a numeric variable.
    pub fn as_float(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Float(array) => Some(array),
            Self::Text(_) => None,
        }
    }

    /// Returns the string value, if this is a text variable.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Float(_) => None,
            Self::Text(value) => Some(value),
        }
    }

    /// Short name of the variable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

/// A named variable together with the dimensions it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    dims: Vec<String>,
    data: VariableData,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension names, outermost first.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &VariableData {
        &self.data
    }
}

/// A self-describing collection of named dimensions and variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridDataset {
    dimensions: Vec<(String, usize)>,
    variables: Vec<Variable>,
}

impl GridDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dimension.
    ///
    /// Re-registering a dimension with the same length is a no-op; a
    /// different length is a [`GridError::DimensionMismatch`].
    pub fn add_dimension(&mut self, name: &str, len: usize) -> GridResult<()> {
        match self.dimension_len(name) {
            Some(existing) if existing == len => Ok(()),
            Some(existing) => Err(GridError::DimensionMismatch {
                name: name.to_string(),
                expected: existing,
                found: len,
            }),
            None => {
                self.dimensions.push((name.to_string(), len));
                Ok(())
            }
        }
    }

    /// Length of the named dimension.
    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.dimensions
            .iter()
            .find(|(dim, _)| dim == name)
            .map(|(_, len)| *len)
    }

    /// Dimensions in registration order.
    pub fn dimensions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.dimensions.iter().map(|(name, len)| (name.as_str(), *len))
    }

    /// Insert a numeric variable, registering any dimension not yet known.
    ///
    /// The number of dimension names must match the array rank and every
    /// axis length must agree with an already registered dimension of the
    /// same name. An existing variable with the same name is replaced.
    pub fn insert_array(&mut self, name: &str, dims: &[&str], array: ArrayD<f64>) -> GridResult<()> {
        if dims.len() != array.ndim() {
            return Err(GridError::InvalidShape(format!(
                "variable '{}' has rank {} but {} dimension names were given",
                name,
                array.ndim(),
                dims.len()
            )));
        }

        // Validate every axis before mutating so a failed insert leaves no trace
        for (dim, &len) in dims.iter().zip(array.shape()) {
            if let Some(existing) = self.dimension_len(dim) {
                if existing != len {
                    return Err(GridError::DimensionMismatch {
                        name: dim.to_string(),
                        expected: existing,
                        found: len,
                    });
                }
            }
        }
        for (dim, &len) in dims.iter().zip(array.shape()) {
            self.add_dimension(dim, len)?;
        }

        self.put_variable(name, dims, VariableData::Float(array));
        Ok(())
    }

    /// Insert a text variable over already registered dimensions.
    pub fn insert_text(&mut self, name: &str, dims: &[&str], value: impl Into<String>) -> GridResult<()> {
        if let Some(missing) = dims.iter().find(|dim| self.dimension_len(dim).is_none()) {
            return Err(GridError::MissingData(format!(
                "dimension '{}' for text variable '{}'",
                missing, name
            )));
        }

        self.put_variable(name, dims, VariableData::Text(value.into()));
        Ok(())
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name == name)
    }

    /// Whether a variable with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// All variables in dataset order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    /// Names of the data variables, in dataset order.
    ///
    /// Coordinate variables (variables named after a dimension) are not data
    /// variables and are left out.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables
            .iter()
            .filter(|var| self.dimension_len(&var.name).is_none())
            .map(|var| var.name.clone())
            .collect()
    }

    fn put_variable(&mut self, name: &str, dims: &[&str], data: VariableData) {
        let variable = Variable {
            name: name.to_string(),
            dims: dims.iter().map(|dim| dim.to_string()).collect(),
            data,
        };

        match self.variables.iter_mut().find(|var| var.name == name) {
            Some(slot) => *slot = variable,
            None => self.variables.push(variable),
        }
    }
}
