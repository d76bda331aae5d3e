//! Descriptor types for the node-type catalog.
//!
//! These mirror the metadata service's wire shapes: a descriptor per node
//! type with display metadata, ordered ports, and an ordered parameter
//! schema of sliders and selects.

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Category of a pipeline stage.
///
/// A closed variant set with an explicit fallback: categories the editor
/// does not recognize deserialize to [`NodeCategory::Unknown`] and take the
/// fallback accent color rather than failing the catalog load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    /// Produces data (sources, loaders).
    Data,
    /// Transforms data ahead of modeling.
    Preprocess,
    /// Trains or applies a model.
    Model,
    /// Anything the editor does not recognize.
    #[default]
    Unknown,
}

impl From<&str> for NodeCategory {
    fn from(s: &str) -> Self {
        match s {
            "data" => NodeCategory::Data,
            "preprocess" => NodeCategory::Preprocess,
            "model" => NodeCategory::Model,
            _ => NodeCategory::Unknown,
        }
    }
}

// Forward compatibility: any unrecognized category string decodes to the
// Unknown fallback instead of failing the catalog payload.
impl<'de> Deserialize<'de> for NodeCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(NodeCategory::from(s.as_str()))
    }
}

impl NodeCategory {
    /// Accent color used by the palette and node chrome.
    #[must_use]
    pub fn accent(&self) -> &'static str {
        match self {
            NodeCategory::Data => "#22c55e",
            NodeCategory::Preprocess => "#eab308",
            NodeCategory::Model => "#3b82f6",
            NodeCategory::Unknown => "#6b7280",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "data"),
            Self::Preprocess => write!(f, "preprocess"),
            Self::Model => write!(f, "model"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A named, typed connection point on a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDef {
    pub name: String,
    pub datatype: String,
}

/// One editable parameter of a node type.
///
/// The wire shape is flat, `{name, type, default, min?, max?, step?,
/// options?}`, with the kind-specific constraints flattened next to the
/// name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    #[serde(flatten)]
    pub control: ParamControl,
}

impl ParamDef {
    /// The schema's declared default as a JSON value.
    #[must_use]
    pub fn default_value(&self) -> Value {
        self.control.default_value()
    }
}

/// Control kind and constraints for a parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParamControl {
    /// Numeric slider bounded to `[min, max]` with a step increment.
    Slider {
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    /// Single choice out of a fixed option set.
    Select {
        default: String,
        options: Vec<String>,
    },
}

impl ParamControl {
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            ParamControl::Slider { default, .. } => {
                serde_json::Number::from_f64(*default).map_or(Value::Null, Value::Number)
            }
            ParamControl::Select { default, .. } => Value::String(default.clone()),
        }
    }

    /// Check the schema invariant: the default satisfies the control's own
    /// constraints.
    pub fn validate_default(&self, param: &str) -> Result<(), SchemaError> {
        match self {
            ParamControl::Slider { default, min, max, .. } => {
                if default < min || default > max {
                    return Err(SchemaError::SliderDefaultOutOfRange {
                        param: param.to_string(),
                        default: *default,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }
            ParamControl::Select { default, options } => {
                if !options.iter().any(|o| o == default) {
                    return Err(SchemaError::SelectDefaultNotAnOption {
                        param: param.to_string(),
                        default: default.clone(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// Static catalog entry describing one pipeline stage type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeDescriptor {
    /// Unique key referenced by [`PipelineNode`](crate::graph::PipelineNode).
    pub node_type: String,
    pub display_name: String,
    #[serde(default)]
    pub category: NodeCategory,
    #[serde(default)]
    pub input_ports: Vec<PortDef>,
    #[serde(default)]
    pub output_ports: Vec<PortDef>,
    #[serde(default)]
    pub parameter_schema: Vec<ParamDef>,
}

impl NodeTypeDescriptor {
    /// Validate the whole parameter schema (defaults within constraints,
    /// unique parameter names).
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, param) in self.parameter_schema.iter().enumerate() {
            param.control.validate_default(&param.name)?;
            if self.parameter_schema[..i].iter().any(|p| p.name == param.name) {
                return Err(SchemaError::DuplicateParam {
                    param: param.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Find a parameter definition by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamDef> {
        self.parameter_schema.iter().find(|p| p.name == name)
    }

    /// True if `name` is among the declared output ports.
    #[must_use]
    pub fn has_output_port(&self, name: &str) -> bool {
        self.output_ports.iter().any(|p| p.name == name)
    }

    /// True if `name` is among the declared input ports.
    #[must_use]
    pub fn has_input_port(&self, name: &str) -> bool {
        self.input_ports.iter().any(|p| p.name == name)
    }
}

/// Violations of a descriptor's own parameter schema.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("slider '{param}' default {default} outside [{min}, {max}]")]
    #[diagnostic(code(pipewright::catalog::slider_default_out_of_range))]
    SliderDefaultOutOfRange {
        param: String,
        default: f64,
        min: f64,
        max: f64,
    },

    #[error("select '{param}' default '{default}' is not among its options")]
    #[diagnostic(code(pipewright::catalog::select_default_not_an_option))]
    SelectDefaultNotAnOption { param: String, default: String },

    #[error("duplicate parameter name '{param}'")]
    #[diagnostic(code(pipewright::catalog::duplicate_param))]
    DuplicateParam { param: String },
}
