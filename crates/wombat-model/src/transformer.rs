//! Transformer steps: message mutations inserted into an inlet's source or
//! an outlet's consumer.
//!
//! [`TransformerStep`] mirrors the declarative format, with one optional
//! field per variant. [`TransformerStep::kind`] checks that exactly one is
//! set and hands back a [`TransformerKind`]; composites nest arbitrarily.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::nats::NatsConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformerStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceTransformer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeTransformer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<MappingTransformer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<ExplodeTransformer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine: Option<CombineTransformer>,
}

/// Delegates to a NATS request/reply endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTransformer {
    pub endpoint: String,
    pub nats: NatsConfig,
    /// Request timeout as a duration string, e.g. `5s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Runs its children in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeTransformer {
    #[serde(default)]
    pub sequential: Vec<TransformerStep>,
}

/// Inline mapping script, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingTransformer {
    #[serde(alias = "sourcecode")]
    pub source_code: String,
}

/// Splits one message into many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodeTransformer {
    pub format: ExplodeFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

/// Batches many messages into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineTransformer {
    pub format: CombineFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplodeFormat {
    Binary,
    Csv,
    JsonArray,
    JsonDocuments,
    JsonMap,
    Lines,
    Tar,
    Zip,
}

impl ExplodeFormat {
    pub const DEFAULT_DELIMITER: &'static str = ",";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Csv => "csv",
            Self::JsonArray => "json_array",
            Self::JsonDocuments => "json_documents",
            Self::JsonMap => "json_map",
            Self::Lines => "lines",
            Self::Tar => "tar",
            Self::Zip => "zip",
        }
    }

    /// Whether the format splits on a configurable delimiter.
    pub fn is_delimited(self) -> bool {
        matches!(self, Self::Csv)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineFormat {
    Binary,
    Concatenate,
    JsonArray,
    Lines,
    Tar,
    Zip,
}

impl CombineFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Concatenate => "concatenate",
            Self::JsonArray => "json_array",
            Self::Lines => "lines",
            Self::Tar => "tar",
            Self::Zip => "zip",
        }
    }

    /// Archive formats name each entry; line based formats do not.
    pub fn takes_path(self) -> bool {
        matches!(self, Self::Tar | Self::Zip)
    }
}

/// The resolved transformer variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformerKind<'a> {
    Service(&'a ServiceTransformer),
    Composite(&'a CompositeTransformer),
    Mapping(&'a MappingTransformer),
    Explode(&'a ExplodeTransformer),
    Combine(&'a CombineTransformer),
}

impl TransformerStep {
    pub fn service(endpoint: impl Into<String>, nats: NatsConfig, timeout: Option<&str>) -> Self {
        Self {
            service: Some(ServiceTransformer {
                endpoint: endpoint.into(),
                nats,
                timeout: timeout.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    pub fn composite(sequential: Vec<TransformerStep>) -> Self {
        Self {
            composite: Some(CompositeTransformer { sequential }),
            ..Self::default()
        }
    }

    pub fn mapping(source_code: impl Into<String>) -> Self {
        Self {
            mapping: Some(MappingTransformer {
                source_code: source_code.into(),
            }),
            ..Self::default()
        }
    }

    pub fn explode(format: ExplodeFormat, delimiter: Option<&str>) -> Self {
        Self {
            explode: Some(ExplodeTransformer {
                format,
                delimiter: delimiter.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    pub fn combine(format: CombineFormat, path: Option<&str>) -> Self {
        Self {
            combine: Some(CombineTransformer {
                format,
                path: path.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    /// Resolve the single configured variant. `step` names this node in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TransformerType`] when zero or several
    /// variants are set.
    pub fn kind(&self, step: &str) -> Result<TransformerKind<'_>, ValidationError> {
        let mut resolved = Vec::with_capacity(1);
        if let Some(t) = &self.service {
            resolved.push(TransformerKind::Service(t));
        }
        if let Some(t) = &self.composite {
            resolved.push(TransformerKind::Composite(t));
        }
        if let Some(t) = &self.mapping {
            resolved.push(TransformerKind::Mapping(t));
        }
        if let Some(t) = &self.explode {
            resolved.push(TransformerKind::Explode(t));
        }
        if let Some(t) = &self.combine {
            resolved.push(TransformerKind::Combine(t));
        }

        match resolved.as_slice() {
            [kind] => Ok(*kind),
            _ => Err(ValidationError::TransformerType {
                step: step.to_string(),
                found: resolved.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_step_is_rejected_with_its_name() {
        let err = TransformerStep::default().kind("transformer").unwrap_err();
        assert_eq!(
            err,
            ValidationError::TransformerType {
                step: "transformer".into(),
                found: 0
            }
        );
    }

    #[test]
    fn two_variants_are_rejected() {
        let mut step = TransformerStep::mapping("root = this");
        step.combine = Some(CombineTransformer {
            format: CombineFormat::Lines,
            path: None,
        });
        assert!(matches!(
            step.kind("t"),
            Err(ValidationError::TransformerType { found: 2, .. })
        ));
    }

    #[test]
    fn deserialize_nested_composite() {
        let yaml = r#"
composite:
  sequential:
    - mapping:
        sourcecode: "root = this.upper()"
    - explode:
        format: csv
        delimiter: ";"
"#;
        let step: TransformerStep = serde_yaml::from_str(yaml).unwrap();
        let Ok(TransformerKind::Composite(c)) = step.kind("transformer") else {
            panic!("expected composite");
        };
        assert_eq!(c.sequential.len(), 2);
        assert!(matches!(
            c.sequential[1].kind("child"),
            Ok(TransformerKind::Explode(e)) if e.format == ExplodeFormat::Csv
        ));
    }

    #[test]
    fn format_traits() {
        assert!(ExplodeFormat::Csv.is_delimited());
        assert!(!ExplodeFormat::Lines.is_delimited());
        assert!(CombineFormat::Zip.takes_path());
        assert!(!CombineFormat::Lines.takes_path());
    }
}
