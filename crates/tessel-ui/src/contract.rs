//! Capability contracts: named operation sets checked structurally.
//!
//! The static [`Element`](crate::element::Element) trait already guarantees at
//! compile time that a node has the shared behaviour. Contracts add the
//! runtime gate used wherever a node crosses the tree boundary, so that a
//! node type which only *partially* supports the element protocol (and says
//! so through [`Capable::provides`]) is rejected with a diagnostic that names
//! the missing operation instead of failing somewhere deep in a render pass.
//!
//! Contracts are plain descriptors. Nothing is ever dispatched through them.

use crate::error::{ElementError, ElementResult};
use std::sync::OnceLock;

/// Name of the element contract.
pub const ELEMENT_CONTRACT: &str = "tessel.Element";

/// Operations every tree participant must provide.
pub const ELEMENT_OPERATIONS: &[&str] = &[
    "id",
    "title",
    "style_class",
    "inline_style",
    "on_attach",
    "get_attribute",
    "set_attribute",
    "remove_attribute",
    "clear_attributes",
    "serialize",
    "activate",
    "add",
    "remove",
    "find",
    "append_to",
];

/// Structural view of a candidate: which named operations it exposes.
pub trait Capable {
    /// Whether `operation` exists on this object and can be called.
    fn provides(&self, operation: &str) -> bool;
}

/// A named list of required operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    name: String,
    operations: Vec<String>,
}

impl Contract {
    /// Declare a contract.
    ///
    /// Fails with [`ElementError::ContractDefinition`] when the name is empty or
    /// when an operation name is not a usable identifier or is declared twice.
    pub fn define<I, S>(name: impl Into<String>, operations: I) -> ElementResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ElementError::ContractDefinition {
                contract: name,
                reason: "contract name must not be empty".to_string(),
            });
        }

        let mut declared: Vec<String> = Vec::new();
        for operation in operations {
            let operation = operation.into();
            if !is_operation_name(&operation) {
                return Err(ElementError::ContractDefinition {
                    contract: name,
                    reason: format!("`{operation}` is not a valid operation name"),
                });
            }
            if declared.contains(&operation) {
                return Err(ElementError::ContractDefinition {
                    contract: name,
                    reason: format!("operation `{operation}` declared twice"),
                });
            }
            declared.push(operation);
        }

        Ok(Self {
            name,
            operations: declared,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared operations, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(String::as_str)
    }

    /// First operation of this contract the candidate lacks.
    pub fn first_missing(&self, candidate: &(impl Capable + ?Sized)) -> Option<&str> {
        self.operations().find(|op| !candidate.provides(op))
    }

    pub fn is_satisfied_by(&self, candidate: &(impl Capable + ?Sized)) -> bool {
        self.first_missing(candidate).is_none()
    }
}

/// Check `candidate` against each contract in order.
///
/// The error names the first unmet operation: contracts are scanned in
/// argument order and operations in declared order.
pub fn verify(candidate: &(impl Capable + ?Sized), contracts: &[&Contract]) -> ElementResult<()> {
    for contract in contracts {
        if let Some(operation) = contract.first_missing(candidate) {
            return Err(ElementError::ContractViolation {
                contract: contract.name().to_string(),
                operation: operation.to_string(),
            });
        }
    }
    Ok(())
}

/// The contract every element node must satisfy.
pub fn element_contract() -> &'static Contract {
    static CONTRACT: OnceLock<Contract> = OnceLock::new();
    CONTRACT.get_or_init(|| Contract {
        name: ELEMENT_CONTRACT.to_string(),
        operations: ELEMENT_OPERATIONS.iter().map(|op| op.to_string()).collect(),
    })
}

fn is_operation_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

impl Capable for [&str] {
    fn provides(&self, operation: &str) -> bool {
        self.iter().any(|op| *op == operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Partial {
        ops: Vec<&'static str>,
    }

    impl Capable for Partial {
        fn provides(&self, operation: &str) -> bool {
            self.ops.iter().any(|op| *op == operation)
        }
    }

    #[test]
    fn test_define_rejects_bad_names() {
        assert!(matches!(
            Contract::define("Broken", ["show", ""]),
            Err(ElementError::ContractDefinition { .. })
        ));
        assert!(matches!(
            Contract::define("Broken", ["show", "hide me"]),
            Err(ElementError::ContractDefinition { .. })
        ));
        assert!(matches!(
            Contract::define("Broken", ["show", "show"]),
            Err(ElementError::ContractDefinition { .. })
        ));
        assert!(matches!(
            Contract::define("", ["show"]),
            Err(ElementError::ContractDefinition { .. })
        ));
    }

    #[test]
    fn test_verify_names_missing_serialize() {
        let mut ops: Vec<&'static str> = ELEMENT_OPERATIONS.to_vec();
        ops.retain(|op| *op != "serialize");
        let candidate = Partial { ops };

        let err = verify(&candidate, &[element_contract()]).unwrap_err();
        assert_eq!(
            err,
            ElementError::ContractViolation {
                contract: ELEMENT_CONTRACT.to_string(),
                operation: "serialize".to_string(),
            }
        );
    }

    #[test]
    fn test_verify_scans_contracts_in_order() {
        let visible = Contract::define("Visible", ["show", "hide"]).unwrap();
        let removable = Contract::define("Removable", ["destroy"]).unwrap();
        let candidate = Partial { ops: vec!["show"] };

        match verify(&candidate, &[&removable, &visible]) {
            Err(ElementError::ContractViolation { contract, operation }) => {
                assert_eq!(contract, "Removable");
                assert_eq!(operation, "destroy");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        match verify(&candidate, &[&visible, &removable]) {
            Err(ElementError::ContractViolation { operation, .. }) => assert_eq!(operation, "hide"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_slice_candidate_satisfies_full_list() {
        assert!(element_contract().is_satisfied_by(ELEMENT_OPERATIONS));
        assert!(verify(ELEMENT_OPERATIONS, &[]).is_ok());
    }
}
