//! ABI parsing and function classification.
//!
//! The report contract promises results in ABI declaration order, so the raw
//! JSON array is walked directly instead of going through
//! [`alloy_json_abi::JsonAbi`], which re-groups functions by name. Non-function
//! entries (constructor, event, error, fallback, receive) are dropped before
//! classification and can never be misclassified as callable.

use alloy_json_abi::{Function, StateMutability};
use serde::Serialize;
use tracing::warn;

/// Parse the function entries of an ABI JSON document, in declaration order.
///
/// Entries that are not functions are skipped. A function entry that does not
/// deserialize (hand-edited or corrupt ABI) is skipped with a warning rather
/// than failing the whole document.
pub fn parse_abi_functions(abi_json: &str) -> Result<Vec<Function>, String> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(abi_json).map_err(|e| format!("ABI is not a JSON array: {e}"))?;

    let mut functions = Vec::new();
    for item in items {
        if item.get("type").and_then(|t| t.as_str()) != Some("function") {
            continue;
        }
        match serde_json::from_value::<Function>(item.clone()) {
            Ok(func) => functions.push(func),
            Err(e) => {
                warn!(
                    target: "contract_inspector::abi",
                    error = %e,
                    "skipping malformed function entry"
                );
            }
        }
    }
    Ok(functions)
}

/// Retain the functions that can be called without arguments or a transaction:
/// zero inputs and `view` or `pure` mutability.
///
/// Two zero-arg entries with the same name cannot occur in a valid ABI, but
/// malformed ones exist; the first declared wins.
pub fn callable_functions(functions: &[Function]) -> Vec<Function> {
    let mut seen = Vec::new();
    let mut callables = Vec::new();
    for func in functions {
        if !func.inputs.is_empty() {
            continue;
        }
        if !matches!(
            func.state_mutability,
            StateMutability::View | StateMutability::Pure
        ) {
            continue;
        }
        if seen.contains(&func.name) {
            warn!(
                target: "contract_inspector::abi",
                function = %func.name,
                "duplicate zero-argument read-only function, keeping first declared"
            );
            continue;
        }
        seen.push(func.name.clone());
        callables.push(func.clone());
    }
    callables
}

/// One line of the report's ABI summary.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub signature: String,
    pub selector: String,
    pub state_mutability: StateMutability,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    /// Whether this entry is part of the callable set the engine invokes.
    pub callable: bool,
}

/// Summarize every function of the ABI, in declaration order.
pub fn summarize_functions(functions: &[Function]) -> Vec<FunctionSummary> {
    let mut seen = Vec::new();
    functions
        .iter()
        .map(|func| {
            let zero_arg_readonly = func.inputs.is_empty()
                && matches!(
                    func.state_mutability,
                    StateMutability::View | StateMutability::Pure
                );
            let callable = zero_arg_readonly && !seen.contains(&func.name);
            if callable {
                seen.push(func.name.clone());
            }
            FunctionSummary {
                name: func.name.clone(),
                signature: func.signature(),
                selector: format!("0x{}", hex::encode(func.selector().as_slice())),
                state_mutability: func.state_mutability,
                inputs: func.inputs.iter().map(|p| p.selector_type().into_owned()).collect(),
                outputs: func.outputs.iter().map(|p| p.selector_type().into_owned()).collect(),
                callable,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {
            "name": "name",
            "type": "function",
            "inputs": [],
            "outputs": [{"name": "", "type": "string"}],
            "stateMutability": "view"
        },
        {
            "name": "decimals",
            "type": "function",
            "inputs": [],
            "outputs": [{"name": "", "type": "uint8"}],
            "stateMutability": "view"
        },
        {
            "name": "transfer",
            "type": "function",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "name": "Transfer",
            "type": "event",
            "inputs": [
                {"name": "from", "type": "address", "indexed": true},
                {"name": "to", "type": "address", "indexed": true},
                {"name": "value", "type": "uint256", "indexed": false}
            ],
            "anonymous": false
        }
    ]"#;

    #[test]
    fn test_parse_preserves_declaration_order() {
        let functions = parse_abi_functions(ERC20_ABI).unwrap();
        let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "decimals", "transfer"]);
    }

    #[test]
    fn test_events_and_constructors_excluded() {
        let abi = r#"[
            {"type": "constructor", "inputs": [], "stateMutability": "nonpayable"},
            {"type": "event", "name": "Ping", "inputs": [], "anonymous": false},
            {"type": "error", "name": "Nope", "inputs": []},
            {"type": "fallback", "stateMutability": "payable"},
            {"type": "receive", "stateMutability": "payable"}
        ]"#;
        let functions = parse_abi_functions(abi).unwrap();
        assert!(functions.is_empty());
        assert!(callable_functions(&functions).is_empty());
    }

    #[test]
    fn test_callable_set_exact() {
        let functions = parse_abi_functions(ERC20_ABI).unwrap();
        let callables = callable_functions(&functions);
        let names: Vec<_> = callables.iter().map(|f| f.name.as_str()).collect();
        // transfer excluded: non-zero arity and nonpayable.
        assert_eq!(names, vec!["name", "decimals"]);
    }

    #[test]
    fn test_payable_and_nonpayable_zero_arg_excluded() {
        let abi = r#"[
            {"name": "poke", "type": "function", "inputs": [], "outputs": [], "stateMutability": "nonpayable"},
            {"name": "deposit", "type": "function", "inputs": [], "outputs": [], "stateMutability": "payable"},
            {"name": "paused", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "bool"}], "stateMutability": "view"}
        ]"#;
        let functions = parse_abi_functions(abi).unwrap();
        let callables = callable_functions(&functions);
        assert_eq!(callables.len(), 1);
        assert_eq!(callables[0].name, "paused");
    }

    #[test]
    fn test_duplicate_names_keep_first_declared() {
        let abi = r#"[
            {"name": "version", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
            {"name": "version", "type": "function", "inputs": [], "outputs": [{"name": "", "type": "string"}], "stateMutability": "pure"}
        ]"#;
        let functions = parse_abi_functions(abi).unwrap();
        let callables = callable_functions(&functions);
        assert_eq!(callables.len(), 1);
        assert_eq!(callables[0].outputs[0].ty, "uint256");
    }

    #[test]
    fn test_filtering_is_total_and_exact() {
        // Generate every combination of mutability and arity 0..=2 and check
        // the callable set against the defining predicate.
        let mutabilities = ["pure", "view", "nonpayable", "payable"];
        let mut entries = Vec::new();
        for (i, mutability) in mutabilities.iter().enumerate() {
            for arity in 0..=2usize {
                let inputs: Vec<String> = (0..arity)
                    .map(|n| format!("{{\"name\": \"a{n}\", \"type\": \"uint256\"}}"))
                    .collect();
                entries.push(format!(
                    "{{\"name\": \"f_{i}_{arity}\", \"type\": \"function\", \"inputs\": [{}], \"outputs\": [], \"stateMutability\": \"{mutability}\"}}",
                    inputs.join(",")
                ));
            }
        }
        let abi = format!("[{}]", entries.join(","));
        let functions = parse_abi_functions(&abi).unwrap();
        assert_eq!(functions.len(), 12);

        let callables = callable_functions(&functions);
        let expected: Vec<_> = functions
            .iter()
            .filter(|f| {
                f.inputs.is_empty()
                    && matches!(
                        f.state_mutability,
                        StateMutability::View | StateMutability::Pure
                    )
            })
            .map(|f| f.name.clone())
            .collect();
        let got: Vec<_> = callables.iter().map(|f| f.name.clone()).collect();
        assert_eq!(got, expected);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_empty_abi_is_not_an_error() {
        let functions = parse_abi_functions("[]").unwrap();
        assert!(functions.is_empty());
        assert!(callable_functions(&functions).is_empty());
        assert!(summarize_functions(&functions).is_empty());
    }

    #[test]
    fn test_non_array_abi_rejected() {
        assert!(parse_abi_functions("{\"not\": \"an abi\"}").is_err());
    }

    #[test]
    fn test_summary_flags_callables() {
        let functions = parse_abi_functions(ERC20_ABI).unwrap();
        let summary = summarize_functions(&functions);
        assert_eq!(summary.len(), 3);
        assert!(summary[0].callable && summary[1].callable);
        assert!(!summary[2].callable);
        assert_eq!(summary[2].signature, "transfer(address,uint256)");
        assert_eq!(summary[2].selector, "0xa9059cbb");
        assert_eq!(summary[2].inputs, vec!["address", "uint256"]);
    }
}
