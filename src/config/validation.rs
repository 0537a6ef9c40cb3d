//! Configuration validation.
//!
//! Interprets the field table from [`super::schema`] against a parsed JSON
//! value: missing fields are filled with their defaults, present fields are
//! checked against their constraint, and every violation is collected.

use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use url::Url;

use super::schema::{hex_pattern, Constraint, FieldSpec, FIELDS};
use super::Configuration;
use crate::domain::{SetupError, Violation};

/// Compiled form of a field constraint.
enum Check {
    Url,
    Hex { digits: usize, pattern: Regex },
    Path,
}

impl Check {
    fn compile(constraint: Constraint) -> Result<Self, SetupError> {
        Ok(match constraint {
            Constraint::Url => Check::Url,
            Constraint::Hex { digits } => Check::Hex {
                digits,
                pattern: Regex::new(&hex_pattern(digits))?,
            },
            Constraint::Path => Check::Path,
        })
    }

    /// Reason `text` fails this check, if it does.
    fn failure(&self, text: &str) -> Option<String> {
        match self {
            Check::Url => Url::parse(text)
                .err()
                .map(|e| format!("invalid URL '{}': {}", text, e)),
            Check::Hex { digits, pattern } => (!pattern.is_match(text))
                .then(|| format!("must be 0x followed by {} hex digits", digits)),
            Check::Path => None,
        }
    }
}

/// A field together with its compiled check.
struct Rule {
    field: &'static FieldSpec,
    check: Check,
}

/// Validator built from the field table.
pub struct Validator {
    rules: Vec<Rule>,
}

impl Validator {
    /// Compile the constraint patterns of every field.
    pub fn new() -> Result<Self, SetupError> {
        let rules = FIELDS
            .iter()
            .map(|field| -> Result<Rule, SetupError> {
                Ok(Rule {
                    field,
                    check: Check::compile(field.constraint)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Fill defaults into `value` and return every constraint violation.
    pub fn check(&self, value: &mut Value) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .rules
            .iter()
            .filter_map(|rule| self.check_rule(rule, value))
            .collect();

        // Sibling fields under a broken parent report the same parent
        violations.dedup();
        violations
    }

    /// Validate a parsed document read from `source`.
    pub fn validate(&self, source: &Path, mut value: Value) -> Result<Configuration, SetupError> {
        let violations = self.check(&mut value);
        if !violations.is_empty() {
            return Err(SetupError::Validation {
                path: source.to_path_buf(),
                violations,
            });
        }

        serde_json::from_value(value).map_err(|source_err| SetupError::Parse {
            path: source.to_path_buf(),
            source: source_err,
        })
    }

    fn check_rule(&self, rule: &Rule, root: &mut Value) -> Option<Violation> {
        let segments: Vec<&str> = rule.field.segments().collect();
        let last = segments.len().checked_sub(1)?;
        let mut node = root;

        for (depth, segment) in segments.iter().enumerate() {
            let map = match node {
                Value::Object(map) => map,
                other => {
                    return Some(type_mismatch(&segments[..depth], "object", other));
                }
            };

            if depth == last {
                let value = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::String(rule.field.default.to_string()));
                return check_leaf(rule, value);
            }

            node = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        None
    }
}

fn check_leaf(rule: &Rule, value: &Value) -> Option<Violation> {
    let field = rule.field;
    let text = match value {
        Value::String(text) => text,
        other => {
            let segments: Vec<&str> = field.segments().collect();
            return Some(type_mismatch(&segments, "string", other));
        }
    };

    let message = rule.check.failure(text)?;

    Some(Violation {
        path: field.path.to_string(),
        constraint: field.constraint.name(),
        message,
    })
}

fn type_mismatch(segments: &[&str], expected: &str, found: &Value) -> Violation {
    let path = if segments.is_empty() {
        "(root)".to_string()
    } else {
        segments.join(".")
    };

    Violation {
        path,
        constraint: "type",
        message: format!("expected {}, received {}", expected, json_kind(found)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{
        DEFAULT_PRIVATE_KEY_FILE, DEFAULT_RPC_URL, ZERO_ADDRESS, ZERO_PRIVATE_KEY,
    };
    use serde_json::json;

    fn validate(value: Value) -> Result<Configuration, SetupError> {
        Validator::new()
            .unwrap()
            .validate(Path::new("config.json"), value)
    }

    fn violated_paths(value: Value) -> Vec<String> {
        match validate(value) {
            Err(SetupError::Validation { violations, .. }) => {
                violations.into_iter().map(|v| v.path).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn valid_document() -> Value {
        json!({
            "$schema": "./config.schema.json",
            "network": { "rpcUrl": "https://mainnet.infura.io/v3/abc" },
            "contracts": {
                "contractAddresses": {
                    "token": "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984",
                    "pair": "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc",
                    "router": "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D"
                },
                "privateKeys": {
                    "baseWallet": "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
                },
                "application": { "privateKeyFile": "/etc/keys/pks.json" }
            }
        })
    }

    #[test]
    fn test_every_hex_field_compiles_a_pattern() {
        let validator = Validator::new().unwrap();
        for rule in &validator.rules {
            match (rule.field.constraint, &rule.check) {
                (Constraint::Hex { digits }, Check::Hex { pattern, .. }) => {
                    assert_eq!(pattern.as_str(), hex_pattern(digits));
                    assert!(!pattern.is_match("0x"), "{} accepts empty hex", rule.field.path);
                }
                (Constraint::Hex { .. }, _) => {
                    panic!("{} has no hex check", rule.field.path)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_hex_check_rejects_near_misses() {
        let check = Check::compile(Constraint::Hex { digits: 4 }).unwrap();
        assert_eq!(check.failure("0xbeef"), None);
        for bad in ["0xbee", "0xbeeff", "beef", "0Xbeef", "0xbeeg", " 0xbeef"] {
            assert!(check.failure(bad).is_some(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = validate(json!({})).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_missing_fields_are_filled() {
        let config = validate(json!({
            "network": { "rpcUrl": "http://localhost:8545" },
            "contracts": { "privateKeys": {} }
        }))
        .unwrap();

        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.contracts.contract_addresses.token, ZERO_ADDRESS);
        assert_eq!(config.contracts.private_keys.base_wallet, ZERO_PRIVATE_KEY);
        assert_eq!(
            config.contracts.application.private_key_file,
            DEFAULT_PRIVATE_KEY_FILE
        );
    }

    #[test]
    fn test_valid_document_keeps_values() {
        let config = validate(valid_document()).unwrap();
        assert_eq!(
            config.contracts.contract_addresses.router,
            "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D"
        );
        assert_eq!(config.contracts.application.private_key_file, "/etc/keys/pks.json");
    }

    #[test]
    fn test_default_configuration_round_trips() {
        let value = serde_json::to_value(Configuration::default()).unwrap();
        assert_eq!(validate(value).unwrap(), Configuration::default());
    }

    #[test]
    fn test_bad_addresses_are_named() {
        for name in ["token", "pair", "router"] {
            for bad in [
                "0x123",
                "1f9840a85d5aF5bf1D1762F925BDADdC4201F984",
                "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F98g",
                "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F9840",
                "",
            ] {
                let mut doc = valid_document();
                doc["contracts"]["contractAddresses"][name] = json!(bad);
                assert_eq!(
                    violated_paths(doc),
                    vec![format!("contracts.contractAddresses.{}", name)],
                    "value {:?} should be rejected",
                    bad
                );
            }
        }
    }

    #[test]
    fn test_bad_private_key_is_named() {
        let mut doc = valid_document();
        // Address-length key
        doc["contracts"]["privateKeys"]["baseWallet"] =
            json!("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984");
        assert_eq!(violated_paths(doc), vec!["contracts.privateKeys.baseWallet"]);
    }

    #[test]
    fn test_private_key_not_echoed() {
        let secret = "0xnothexnothexnothexnothexnothexnothexnothexnothexnothexnothexnoth";
        let mut doc = valid_document();
        doc["contracts"]["privateKeys"]["baseWallet"] = json!(secret);

        let err = validate(doc).unwrap_err();
        assert_eq!(err.violations()[0].constraint, "pattern");
        assert!(!err.to_string().contains(secret));
    }

    #[test]
    fn test_bad_rpc_url_is_named() {
        for bad in ["not-a-url", "", "//missing-scheme.com", "http://"] {
            let mut doc = valid_document();
            doc["network"]["rpcUrl"] = json!(bad);

            let err = validate(doc).unwrap_err();
            let violations = err.violations();
            assert_eq!(violations.len(), 1, "value {:?}", bad);
            assert_eq!(violations[0].path, "network.rpcUrl");
            assert_eq!(violations[0].constraint, "url");
        }
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let mut doc = valid_document();
        doc["contracts"]["contractAddresses"]["token"] =
            json!("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD");
        assert!(validate(doc).is_ok());
    }

    #[test]
    fn test_wrong_types_rejected() {
        let paths = violated_paths(json!({
            "network": { "rpcUrl": 8545 },
            "contracts": { "application": { "privateKeyFile": null } }
        }));
        assert_eq!(
            paths,
            vec!["network.rpcUrl", "contracts.application.privateKeyFile"]
        );
    }

    #[test]
    fn test_non_object_parent_reported_once() {
        let err = validate(json!({ "contracts": { "contractAddresses": [] } })).unwrap_err();
        let violations = err.violations();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "contracts.contractAddresses");
        assert_eq!(violations[0].message, "expected object, received array");
    }

    #[test]
    fn test_non_object_root() {
        let err = validate(json!("config")).unwrap_err();
        let violations = err.violations();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "(root)");
        assert_eq!(violations[0].constraint, "type");
    }

    #[test]
    fn test_all_violations_collected() {
        let paths = violated_paths(json!({
            "network": { "rpcUrl": "not-a-url" },
            "contracts": {
                "contractAddresses": { "pair": "0x00" },
                "privateKeys": { "baseWallet": "0x00" }
            }
        }));
        assert_eq!(
            paths,
            vec![
                "network.rpcUrl",
                "contracts.contractAddresses.pair",
                "contracts.privateKeys.baseWallet",
            ]
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = validate(json!({
            "$schema": 42,
            "extra": true,
            "network": { "rpcUrl": DEFAULT_RPC_URL, "chainId": 1 }
        }))
        .unwrap();
        assert_eq!(config, Configuration::default());
    }
}
