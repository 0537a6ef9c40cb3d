//! Declarative field table and JSON Schema rendering.
//!
//! Every configuration field is described exactly once in [`FIELDS`]. The
//! validator, the default filler and the exported schema document all read
//! from this table.

use serde_json::{json, Map, Value};

use super::types::{DEFAULT_PRIVATE_KEY_FILE, DEFAULT_RPC_URL, ZERO_ADDRESS, ZERO_PRIVATE_KEY};

/// JSON Schema dialect used for the exported document.
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Constraint applied to a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Absolute URL
    Url,
    /// `0x` followed by exactly `digits` hexadecimal characters
    Hex { digits: usize },
    /// Free-form file path
    Path,
}

impl Constraint {
    /// Name reported in violations.
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Url => "url",
            Constraint::Hex { .. } => "pattern",
            Constraint::Path => "type",
        }
    }

    /// Regex pattern, for constraints that have one.
    pub fn pattern(&self) -> Option<String> {
        match self {
            Constraint::Hex { digits } => Some(hex_pattern(*digits)),
            _ => None,
        }
    }

    fn format(&self) -> Option<&'static str> {
        match self {
            Constraint::Url => Some("uri"),
            _ => None,
        }
    }
}

/// Anchored regex for `0x` followed by exactly `digits` hex characters.
pub fn hex_pattern(digits: usize) -> String {
    format!("^0x[0-9a-fA-F]{{{}}}$", digits)
}

/// One configuration field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Dotted path from the document root
    pub path: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub constraint: Constraint,
}

impl FieldSpec {
    /// Path split into its object keys.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('.')
    }
}

/// The configuration shape.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        path: "network.rpcUrl",
        description: "JSON-RPC endpoint of the blockchain node",
        default: DEFAULT_RPC_URL,
        constraint: Constraint::Url,
    },
    FieldSpec {
        path: "contracts.contractAddresses.token",
        description: "Token contract address",
        default: ZERO_ADDRESS,
        constraint: Constraint::Hex { digits: 40 },
    },
    FieldSpec {
        path: "contracts.contractAddresses.pair",
        description: "Liquidity pair contract address",
        default: ZERO_ADDRESS,
        constraint: Constraint::Hex { digits: 40 },
    },
    FieldSpec {
        path: "contracts.contractAddresses.router",
        description: "Router contract address",
        default: ZERO_ADDRESS,
        constraint: Constraint::Hex { digits: 40 },
    },
    FieldSpec {
        path: "contracts.privateKeys.baseWallet",
        description: "Private key of the base wallet",
        default: ZERO_PRIVATE_KEY,
        constraint: Constraint::Hex { digits: 64 },
    },
    FieldSpec {
        path: "contracts.application.privateKeyFile",
        description: "Path to the private-key file",
        default: DEFAULT_PRIVATE_KEY_FILE,
        constraint: Constraint::Path,
    },
];

/// Render the field table as a JSON Schema document.
pub fn schema_document() -> Value {
    let mut root = Map::new();

    'fields: for field in FIELDS {
        let segments: Vec<&str> = field.segments().collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut props = &mut root;
        for segment in parents {
            let child = props.entry(segment.to_string()).or_insert_with(object_node);
            props = match child.get_mut("properties").and_then(Value::as_object_mut) {
                Some(next) => next,
                None => continue 'fields,
            };
        }

        props.insert(leaf.to_string(), leaf_node(field));
    }

    // Editors read `$schema` from the config file itself
    root.insert(
        "$schema".to_string(),
        json!({
            "type": "string",
            "description": "Path to this JSON Schema, used by editor tooling"
        }),
    );

    json!({
        "$schema": SCHEMA_DIALECT,
        "title": "Configuration",
        "type": "object",
        "properties": root,
    })
}

fn object_node() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn leaf_node(field: &FieldSpec) -> Value {
    let mut leaf = json!({
        "type": "string",
        "description": field.description,
        "default": field.default,
    });
    if let Some(format) = field.constraint.format() {
        leaf["format"] = json!(format);
    }
    if let Some(pattern) = field.constraint.pattern() {
        leaf["pattern"] = json!(pattern);
    }
    leaf
}
