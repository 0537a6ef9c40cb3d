//! Configuration data types.

use serde::{Deserialize, Serialize};

/// Default JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://rpc.example.com";

/// All-zero contract address placeholder.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// All-zero private key placeholder.
pub const ZERO_PRIVATE_KEY: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Default location of the private-key file.
pub const DEFAULT_PRIVATE_KEY_FILE: &str = "./.projects/dir/pks.json";

/// Default schema reference written into generated config files.
pub const DEFAULT_SCHEMA_REF: &str = "./config.schema.json";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
}

/// Node connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsConfig {
    pub contract_addresses: ContractAddresses,
    pub private_keys: PrivateKeys,
    pub application: ApplicationConfig,
}

/// Deployed contract addresses (`0x` + 40 hex digits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub token: String,
    pub pair: String,
    pub router: String,
}

/// Wallet keys (`0x` + 64 hex digits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateKeys {
    pub base_wallet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    /// Path to the private-key file; never opened by this tool
    pub private_key_file: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: DEFAULT_RPC_URL.to_string(),
            },
            contracts: ContractsConfig {
                contract_addresses: ContractAddresses {
                    token: ZERO_ADDRESS.to_string(),
                    pair: ZERO_ADDRESS.to_string(),
                    router: ZERO_ADDRESS.to_string(),
                },
                private_keys: PrivateKeys {
                    base_wallet: ZERO_PRIVATE_KEY.to_string(),
                },
                application: ApplicationConfig {
                    private_key_file: DEFAULT_PRIVATE_KEY_FILE.to_string(),
                },
            },
        }
    }
}

/// On-disk document: the configuration plus its `$schema` tooling hint.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigDocument<'a> {
    #[serde(rename = "$schema")]
    pub schema: &'a str,
    #[serde(flatten)]
    pub config: &'a Configuration,
}
