//! Configuration service for exporting, writing and loading config files.

use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::schema;
use super::types::{ConfigDocument, DEFAULT_SCHEMA_REF};
use super::validation::Validator;
use super::Configuration;
use crate::domain::logger::EventSink;
use crate::domain::SetupError;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Default schema file path.
pub const DEFAULT_SCHEMA_PATH: &str = "./config.schema.json";

/// Configuration service.
pub struct ConfigService<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> ConfigService<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    /// Export the JSON Schema document to `path`.
    ///
    /// Returns the size in bytes of the written file as reported by its
    /// metadata.
    pub fn export_schema(&self, path: &Path) -> Result<u64, SetupError> {
        self.sink
            .info(&format!("Exporting configuration schema to {}", path.display()), None);

        let result = write_json(path, &schema::schema_document()).and_then(|()| {
            fs::metadata(path)
                .map(|meta| meta.len())
                .map_err(|e| SetupError::filesystem("stat", path, e))
        });

        match result {
            Ok(size) => {
                self.sink.info(
                    &format!("Schema written to {} ({} bytes)", path.display(), size),
                    None,
                );
                Ok(size)
            }
            Err(e) => {
                self.sink.error("Failed to export configuration schema", &e);
                Err(e)
            }
        }
    }

    /// Write the default configuration to `path`, replacing any existing file.
    pub fn write_default(&self, path: &Path, schema_ref: &str) -> Result<(), SetupError> {
        let config = Configuration::default();
        let document = ConfigDocument {
            schema: schema_ref,
            config: &config,
        };
        write_json(path, &document)?;

        self.sink
            .info(&format!("Default configuration written to {}", path.display()), None);
        Ok(())
    }

    /// Read, parse and validate the configuration file at `path`.
    pub fn load(&self, path: &Path) -> Result<Configuration, SetupError> {
        let content =
            fs::read_to_string(path).map_err(|e| SetupError::filesystem("read", path, e))?;

        let value = serde_json::from_str(&content).map_err(|source| SetupError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Validator::new()?.validate(path, value)
    }
}

/// `$schema` value to embed in a config file at `config` pointing at `schema`.
///
/// The reference is relative to the config file's directory, the way editors
/// resolve it: `./name` for siblings, `../schemas/name` and so on otherwise.
/// When no relative route exists (one path absolute and the other not, or the
/// config directory climbs out through `..`) the schema path is made absolute.
pub fn schema_reference(config: &Path, schema: &Path) -> String {
    let Some(name) = schema.file_name() else {
        return DEFAULT_SCHEMA_REF.to_string();
    };
    let name = name.to_string_lossy();

    let config_dir = lexical_components(config.parent().unwrap_or(Path::new("")));
    let schema_dir = lexical_components(schema.parent().unwrap_or(Path::new("")));

    match relative_route(&config_dir, &schema_dir) {
        Some(route) if route.is_empty() => format!("./{}", name),
        Some(route) if route[0] == ".." => format!("{}/{}", route.join("/"), name),
        Some(route) => format!("./{}/{}", route.join("/"), name),
        None => absolute(schema).display().to_string(),
    }
}

/// Path components with `.` dropped and `name/..` pairs folded away.
fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// Directory steps leading from `from` to `to`.
fn relative_route(from: &[Component<'_>], to: &[Component<'_>]) -> Option<Vec<String>> {
    let common = from.iter().zip(to).take_while(|(a, b)| a == b).count();
    let (up, down) = (&from[common..], &to[common..]);

    // Climbing out of `..` or across roots has no relative spelling
    if up.iter().any(|c| !matches!(c, Component::Normal(_)))
        || down
            .iter()
            .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
    {
        return None;
    }

    let mut route: Vec<String> = up.iter().map(|_| "..".to_string()).collect();
    route.extend(
        down.iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Some(route)
}

fn absolute(path: &Path) -> PathBuf {
    let joined = match env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    lexical_components(&joined).iter().collect()
}

/// Pretty-print `value` to `path`, creating parent directories if needed.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SetupError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| SetupError::filesystem("create directory", parent, e))?;
        }
    }

    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');

    fs::write(path, content).map_err(|e| SetupError::filesystem("write", path, e))
}
