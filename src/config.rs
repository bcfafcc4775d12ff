//! Stack configuration in TOML format
//!
use crate::function::{Architecture, RustFunctionProps};
use crate::hello_world::HelloWorldApiProps;
use crate::stack::StackProps;
use crate::Error;

pub struct Config {
    stacks: Vec<StackConfig>,
}

#[derive(serde::Deserialize)]
pub struct StackConfig {
    name: String,
    manifest_path: std::path::PathBuf,
    #[serde(default)]
    expose_handles: bool,
    account: Option<String>,
    region: Option<String>,
    memory_size: Option<u32>,
    timeout_seconds: Option<u32>,
    #[serde(default)]
    architecture: Architecture,
    #[serde(default)]
    environment: std::collections::BTreeMap<String, String>,
}

#[derive(serde::Deserialize)]
struct ConfigToml {
    stacks: Vec<StackConfig>,
}

impl Config {
    pub fn from_file<P: AsRef<std::path::Path>>(config_file: P) -> Result<Self, Error> {
        use std::io::Read;

        // Read stack.toml file
        let mut f = std::fs::File::open(config_file)?;
        let mut toml_str = String::new();
        f.read_to_string(&mut toml_str)?;

        Self::from_toml_str(&toml_str)
    }

    pub fn from_toml_str(cfg_toml_str: &str) -> Result<Self, Error> {
        let ConfigToml { stacks } = toml::from_str::<ConfigToml>(cfg_toml_str)?;
        Ok(Self { stacks })
    }

    pub fn stacks<'a>(&'a self) -> impl Iterator<Item = &'a StackConfig> {
        self.stacks.iter()
    }
}

impl StackConfig {
    pub fn name<'a>(&'a self) -> &'a str {
        self.name.as_str()
    }

    pub fn to_props(&self) -> HelloWorldApiProps {
        HelloWorldApiProps {
            stack: StackProps {
                account: self.account.clone(),
                region: self.region.clone(),
            },
            function: RustFunctionProps {
                manifest_path: self.manifest_path.clone(),
                memory_size: self.memory_size,
                timeout_seconds: self.timeout_seconds,
                architecture: self.architecture,
                environment: self.environment.clone(),
            },
            expose_handles: self.expose_handles,
        }
    }
}
