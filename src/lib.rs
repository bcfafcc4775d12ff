mod app;
mod config;
mod function;
mod hello_world;
mod manifest;
mod stack;
mod template;

// re-exports
pub use app::{App, Assembly, StackArtifact};
pub use config::{Config, StackConfig};
pub use function::{Architecture, FunctionUrl, RustFunction, RustFunctionProps, UrlAuthType};
pub use hello_world::{HelloWorldApiProps, HelloWorldApiStack, FN_URL_OUTPUT};
pub use manifest::CargoManifest;
pub use stack::{Asset, Stack, StackProps};
pub use template::{Output, Parameter, Resource, Template};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    TomlError(#[from] toml::de::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error("Build manifest not found: {0}")]
    ManifestNotFound(String),
    #[error("No [package] section in build manifest: {0}")]
    NotAPackage(String),
    #[error("Invalid stack name: {0}")]
    InvalidStackName(String),
    #[error("Stack {0} is already defined in this app")]
    DuplicateStack(String),
    #[error("Logical ID {id} is already in use in stack {stack}")]
    DuplicateLogicalId { stack: String, id: String },
    #[error("Output {name} is already defined in stack {stack}")]
    DuplicateOutput { stack: String, name: String },
    #[error("Construct ID {0:?} has no alphanumeric characters")]
    EmptyLogicalId(String),
}

/// Declare every stack listed in the configuration, then synthesize the
/// CloudFormation templates and the asset manifest.
pub fn synth_stacks(config: &Config) -> Result<Assembly, Error> {
    let mut app = App::new();

    for stack_cfg in config.stacks() {
        HelloWorldApiStack::new(&mut app, stack_cfg.name(), stack_cfg.to_props())?;
    }

    Ok(app.synth())
}
