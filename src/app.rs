use crate::stack::{Asset, Stack};
use crate::template::Template;
use crate::Error;

/// Explicit synthesis context. Stacks register into an `App`; `synth`
/// renders them all into an [`Assembly`] without contacting AWS.
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self { stacks: Vec::new() }
    }

    /// Register a fully-built stack. Stack names are unique per app.
    pub fn add_stack(&mut self, stack: Stack) -> Result<(), Error> {
        if self.stacks.iter().any(|s| s.name() == stack.name()) {
            return Err(Error::DuplicateStack(stack.name().to_string()));
        }

        self.stacks.push(stack);
        Ok(())
    }

    pub fn stacks<'a>(&'a self) -> impl Iterator<Item = &'a Stack> {
        self.stacks.iter()
    }

    pub fn stack<'a>(&'a self, name: &str) -> Option<&'a Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    pub fn synth(&self) -> Assembly {
        let artifacts = self
            .stacks
            .iter()
            .map(|stack| StackArtifact {
                stack_name: stack.name().to_string(),
                account: stack.props().account.clone(),
                region: stack.props().region.clone(),
                template: stack.template().clone(),
                assets: stack.assets().to_vec(),
            })
            .collect::<Vec<_>>();

        Assembly { artifacts }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a deployment needs: one template per stack plus the asset
/// manifest binding code parameters to locally-built artifacts.
pub struct Assembly {
    artifacts: Vec<StackArtifact>,
}

pub struct StackArtifact {
    stack_name: String,
    account: Option<String>,
    region: Option<String>,
    template: Template,
    assets: Vec<Asset>,
}

impl Assembly {
    pub fn artifacts<'a>(&'a self) -> &'a [StackArtifact] {
        self.artifacts.as_slice()
    }

    /// Write `<stack>.template.json` per stack and a combined `assets.json`
    /// into the output directory.
    pub fn write_to_dir(&self, out_dir: &std::path::Path) -> Result<(), Error> {
        use std::io::Write;

        std::fs::create_dir_all(out_dir)?;

        for artifact in &self.artifacts {
            let path = out_dir.join(artifact.template_file_name());
            let mut f = std::fs::File::create(path)?;
            f.write_all(artifact.template_json()?.as_bytes())?;
        }

        let assets = self
            .artifacts
            .iter()
            .map(|artifact| (artifact.stack_name.as_str(), artifact.assets.as_slice()))
            .collect::<std::collections::BTreeMap<_, _>>();

        let mut f = std::fs::File::create(out_dir.join("assets.json"))?;
        f.write_all(serde_json::to_string_pretty(&assets)?.as_bytes())?;

        Ok(())
    }
}

impl StackArtifact {
    pub fn stack_name<'a>(&'a self) -> &'a str {
        self.stack_name.as_str()
    }

    pub fn account<'a>(&'a self) -> Option<&'a str> {
        self.account.as_deref()
    }

    pub fn region<'a>(&'a self) -> Option<&'a str> {
        self.region.as_deref()
    }

    pub fn template<'a>(&'a self) -> &'a Template {
        &self.template
    }

    pub fn assets<'a>(&'a self) -> &'a [Asset] {
        self.assets.as_slice()
    }

    pub fn template_file_name(&self) -> String {
        format!("{}.template.json", self.stack_name)
    }

    pub fn template_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.template)?)
    }
}
