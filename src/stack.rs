use crate::template::{Output, Parameter, Resource, Template};
use crate::Error;

/// Optional provisioning target. CloudFormation picks these up from the
/// deployer's environment when unset.
#[derive(Clone, Debug, Default)]
pub struct StackProps {
    pub account: Option<String>,
    pub region: Option<String>,
}

/// A named deployable unit: one CloudFormation template in the making.
pub struct Stack {
    name: String,
    props: StackProps,
    template: Template,
    assets: Vec<Asset>,
}

impl Stack {
    pub fn new(name: &str, props: StackProps) -> Result<Self, Error> {
        if !is_valid_stack_name(name) {
            return Err(Error::InvalidStackName(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            props,
            template: Template::new(),
            assets: Vec::new(),
        })
    }

    pub fn name<'a>(&'a self) -> &'a str {
        self.name.as_str()
    }

    pub fn props<'a>(&'a self) -> &'a StackProps {
        &self.props
    }

    pub fn template<'a>(&'a self) -> &'a Template {
        &self.template
    }

    pub fn assets<'a>(&'a self) -> &'a [Asset] {
        self.assets.as_slice()
    }

    /// Declare a resource under the given construct ID. Returns the logical
    /// ID the resource was filed under.
    pub fn add_resource(&mut self, construct_id: &str, resource: Resource) -> Result<String, Error> {
        let logical_id = crate::template::logical_id(construct_id)?;

        if self.template.has_logical_id(&logical_id) {
            return Err(Error::DuplicateLogicalId {
                stack: self.name.clone(),
                id: logical_id,
            });
        }

        self.template.insert_resource(logical_id.clone(), resource);
        Ok(logical_id)
    }

    pub fn add_parameter(&mut self, name: &str, parameter: Parameter) -> Result<(), Error> {
        let name = crate::template::logical_id(name)?;

        if self.template.has_logical_id(&name) {
            return Err(Error::DuplicateLogicalId {
                stack: self.name.clone(),
                id: name,
            });
        }

        self.template.insert_parameter(name, parameter);
        Ok(())
    }

    /// Declare a named export. The value must reference an already-declared
    /// resource attribute; outputs are immutable once added.
    pub fn add_output(&mut self, name: &str, value: serde_json::Value) -> Result<(), Error> {
        if self.template.has_output(name) {
            return Err(Error::DuplicateOutput {
                stack: self.name.clone(),
                name: name.to_string(),
            });
        }

        self.template.insert_output(name.to_string(), Output::new(value));
        Ok(())
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }
}

/// Locally-built artifact the deployer must upload before creating the
/// stack. Binds the code-location template parameters to the file
/// `cargo lambda build` produces.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Asset {
    pub manifest_path: std::path::PathBuf,
    pub artifact: String,
    pub bucket_parameter: String,
    pub key_parameter: String,
}

/// CloudFormation stack names: leading letter, then letters, digits and
/// hyphens, at most 128 characters.
fn is_valid_stack_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= 128 && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_name_validation() {
        assert!(Stack::new("RustyLambdaStack", StackProps::default()).is_ok());
        assert!(Stack::new("my-stack-2", StackProps::default()).is_ok());

        for bad in ["", "2stack", "my_stack", "my stack"] {
            assert!(matches!(
                Stack::new(bad, StackProps::default()),
                Err(Error::InvalidStackName(_))
            ));
        }
    }

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut stack = Stack::new("Test", StackProps::default()).unwrap();
        let resource = || Resource::new("AWS::SNS::Topic", serde_json::json!({}));

        stack.add_resource("My topic", resource()).unwrap();
        // "My-topic" sanitizes to the same logical ID as "My topic"
        let err = stack.add_resource("My-topic", resource()).unwrap_err();
        assert!(matches!(err, Error::DuplicateLogicalId { .. }));
    }

    #[test]
    fn duplicate_output_is_rejected() {
        let mut stack = Stack::new("Test", StackProps::default()).unwrap();

        stack.add_output("url", serde_json::json!("a")).unwrap();
        let err = stack.add_output("url", serde_json::json!("b")).unwrap_err();
        assert!(matches!(err, Error::DuplicateOutput { .. }));
    }
}
