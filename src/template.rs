//! CloudFormation template as plain data, serialized with serde_json.
use crate::Error;

/// One declared resource: a CloudFormation type name plus its properties.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    resource_type: String,
    #[serde(rename = "Properties")]
    properties: serde_json::Value,
}

impl Resource {
    pub fn new(resource_type: &str, properties: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            properties,
        }
    }

    pub fn resource_type<'a>(&'a self) -> &'a str {
        self.resource_type.as_str()
    }

    pub fn properties<'a>(&'a self) -> &'a serde_json::Value {
        &self.properties
    }
}

/// Deploy-time input, used for the S3 location of packaged function code.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Parameter {
    #[serde(rename = "Type")]
    parameter_type: String,
    #[serde(rename = "Description")]
    description: String,
}

impl Parameter {
    pub fn string(description: &str) -> Self {
        Self {
            parameter_type: "String".to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Output {
    #[serde(rename = "Value")]
    value: serde_json::Value,
}

impl Output {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    pub fn value<'a>(&'a self) -> &'a serde_json::Value {
        &self.value
    }
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: String,
    #[serde(
        rename = "Parameters",
        skip_serializing_if = "std::collections::BTreeMap::is_empty"
    )]
    parameters: std::collections::BTreeMap<String, Parameter>,
    #[serde(rename = "Resources")]
    resources: std::collections::BTreeMap<String, Resource>,
    #[serde(
        rename = "Outputs",
        skip_serializing_if = "std::collections::BTreeMap::is_empty"
    )]
    outputs: std::collections::BTreeMap<String, Output>,
}

impl Template {
    pub fn new() -> Self {
        Self {
            format_version: "2010-09-09".to_string(),
            parameters: std::collections::BTreeMap::new(),
            resources: std::collections::BTreeMap::new(),
            outputs: std::collections::BTreeMap::new(),
        }
    }

    /// Logical IDs share one namespace with parameters in CloudFormation
    pub fn has_logical_id(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id) || self.parameters.contains_key(logical_id)
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn insert_resource(&mut self, logical_id: String, resource: Resource) {
        self.resources.insert(logical_id, resource);
    }

    pub fn insert_parameter(&mut self, name: String, parameter: Parameter) {
        self.parameters.insert(name, parameter);
    }

    pub fn insert_output(&mut self, name: String, output: Output) {
        self.outputs.insert(name, output);
    }

    pub fn resources<'a>(&'a self) -> impl Iterator<Item = (&'a str, &'a Resource)> {
        self.resources.iter().map(|(id, res)| (id.as_str(), res))
    }

    pub fn output<'a>(&'a self, name: &str) -> Option<&'a Output> {
        self.outputs.get(name)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

/// `Fn::GetAtt` reference to an attribute of a declared resource
pub fn get_att(logical_id: &str, attribute: &str) -> serde_json::Value {
    serde_json::json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `Ref` to a declared resource, parameter or pseudo parameter
pub fn reference(logical_id: &str) -> serde_json::Value {
    serde_json::json!({ "Ref": logical_id })
}

/// `Fn::Join` with an empty separator
pub fn join(parts: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "Fn::Join": ["", parts] })
}

/// Strip a construct ID down to the alphanumeric characters CloudFormation
/// accepts as a logical ID.
pub fn logical_id(construct_id: &str) -> Result<String, Error> {
    let id = construct_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>();

    if id.is_empty() {
        Err(Error::EmptyLogicalId(construct_id.to_string()))
    } else {
        Ok(id)
    }
}
