use crate::manifest::CargoManifest;
use crate::stack::{Asset, Stack};
use crate::template::{self, Parameter, Resource};
use crate::Error;

// Functions packaged by cargo-lambda run as custom-runtime bootstraps
const RUNTIME: &str = "provided.al2023";
const HANDLER: &str = "bootstrap";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub enum Architecture {
    #[default]
    #[serde(rename = "x86_64")]
    X86,
    #[serde(rename = "arm64")]
    Arm64,
}

impl Architecture {
    fn as_cloudformation(&self) -> &'static str {
        match self {
            Self::X86 => "x86_64",
            Self::Arm64 => "arm64",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RustFunctionProps {
    /// Path to the `Cargo.toml` of the function's source crate
    pub manifest_path: std::path::PathBuf,
    pub memory_size: Option<u32>,
    pub timeout_seconds: Option<u32>,
    pub architecture: Architecture,
    pub environment: std::collections::BTreeMap<String, String>,
}

/// A Lambda function built from a local Cargo manifest. Declaring one adds
/// an execution role and the function itself to the stack, and records the
/// code asset the deployer must upload.
#[derive(Clone, Debug)]
pub struct RustFunction {
    logical_id: String,
    bin_name: String,
}

impl RustFunction {
    pub fn new(stack: &mut Stack, id: &str, props: &RustFunctionProps) -> Result<Self, Error> {
        // Resolve the build manifest first; an unresolvable path aborts the
        // whole declaration
        let manifest = CargoManifest::from_path(&props.manifest_path)?;
        let base_id = template::logical_id(id)?;

        let role = Resource::new(
            "AWS::IAM::Role",
            serde_json::json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Action": "sts:AssumeRole",
                        "Effect": "Allow",
                        "Principal": { "Service": "lambda.amazonaws.com" }
                    }]
                },
                "ManagedPolicyArns": [template::join(vec![
                    serde_json::json!("arn:"),
                    template::reference("AWS::Partition"),
                    serde_json::json!(":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"),
                ])]
            }),
        );
        let role_id = stack.add_resource(&format!("{}ServiceRole", base_id), role)?;

        // The code location is bound at deploy time through parameters;
        // synthesis records which artifact belongs in them
        let bucket_parameter = format!("{}CodeS3Bucket", base_id);
        let key_parameter = format!("{}CodeS3Key", base_id);
        stack.add_parameter(
            &bucket_parameter,
            Parameter::string("S3 bucket holding the packaged function code"),
        )?;
        stack.add_parameter(
            &key_parameter,
            Parameter::string("S3 key of the packaged function code"),
        )?;

        let mut properties = serde_json::json!({
            "Code": {
                "S3Bucket": template::reference(&bucket_parameter),
                "S3Key": template::reference(&key_parameter),
            },
            "Handler": HANDLER,
            "Runtime": RUNTIME,
            "Architectures": [props.architecture.as_cloudformation()],
            "Role": template::get_att(&role_id, "Arn"),
        });
        if let Some(memory_size) = props.memory_size {
            properties["MemorySize"] = serde_json::json!(memory_size);
        }
        if let Some(timeout_seconds) = props.timeout_seconds {
            properties["Timeout"] = serde_json::json!(timeout_seconds);
        }
        if !props.environment.is_empty() {
            properties["Environment"] = serde_json::json!({ "Variables": &props.environment });
        }

        let function = Resource::new("AWS::Lambda::Function", properties);
        let logical_id = stack.add_resource(id, function)?;

        stack.add_asset(Asset {
            manifest_path: manifest.manifest_path().to_path_buf(),
            artifact: manifest.artifact_path(),
            bucket_parameter,
            key_parameter,
        });

        Ok(Self {
            logical_id,
            bin_name: manifest.bin_name().to_string(),
        })
    }

    /// Expose the function over an HTTPS endpoint. With [`UrlAuthType::None`]
    /// this also grants `lambda:InvokeFunctionUrl` to everyone. A function
    /// carries at most one URL; deriving a second collides.
    pub fn add_function_url(
        &self,
        stack: &mut Stack,
        auth_type: UrlAuthType,
    ) -> Result<FunctionUrl, Error> {
        let url = Resource::new(
            "AWS::Lambda::Url",
            serde_json::json!({
                "AuthType": auth_type.as_cloudformation(),
                "TargetFunctionArn": self.arn(),
            }),
        );
        let logical_id = stack.add_resource(&format!("{}Url", self.logical_id), url)?;

        if auth_type == UrlAuthType::None {
            // Lambda requires an explicit public-invoke permission to serve
            // unauthenticated URL requests
            let permission = Resource::new(
                "AWS::Lambda::Permission",
                serde_json::json!({
                    "Action": "lambda:InvokeFunctionUrl",
                    "FunctionName": self.arn(),
                    "FunctionUrlAuthType": auth_type.as_cloudformation(),
                    "Principal": "*",
                }),
            );
            stack.add_resource(&format!("{}UrlPublicAccess", self.logical_id), permission)?;
        }

        Ok(FunctionUrl {
            logical_id,
            auth_type,
        })
    }

    pub fn logical_id<'a>(&'a self) -> &'a str {
        self.logical_id.as_str()
    }

    pub fn bin_name<'a>(&'a self) -> &'a str {
        self.bin_name.as_str()
    }

    /// Attribute reference to the function's ARN
    pub fn arn(&self) -> serde_json::Value {
        template::get_att(&self.logical_id, "Arn")
    }
}

/// Who may invoke the function URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlAuthType {
    /// Anyone on the internet, no signature required. Fine for a demo,
    /// not for production.
    None,
    /// Callers must sign requests with IAM credentials
    AwsIam,
}

impl UrlAuthType {
    pub fn as_cloudformation(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::AwsIam => "AWS_IAM",
        }
    }
}

/// Handle to a declared function URL. The address itself only exists after
/// deployment; `url()` is the attribute reference the template exports.
#[derive(Clone, Debug)]
pub struct FunctionUrl {
    logical_id: String,
    auth_type: UrlAuthType,
}

impl FunctionUrl {
    pub fn url(&self) -> serde_json::Value {
        template::get_att(&self.logical_id, "FunctionUrl")
    }

    pub fn auth_type(&self) -> UrlAuthType {
        self.auth_type
    }

    pub fn logical_id<'a>(&'a self) -> &'a str {
        self.logical_id.as_str()
    }
}
