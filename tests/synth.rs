use rusty_lambda_stack::{
    App, Config, Error, HelloWorldApiProps, HelloWorldApiStack, RustFunction, RustFunctionProps,
    Stack, StackProps, UrlAuthType, FN_URL_OUTPUT,
};

// Integration tests run from the package root, where the real function
// manifest lives
const MANIFEST: &str = "hello-world-api/Cargo.toml";

fn props(expose_handles: bool) -> HelloWorldApiProps {
    HelloWorldApiProps {
        function: RustFunctionProps {
            manifest_path: MANIFEST.into(),
            ..RustFunctionProps::default()
        },
        expose_handles,
        ..HelloWorldApiProps::default()
    }
}

fn template_of(app: &App, stack_name: &str) -> serde_json::Value {
    let assembly = app.synth();
    let artifact = assembly
        .artifacts()
        .iter()
        .find(|a| a.stack_name() == stack_name)
        .unwrap();
    serde_json::from_str(&artifact.template_json().unwrap()).unwrap()
}

#[test]
fn synth_declares_function_url_and_output() {
    let mut app = App::new();
    HelloWorldApiStack::new(&mut app, "RustyLambdaStack", props(false)).unwrap();

    let template = template_of(&app, "RustyLambdaStack");
    let resources = template["Resources"].as_object().unwrap();

    let functions = resources
        .values()
        .filter(|r| r["Type"] == "AWS::Lambda::Function")
        .collect::<Vec<_>>();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0]["Properties"]["Handler"], "bootstrap");
    assert_eq!(functions[0]["Properties"]["Runtime"], "provided.al2023");

    let urls = resources
        .iter()
        .filter(|(_, r)| r["Type"] == "AWS::Lambda::Url")
        .collect::<Vec<_>>();
    assert_eq!(urls.len(), 1);
    let (url_id, url) = urls[0];
    assert_eq!(url["Properties"]["AuthType"], "NONE");

    // The output must export exactly the URL's address attribute
    let output_value = &template["Outputs"][FN_URL_OUTPUT]["Value"];
    assert_eq!(
        output_value,
        &serde_json::json!({ "Fn::GetAtt": [url_id, "FunctionUrl"] })
    );

    // Unauthenticated URLs need the public-invoke permission
    let permissions = resources
        .values()
        .filter(|r| r["Type"] == "AWS::Lambda::Permission")
        .collect::<Vec<_>>();
    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0]["Properties"]["Principal"], "*");
    assert_eq!(
        permissions[0]["Properties"]["Action"],
        "lambda:InvokeFunctionUrl"
    );
}

#[test]
fn encapsulated_stack_keeps_no_handles() {
    let mut app = App::new();
    let stack = HelloWorldApiStack::new(&mut app, "RustyLambdaStack", props(false)).unwrap();

    assert!(stack.function.is_none());
    assert!(stack.function_url.is_none());
}

#[test]
fn exposed_handles_match_the_output() {
    let mut app = App::new();
    let stack = HelloWorldApiStack::new(&mut app, "RustyLambdaStack", props(true)).unwrap();

    let function = stack.function.as_ref().unwrap();
    let function_url = stack.function_url.as_ref().unwrap();
    assert_eq!(function_url.auth_type(), UrlAuthType::None);

    let template = template_of(&app, "RustyLambdaStack");

    // The exposed URL handle references the same entity the output exports
    assert_eq!(
        &template["Outputs"][FN_URL_OUTPUT]["Value"],
        &function_url.url()
    );

    // And the exposed function is the one the URL targets
    let url = &template["Resources"][function_url.logical_id()];
    assert_eq!(&url["Properties"]["TargetFunctionArn"], &function.arn());
}

#[test]
fn missing_manifest_aborts_synthesis() {
    let mut app = App::new();
    let mut bad = props(false);
    bad.function.manifest_path = "no-such-dir/Cargo.toml".into();

    let err = HelloWorldApiStack::new(&mut app, "RustyLambdaStack", bad).unwrap_err();
    assert!(matches!(err, Error::ManifestNotFound(_)));

    // No partial graph: the app never saw the failed stack
    assert_eq!(app.stacks().count(), 0);
    assert!(app.synth().artifacts().is_empty());
}

#[test]
fn duplicate_stack_names_collide() {
    let mut app = App::new();
    HelloWorldApiStack::new(&mut app, "RustyLambdaStack", props(false)).unwrap();

    let err = HelloWorldApiStack::new(&mut app, "RustyLambdaStack", props(true)).unwrap_err();
    assert!(matches!(err, Error::DuplicateStack(_)));
    assert_eq!(app.stacks().count(), 1);
}

#[test]
fn a_function_carries_at_most_one_url() {
    let mut stack = Stack::new("Test", StackProps::default()).unwrap();
    let function = RustFunction::new(
        &mut stack,
        "RustFunction",
        &RustFunctionProps {
            manifest_path: MANIFEST.into(),
            ..RustFunctionProps::default()
        },
    )
    .unwrap();

    function
        .add_function_url(&mut stack, UrlAuthType::None)
        .unwrap();
    let err = function
        .add_function_url(&mut stack, UrlAuthType::None)
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateLogicalId { .. }));
}

#[test]
fn iam_auth_skips_the_public_permission() {
    let mut stack = Stack::new("Test", StackProps::default()).unwrap();
    let function = RustFunction::new(
        &mut stack,
        "RustFunction",
        &RustFunctionProps {
            manifest_path: MANIFEST.into(),
            ..RustFunctionProps::default()
        },
    )
    .unwrap();
    function
        .add_function_url(&mut stack, UrlAuthType::AwsIam)
        .unwrap();

    let permissions = stack
        .template()
        .resources()
        .filter(|(_, r)| r.resource_type() == "AWS::Lambda::Permission")
        .count();
    assert_eq!(permissions, 0);
}

#[test]
fn config_drives_synthesis() {
    let config = Config::from_toml_str(
        r#"
        [[stacks]]
        name = "RustyLambdaStack"
        manifest_path = "hello-world-api/Cargo.toml"
        "#,
    )
    .unwrap();

    let assembly = rusty_lambda_stack::synth_stacks(&config).unwrap();
    assert_eq!(assembly.artifacts().len(), 1);

    let artifact = &assembly.artifacts()[0];
    assert_eq!(artifact.stack_name(), "RustyLambdaStack");

    // The asset manifest points the code parameters at the cargo-lambda
    // artifact of the hello-world-api binary
    let assets = artifact.assets();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].artifact, "target/lambda/hello-world-api/bootstrap.zip");
    assert!(assets[0].bucket_parameter.ends_with("CodeS3Bucket"));
}

#[test]
fn assembly_writes_template_and_asset_files() {
    let mut app = App::new();
    HelloWorldApiStack::new(&mut app, "RustyLambdaStack", props(false)).unwrap();

    let out_dir = std::env::temp_dir().join("rusty-lambda-stack-synth-test");
    let _ = std::fs::remove_dir_all(&out_dir);

    app.synth().write_to_dir(&out_dir).unwrap();

    let template_path = out_dir.join("RustyLambdaStack.template.json");
    let template_str = std::fs::read_to_string(&template_path).unwrap();
    let template = serde_json::from_str::<serde_json::Value>(&template_str).unwrap();
    assert!(template["Outputs"][FN_URL_OUTPUT].is_object());

    let assets_str = std::fs::read_to_string(out_dir.join("assets.json")).unwrap();
    let assets = serde_json::from_str::<serde_json::Value>(&assets_str).unwrap();
    assert!(assets["RustyLambdaStack"].is_array());

    let _ = std::fs::remove_dir_all(&out_dir);
}
