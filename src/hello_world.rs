use crate::app::App;
use crate::function::{FunctionUrl, RustFunction, RustFunctionProps, UrlAuthType};
use crate::stack::{Stack, StackProps};
use crate::Error;

/// Name of the stack output carrying the invocation URL
pub const FN_URL_OUTPUT: &str = "helloWorldApiFnUrl";

#[derive(Clone, Debug, Default)]
pub struct HelloWorldApiProps {
    pub stack: StackProps,
    pub function: RustFunctionProps,
    /// Keep the function and URL handles readable after construction, so
    /// sibling stacks can wire permissions or outputs against them
    pub expose_handles: bool,
}

/// One Rust function behind a public function URL, with the URL exported as
/// a stack output.
#[derive(Debug)]
pub struct HelloWorldApiStack {
    stack_name: String,
    pub function: Option<RustFunction>,
    pub function_url: Option<FunctionUrl>,
}

impl HelloWorldApiStack {
    pub fn new(app: &mut App, id: &str, props: HelloWorldApiProps) -> Result<Self, Error> {
        let mut stack = Stack::new(id, props.stack)?;

        // The function, built from the local Cargo manifest
        let function = RustFunction::new(&mut stack, "RustFunction", &props.function)?;

        // Reachable without authentication — anyone holding the URL can
        // invoke the function. Demo configuration, not production.
        let function_url = function.add_function_url(&mut stack, UrlAuthType::None)?;

        // Export the URL so it shows up in the deploy outputs
        stack.add_output(FN_URL_OUTPUT, function_url.url())?;

        // Register last: a failed declaration leaves nothing behind in the app
        app.add_stack(stack)?;

        Ok(Self {
            stack_name: id.to_string(),
            function: props.expose_handles.then_some(function),
            function_url: props.expose_handles.then_some(function_url),
        })
    }

    pub fn stack_name<'a>(&'a self) -> &'a str {
        self.stack_name.as_str()
    }
}
