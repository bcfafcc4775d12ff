#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Read stack definitions from file
    #[arg(
        short = 'c',
        long,
        value_name = "CONFIG FILE",
        default_value = "stack.toml"
    )]
    config_file: std::path::PathBuf,

    #[command(subcommand)]
    command: CliCommands,
}

#[derive(clap::Subcommand)]
enum CliCommands {
    /// Synthesize CloudFormation templates and the asset manifest
    Synth {
        /// Directory the templates are written into
        #[arg(long, value_name = "DIR", default_value = "stack.out")]
        out: std::path::PathBuf,
    },
    /// List the stacks defined in the configuration
    List {},
}

fn main() {
    use clap::Parser;
    use rusty_lambda_stack::*;

    let cli = Cli::parse();

    match cli.command {
        CliCommands::Synth { out } => {
            let config = Config::from_file(&cli.config_file).unwrap();
            let assembly = synth_stacks(&config).unwrap();
            assembly.write_to_dir(&out).unwrap();

            for artifact in assembly.artifacts() {
                println!(
                    "{}: {}",
                    artifact.stack_name(),
                    out.join(artifact.template_file_name()).display()
                );
                for asset in artifact.assets() {
                    println!(
                        "  package {} as {}, then fill parameters {} / {}",
                        asset.manifest_path.display(),
                        asset.artifact,
                        asset.bucket_parameter,
                        asset.key_parameter
                    );
                }
            }
        }
        CliCommands::List {} => {
            let config = Config::from_file(&cli.config_file).unwrap();
            for stack in config.stacks() {
                println!("{}", stack.name());
            }
        }
    }
}
