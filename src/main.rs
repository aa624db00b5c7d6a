use anyhow::Result;
use apiviz::cli;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "apiviz",
    about = "UML relationship diagrams from type descriptors, rendered as Graphviz DOT",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// TOML configuration file
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Category declaration `name[:fill[:line]]` (repeatable)
    #[arg(long = "category", value_name = "SPEC", action = clap::ArgAction::Append)]
    categories: Vec<String>,

    /// Do not generate the package dependency overview
    #[arg(long, default_value_t = false)]
    no_package_diagram: bool,

    /// Check every generated diagram with the DOT validator
    #[arg(long, default_value_t = false)]
    validate: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the overview, every package summary and every class diagram
    Generate {
        /// Descriptor JSON file
        descriptors: PathBuf,

        /// Output directory
        #[arg(short = 'o', long = "output", value_name = "DIR", default_value = "apiviz-out")]
        output: PathBuf,

        /// Package coupling JSON file; derived from the descriptors when absent
        #[arg(long, value_name = "JSON")]
        couplings: Option<PathBuf>,

        /// Print the generation report as JSON
        #[arg(long, default_value_t = false)]
        report: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the class diagram of one type
    Class {
        descriptors: PathBuf,

        /// Qualified type name
        name: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the summary diagram of one package
    Package {
        descriptors: PathBuf,

        /// Package name
        name: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the package dependency overview
    Overview {
        descriptors: PathBuf,

        #[arg(long, value_name = "JSON")]
        couplings: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the relationship graph as JSON
    Graph { descriptors: PathBuf },
}

impl ConfigArgs {
    fn load(&self) -> Result<apiviz::config::GeneratorConfig> {
        cli::load_config(
            self.config.as_deref(),
            &self.categories,
            self.no_package_diagram,
            self.validate,
        )
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Generate {
            descriptors,
            output,
            couplings,
            report,
            config,
        } => cli::generate_diagrams(
            &descriptors,
            &output,
            couplings.as_deref(),
            config.load()?,
            report,
        ),
        Command::Class {
            descriptors,
            name,
            config,
        } => cli::print_class_diagram(&descriptors, &name, config.load()?),
        Command::Package {
            descriptors,
            name,
            config,
        } => cli::print_package_diagram(&descriptors, &name, config.load()?),
        Command::Overview {
            descriptors,
            couplings,
            config,
        } => cli::print_overview(&descriptors, couplings.as_deref(), config.load()?),
        Command::Graph { descriptors } => cli::debug_graph_data(&descriptors),
    }
}
