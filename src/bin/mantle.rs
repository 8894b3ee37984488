//! CLI for inspecting the booted object model.
//!
//! Usage:
//!   mantle classes                   # List top-level classes and modules
//!   mantle ancestors <NAME>          # Print the ancestor chain of a class/module
//!   mantle methods <NAME> [--all]    # Print instance methods
//!   mantle --config mantle.toml ...  # Boot with a configuration file

use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use log::debug;

use mantle::runner::ds::entity::EntityId;
use mantle::runner::ds::value::Value;
use mantle::runner::model::Runtime;
use mantle::runner::plugin::config::RuntimeConfig;

#[derive(ClapParser)]
#[command(name = "mantle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the mantle object model", long_about = None)]
struct Cli {
    /// Runtime configuration (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the classes and modules declared at the top level
    Classes,

    /// Print the ancestor chain of a class or module
    Ancestors {
        /// Constant path, e.g. Array or Outer::Inner
        name: String,
    },

    /// Print the instance methods of a class or module
    Methods {
        /// Constant path, e.g. Array or Outer::Inner
        name: String,

        /// Include inherited methods
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RuntimeConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    )
    .init();

    let rt = match Runtime::with_core_config(config) {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to boot: {}", e);
            process::exit(1);
        }
    };
    debug!("booted {:?}", rt);

    let result = match cli.command {
        Commands::Classes => {
            list_classes(&rt);
            Ok(())
        }
        Commands::Ancestors { name } => print_ancestors(&rt, &name),
        Commands::Methods { name, all } => print_methods(&rt, &name, all),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn list_classes(rt: &Runtime) {
    let object = rt.object_class();
    for name in rt.constants(object) {
        if let Ok(Value::Entity(id)) = rt.const_get(object, &name) {
            let entity = rt.entity(id);
            let kind = if entity.is_module() { "module" } else { "class" };
            match (entity.superclass(), entity.native_kind()) {
                (Some(superclass), Some(native)) => println!(
                    "{} {} < {} [{}]",
                    kind,
                    name,
                    rt.entity_name(superclass),
                    native
                ),
                (Some(superclass), None) => {
                    println!("{} {} < {}", kind, name, rt.entity_name(superclass))
                }
                (None, _) => println!("{} {}", kind, name),
            }
        }
    }
}

/// The class or module a constant path names.
fn resolve(rt: &Runtime, name: &str) -> Result<EntityId, String> {
    match rt.const_get_path(name).map_err(|e| e.to_string())? {
        Value::Entity(id) => Ok(id),
        other => Err(format!("{} is not a class/module", rt.describe(&other))),
    }
}

fn print_ancestors(rt: &Runtime, name: &str) -> Result<(), String> {
    let id = resolve(rt, name)?;
    for ancestor in rt.ancestors(id) {
        println!("{}", rt.entity_name(ancestor));
    }
    Ok(())
}

fn print_methods(rt: &Runtime, name: &str, all: bool) -> Result<(), String> {
    let id = resolve(rt, name)?;
    for method in rt.instance_methods(id, all) {
        println!("{}", method);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entities_only() {
        let mut rt = Runtime::with_core().unwrap();
        let object = rt.object_class();
        rt.const_set(object, "LIMIT", Value::Integer(3)).unwrap();

        assert_eq!(resolve(&rt, "Object"), Ok(object));
        assert_eq!(
            resolve(&rt, "LIMIT"),
            Err("an instance of Numeric is not a class/module".to_string())
        );
        assert!(resolve(&rt, "Missing").is_err());
    }
}
