//! External method dispatch from the command line

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use mtnav_app::MethodOutput;
use mtnav_navigate::NavArgs;

use super::{connect, parse_nav_arg, GlobalOptions};
use crate::output::{print_message, print_success, print_value, OutputFormat};

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Method name, e.g. do_login or api_login
    pub method: String,

    /// Method argument as key=value (repeatable)
    #[arg(short, long = "arg", value_parser = parse_nav_arg)]
    pub args: Vec<(String, Value)>,
}

pub fn execute(args: CallArgs, options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let config = options.load_config()?;
    let app = connect(&config)?;
    let nav_args: NavArgs = args.args.into_iter().collect();

    match app.call(&args.method, &nav_args)? {
        MethodOutput::None => match format {
            OutputFormat::Json | OutputFormat::Yaml => {
                print_message(&format!("{} completed", args.method), format)
            }
            _ => print_success(&format!("{} completed", args.method)),
        },
        MethodOutput::Json(value) => print_value(&value, format)?,
        MethodOutput::View(view) => {
            let displayed = view.is_displayed()?;
            print_message(
                &format!("{} returned a view (displayed: {})", args.method, displayed),
                format,
            );
        }
    }
    Ok(())
}
