//! Navigation from the command line

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use mtnav_app::ImplementationKind;
use mtnav_navigate::NavArgs;

use super::{connect, parse_nav_arg, GlobalOptions};
use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct NavigateArgs {
    /// Destination to reach, e.g. LoggedIn
    pub destination: String,

    /// Implementation to navigate through
    #[arg(long, default_value = "ViaWebUI")]
    pub via: ImplementationKind,

    /// Navigation argument as key=value (repeatable)
    #[arg(short, long = "arg", value_parser = parse_nav_arg)]
    pub args: Vec<(String, Value)>,

    /// Attempts per destination
    #[arg(long)]
    pub tries: Option<usize>,
}

/// Outcome of a navigation
#[derive(Debug, Serialize)]
pub struct NavigationDisplay {
    pub implementation: String,
    pub destination: String,
    pub has_view: bool,
    pub displayed: Option<bool>,
}

impl TableDisplay for NavigationDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Implementation", "Destination", "View", "Displayed"]
    }

    fn row(&self) -> Vec<String> {
        let yes_no = |b: bool| if b { "yes" } else { "no" }.to_string();
        vec![
            self.implementation.clone(),
            self.destination.clone(),
            yes_no(self.has_view),
            self.displayed.map(yes_no).unwrap_or_else(|| "-".to_string()),
        ]
    }
}

pub fn execute(args: NavigateArgs, options: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let mut config = options.load_config()?;
    if let Some(tries) = args.tries {
        config.navigation.tries = tries;
    }

    let app = connect(&config)?;
    let nav_args: NavArgs = args.args.into_iter().collect();

    info!("Navigating {} to {} via {}", app.address(), args.destination, args.via);
    let view = app.navigate_to(args.via, &args.destination, &nav_args)?;

    let display = NavigationDisplay {
        implementation: args.via.to_string(),
        destination: args.destination,
        has_view: view.is_some(),
        displayed: view.map(|v| v.is_displayed()).transpose()?,
    };
    print_item(&display, format)
}
