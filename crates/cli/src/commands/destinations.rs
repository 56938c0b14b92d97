//! Destination listing

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mtnav_app::{ImplementationKind, Registry};
use mtnav_navigate::{Navigable, Navigate};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args, Debug)]
pub struct DestinationsArgs {
    /// Only list destinations of this implementation (ViaWebUI, ViaRESTAPI)
    #[arg(long)]
    pub via: Option<ImplementationKind>,
}

/// One registered destination
#[derive(Debug, Serialize, PartialEq)]
pub struct DestinationDisplay {
    pub implementation: String,
    pub destination: String,
    pub prerequisite: Option<String>,
}

impl TableDisplay for DestinationDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Implementation", "Destination", "Prerequisite"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.implementation.clone(),
            self.destination.clone(),
            self.prerequisite.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }
}

/// Every destination of the registry, grouped by implementation
pub fn collect(registry: &Registry, via: Option<ImplementationKind>) -> Result<Vec<DestinationDisplay>> {
    let mut rows = Vec::new();
    for kind in ImplementationKind::ALL {
        if via.is_some_and(|v| v != kind) {
            continue;
        }
        match kind {
            ImplementationKind::WebUi => push_rows(kind, &registry.web_ui(), &mut rows)?,
            ImplementationKind::RestApi => push_rows(kind, &registry.rest_api(), &mut rows)?,
        }
    }
    Ok(rows)
}

fn push_rows<T: ?Sized + Navigable + 'static>(
    kind: ImplementationKind,
    navigator: &Navigate<T>,
    rows: &mut Vec<DestinationDisplay>,
) -> Result<()> {
    for destination in navigator.list_destinations() {
        rows.push(DestinationDisplay {
            implementation: kind.to_string(),
            destination: destination.to_string(),
            prerequisite: navigator.prerequisite_of(destination)?,
        });
    }
    Ok(())
}

pub fn execute(args: DestinationsArgs, format: OutputFormat) -> Result<()> {
    let registry = Registry::standard()?;
    let rows = collect(&registry, args.via)?;
    print_list(&rows, format)
}
