//! Parse command implementation
//!
//! Shows how reference lines are interpreted: folder, organization,
//! repository, branch, the canonical clone URL and the `git clone` command
//! the fetch would run. Nothing is fetched and no file is touched.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use auto_addons::git::{clone_args, display_command};
use auto_addons::reference::{ReferenceParser, RepositoryReference};

use super::SettingsArgs;

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Reference lines, e.g. "connector_rename OCA/connector 8.0"
    #[arg(value_name = "LINE", required = true)]
    pub lines: Vec<String>,

    /// Branch inherited by lines that do not name one
    #[arg(long, value_name = "BRANCH")]
    pub parent_branch: Option<String>,

    /// Print the parsed references as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Debug, Serialize)]
struct ParsedLine {
    #[serde(flatten)]
    reference: RepositoryReference,
    url: String,
    destination: PathBuf,
    clone_command: String,
}

/// Execute the parse command
pub fn execute(args: ParseArgs) -> Result<()> {
    let settings = args.settings.load()?;
    let parser = ReferenceParser::new(&settings);

    let mut parsed = Vec::new();
    let mut failures = 0;
    for line in &args.lines {
        match parser.parse(line, args.parent_branch.as_deref()) {
            Ok(reference) => {
                let url = reference.resolve_url();
                let destination = reference.destination(&settings.base_path);
                let clone_command =
                    display_command(&clone_args(&url, reference.branch.as_deref(), &destination));
                parsed.push(ParsedLine {
                    reference,
                    url,
                    destination,
                    clone_command,
                });
            }
            Err(e) => {
                eprintln!("{}", e);
                failures += 1;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        for line in &parsed {
            print_parsed(line);
        }
    }

    if failures > 0 {
        bail!(
            "{} of {} reference lines could not be parsed",
            failures,
            args.lines.len()
        );
    }
    Ok(())
}

fn print_parsed(line: &ParsedLine) {
    let reference = &line.reference;
    println!("{}", reference.source_text);
    println!("  folder:       {}", reference.local_folder);
    println!("  organization: {}", reference.organization);
    println!("  repository:   {}", reference.repository_name);
    println!("  host:         {}", reference.host);
    println!("  scheme:       {}", reference.scheme);
    println!(
        "  branch:       {}",
        reference.branch.as_deref().unwrap_or("(default)")
    );
    println!("  url:          {}", line.url);
    println!("  destination:  {}", line.destination.display());
    println!("  clone:        {}", line.clone_command);
}
