//! Fetch command implementation
//!
//! Resolves the root references, clones or updates every repository they
//! transitively declare, and writes the resulting `addons_path` (followed by
//! Odoo's built-in addons directory) into the server configuration.
//!
//! The positional arguments mirror the container entrypoint:
//!
//! ```bash
//! auto-addons fetch                          # roots from <base>/oca_dependencies.txt
//! auto-addons fetch false                    # same, without following dependencies
//! auto-addons fetch true Elico-Corp/odoo     # a single root repository
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ptree::{print_tree, TreeItem};

use auto_addons::odoo_conf;
use auto_addons::output::{emoji, OutputConfig};
use auto_addons::repository::DefaultGitOperations;
use auto_addons::traversal::{
    Outcome, RefId, ReferenceArena, Traversal, TraversalOptions, TraversalReport,
};

use super::SettingsArgs;

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Follow oca_dependencies.txt files; only "false" disables it
    #[arg(
        value_name = "FETCH_DEPENDENCIES",
        default_value = "true",
        env = "FETCH_OCA_DEPENDENCIES"
    )]
    pub fetch_dependencies: String,

    /// Single repository to fetch instead of the base dependency file
    #[arg(value_name = "REPOSITORY", env = "ADDONS_REPO")]
    pub repository: Option<String>,

    /// Do not pull repositories that already exist
    #[arg(long)]
    pub no_pull: bool,

    /// Print the resolved addons_path instead of writing the configuration
    #[arg(long)]
    pub no_write: bool,

    /// Print the resolution tree
    #[arg(long)]
    pub tree: bool,

    /// Suppress the summary
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Anything but a case-insensitive "false" enables dependency fetching.
fn fetch_dependencies_enabled(value: &str) -> bool {
    !value.trim().eq_ignore_ascii_case("false")
}

/// Execute the fetch command
pub fn execute(args: FetchArgs, output: &OutputConfig) -> Result<()> {
    let settings = args.settings.load()?;
    let fetch_dependencies = fetch_dependencies_enabled(&args.fetch_dependencies);
    let options = TraversalOptions {
        fetch_dependencies,
        // Existing work trees are left alone when dependencies are not followed
        pull_existing: fetch_dependencies && !args.no_pull,
    };

    let git = DefaultGitOperations;
    let mut traversal = Traversal::new(&git, &settings, options);

    let repository = args
        .repository
        .as_deref()
        .map(str::trim)
        .filter(|repository| !repository.is_empty());
    match repository {
        Some(repository) => traversal.resolve_root(repository),
        None => {
            let roots_file = settings.root_dependencies_file();
            let content = fs::read_to_string(&roots_file).with_context(|| {
                format!("Failed to read dependency file {}", roots_file.display())
            })?;
            traversal.resolve_roots(&content);
        }
    }

    let TraversalReport {
        paths,
        arena,
        errors,
    } = traversal.finish();

    if args.tree && !arena.is_empty() {
        print_resolution_tree(&arena)?;
    }

    // Odoo's own addons come last so already-present modules win
    let mut addons_path: Vec<PathBuf> = paths;
    addons_path.push(settings.builtin_addons_path.clone());

    if args.no_write {
        for path in &addons_path {
            println!("{}", path.display());
        }
    } else {
        odoo_conf::write_addons_path(&settings.config_file, &addons_path)?;
    }

    if !args.quiet {
        let resolved = addons_path.len() - 1;
        let summary = format!(
            "{} Resolved {} {} ({} {})",
            output.status(errors.is_empty()),
            resolved,
            if resolved == 1 { "repository" } else { "repositories" },
            errors.len(),
            if errors.len() == 1 { "error" } else { "errors" },
        );
        if args.no_write {
            eprintln!("{}", summary);
        } else {
            println!("{}", summary);
            println!(
                "   {} addons_path written to {}",
                emoji(output, "📝", "-"),
                settings.config_file.display()
            );
        }
    }

    Ok(())
}

fn print_resolution_tree(arena: &ReferenceArena) -> Result<()> {
    for root in arena.roots() {
        let tree_root = build_tree_node(arena, root);
        print_tree(&tree_root).context("Failed to display tree")?;
    }
    Ok(())
}

fn build_tree_node(arena: &ReferenceArena, id: RefId) -> TreeNode {
    let node = arena.get(id);
    let status = match node.outcome {
        Outcome::Pending => "pending",
        Outcome::Skipped => "already resolved",
        Outcome::Updated => "updated",
        Outcome::Cloned => "cloned",
        Outcome::Failed => "failed",
    };
    let label = format!("{} [{}]", node.reference, status);
    let children = arena
        .children(id)
        .map(|child| build_tree_node(arena, child))
        .collect();
    TreeNode { label, children }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
