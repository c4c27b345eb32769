//! Command-line surface for `quire-admin`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quire-admin", version, about = "Quire administration client", long_about = None)]
pub struct Cli {
    /// Site base URL, e.g. <http://127.0.0.1:3000>
    #[arg(long, env = "QUIRE_SITE_URL", default_value = "http://127.0.0.1:3000")]
    pub site: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post and category totals plus the most recent posts
    Dashboard,
    /// Category management
    Categories(CategoriesArgs),
    /// Post management
    Posts(PostsArgs),
    /// Show how a markdown file splits into display blocks
    Preview {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    /// List every category
    List,
    /// Get a category by slug
    Show { slug: String },
    /// Create a category
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a category or change its description
    Update {
        /// Current slug of the category
        slug: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Remove the description
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    /// Delete a category and its post links
    Delete { id: i32 },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts, filtered and paginated like the reading site
    List {
        #[arg(long)]
        search: Option<String>,
        /// Category name; "All Categories" disables the filter
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Get a post by slug
    Show { slug: String },
    /// List the posts linked to a category
    ByCategory {
        #[arg(long)]
        category_id: i32,
    },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: PostFieldArgs,
    },
    /// Update a post; omitted fields keep their current value
    Update {
        /// Current slug of the post
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: PostFieldArgs,
        #[command(flatten)]
        clear: PostClearArgs,
    },
    /// Delete a post
    Delete { id: i32 },
}

#[derive(Args, Debug, Default, Clone)]
pub struct PostFieldArgs {
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    /// Make the post visible on the reading site
    #[arg(long, conflicts_with = "draft")]
    pub publish: bool,
    /// Hide the post from the reading site
    #[arg(long)]
    pub draft: bool,
    /// Category id to link; repeat for several (at most 3)
    #[arg(long = "category-id", value_name = "ID")]
    pub category_ids: Vec<i32>,
}

/// Fields an update can blank out instead of keeping.
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct PostClearArgs {
    /// Remove every category link
    #[arg(id = "clear_categories", long = "clear-categories", conflicts_with = "category_ids")]
    pub categories: bool,
    /// Remove the cover image
    #[arg(id = "clear_image", long = "clear-image", conflicts_with = "image")]
    pub image: bool,
    /// Reset the description to empty
    #[arg(
        id = "clear_description",
        long = "clear-description",
        conflicts_with = "description"
    )]
    pub description: bool,
}

impl PostFieldArgs {
    /// `Some(true)` for `--publish`, `Some(false)` for `--draft`.
    pub fn published(&self) -> Option<bool> {
        match (self.publish, self.draft) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
