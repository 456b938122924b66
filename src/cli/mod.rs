//! Command-line interface for syllabus.
//!
//! Provides commands for browsing courses, lessons and challenges from a
//! content directory, and for rendering MDX lesson bodies.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{self, ResolvedConfig};
use crate::content::{self, ContentStore};
use crate::domain::{ChallengeSlug, Course};
use crate::mdx::{render_safe_mdx_with, UnknownComponentPolicy};

/// syllabus - Course content access and safe MDX rendering
#[derive(Parser, Debug)]
#[command(name = "syllabus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content directory (overrides config and SYLLABUS_CONTENT)
    #[arg(long, global = true)]
    pub content: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all courses
    Courses {
        /// Print the full collection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a course with numbered lessons (JSON)
    Course {
        /// Course slug
        slug: String,
    },

    /// Show the numbered lessons of a course (JSON)
    Lessons {
        /// Course slug
        slug: String,
    },

    /// Show a challenge (JSON)
    Challenge {
        /// Challenge slug
        slug: Option<String>,
    },

    /// List all challenges
    Challenges {
        /// Print the full collection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render MDX to HTML
    Render {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the view tree as JSON instead of HTML
        #[arg(long)]
        tree: bool,

        /// How to handle components with no registered renderer
        #[arg(long, value_enum)]
        unknown_components: Option<PolicyArg>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Unknown component policy for CLI (maps to UnknownComponentPolicy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Render as a plain element
    Passthrough,

    /// Drop the element
    Strip,

    /// Fail the render
    Error,
}

impl From<PolicyArg> for UnknownComponentPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Passthrough => UnknownComponentPolicy::Passthrough,
            PolicyArg::Strip => UnknownComponentPolicy::Strip,
            PolicyArg::Error => UnknownComponentPolicy::Error,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        // Configuration is only loaded by the commands that need it
        let content = self.content;
        let settings = || content_settings(config::config(), content.clone());

        match self.command {
            Commands::Courses { json } => list_courses(&settings()?, json).await,
            Commands::Course { slug } => show_course(&settings()?, &slug).await,
            Commands::Lessons { slug } => show_lessons(&settings()?, &slug).await,
            Commands::Challenge { slug } => show_challenge(&settings()?, slug.as_deref()).await,
            Commands::Challenges { json } => list_challenges(&settings()?, json).await,
            Commands::Render {
                input,
                tree,
                unknown_components,
            } => {
                let policy = match unknown_components {
                    Some(policy) => UnknownComponentPolicy::from(policy),
                    None => config::config()?.render.unknown_components,
                };
                render(input, tree, policy)
            }
            Commands::Config => {
                let mut resolved = config::config()?.clone();
                if let Some(content) = content.clone() {
                    resolved = resolved.with_content_dir(content);
                }
                show_config(&resolved)
            }
        }
    }
}

/// Settings for the content commands. An explicit `--content` still works
/// when the configuration cannot be loaded.
fn content_settings(
    loaded: Result<&ResolvedConfig>,
    content: Option<PathBuf>,
) -> Result<ResolvedConfig> {
    match (loaded, content) {
        (Ok(config), Some(content)) => Ok(config.clone().with_content_dir(content)),
        (Ok(config), None) => Ok(config.clone()),
        (Err(e), Some(content)) => {
            eprintln!("warning: ignoring configuration: {:#}", e);
            Ok(ResolvedConfig::for_content_dir(content))
        }
        (Err(e), None) => Err(e),
    }
}

/// Load the content directory and install it as the process-wide store
async fn load_store(config: &ResolvedConfig) -> Result<&'static ContentStore> {
    let store = ContentStore::load(&config.content).await?;
    Ok(content::install(store)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// List all courses
async fn list_courses(config: &ResolvedConfig, json: bool) -> Result<()> {
    load_store(config).await?;
    let courses = content::get_all_courses()?;

    if json {
        return print_json(&courses);
    }

    if courses.is_empty() {
        println!("No courses found in {}", config.content.display());
        return Ok(());
    }

    println!("{:<30} {:<40} {:>8}", "SLUG", "TITLE", "LESSONS");
    println!("{}", "-".repeat(80));

    for course in &courses {
        println!(
            "{:<30} {:<40} {:>8}",
            course.slug,
            course.title().unwrap_or("-"),
            course.lessons.len()
        );
    }

    Ok(())
}

/// Show a course with numbered lessons
async fn show_course(config: &ResolvedConfig, slug: &str) -> Result<()> {
    load_store(config).await?;
    let course: Course = content::get_course(slug)?;
    print_json(&course)
}

/// Show the numbered lessons of a course
async fn show_lessons(config: &ResolvedConfig, slug: &str) -> Result<()> {
    load_store(config).await?;
    let lessons = content::get_course_lessons(slug)?;
    print_json(&lessons)
}

/// Show a challenge; absence is reported, not an error
async fn show_challenge(config: &ResolvedConfig, slug: Option<&str>) -> Result<()> {
    load_store(config).await?;

    match content::get_challenge(ChallengeSlug::from(slug))? {
        Some(challenge) => print_json(&challenge),
        None => {
            eprintln!("No challenge found");
            Ok(())
        }
    }
}

/// List all challenges
async fn list_challenges(config: &ResolvedConfig, json: bool) -> Result<()> {
    load_store(config).await?;
    let challenges = content::get_all_challenges()?;

    if json {
        return print_json(&challenges);
    }

    if challenges.is_empty() {
        println!("No challenges found in {}", config.content.display());
        return Ok(());
    }

    println!("{:<30} {:<40}", "SLUG", "TITLE");
    println!("{}", "-".repeat(70));

    for challenge in &challenges {
        println!(
            "{:<30} {:<40}",
            challenge.slug,
            challenge.title().unwrap_or("-")
        );
    }

    Ok(())
}

/// Render MDX from a file or stdin
fn render(input_file: Option<PathBuf>, tree: bool, policy: UnknownComponentPolicy) -> Result<()> {
    let source = if let Some(path) = input_file {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    };

    let rendered = render_safe_mdx_with(&source, policy)?;

    for diagnostic in &rendered.diagnostics {
        match diagnostic.line {
            Some(line) => eprintln!("warning: {} (line {})", diagnostic.message, line),
            None => eprintln!("warning: {}", diagnostic.message),
        }
    }

    if tree {
        print_json(&rendered.node)
    } else {
        println!("{}", rendered.node.to_html());
        Ok(())
    }
}

/// Show resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("Syllabus Configuration");
    println!("======================\n");

    match &config.config_file {
        Some(path) => println!("Config file:  {}", path.display()),
        None => println!("Config file:  (none, using defaults)"),
    }
    println!("Home:         {}", config.home.display());
    println!("Content:      {}", config.content.display());
    println!("Unknown tags: {}", config.render.unknown_components);

    Ok(())
}
