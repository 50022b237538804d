//! Campus CLI
//!
//! Command-line interface for the campus CMS API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use campus_client::CampusClient;
use campus_types::{CreatePostRequest, LicenseNotice, PostId, PostStatus};

#[derive(Parser)]
#[command(name = "campus")]
#[command(author, version, about = "Campus CMS API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the campus CMS API
    #[arg(long, env = "CAMPUS_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Admin bearer token (from `campus login`)
    #[arg(long, env = "CAMPUS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Log in and print a bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CAMPUS_PASSWORD")]
        password: String,
    },
    /// Create the first super admin
    Bootstrap {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "CAMPUS_PASSWORD")]
        password: String,
    },
    /// Show the cached license status
    License,
    /// Blog post operations
    Posts {
        #[command(subcommand)]
        action: PostCommands,
    },
    /// Feature flag operations
    Flags {
        #[command(subcommand)]
        action: FlagCommands,
    },
    /// Site setting operations
    Settings {
        #[command(subcommand)]
        action: SettingCommands,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// List posts (published only unless --all)
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<i64>,
        /// Include drafts (requires a token)
        #[arg(long)]
        all: bool,
    },
    /// Get a published post by slug
    Get { slug: String },
    /// Create a post
    Create {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "news")]
        category: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Publish immediately instead of saving a draft
        #[arg(long)]
        publish: bool,
    },
    /// Publish a draft
    Publish {
        /// Post ID (UUID)
        id: String,
    },
    /// Delete a post
    Delete {
        /// Post ID (UUID)
        id: String,
    },
}

#[derive(Subcommand)]
enum FlagCommands {
    /// List feature flags
    List,
    /// Turn a flag on or off
    Set {
        key: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingCommands {
    /// List site settings
    List,
    /// Set a value (parsed as JSON, otherwise stored as a string)
    Set { key: String, value: String },
}

fn parse_post_id(s: &str) -> Result<PostId> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid post ID: {}", s))
}

fn parse_setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = CampusClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            eprintln!("Token expires at {}", session.expires_at);
            println!("{}", session.token);
        }

        Commands::Bootstrap {
            email,
            name,
            password,
        } => {
            let admin = client.bootstrap(&email, &name, &password).await?;
            println!("{}", serde_json::to_string_pretty(&admin)?);
        }

        Commands::License => {
            let status = client.license_status().await?;
            match status.notice {
                LicenseNotice::Clear => println!("✓ License OK"),
                LicenseNotice::Warning { days_remaining } => {
                    println!("! Pilot period ends in {} day(s)", days_remaining)
                }
                LicenseNotice::Blocked => println!("✗ License expired"),
            }
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Commands::Posts { action } => match action {
            PostCommands::List {
                category,
                limit,
                all,
            } => {
                let posts = if all {
                    client.list_posts(None).await?
                } else {
                    client
                        .list_published_posts(category.as_deref(), limit)
                        .await?
                };
                println!("{}", serde_json::to_string_pretty(&posts)?);
            }
            PostCommands::Get { slug } => {
                let post = client.get_post(&slug).await?;
                println!("{}", serde_json::to_string_pretty(&post)?);
            }
            PostCommands::Create {
                slug,
                title,
                content,
                category,
                author,
                excerpt,
                tags,
                publish,
            } => {
                let req = CreatePostRequest {
                    slug,
                    title,
                    excerpt,
                    content,
                    category,
                    author,
                    cover_image: None,
                    tags,
                    status: if publish {
                        PostStatus::Published
                    } else {
                        PostStatus::Draft
                    },
                };
                let post = client.create_post(&req).await?;
                println!("{}", serde_json::to_string_pretty(&post)?);
            }
            PostCommands::Publish { id } => {
                let post = client.publish_post(parse_post_id(&id)?).await?;
                println!("{}", serde_json::to_string_pretty(&post)?);
            }
            PostCommands::Delete { id } => {
                client.delete_post(parse_post_id(&id)?).await?;
                println!("✓ Post deleted");
            }
        },

        Commands::Flags { action } => match action {
            FlagCommands::List => {
                let flags = client.list_flags().await?;
                println!("{}", serde_json::to_string_pretty(&flags)?);
            }
            FlagCommands::Set {
                key,
                enabled,
                description,
            } => {
                let flag = client.set_flag(&key, enabled, description).await?;
                println!("{}", serde_json::to_string_pretty(&flag)?);
            }
        },

        Commands::Settings { action } => match action {
            SettingCommands::List => {
                let settings = client.list_settings().await?;
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            SettingCommands::Set { key, value } => {
                let setting = client.set_setting(&key, parse_setting_value(&value)).await?;
                println!("{}", serde_json::to_string_pretty(&setting)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_setting_value_parsing() {
        assert_eq!(parse_setting_value("true"), serde_json::json!(true));
        assert_eq!(parse_setting_value(r#"{"a":1}"#), serde_json::json!({"a": 1}));
        assert_eq!(parse_setting_value("Hillside"), serde_json::json!("Hillside"));
    }

    #[test]
    fn test_flag_set_parses_boolean() {
        let cli = Cli::try_parse_from(["campus", "flags", "set", "gallery", "false"]).unwrap();
        match cli.command {
            Commands::Flags {
                action: FlagCommands::Set { key, enabled, .. },
            } => {
                assert_eq!(key, "gallery");
                assert!(!enabled);
            }
            _ => panic!("expected flags set"),
        }
    }
}
