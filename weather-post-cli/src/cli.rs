use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::fmt::{self, Write as _};
use tracing::info;

use weather_post_core::{
    CacheConfig, City, Config, WeatherPost, WeatherService, city::burmese_name_for, condition_text,
    icon_asset,
};

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-post", version, about = "Burmese weather posts for social media")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a post for every supported city.
    Posts {
        /// Skip cached data and fetch fresh values.
        #[arg(long)]
        refresh: bool,

        /// Print JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Build the post for one city.
    Show {
        /// City name, e.g. "Yangon" or "chiang-mai".
        city: City,

        #[arg(long)]
        refresh: bool,

        #[arg(long)]
        json: bool,
    },

    /// Check the configured OpenWeather key and the cache backend.
    CheckKey,

    /// Drop cached weather and forecast entries.
    ClearCache {
        /// City whose entries should be removed.
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        city: Option<City>,

        /// Remove entries for every supported city.
        #[arg(long)]
        all: bool,
    },

    /// Set the API key and cache backend interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Posts { refresh, json } => {
                let service = build_service().await?;
                let mut posts = Vec::with_capacity(City::all().len());
                for city in City::all() {
                    posts.push(service.post(city.name(), refresh).await);
                }
                print_posts(&posts, json)?;
            }
            Command::Show { city, refresh, json } => {
                let service = build_service().await?;
                let post = service.post(city.name(), refresh).await;
                print_posts(std::slice::from_ref(&post), json)?;
            }
            Command::CheckKey => {
                let config = Config::load()?;
                let service = WeatherService::from_config(&config).await?;
                let cache = if service.resolver().cache().ping().await { "reachable" } else { "unreachable" };
                println!("Cache backend is {cache}.");

                if !config.has_api_key() {
                    println!("No OpenWeather API key configured. Run `weather-post configure`.");
                    return Ok(());
                }
                if service.is_key_valid().await {
                    println!("OpenWeather API key is valid.");
                } else {
                    println!("OpenWeather API key was rejected or the API is unreachable.");
                }
            }
            Command::ClearCache { city, all } => {
                let service = build_service().await?;
                let cities: Vec<City> = match (city, all) {
                    (_, true) => City::all().to_vec(),
                    (Some(city), false) => vec![city],
                    (None, false) => bail!("Pass a city name or --all"),
                };
                for city in &cities {
                    service.clear_cache(city.name()).await;
                }
                info!(count = cities.len(), "Cleared cache entries");
                println!("Cleared cache for {} city(ies).", cities.len());
            }
        }

        Ok(())
    }
}

async fn build_service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    WeatherService::from_config(&config).await
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    // Environment overrides are not persisted.
    let mut config = Config::load_from(&path)?;

    let key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.set_api_key(key.trim().to_string());
    }

    let backend = Select::new("Cache backend:", vec!["memory", "redis"])
        .prompt()
        .context("Failed to read cache backend")?;
    config.cache = match backend {
        "redis" => {
            let current = match &config.cache {
                CacheConfig::Redis { url } => url.clone(),
                CacheConfig::Memory => DEFAULT_REDIS_URL.to_string(),
            };
            let url = Text::new("Redis URL:")
                .with_default(&current)
                .prompt()
                .context("Failed to read Redis URL")?;
            CacheConfig::Redis { url }
        }
        _ => CacheConfig::Memory,
    };

    config.save_to(&path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn print_posts(posts: &[WeatherPost], json: bool) -> anyhow::Result<()> {
    if json {
        let out = match posts {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        println!("{out}");
    } else {
        for post in posts {
            println!("{}", render_card(post)?);
        }
    }
    Ok(())
}

/// Human-readable card for one post.
fn render_card(post: &WeatherPost) -> Result<String, fmt::Error> {
    let s = &post.snapshot;
    let mut out = String::new();

    writeln!(out, "== {} ({}) ==", s.city, burmese_name_for(&s.city))?;
    writeln!(out, "{}  {}°C", condition_text(s.condition, s.weather_code), s.temperature)?;
    if let Some(icon) = &s.icon {
        writeln!(out, "Icon: {}", icon_asset(icon))?;
    }
    writeln!(out, "Humidity: {}%   Wind: {} km/h", s.humidity, s.wind_speed)?;
    let source = if s.is_real_data { "Live data" } else { "Demo data" };
    writeln!(out, "Updated: {} ({source})", s.last_updated)?;

    if let Some(hourly) = &s.hourly_forecast {
        let row: Vec<String> = hourly.iter().map(|p| format!("{} {}°", p.time, p.temperature)).collect();
        writeln!(out, "{}", row.join(" | "))?;
    }

    writeln!(out, "{}", post.text)?;
    Ok(out)
}
