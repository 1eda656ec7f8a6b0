//! Command routing for inbound text.
//!
//! An ordered table of (pattern, enabled, command) entries. The first
//! enabled entry whose pattern matches anywhere in the text wins; if none
//! match, the text goes to the language model. Declaration order is the
//! only tie-breaker, so more specific patterns must come first.

use regex::Regex;

use crate::config::BotConfig;

pub const HELP_PATTERN: &str = r"(help|ヘルプ|へるぷ)";
pub const FAV_PATTERN: &str = r"(褒め|ほめ|ホメ|称え|たたえ)(ろ|て)";
pub const NEWS_PATTERN: &str = r"(ニュース|News|NEWS|news)";

/// What to do with an inbound text event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reply with usage text.
    Help,
    /// Acknowledge and react.
    Fav,
    /// Reply with a news summary.
    News,
    /// Default: reply with a language-model completion.
    Ask,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Fav => "fav",
            Command::News => "news",
            Command::Ask => "ask",
        }
    }
}

/// One row of the routing table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: Regex,
    pub enabled: bool,
    pub command: Command,
}

/// Result of routing: the command plus the text the pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub command: Command,
    pub matched: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct CommandRouter {
    routes: Vec<RouteEntry>,
}

impl CommandRouter {
    pub fn builder() -> CommandRouterBuilder {
        CommandRouterBuilder::default()
    }

    /// The standard table: help, fav, news.
    pub fn default_routes() -> Self {
        let routes = [
            (HELP_PATTERN, Command::Help),
            (FAV_PATTERN, Command::Fav),
            (NEWS_PATTERN, Command::News),
        ]
        .into_iter()
        .map(|(pattern, command)| RouteEntry {
            pattern: Regex::new(pattern).unwrap(),
            enabled: true,
            command,
        })
        .collect();
        Self { routes }
    }

    /// The standard table with configured routes disabled.
    pub fn from_config(config: &BotConfig) -> Self {
        let mut router = Self::default_routes();
        for entry in &mut router.routes {
            entry.enabled = config.is_command_enabled(entry.command.name());
        }
        router
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Route `text` to exactly one command.
    pub fn route<'a>(&self, text: &'a str) -> RouteMatch<'a> {
        self.routes
            .iter()
            .filter(|entry| entry.enabled)
            .find_map(|entry| {
                entry.pattern.find(text).map(|m| RouteMatch {
                    command: entry.command,
                    matched: Some(m.as_str()),
                })
            })
            .unwrap_or(RouteMatch {
                command: Command::Ask,
                matched: None,
            })
    }
}

/// Builder for constructing a CommandRouter.
#[derive(Default)]
pub struct CommandRouterBuilder {
    routes: Vec<RouteEntry>,
}

impl CommandRouterBuilder {
    /// Append a route. Routes are matched in the order they are added.
    pub fn route(mut self, pattern: &str, command: Command) -> Result<Self, regex::Error> {
        self.routes.push(RouteEntry {
            pattern: Regex::new(pattern)?,
            enabled: true,
            command,
        });
        Ok(self)
    }

    /// Append a route that is present but skipped.
    pub fn disabled_route(mut self, pattern: &str, command: Command) -> Result<Self, regex::Error> {
        self.routes.push(RouteEntry {
            pattern: Regex::new(pattern)?,
            enabled: false,
            command,
        });
        Ok(self)
    }

    pub fn build(self) -> CommandRouter {
        CommandRouter {
            routes: self.routes,
        }
    }
}
