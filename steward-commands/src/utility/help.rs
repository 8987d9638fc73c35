use tracing::warn;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use steward_core::Context;
use steward_utils::{
    embed::build_page_embed,
    pagination::{PageContent, PageInfo, SessionOptions, total_pages},
    transport::ResponseTarget,
};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help [page|category]",
};

const HELP_COMMANDS_PER_PAGE: usize = 20;
const HELP_TITLE: &str = "Available Commands";

/// What `!help` was asked to show.
#[derive(Debug, PartialEq, Eq)]
enum HelpQuery<'a> {
    /// One-based page of the full catalogue.
    Page(usize),
    Category(&'a str),
}

fn parse_query(arg1: Option<&str>) -> HelpQuery<'_> {
    match arg1 {
        None => HelpQuery::Page(1),
        Some(raw) => match raw.parse::<usize>() {
            Ok(page) if page >= 1 => HelpQuery::Page(page),
            _ => HelpQuery::Category(raw),
        },
    }
}

/// Render the command catalog as an owner-bound paginated message.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let query = parse_query(arg1);

    let mut categories: Vec<&str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();

    let (category, requested_page) = match query {
        HelpQuery::Category(wanted) if !categories.contains(&wanted) => {
            let out = unknown_category_message(wanted, &categories);
            http.create_message(msg.channel_id).content(&out).await?;
            return Ok(());
        }
        HelpQuery::Category(wanted) => (Some(wanted), 1),
        HelpQuery::Page(page) => (None, page),
    };

    let commands = sorted_commands(category);
    let total = total_pages(commands.len(), HELP_COMMANDS_PER_PAGE);

    if requested_page > total {
        let out = page_out_of_range_message(requested_page, total);
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let options = SessionOptions {
        per_page: HELP_COMMANDS_PER_PAGE,
        empty_text: no_commands_message(category),
        start_page: requested_page - 1,
        ..SessionOptions::owned_by(msg.author.id.get())
    };

    ctx.sessions
        .paginator()
        .start(
            &ResponseTarget::Channel(msg.channel_id),
            commands.as_slice(),
            &options,
            render_help_page,
        )
        .await?;

    Ok(())
}

fn render_help_page(commands: &[&'static CommandMeta], page: PageInfo) -> PageContent {
    let description = grouped_help_description(commands);

    match build_page_embed(HELP_TITLE, description.clone(), page, None) {
        Ok(embed) => PageContent::embed(embed),
        Err(source) => {
            warn!(?source, page = page.index + 1, "help page embed rejected; sending as text");
            PageContent::text(description)
        }
    }
}

/// One bold header per category followed by its commands.
fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category = None;

    for command in commands {
        if current_category != Some(command.category) {
            if current_category.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", capitalize(command.category)));
            current_category = Some(command.category);
        }
        out.push_str(&format!("`{}` - {}\n", command.usage, command.desc));
    }

    out.trim_end().to_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unknown_category_message(wanted: &str, categories: &[&str]) -> String {
    format!(
        "Unknown category `{wanted}`. Available categories: {}.",
        categories.join(", ")
    )
}

fn page_out_of_range_message(requested: usize, total: usize) -> String {
    format!("Page {requested} does not exist. Available pages: 1-{total}.")
}

fn no_commands_message(category: Option<&str>) -> String {
    match category {
        Some(category) => format!("No commands in category `{category}`."),
        None => "No commands available.".to_owned(),
    }
}

fn sorted_commands(category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| match category {
            Some(wanted) => cmd.category == wanted,
            None => true,
        })
        .collect();

    filtered.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });

    filtered
}
