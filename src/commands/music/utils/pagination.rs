//! Button-driven paginated embeds, used by `/queue` and `/lyrics`.
//!
//! `Pager` is the pure page arithmetic. `paginate` runs the interaction loop:
//! it waits for a button press on the pager message, checks who pressed it,
//! applies the press to the `Pager` and edits the message in place, until the
//! pager is closed or nobody presses anything for the configured timeout.

use poise::serenity_prelude as serenity;
use poise::CreateReply;
use serenity::all::{
    ButtonStyle, ComponentInteraction, ComponentInteractionCollector, CreateActionRow,
    CreateButton, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use tracing::debug;

use super::dj_permissions::member_is_dj;
use crate::{CommandResult, Context};

/// Longest text put on one page. Embed descriptions allow 4096 characters.
pub const PAGE_CHAR_LIMIT: usize = 4000;

/// A button on the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    First,
    Prev,
    Next,
    Last,
    Close,
}

impl PagerAction {
    const ALL: [PagerAction; 5] = [
        PagerAction::First,
        PagerAction::Prev,
        PagerAction::Next,
        PagerAction::Last,
        PagerAction::Close,
    ];

    fn suffix(self) -> &'static str {
        match self {
            PagerAction::First => "first",
            PagerAction::Prev => "prev",
            PagerAction::Next => "next",
            PagerAction::Last => "last",
            PagerAction::Close => "close",
        }
    }

    fn emoji(self) -> char {
        match self {
            PagerAction::First => '⏮',
            PagerAction::Prev => '◀',
            PagerAction::Next => '▶',
            PagerAction::Last => '⏭',
            PagerAction::Close => '✖',
        }
    }

    /// Button id for this action in the pager identified by `prefix`.
    pub fn custom_id(self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.suffix())
    }

    /// Parses a button id produced by `custom_id` with the same prefix.
    pub fn from_custom_id(prefix: &str, custom_id: &str) -> Option<Self> {
        let suffix = custom_id.strip_prefix(prefix)?.strip_prefix('_')?;
        Self::ALL.into_iter().find(|action| action.suffix() == suffix)
    }
}

/// Result of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerStep {
    Show(usize),
    Close,
}

/// Current page of a fixed number of pages. Navigation clamps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    pages: usize,
}

impl Pager {
    pub fn new(pages: usize) -> Self {
        Self {
            page: 0,
            pages: pages.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn apply(&mut self, action: PagerAction) -> PagerStep {
        self.page = match action {
            PagerAction::First => 0,
            PagerAction::Prev => self.page.saturating_sub(1),
            PagerAction::Next => (self.page + 1).min(self.pages - 1),
            PagerAction::Last => self.pages - 1,
            PagerAction::Close => return PagerStep::Close,
        };
        PagerStep::Show(self.page)
    }

    fn enabled(&self, action: PagerAction) -> bool {
        match action {
            PagerAction::First | PagerAction::Prev => self.page > 0,
            PagerAction::Next | PagerAction::Last => self.page + 1 < self.pages,
            PagerAction::Close => true,
        }
    }

    /// The button row; every button disabled once `expired`.
    pub fn buttons(&self, prefix: &str, expired: bool) -> Vec<CreateActionRow> {
        let buttons = PagerAction::ALL
            .into_iter()
            .map(|action| {
                CreateButton::new(action.custom_id(prefix))
                    .emoji(action.emoji())
                    .style(if action == PagerAction::Close {
                        ButtonStyle::Danger
                    } else {
                        ButtonStyle::Secondary
                    })
                    .disabled(expired || !self.enabled(action))
            })
            .collect();
        vec![CreateActionRow::Buttons(buttons)]
    }
}

/// Groups `lines` into pages of at most `per_page` lines.
pub fn paginate_lines(lines: &[String], per_page: usize) -> Vec<String> {
    lines
        .chunks(per_page.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

/// Splits `text` into pages of at most `max_chars` characters, breaking on
/// line boundaries. A single line longer than a page is split mid-line.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let mut line: Vec<char> = line.chars().collect();

        while line.len() > max_chars {
            if !current.is_empty() {
                pages.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = line.split_off(max_chars);
            pages.push(line.into_iter().collect());
            line = rest;
        }

        let needed = if current.is_empty() { line.len() } else { current_len + 1 + line.len() };
        if needed > max_chars {
            pages.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current_len += line.len();
        current.extend(line);
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Where the interaction loop is.
enum PagerState {
    /// Waiting for the next button press.
    Awaiting,
    /// A press arrived and is being applied.
    Handling(Box<ComponentInteraction>),
    /// No press within the timeout; buttons get disabled.
    Expired,
    /// Closed by a user; buttons are already gone.
    Stopped,
}

fn page_embed(title: &str, pages: &[String], pager: &Pager) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(title)
        .description(pages.get(pager.page()).map(String::as_str).unwrap_or_default())
        .color(0x00ff00);
    if pager.pages() > 1 {
        embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{}",
            pager.page() + 1,
            pager.pages()
        )));
    }
    embed
}

/// Sends `pages` as one embed titled `title` and runs the pager until it is
/// closed or times out. Buttons answer the invoking user and DJs only.
pub async fn paginate(ctx: Context<'_>, title: &str, pages: Vec<String>) -> CommandResult {
    let prefix = format!("pager_{}", ctx.id());
    let timeout = ctx.data().config.pagination_timeout;
    let mut pager = Pager::new(pages.len());

    let reply = ctx
        .send(
            CreateReply::default()
                .embed(page_embed(title, &pages, &pager))
                .components(pager.buttons(&prefix, false)),
        )
        .await?;

    let message_id = reply.message().await?.id;
    let mut state = PagerState::Awaiting;

    loop {
        state = match state {
            PagerState::Awaiting => {
                let filter_prefix = prefix.clone();
                let press = ComponentInteractionCollector::new(ctx.serenity_context())
                    .message_id(message_id)
                    .filter(move |press| press.data.custom_id.starts_with(&filter_prefix))
                    .timeout(timeout)
                    .await;
                match press {
                    Some(press) => PagerState::Handling(Box::new(press)),
                    None => PagerState::Expired,
                }
            }
            PagerState::Handling(press) => {
                let Some(action) = PagerAction::from_custom_id(&prefix, &press.data.custom_id)
                else {
                    state = PagerState::Awaiting;
                    continue;
                };

                let allowed = press.user.id == ctx.author().id
                    || press
                        .member
                        .as_ref()
                        .is_some_and(|member| member_is_dj(&ctx.data().settings, member));

                if !allowed {
                    debug!("{} pressed someone else's pager", press.user.name);
                    press
                        .create_response(
                            ctx.serenity_context(),
                            CreateInteractionResponse::Message(
                                CreateInteractionResponseMessage::new()
                                    .content("Only the person who ran this command or a DJ can use these buttons.")
                                    .ephemeral(true),
                            ),
                        )
                        .await?;
                    PagerState::Awaiting
                } else {
                    let (components, next) = match pager.apply(action) {
                        PagerStep::Show(_) => (pager.buttons(&prefix, false), PagerState::Awaiting),
                        PagerStep::Close => (Vec::new(), PagerState::Stopped),
                    };
                    press
                        .create_response(
                            ctx.serenity_context(),
                            CreateInteractionResponse::UpdateMessage(
                                CreateInteractionResponseMessage::new()
                                    .embed(page_embed(title, &pages, &pager))
                                    .components(components),
                            ),
                        )
                        .await?;
                    next
                }
            }
            PagerState::Expired => {
                reply
                    .edit(
                        ctx,
                        CreateReply::default()
                            .embed(page_embed(title, &pages, &pager))
                            .components(pager.buttons(&prefix, true)),
                    )
                    .await?;
                break;
            }
            PagerState::Stopped => break,
        };
    }

    Ok(())
}
