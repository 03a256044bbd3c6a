use crate::{Context, Error, BOT_COLOR};
use poise::serenity_prelude::{
    ComponentInteractionCollector, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};
use poise::CreateReply;

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// Splits entries into pages of `per_page`.
pub fn into_pages(entries: Vec<String>, per_page: usize) -> Vec<Vec<String>> {
    entries.chunks(per_page.max(1)).map(<[String]>::to_vec).collect()
}

fn create_page_embed(pages: &[Vec<String>], title: &str, page: usize) -> CreateEmbed {
    let per_page = pages.first().map_or(0, Vec::len);
    let current = pages.get(page).map(Vec::as_slice).unwrap_or_default();
    let total: usize = pages.iter().map(Vec::len).sum();
    CreateEmbed::default()
        .color(BOT_COLOR)
        .title(title)
        .description(current.join("\n"))
        .footer(CreateEmbedFooter::new(format!(
            "Page {}/{} - Showing entries {}-{} out of {}.",
            page + 1,
            pages.len(),
            page * per_page + 1,
            page * per_page + current.len(),
            total
        )))
}

pub async fn paginate(
    ctx: Context<'_>, pages: Vec<Vec<String>>, title: String, mut page: usize,
) -> Result<(), Error> {
    if pages.is_empty() {
        return Ok(());
    }
    let ctx_id = ctx.id();
    if page >= pages.len() {
        page = 0;
    }
    let prev_button_id = format!("{}prev", ctx_id);
    let next_button_id = format!("{}next", ctx_id);

    let mut reply = CreateReply::default().embed(create_page_embed(&pages, &title, page));
    if pages.len() > 1 {
        let components = CreateActionRow::Buttons(vec![
            CreateButton::new(&prev_button_id).label("◀"),
            CreateButton::new(&next_button_id).label("▶"),
        ]);
        reply = reply.components(vec![components]);
    }
    ctx.send(reply).await?;

    if pages.len() == 1 {
        return Ok(());
    }

    while let Some(press) = ComponentInteractionCollector::new(ctx)
        .filter(move |press| press.data.custom_id.starts_with(&ctx_id.to_string()))
        .timeout(std::time::Duration::from_secs(120))
        .await
    {
        if press.data.custom_id == next_button_id {
            page = (page + 1) % pages.len();
        } else {
            page = page.checked_sub(1).unwrap_or(pages.len() - 1);
        }

        press
            .create_response(
                ctx.serenity_context(),
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(create_page_embed(&pages, &title, page)),
                ),
            )
            .await?;
    }

    Ok(())
}

pub async fn send_ephemeral_text(ctx: Context<'_>, content: &str) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(content).ephemeral(true)).await?;
    Ok(())
}
