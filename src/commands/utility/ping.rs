use crate::{Context, Error};

/// Check that the bot is alive
///
/// !ping
#[poise::command(prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Nakara Muji").await?;
    Ok(())
}
