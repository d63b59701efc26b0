use anyhow::Result;

use super::Context;

pub fn run(ctx: &Context, account: &str, refresh_token: &str) -> Result<()> {
    ctx.tokens.import(account, refresh_token)?;

    eprintln!("Stored session for {}", account);
    eprintln!("\nRun `calsync sync {}` to pull your calendars.", account);

    Ok(())
}
