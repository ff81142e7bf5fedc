//! One-shot command handlers
//!
//! Each handler drives the workflows the same way an operator would, then
//! renders the resulting tree.

use crate::render;
use anyhow::{anyhow, bail, Context, Result};
use async_lock::RwLock;
use eventlens_app::selectors::event_rows;
use eventlens_app::workflows::explorer;
use eventlens_app::{AddressId, AppCore, AppError, EventGuid, ReduceOutcome, UserId, ViewState};
use std::sync::Arc;

/// Shared store handle used by every command.
pub type App = Arc<RwLock<AppCore>>;

/// Attach the error category and a hint to workflow errors.
pub(crate) fn explain(err: AppError) -> anyhow::Error {
    let context = format!("{} error. {}", err.category(), err.resolution_hint());
    anyhow!(err).context(context)
}

fn require_applied(outcome: &ReduceOutcome, what: &str) -> Result<()> {
    match outcome {
        ReduceOutcome::Applied => Ok(()),
        ReduceOutcome::Ignored(reason) => bail!("{what}: {reason}"),
        ReduceOutcome::Discarded(stale) => bail!("{what}: {stale}"),
    }
}

/// `eventlens users`
pub async fn users(app: &App) -> Result<String> {
    explorer::load_users(app).await.map_err(explain)?;
    let state = explorer::snapshot(app).await;
    Ok(render::users(state.user_ids()))
}

async fn open_user(app: &App, user: &str) -> Result<()> {
    let user = UserId::new(user).context("Invalid user id")?;
    explorer::select_user(app, user).await.map_err(explain)?;
    Ok(())
}

async fn open_address(app: &App, user: &str, address: &str) -> Result<()> {
    open_user(app, user).await?;
    let address = AddressId::new(address).context("Invalid address id")?;
    let dispatch = explorer::select_address(app, address)
        .await
        .map_err(explain)?;
    require_applied(&dispatch.outcome, "Cannot open address")
}

/// `eventlens addresses <user> [--all]`
pub async fn addresses(app: &App, user: &str, include_deleted: bool) -> Result<String> {
    open_user(app, user).await?;
    let state = explorer::snapshot(app).await;
    Ok(render::addresses(&state, include_deleted))
}

/// `eventlens events <user> <address>`
pub async fn events(app: &App, user: &str, address: &str) -> Result<String> {
    open_address(app, user, address).await?;
    let state = explorer::snapshot(app).await;
    Ok(render::events(&state))
}

/// Resolve an event given as a list index or a guid.
pub fn resolve_event(state: &ViewState, selector: &str) -> Result<EventGuid> {
    let rows = event_rows(state);
    if let Ok(index) = selector.parse::<usize>() {
        return rows
            .get(index)
            .map(|row| row.guid.clone())
            .ok_or_else(|| anyhow!("No event at index {index} ({} listed)", rows.len()));
    }
    let guid: EventGuid = selector
        .parse()
        .with_context(|| format!("'{selector}' is neither an index nor an event guid"))?;
    if !rows.iter().any(|row| row.guid == guid) {
        bail!("Event {guid} is not listed for this address");
    }
    Ok(guid)
}

/// `eventlens compare <user> <address> <first> <second>`
pub async fn compare(
    app: &App,
    user: &str,
    address: &str,
    first: &str,
    second: &str,
    show_unchanged: bool,
) -> Result<String> {
    open_address(app, user, address).await?;

    let state = explorer::snapshot(app).await;
    let guids = [resolve_event(&state, first)?, resolve_event(&state, second)?];
    if guids[0] == guids[1] {
        bail!("Pick two different events to compare");
    }
    for guid in guids {
        let dispatch = explorer::toggle_event(app, guid)
            .await
            .map_err(explain)?;
        require_applied(&dispatch.outcome, "Cannot select event")?;
    }

    let dispatch = explorer::request_comparison(app).await.map_err(explain)?;
    require_applied(&dispatch.outcome, "Cannot compare")?;

    let state = explorer::snapshot(app).await;
    let pair = state
        .comparison()
        .ok_or_else(|| anyhow!("Comparison did not load"))?;
    Ok(render::diff_table(&pair.rows(), show_unchanged))
}
