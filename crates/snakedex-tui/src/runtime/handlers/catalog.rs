use snakedex_core::session::{SessionError, SessionGuard};
use snakedex_types::SnakeRecord;

use crate::events::{CatalogUiEvent, UiEvent};
use crate::overlays::FormId;

pub async fn fetch_snakes(guard: SessionGuard) -> UiEvent {
    let event = match guard.list_snakes().await {
        Ok(snakes) => CatalogUiEvent::Loaded { snakes },
        Err(e) => session_lost_or(e, |error| CatalogUiEvent::LoadFailed { error }),
    };
    UiEvent::Catalog(event)
}

pub async fn save_snake(
    guard: SessionGuard,
    form: FormId,
    original_binomial: Option<String>,
    record: SnakeRecord,
) -> UiEvent {
    let event = match guard.save_snake(original_binomial, record).await {
        Ok(()) => CatalogUiEvent::Saved { form },
        Err(e) => session_lost_or(e, |error| CatalogUiEvent::SaveFailed { form, error }),
    };
    UiEvent::Catalog(event)
}

pub async fn delete_snake(guard: SessionGuard, binomial: String) -> UiEvent {
    let event = match guard.delete_snake(binomial).await {
        Ok(()) => CatalogUiEvent::Deleted,
        Err(e) => session_lost_or(e, |error| CatalogUiEvent::DeleteFailed { error }),
    };
    UiEvent::Catalog(event)
}

fn session_lost_or(
    error: SessionError,
    failed: impl FnOnce(String) -> CatalogUiEvent,
) -> CatalogUiEvent {
    if error.requires_login() {
        CatalogUiEvent::SessionLost
    } else {
        failed(error.to_string())
    }
}
