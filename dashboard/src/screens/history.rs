use std::cmp::Reverse;

use hidrosafe_core::{ApiError, HistoryEvent};

use crate::service::ApiService;

/// Highest numeric id first. Ids that are not numbers go last; ties keep
/// their arrival order.
pub fn sort_newest_first(events: &mut [HistoryEvent]) {
    events.sort_by_key(|e| Reverse(e.numeric_id()));
}

pub async fn load_history(api: &ApiService) -> Result<Vec<HistoryEvent>, ApiError> {
    let mut events = api.fetch_history().await?;
    sort_newest_first(&mut events);
    Ok(events)
}
