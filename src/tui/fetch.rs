use super::model::{Agenda, UPCOMING_LIMIT, UPCOMING_THRESHOLD};
use crate::components::CalendarProvider;
use crate::error::CalendarResult;
use tracing::warn;

/// Fetch everything the dashboard shows in one go
///
/// Today's events (plus upcoming ones when today is short) and the next event
/// are requested concurrently. A failing today/upcoming call fails the whole
/// fetch; a failing next-event call only drops the countdown.
pub async fn fetch_agenda<P>(provider: &P) -> CalendarResult<Agenda>
where
    P: CalendarProvider + ?Sized,
{
    let lists = async {
        let today = provider.fetch_today().await?;
        let upcoming = if today.len() < UPCOMING_THRESHOLD {
            provider.fetch_upcoming(UPCOMING_LIMIT, true).await?
        } else {
            Vec::new()
        };
        CalendarResult::Ok((today, upcoming))
    };

    let (lists, next) = tokio::join!(lists, provider.fetch_next());
    let (today, upcoming) = lists?;

    let next = match next {
        Ok(next) => next,
        Err(e) => {
            warn!("Failed to fetch next event from {}: {}", provider.name(), e);
            None
        }
    };

    Ok(Agenda {
        today,
        upcoming,
        next,
    })
}
